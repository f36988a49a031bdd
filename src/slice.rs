use std::fmt::{Debug, Display, Formatter};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::FromStr;

use smallvec::SmallVec;

use crate::errors::{ParseSliceError, SliceError};

/// Selects a subset of one dimension of a view.
///
/// Each of `start`, `stop` and `step` is optional. Unset fields take a default
/// that depends on the dimension being sliced: `start` defaults to 0, `stop`
/// to the size of the dimension and `step` to 1.
///
/// Unlike NumPy, negative `start` and `stop` values do not count back from
/// the end of the dimension. They are used as-is, so `Slice::new(Some(-1),
/// None, None)` on a dimension of size 4 selects positions `-1..4`.
///
/// Slices can be constructed from Rust ranges, eg. `Slice::from(2..5)`, or
/// parsed from text in `start:stop:step` form, eg. `"1:14:2".parse()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Slice {
    /// First position in the range, inclusive.
    pub start: Option<isize>,

    /// Position at which the range ends, exclusive.
    pub stop: Option<isize>,

    /// Distance between selected positions. Must be non-zero when the slice
    /// is used to index a view.
    pub step: Option<isize>,
}

impl Slice {
    #[inline]
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Slice {
        Slice { start, stop, step }
    }

    /// Return a slice which selects the whole dimension.
    #[inline]
    pub fn full() -> Slice {
        Slice::default()
    }

    /// Return a slice from `start` to `stop` with a step of 1.
    #[inline]
    pub fn range(start: isize, stop: isize) -> Slice {
        Slice::new(Some(start), Some(stop), None)
    }

    /// Return a copy of this slice with `step` set.
    #[inline]
    pub fn with_step(self, step: isize) -> Slice {
        Slice {
            step: Some(step),
            ..self
        }
    }

    /// Return true if all fields are unset.
    pub fn is_full(&self) -> bool {
        *self == Slice::full()
    }

    /// Compose this slice with `other`, which is applied to the result of
    /// this one.
    ///
    /// The result `c` satisfies `x.index([c]) == x.index([self])?.index([other])`
    /// for any 1D view `x` where both sides are valid, provided `other`'s
    /// bounds lie within the extent selected by `self`. Positions in `other`
    /// are in the index space of `self`'s result, so they are scaled by this
    /// slice's step and shifted by its start.
    ///
    /// Fails with [`SliceError::Overflow`] if the composed start, stop or
    /// step does not fit in `isize`.
    pub fn apply(&self, other: &Slice) -> Result<Slice, SliceError> {
        let self_start = self.start.unwrap_or(0);
        let self_step = self.step.unwrap_or(1);

        // Map a position in the result of `self` to a position in its input.
        let map_pos = |pos: isize| {
            self_step
                .checked_mul(pos)
                .and_then(|delta| self_start.checked_add(delta))
                .ok_or(SliceError::Overflow)
        };

        let step = if self.step.is_none() && other.step.is_none() {
            None
        } else {
            let step = self_step
                .checked_mul(other.step.unwrap_or(1))
                .ok_or(SliceError::Overflow)?;
            Some(step)
        };

        let start = if self.start.is_none() && other.start.is_none() {
            None
        } else {
            Some(map_pos(other.start.unwrap_or(0))?)
        };

        // An unset stop in `other` inherits whatever bound `self` has.
        let stop = match other.stop {
            Some(other_stop) => Some(map_pos(other_stop)?),
            None => self.stop,
        };

        Ok(Slice { start, stop, step })
    }

    /// Resolve unset fields against a dimension of size `dim_size`.
    ///
    /// Returns `None` if the step is zero. A `dim_size` above `isize::MAX`
    /// saturates; views never have dimensions that large.
    #[inline]
    pub fn resolve(&self, dim_size: usize) -> Option<ResolvedSlice> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return None;
        }
        Some(ResolvedSlice {
            start: self.start.unwrap_or(0),
            stop: self
                .stop
                .unwrap_or_else(|| dim_size.try_into().unwrap_or(isize::MAX)),
            step,
        })
    }

    /// Return the number of positions this slice selects from a dimension of
    /// size `dim_size`, or `None` if the step is zero.
    pub fn steps(&self, dim_size: usize) -> Option<usize> {
        self.resolve(dim_size).map(|r| r.steps())
    }
}

/// A [`Slice`] whose fields have been resolved against a dimension size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSlice {
    pub start: isize,
    pub stop: isize,

    /// Non-zero step.
    pub step: isize,
}

impl ResolvedSlice {
    /// Return the number of positions visited stepping from `start` towards
    /// `stop`, excluding `stop`. This is zero if `stop` is not in the
    /// direction of `step`.
    pub fn steps(&self) -> usize {
        // Widen so that `stop - start` cannot overflow.
        let span = self.stop as i128 - self.start as i128;
        let step = self.step as i128;
        if (step > 0 && span <= 0) || (step < 0 && span >= 0) {
            return 0;
        }
        let steps = (span.abs() + step.abs() - 1) / step.abs();
        steps.try_into().unwrap_or(usize::MAX)
    }
}

impl Display for Slice {
    /// Format as `start:stop` or `start:stop:step`, leaving unset fields
    /// empty.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn field(f: &mut Formatter<'_>, value: Option<isize>) -> std::fmt::Result {
            match value {
                Some(value) => write!(f, "{}", value),
                None => Ok(()),
            }
        }
        field(f, self.start)?;
        write!(f, ":")?;
        field(f, self.stop)?;
        if self.step.is_some() {
            write!(f, ":")?;
            field(f, self.step)?;
        }
        Ok(())
    }
}

impl FromStr for Slice {
    type Err = ParseSliceError;

    /// Parse a slice in `start:stop` or `start:stop:step` form. Any field may
    /// be empty, eg. `"::2"` or `":"`.
    fn from_str(s: &str) -> Result<Slice, ParseSliceError> {
        let fields: SmallVec<[&str; 3]> = s.split(':').map(str::trim).collect();
        if fields.len() < 2 {
            return Err(ParseSliceError::MissingSeparator);
        }
        if fields.len() > 3 {
            return Err(ParseSliceError::TooManyFields);
        }

        let parse = |field: Option<&&str>| -> Result<Option<isize>, ParseSliceError> {
            match field {
                None => Ok(None),
                Some(field) if field.is_empty() => Ok(None),
                Some(field) => field
                    .parse()
                    .map(Some)
                    .map_err(|_| ParseSliceError::InvalidInteger(field.to_string())),
            }
        };

        Ok(Slice {
            start: parse(fields.first())?,
            stop: parse(fields.get(1))?,
            step: parse(fields.get(2))?,
        })
    }
}

impl<T> From<Range<T>> for Slice
where
    T: TryInto<isize>,
    <T as TryInto<isize>>::Error: Debug,
{
    fn from(r: Range<T>) -> Slice {
        let start = r.start.try_into().expect("range start exceeds isize");
        let stop = r.end.try_into().expect("range end exceeds isize");
        Slice::range(start, stop)
    }
}

impl<T> From<RangeTo<T>> for Slice
where
    T: TryInto<isize>,
    <T as TryInto<isize>>::Error: Debug,
{
    fn from(r: RangeTo<T>) -> Slice {
        let stop = r.end.try_into().expect("range end exceeds isize");
        Slice::new(None, Some(stop), None)
    }
}

impl<T> From<RangeFrom<T>> for Slice
where
    T: TryInto<isize>,
    <T as TryInto<isize>>::Error: Debug,
{
    fn from(r: RangeFrom<T>) -> Slice {
        let start = r.start.try_into().expect("range start exceeds isize");
        Slice::new(Some(start), None, None)
    }
}

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice::full()
    }
}

/// Dynamically sized array of [`Slice`]s, which avoids allocating in the
/// common case where the length is small.
pub type DynSlices = SmallVec<[Slice; 4]>;

/// Compose two lists of per-dimension slices positionally, using
/// [`Slice::apply`].
///
/// Fails if the lists have different lengths, or any composition overflows.
pub fn apply_all(first: &[Slice], second: &[Slice]) -> Result<DynSlices, SliceError> {
    if first.len() != second.len() {
        return Err(SliceError::DimCountMismatch {
            expected: first.len(),
            actual: second.len(),
        });
    }
    first.iter().zip(second).map(|(a, b)| a.apply(b)).collect()
}

/// Used to convert sequences of slices into a uniform `[Slice]` array that
/// can be used to index a view.
///
/// This trait is implemented for:
///
///  - Individual slices and ranges (types satisfying `Into<Slice>`)
///  - Arrays of slices or ranges
///  - Tuples of slices and/or ranges, up to length 4
///  - `&[Slice]` and `Vec<Slice>`
pub trait IntoSlices {
    type Array: AsRef<[Slice]>;

    fn into_slices(self) -> Self::Array;
}

impl<'a> IntoSlices for &'a [Slice] {
    type Array = &'a [Slice];

    fn into_slices(self) -> &'a [Slice] {
        self
    }
}

impl IntoSlices for Vec<Slice> {
    type Array = Vec<Slice>;

    fn into_slices(self) -> Vec<Slice> {
        self
    }
}

impl IntoSlices for DynSlices {
    type Array = DynSlices;

    fn into_slices(self) -> DynSlices {
        self
    }
}

impl<const N: usize, T: Into<Slice>> IntoSlices for [T; N] {
    type Array = [Slice; N];

    fn into_slices(self) -> [Slice; N] {
        self.map(|x| x.into())
    }
}

impl<T: Into<Slice>> IntoSlices for T {
    type Array = [Slice; 1];

    fn into_slices(self) -> [Slice; 1] {
        [self.into()]
    }
}

impl<T1: Into<Slice>> IntoSlices for (T1,) {
    type Array = [Slice; 1];

    fn into_slices(self) -> [Slice; 1] {
        [self.0.into()]
    }
}

impl<T1: Into<Slice>, T2: Into<Slice>> IntoSlices for (T1, T2) {
    type Array = [Slice; 2];

    fn into_slices(self) -> [Slice; 2] {
        [self.0.into(), self.1.into()]
    }
}

impl<T1: Into<Slice>, T2: Into<Slice>, T3: Into<Slice>> IntoSlices for (T1, T2, T3) {
    type Array = [Slice; 3];

    fn into_slices(self) -> [Slice; 3] {
        [self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<T1: Into<Slice>, T2: Into<Slice>, T3: Into<Slice>, T4: Into<Slice>> IntoSlices
    for (T1, T2, T3, T4)
{
    type Array = [Slice; 4];

    fn into_slices(self) -> [Slice; 4] {
        [self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}
