use std::sync::Arc;

use crate::errors::{FromDataError, IndexError, SliceError};
use crate::index_iterator::{DynIndex, Indices};
use crate::layout::{Layout, StridedLayout};
use crate::slice::IntoSlices;
use crate::storage::BufferRecord;

/// A strided view of a shared, immutable buffer of `f32` elements.
///
/// A view consists of a reference-counted [`BufferRecord`] plus a
/// [`StridedLayout`] which maps multi-dimensional indices to positions in the
/// buffer. Slicing a view with [`index`](View::index) produces a new view over
/// the same buffer; the buffer's elements are never copied or modified.
///
/// Views can only be created by [`arange`], [`arange_shape`] or by slicing
/// an existing view, so every view's layout has been validated against its
/// buffer.
#[derive(Clone)]
pub struct View {
    data: Arc<BufferRecord>,

    // Constructors must ensure that, if the layout is non-empty, every index
    // that is valid for it maps to a position inside `data`.
    layout: StridedLayout,
}

/// Create a new buffer containing `0.0, 1.0, ... end - 1` and return a 1D
/// view of it.
///
/// Fails if `end` is negative.
pub fn arange(end: isize) -> Result<View, FromDataError> {
    let len: usize = end
        .try_into()
        .map_err(|_| FromDataError::NegativeLength(end))?;
    arange_shape(&[len])
}

/// Create a new buffer containing `0.0, 1.0, ...` with enough elements to fill
/// `shape`, and return a contiguous view of it with that shape.
///
/// An empty `shape` creates a single-element buffer and a 0D (scalar) view.
///
/// Fails if any dimension or the total element count exceeds `isize::MAX`.
pub fn arange_shape(shape: &[usize]) -> Result<View, FromDataError> {
    if shape.iter().any(|&size| isize::try_from(size).is_err()) {
        return Err(FromDataError::TooLarge);
    }
    let len = shape
        .iter()
        .try_fold(1usize, |acc, &size| acc.checked_mul(size))
        .filter(|&len| isize::try_from(len).is_ok())
        .ok_or(FromDataError::TooLarge)?;
    let elements: Vec<f32> = (0..len).map(|x| x as f32).collect();
    let data = Arc::new(BufferRecord::new(elements, shape));
    log::trace!("created buffer of {} elements with shape {:?}", len, shape);
    Ok(View::from_parts(data, StridedLayout::from_shape(shape)))
}

impl View {
    /// Create a view from a buffer and a layout that is known to be valid
    /// for it.
    fn from_parts(data: Arc<BufferRecord>, layout: StridedLayout) -> View {
        debug_assert!(layout
            .position_range()
            .map(|(min, max)| data.contains_range(min, max))
            .unwrap_or(true));
        View { data, layout }
    }

    /// Slice the view using one [`Slice`](crate::Slice) per dimension and
    /// return a new view over the same buffer.
    ///
    /// Unset slice fields default to `start = 0`, `stop = size of dimension`
    /// and `step = 1`. Dimensions where `stop` is not reachable from `start`
    /// in the direction of `step` become empty.
    ///
    /// Fails if the number of slices differs from the number of dimensions,
    /// if any step is zero or if the result is non-empty and would reach
    /// positions outside the buffer. `self` is unchanged in every case.
    pub fn index<R: IntoSlices>(&self, slices: R) -> Result<View, SliceError> {
        let slices = slices.into_slices();
        let slices = slices.as_ref();

        let layout = self.layout.try_slice(slices)?;
        if let Some((min, max)) = layout.position_range() {
            if !self.data.contains_range(min, max) {
                return Err(SliceError::OutOfBounds);
            }
        } else if !layout.is_empty() {
            // Non-empty, but the range of positions overflows.
            return Err(SliceError::OutOfBounds);
        }

        log::trace!(
            "sliced view {:?} with {:?} -> offset {} shape {:?} strides {:?}",
            self.shape(),
            slices,
            layout.offset(),
            layout.shape(),
            layout.strides()
        );
        Ok(View::from_parts(self.data.clone(), layout))
    }

    /// Return the element at `index`.
    ///
    /// Fails if `index` has the wrong number of entries, or any entry is not
    /// less than the size of its dimension. Any access into a view with an
    /// empty dimension therefore fails.
    pub fn element_at(&self, index: &[usize]) -> Result<f32, IndexError> {
        if index.len() != self.ndim() {
            return Err(IndexError::DimCountMismatch {
                expected: self.ndim(),
                actual: index.len(),
            });
        }
        self.layout
            .try_offset(index)
            .and_then(|position| self.data.get(position))
            .ok_or(IndexError::OutOfBounds)
    }

    /// Return the element at `index`, or `None` if the index is invalid.
    #[inline]
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.element_at(index).ok()
    }

    /// Return the single element of a view with one element, eg. a 0D view.
    pub fn item(&self) -> Option<f32> {
        if self.len() != 1 {
            return None;
        }
        self.layout
            .position_range()
            .and_then(|(position, _)| self.data.get(position))
    }

    /// Return an iterator over elements in logical (row-major) order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            view: self,
            indices: self.indices(),
        }
    }

    /// Return a copy of the elements in logical order.
    pub fn to_vec(&self) -> Vec<f32> {
        if self.is_contiguous() {
            if let Some(elements) = self.contiguous_data() {
                return elements.to_vec();
            }
        }
        self.iter().collect()
    }

    /// Return the buffer elements covered by a non-empty contiguous view.
    fn contiguous_data(&self) -> Option<&[f32]> {
        let (min, max) = self.layout.position_range()?;
        let start: usize = min.try_into().ok()?;
        let end: usize = max.try_into().ok()?;
        self.data.as_slice().get(start..=end)
    }

    /// Return the layout of this view.
    pub fn layout(&self) -> &StridedLayout {
        &self.layout
    }

    /// Return true if `self` and `other` are views of the same buffer.
    pub fn shares_buffer(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Return the shape that the underlying buffer was created with.
    pub fn original_shape(&self) -> &[usize] {
        self.data.original_shape()
    }

    /// Return the number of elements in the underlying buffer.
    pub fn buffer_len(&self) -> usize {
        self.data.len()
    }
}

impl Layout for View {
    #[inline]
    fn offset(&self) -> isize {
        self.layout.offset()
    }

    #[inline]
    fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    fn strides(&self) -> &[isize] {
        self.layout.strides()
    }
}

impl PartialEq for View {
    /// Views are equal if they have the same shape and elements, regardless
    /// of layout or buffer.
    fn eq(&self, other: &View) -> bool {
        self.shape() == other.shape() && self.iter().eq(other.iter())
    }
}

/// Iterator over the elements of a [`View`] in logical order.
pub struct Iter<'a> {
    view: &'a View,
    indices: Indices,
}

impl Iterator for Iter<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let index: DynIndex = self.indices.next()?;
        let position = self.view.layout.try_offset(&index)?;

        // Positions of valid indices are checked against the buffer when the
        // view is created.
        self.view.data.get(position)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a View {
    type Item = f32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
