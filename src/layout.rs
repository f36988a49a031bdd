use std::iter::zip;

use smallvec::{smallvec, SmallVec};

use crate::errors::SliceError;
use crate::index_iterator::Indices;
use crate::slice::Slice;

/// Layouts describe the shape of a view, ie. the number of dimensions and
/// size of each, and the mapping between indices and positions in the
/// buffer.
///
/// Positions are signed. Strides may be negative, and the offset of an empty
/// view is not required to lie inside the buffer.
pub trait Layout {
    /// Return the position of the element at index `(0, ..., 0)`.
    fn offset(&self) -> isize;

    /// Returns an array of the sizes of each dimension.
    fn shape(&self) -> &[usize];

    /// Returns an array of the strides of each dimension.
    fn strides(&self) -> &[isize];

    /// Return the number of dimensions.
    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Returns the number of elements in the view.
    ///
    /// Saturates at `usize::MAX`. Empty views may have other dimensions whose
    /// sizes multiply past it.
    fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.shape()
            .iter()
            .try_fold(1usize, |acc, &size| acc.checked_mul(size))
            .unwrap_or(usize::MAX)
    }

    /// Returns true if the view has no elements.
    fn is_empty(&self) -> bool {
        self.shape().iter().any(|&size| size == 0)
    }

    /// Returns the size of the dimension `dim`.
    fn size(&self, dim: usize) -> usize {
        self.shape()[dim]
    }

    /// Returns the offset between adjacent indices along dimension `dim`.
    fn stride(&self, dim: usize) -> isize {
        self.strides()[dim]
    }

    /// Map an index to a buffer position, or return `None` if the index has
    /// the wrong length or is out of bounds along any dimension.
    fn try_offset(&self, index: &[usize]) -> Option<isize> {
        if index.len() != self.ndim() {
            return None;
        }
        let mut position = self.offset();
        for ((&idx, &size), &stride) in zip(zip(index, self.shape()), self.strides()) {
            if idx >= size {
                return None;
            }
            let idx: isize = idx.try_into().ok()?;
            position = position.checked_add(idx.checked_mul(stride)?)?;
        }
        Some(position)
    }

    /// Return the smallest and largest positions reachable from valid indices,
    /// or `None` if the view is empty or a position overflows `isize`.
    fn position_range(&self) -> Option<(isize, isize)> {
        if self.is_empty() {
            return None;
        }
        let mut min = self.offset();
        let mut max = self.offset();
        for (&size, &stride) in zip(self.shape(), self.strides()) {
            let last: isize = (size - 1).try_into().ok()?;
            let extent = last.checked_mul(stride)?;
            if extent < 0 {
                min = min.checked_add(extent)?;
            } else {
                max = max.checked_add(extent)?;
            }
        }
        Some((min, max))
    }

    /// Return true if this layout describes a contiguous view, where the
    /// logical order of elements matches the order in which they are stored.
    fn is_contiguous(&self) -> bool {
        let mut product = 1isize;
        for (&size, &stride) in zip(self.shape(), self.strides()).rev() {
            // Dimensions of size 1 cannot affect whether the view is
            // contiguous, since the only valid index is 0.
            if size == 1 {
                continue;
            }
            if stride != product {
                return false;
            }
            let Some(next) = isize::try_from(size)
                .ok()
                .and_then(|size| product.checked_mul(size))
            else {
                return false;
            };
            product = next;
        }
        true
    }

    /// Return an iterator over all valid indices in this view.
    fn indices(&self) -> Indices {
        Indices::from_shape(self.shape())
    }
}

/// Shape, strides and offset of a view with a dynamic number of dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StridedLayout {
    offset: isize,
    shape: SmallVec<[usize; 4]>,
    strides: SmallVec<[isize; 4]>,
}

impl StridedLayout {
    /// Construct a layout with dimension sizes given by `shape`, offset zero
    /// and contiguous row-major strides.
    pub(crate) fn from_shape(shape: &[usize]) -> StridedLayout {
        let mut strides: SmallVec<[isize; 4]> = smallvec![0; shape.len()];
        let mut stride = 1isize;
        for (dim_stride, &size) in strides.iter_mut().zip(shape).rev() {
            *dim_stride = stride;
            stride = stride.saturating_mul(size as isize);
        }
        StridedLayout {
            offset: 0,
            shape: shape.into(),
            strides,
        }
    }

    /// Compute the layout of a view after slicing each dimension with the
    /// corresponding entry in `slices`.
    ///
    /// For each dimension the new size is the number of positions visited
    /// stepping from the slice's start towards its stop, the new stride is
    /// the old stride multiplied by the step, and the slice's start, scaled
    /// by the old stride, is added to the offset.
    ///
    /// Fails with [`SliceError::OutOfBounds`] if a new dimension size exceeds
    /// `isize::MAX` or the offset or strides overflow. It does not check that
    /// the result fits inside any particular buffer.
    pub(crate) fn try_slice(&self, slices: &[Slice]) -> Result<StridedLayout, SliceError> {
        if slices.len() != self.ndim() {
            return Err(SliceError::DimCountMismatch {
                expected: self.ndim(),
                actual: slices.len(),
            });
        }

        let mut shape = SmallVec::with_capacity(self.ndim());
        let mut strides = SmallVec::with_capacity(self.ndim());
        let mut offset = self.offset;

        for (dim, ((&size, &stride), slice)) in
            zip(zip(&self.shape, &self.strides), slices).enumerate()
        {
            let resolved = slice.resolve(size).ok_or(SliceError::ZeroStep { dim })?;
            let new_size = resolved.steps();
            if isize::try_from(new_size).is_err() {
                return Err(SliceError::OutOfBounds);
            }
            shape.push(new_size);
            strides.push(
                stride
                    .checked_mul(resolved.step)
                    .ok_or(SliceError::OutOfBounds)?,
            );
            offset = resolved
                .start
                .checked_mul(stride)
                .and_then(|delta| offset.checked_add(delta))
                .ok_or(SliceError::OutOfBounds)?;
        }

        Ok(StridedLayout {
            offset,
            shape,
            strides,
        })
    }
}

impl Layout for StridedLayout {
    #[inline]
    fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    fn strides(&self) -> &[isize] {
        &self.strides
    }
}

#[cfg(test)]
mod tests {
    use sten_testing::TestCases;

    use super::{Layout, StridedLayout};
    use crate::errors::SliceError;
    use crate::slice::Slice;

    #[test]
    fn test_from_shape() {
        let layout = StridedLayout::from_shape(&[2, 3, 4]);
        assert_eq!(layout.shape(), &[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.offset(), 0);
        assert_eq!(layout.len(), 24);
        assert!(layout.is_contiguous());

        let scalar = StridedLayout::from_shape(&[]);
        assert_eq!(scalar.ndim(), 0);
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar.try_offset(&[]), Some(0));
    }

    #[test]
    fn test_try_slice() {
        #[derive(Debug)]
        struct Case<'a> {
            shape: &'a [usize],
            slices: &'a [Slice],
            expected_shape: &'a [usize],
            expected_strides: &'a [isize],
            expected_offset: isize,
        }

        let cases = [
            // Identity.
            Case {
                shape: &[4, 4],
                slices: &[Slice::full(), Slice::full()],
                expected_shape: &[4, 4],
                expected_strides: &[4, 1],
                expected_offset: 0,
            },
            Case {
                shape: &[16],
                slices: &[Slice::new(Some(1), Some(14), Some(2))],
                expected_shape: &[7],
                expected_strides: &[2],
                expected_offset: 1,
            },
            // Offsets from each dimension accumulate.
            Case {
                shape: &[4, 4],
                slices: &[Slice::range(1, 3), Slice::new(Some(2), None, None)],
                expected_shape: &[2, 2],
                expected_strides: &[4, 1],
                expected_offset: 6,
            },
            // Every other column.
            Case {
                shape: &[4, 4],
                slices: &[Slice::full(), Slice::full().with_step(2)],
                expected_shape: &[4, 2],
                expected_strides: &[4, 2],
                expected_offset: 0,
            },
            // Stop before start gives an empty dimension.
            Case {
                shape: &[8],
                slices: &[Slice::range(6, 2)],
                expected_shape: &[0],
                expected_strides: &[1],
                expected_offset: 6,
            },
            // Reversed rows.
            Case {
                shape: &[3, 2],
                slices: &[Slice::new(Some(2), Some(-1), Some(-1)), Slice::full()],
                expected_shape: &[3, 2],
                expected_strides: &[-2, 1],
                expected_offset: 4,
            },
            // Scalar.
            Case {
                shape: &[],
                slices: &[],
                expected_shape: &[],
                expected_strides: &[],
                expected_offset: 0,
            },
        ];

        cases.test_each(|case| {
            let layout = StridedLayout::from_shape(case.shape);
            let sliced = layout.try_slice(case.slices).unwrap();
            assert_eq!(sliced.shape(), case.expected_shape);
            assert_eq!(sliced.strides(), case.expected_strides);
            assert_eq!(sliced.offset(), case.expected_offset);
        })
    }

    #[test]
    fn test_try_slice_invalid() {
        let layout = StridedLayout::from_shape(&[4, 4]);
        assert_eq!(
            layout.try_slice(&[Slice::full()]),
            Err(SliceError::DimCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            layout.try_slice(&[Slice::full(), Slice::full().with_step(0)]),
            Err(SliceError::ZeroStep { dim: 1 })
        );
    }

    #[test]
    fn test_try_offset() {
        let layout = StridedLayout::from_shape(&[2, 3]);
        assert_eq!(layout.try_offset(&[1, 2]), Some(5));
        assert_eq!(layout.try_offset(&[2, 0]), None);
        assert_eq!(layout.try_offset(&[0]), None);

        let reversed = layout
            .try_slice(&[Slice::full(), Slice::new(Some(2), Some(-1), Some(-1))])
            .unwrap();
        assert_eq!(reversed.try_offset(&[0, 0]), Some(2));
        assert_eq!(reversed.try_offset(&[1, 2]), Some(3));
    }

    #[test]
    fn test_position_range() {
        let layout = StridedLayout::from_shape(&[2, 3]);
        assert_eq!(layout.position_range(), Some((0, 5)));

        let reversed = layout
            .try_slice(&[Slice::new(Some(1), Some(-1), Some(-1)), Slice::full()])
            .unwrap();
        assert_eq!(reversed.position_range(), Some((0, 5)));

        let empty = layout
            .try_slice(&[Slice::range(1, 1), Slice::full()])
            .unwrap();
        assert_eq!(empty.position_range(), None);
    }

    #[test]
    fn test_len_of_empty_layout_with_huge_dims() {
        let layout = StridedLayout::from_shape(&[1, 2, 0]);
        let huge = isize::MAX;
        let sliced = layout
            .try_slice(&[Slice::range(0, huge), Slice::range(0, huge), Slice::full()])
            .unwrap();
        assert_eq!(sliced.shape(), &[huge as usize, huge as usize, 0]);
        assert!(sliced.is_empty());
        assert_eq!(sliced.len(), 0);
        assert_eq!(sliced.indices().count(), 0);
    }

    #[test]
    fn test_try_slice_rejects_oversized_dim() {
        let layout = StridedLayout::from_shape(&[1, 2, 0]);
        assert_eq!(
            layout.try_slice(&[
                Slice::range(isize::MIN, isize::MAX),
                Slice::full(),
                Slice::full()
            ]),
            Err(SliceError::OutOfBounds)
        );
    }

    #[test]
    fn test_is_contiguous() {
        let layout = StridedLayout::from_shape(&[4, 4]);
        assert!(layout.is_contiguous());
        assert!(layout
            .try_slice(&[Slice::range(1, 3), Slice::full()])
            .unwrap()
            .is_contiguous());
        assert!(!layout
            .try_slice(&[Slice::full(), Slice::range(0, 2)])
            .unwrap()
            .is_contiguous());
    }
}
