use std::iter::FusedIterator;

use smallvec::{smallvec, SmallVec};

/// The index type used for views.
pub type DynIndex = SmallVec<[usize; 4]>;

/// Iterator over all multi-indices of a shape, in row-major order.
///
/// The number of dimensions may be zero, in which case the iterator will yield
/// a single empty index. This is consistent with eg. `ndindex` in NumPy.
#[derive(Clone, Debug)]
pub struct Indices {
    shape: DynIndex,
    next: Option<DynIndex>,

    /// Remaining iteration steps.
    steps: usize,
}

impl Indices {
    /// Return an iterator over all the indices where each dimension is between
    /// `0` and `shape[dim]`.
    ///
    /// The number of steps saturates at `usize::MAX`.
    pub fn from_shape(shape: &[usize]) -> Indices {
        let steps = if shape.contains(&0) {
            0
        } else {
            shape
                .iter()
                .try_fold(1usize, |acc, &size| acc.checked_mul(size))
                .unwrap_or(usize::MAX)
        };
        Indices {
            shape: shape.into(),
            next: (steps > 0).then(|| smallvec![0; shape.len()]),
            steps,
        }
    }
}

impl Iterator for Indices {
    type Item = DynIndex;

    /// Return the next index in the sequence, or `None` after all indices
    /// have been returned.
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.steps -= 1;

        let mut next = current.clone();
        let mut has_next = false;
        for (index, &size) in next.iter_mut().zip(self.shape.iter()).rev() {
            *index += 1;
            if *index == size {
                *index = 0;
            } else {
                has_next = true;
                break;
            }
        }
        self.next = has_next.then_some(next);

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.steps, Some(self.steps))
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}

#[cfg(test)]
mod tests {
    use super::{DynIndex, Indices};

    fn collect(shape: &[usize]) -> Vec<Vec<usize>> {
        Indices::from_shape(shape).map(|ix| ix.to_vec()).collect()
    }

    #[test]
    fn test_indices() {
        // Empty iterator
        let mut iter = Indices::from_shape(&[3, 0]);
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);

        // Empty, with other dims whose product overflows
        let mut iter = Indices::from_shape(&[usize::MAX, usize::MAX, 0]);
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);

        // Scalar index iterator
        let mut iter = Indices::from_shape(&[]);
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some(DynIndex::new()));
        assert_eq!(iter.next(), None);

        assert_eq!(collect(&[3]), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(
            collect(&[2, 2]),
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );

        // Dims of size 1 are skipped over.
        assert_eq!(
            collect(&[2, 1, 2]),
            vec![vec![0, 0, 0], vec![0, 0, 1], vec![1, 0, 0], vec![1, 0, 1]]
        );
    }

    #[test]
    fn test_indices_size_hint() {
        let mut iter = Indices::from_shape(&[2, 3]);
        assert_eq!(iter.size_hint(), (6, Some(6)));
        iter.next();
        assert_eq!(iter.size_hint(), (5, Some(5)));
        let rest: Vec<_> = iter.by_ref().collect();
        assert_eq!(rest.len(), 5);
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }
}
