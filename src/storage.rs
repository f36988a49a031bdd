use smallvec::SmallVec;

/// Backing store of elements shared by one or more views.
///
/// A buffer is created once, by [`arange`](crate::arange) or
/// [`arange_shape`](crate::arange_shape), and is never mutated afterwards.
/// Views hold it via an [`Arc`](std::sync::Arc), so it is freed when the last
/// view referencing it is dropped.
#[derive(Debug, PartialEq)]
pub struct BufferRecord {
    elements: Box<[f32]>,

    /// Shape the buffer was created with.
    original_shape: SmallVec<[usize; 4]>,
}

impl BufferRecord {
    pub(crate) fn new(elements: Vec<f32>, original_shape: &[usize]) -> BufferRecord {
        debug_assert_eq!(
            elements.len(),
            original_shape.iter().product::<usize>(),
            "element count does not match shape"
        );
        BufferRecord {
            elements: elements.into_boxed_slice(),
            original_shape: original_shape.into(),
        }
    }

    /// Return the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Return the element at a signed position, or `None` if the position is
    /// outside the buffer.
    #[inline]
    pub fn get(&self, position: isize) -> Option<f32> {
        let position: usize = position.try_into().ok()?;
        self.elements.get(position).copied()
    }

    /// Return true if every position in `min..=max` lies inside the buffer.
    ///
    /// An empty range is always contained.
    pub fn contains_range(&self, min: isize, max: isize) -> bool {
        min > max || (min >= 0 && (max as usize) < self.len())
    }

    /// Return the elements in storage order.
    pub fn as_slice(&self) -> &[f32] {
        &self.elements
    }

    pub fn original_shape(&self) -> &[usize] {
        &self.original_shape
    }
}
