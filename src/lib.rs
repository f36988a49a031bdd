//! sten provides strided, read-only views over a shared buffer of `f32`
//! elements.
//!
//! # Buffers and views
//!
//! A buffer is created by [arange] or [arange_shape] and is never modified
//! afterwards. Each [View] holds a reference-counted handle to a buffer plus
//! a layout: an offset, a shape and (possibly negative) strides which map
//! multi-dimensional indices to buffer positions. The buffer is freed when
//! the last view referencing it is dropped.
//!
//! # Slicing
//!
//! [View::index] takes one [Slice] per dimension and returns a new view over
//! the same buffer. Each slice has an optional start, stop and step:
//!
//! ```
//! use sten::prelude::*;
//! use sten::{arange, Slice};
//!
//! let t = arange(16).unwrap();
//! let u = t.index(Slice::new(Some(1), Some(14), Some(2))).unwrap();
//! assert_eq!(u.shape(), &[7]);
//! assert_eq!(u.to_vec(), [1., 3., 5., 7., 9., 11., 13.]);
//!
//! let v = u.index(Slice::new(Some(1), None, Some(2))).unwrap();
//! assert_eq!(v.to_vec(), [3., 7., 11.]);
//! ```
//!
//! Slicing twice is equivalent to slicing once with the two slices composed
//! by [Slice::apply]:
//!
//! ```
//! use sten::{arange, Slice};
//!
//! let a = Slice::new(Some(1), Some(14), Some(2));
//! let b = Slice::new(Some(1), None, Some(2));
//! let t = arange(16).unwrap();
//! let c = a.apply(&b).unwrap();
//! assert_eq!(t.index(c).unwrap(), t.index(a).unwrap().index(b).unwrap());
//! ```
//!
//! # Serialization
//!
//! Views can be serialized using [serde](https://serde.rs) if the `serde`
//! feature is enabled. The serialized form contains the shape and the
//! elements in row-major order, eg. `{"shape": [3], "data": [3.0, 7.0, 11.0]}`.

pub mod errors;
mod index_iterator;
pub mod layout;
pub mod slice;
pub mod storage;

mod impl_debug;
#[cfg(feature = "serde")]
mod impl_serialize;
mod tensor;

// Re-exports for convenience.
pub use errors::{ErrorKind, FromDataError, IndexError, ParseSliceError, SliceError};
pub use index_iterator::{DynIndex, Indices};
pub use layout::{Layout, StridedLayout};
pub use slice::{apply_all, DynSlices, IntoSlices, Slice};
pub use storage::BufferRecord;
pub use tensor::{arange, arange_shape, Iter, View};

/// This module provides a convenient way to import the most common traits
/// from this library via a glob import.
pub mod prelude {
    pub use super::{IntoSlices, Layout};
}
