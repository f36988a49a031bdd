//! Error types that are reported by view construction, slicing and element
//! access.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Broad classification of the errors in this module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// An argument is malformed or inconsistent with the view it is used with.
    InvalidArgument,

    /// An index or computed element position lies outside the valid range.
    OutOfBounds,
}

/// Errors that can occur when slicing a view with [`View::index`](crate::View::index).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// The number of slices does not match the number of dimensions.
    DimCountMismatch { expected: usize, actual: usize },

    /// The slice for dimension `dim` has a step of zero.
    ZeroStep { dim: usize },

    /// The sliced view is non-empty and some of its elements map to positions
    /// outside the buffer.
    OutOfBounds,

    /// Composing two slices produced a start, stop or step which does not
    /// fit in `isize`.
    Overflow,
}

impl SliceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SliceError::DimCountMismatch { .. } | SliceError::ZeroStep { .. } => {
                ErrorKind::InvalidArgument
            }
            SliceError::OutOfBounds | SliceError::Overflow => ErrorKind::OutOfBounds,
        }
    }
}

impl Display for SliceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceError::DimCountMismatch { expected, actual } => write!(
                f,
                "expected {} slices for view with {} dims, got {}",
                expected, expected, actual
            ),
            SliceError::ZeroStep { dim } => write!(f, "slice step for dim {} is zero", dim),
            SliceError::OutOfBounds => write!(f, "slice selects elements outside the buffer"),
            SliceError::Overflow => write!(f, "composed slice overflows isize"),
        }
    }
}

impl Error for SliceError {}

/// Errors that can occur when creating a new buffer and its initial view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FromDataError {
    /// The requested length is negative.
    NegativeLength(isize),

    /// The element count of the requested shape overflows `usize`, or a
    /// dimension is larger than `isize::MAX`.
    TooLarge,
}

impl FromDataError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl Display for FromDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FromDataError::NegativeLength(len) => write!(f, "length {} is negative", len),
            FromDataError::TooLarge => write!(f, "shape has too many elements"),
        }
    }
}

impl Error for FromDataError {}

/// Errors that can occur when reading an element from a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// The index has a different number of entries than the view has dims.
    DimCountMismatch { expected: usize, actual: usize },

    /// The index is outside the view's shape, or maps to a position outside
    /// the buffer.
    OutOfBounds,
}

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexError::DimCountMismatch { .. } => ErrorKind::InvalidArgument,
            IndexError::OutOfBounds => ErrorKind::OutOfBounds,
        }
    }
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexError::DimCountMismatch { expected, actual } => write!(
                f,
                "index has {} entries but view has {} dims",
                actual, expected
            ),
            IndexError::OutOfBounds => write!(f, "index is out of bounds"),
        }
    }
}

impl Error for IndexError {}

/// Errors that can occur when parsing a slice from its `start:stop:step`
/// text form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseSliceError {
    /// The text has no `:` separator.
    MissingSeparator,

    /// The text has more than three `:`-separated fields.
    TooManyFields,

    /// A field is not empty and not an integer.
    InvalidInteger(String),
}

impl ParseSliceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl Display for ParseSliceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseSliceError::MissingSeparator => write!(f, "slice has no \":\" separator"),
            ParseSliceError::TooManyFields => write!(f, "slice has more than 3 fields"),
            ParseSliceError::InvalidInteger(field) => {
                write!(f, "slice field \"{}\" is not an integer", field)
            }
        }
    }
}

impl Error for ParseSliceError {}
