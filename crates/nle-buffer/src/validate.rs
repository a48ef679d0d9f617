//! Exact-match validation of caller buffers.
//!
//! Checks run in a fixed order and stop at the first violation:
//! array-like, element type, rank, shape, layout. No conversion is ever
//! attempted; a mismatch here would become out-of-bounds writes inside the
//! engine.

use nle_core::{DType, Element};
use thiserror::Error;

use crate::array::ArrayLike;

/// Why a buffer was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The value does not expose type, shape, and strides.
    #[error("buffer is not array-like")]
    NotArrayLike,
    /// The element type differs from the required one.
    #[error("element type mismatch: expected {expected}, found {found}")]
    ElementTypeMismatch {
        /// Required element type.
        expected: DType,
        /// Element type of the buffer.
        found: DType,
    },
    /// The number of dimensions differs.
    #[error("wrong rank: expected {expected} dimensions, found {found}")]
    WrongRank {
        /// Required number of dimensions.
        expected: usize,
        /// Dimensions of the buffer.
        found: usize,
    },
    /// At least one dimension has the wrong extent.
    #[error("wrong shape: expected {expected:?}, found {found:?}")]
    WrongShape {
        /// Required shape.
        expected: Vec<usize>,
        /// Shape of the buffer.
        found: Vec<usize>,
    },
    /// The elements are not dense and row-major.
    #[error("array is not C-contiguous")]
    NotContiguous,
    /// The data pointer is not aligned for the element type.
    #[error("array data is not aligned to {align} bytes")]
    Misaligned {
        /// Required alignment in bytes.
        align: usize,
    },
}

/// Coarse classification of a [`ValidationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Not array-like, or wrong element type.
    Type,
    /// Wrong rank or wrong dimension sizes.
    Shape,
    /// Not contiguous or misaligned.
    Layout,
}

impl ValidationError {
    /// The class this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotArrayLike | Self::ElementTypeMismatch { .. } => ErrorClass::Type,
            Self::WrongRank { .. } | Self::WrongShape { .. } => ErrorClass::Shape,
            Self::NotContiguous | Self::Misaligned { .. } => ErrorClass::Layout,
        }
    }
}

/// Raw typed pointer into a validated buffer.
///
/// The view does not keep the memory alive; pair it with the buffer's
/// [`BufferHold`](crate::BufferHold).
#[derive(Debug, PartialEq, Eq)]
pub struct TypedView<T> {
    ptr: *mut T,
    len: usize,
}

impl<T> Clone for TypedView<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedView<T> {}

impl<T: Element> TypedView<T> {
    /// Pointer to the first element.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Number of elements covered by the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view covers no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Validates `buffer` against `T` and `shape` and returns a view into it.
///
/// `None` means "no buffer supplied" and yields `Ok(None)`: opting out of a
/// slot is not an error.
///
/// # Errors
///
/// Returns the first failed check as a [`ValidationError`].
pub fn validate_and_view<T: Element>(
    buffer: Option<&dyn ArrayLike>,
    shape: &[usize],
) -> Result<Option<TypedView<T>>, ValidationError> {
    let Some(buffer) = buffer else {
        return Ok(None);
    };
    let desc = buffer.describe().ok_or(ValidationError::NotArrayLike)?;

    if desc.dtype != T::DTYPE {
        return Err(ValidationError::ElementTypeMismatch {
            expected: T::DTYPE,
            found: desc.dtype,
        });
    }
    if desc.ndim() != shape.len() {
        return Err(ValidationError::WrongRank {
            expected: shape.len(),
            found: desc.ndim(),
        });
    }
    if desc.shape.as_slice() != shape {
        return Err(ValidationError::WrongShape {
            expected: shape.to_vec(),
            found: desc.shape.to_vec(),
        });
    }
    if !desc.is_c_contiguous() {
        return Err(ValidationError::NotContiguous);
    }
    let align = std::mem::align_of::<T>();
    if (desc.data as usize) % align != 0 {
        return Err(ValidationError::Misaligned { align });
    }

    Ok(Some(TypedView {
        ptr: desc.data.cast::<T>(),
        len: desc.len(),
    }))
}
