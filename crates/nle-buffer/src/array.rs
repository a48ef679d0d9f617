//! The seam between caller-owned memory and the validator.

use std::any::Any;
use std::fmt;

use crate::descriptor::ArrayDescriptor;

/// Caller memory that may be usable as a dense typed array.
///
/// Implementations only describe memory; they never copy it. A value that
/// cannot expose type, shape, and strides returns `None` from
/// [`describe`](ArrayLike::describe) and is rejected as not array-like.
///
/// # Safety
///
/// A session hands the described memory to the engine, which writes
/// through it. Whenever [`describe`](ArrayLike::describe) returns a
/// C-contiguous descriptor whose `data` is aligned for its element type,
/// `data` must address `len * itemsize` bytes that:
///
/// - are valid for writes and may be mutated through a shared reference
///   (no `&T`/`&mut T` to them is live outside an `UnsafeCell`);
/// - stay allocated and in place while the hold from
///   [`retain`](ArrayLike::retain) exists or, for implementations that
///   return [`BufferHold::none()`], until the caller rebinds or closes the
///   session.
///
/// Descriptors that fail validation are never written through.
///
/// Implementing the trait requires `unsafe`:
///
/// ```compile_fail
/// use nle_buffer::{ArrayDescriptor, ArrayLike, BufferHold};
///
/// struct Frozen;
///
/// impl ArrayLike for Frozen {
///     fn describe(&self) -> Option<ArrayDescriptor> {
///         None
///     }
///     fn retain(&self) -> BufferHold {
///         BufferHold::none()
///     }
/// }
/// ```
#[allow(unsafe_code)]
pub unsafe trait ArrayLike {
    /// Type, shape, and stride description, or `None` if not array-like.
    fn describe(&self) -> Option<ArrayDescriptor>;

    /// An extended hold that keeps the described memory alive and at a
    /// fixed address for as long as the hold exists.
    ///
    /// Callers that manage the lifetime themselves (raw C memory) return
    /// [`BufferHold::none()`].
    fn retain(&self) -> BufferHold;
}

/// Joint-ownership token for bound caller memory.
///
/// Dropping the hold releases the claim; the memory itself stays owned by
/// the caller.
pub struct BufferHold(Option<Box<dyn Any + Send>>);

impl BufferHold {
    /// Wraps any owning handle (an `Arc`, a Python reference, ...).
    pub fn new<H: Any + Send>(handle: H) -> Self {
        Self(Some(Box::new(handle)))
    }

    /// A hold that keeps nothing alive.
    pub fn none() -> Self {
        Self(None)
    }

    /// Whether this hold owns anything.
    pub fn is_held(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for BufferHold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BufferHold")
            .field(&if self.is_held() { "held" } else { "none" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn hold_extends_shared_ownership() {
        let owner = Arc::new([0u8; 4]);
        let hold = BufferHold::new(Arc::clone(&owner));
        assert!(hold.is_held());
        assert_eq!(Arc::strong_count(&owner), 2);
        drop(hold);
        assert_eq!(Arc::strong_count(&owner), 1);
    }

    #[test]
    fn empty_hold_owns_nothing() {
        let hold = BufferHold::none();
        assert!(!hold.is_held());
        assert_eq!(format!("{hold:?}"), "BufferHold(\"none\")");
    }
}
