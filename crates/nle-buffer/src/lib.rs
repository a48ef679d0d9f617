//! Validation of caller-owned output buffers.
//!
//! The engine writes observation data straight into caller memory using
//! raw stores sized by its compiled-in geometry. This crate decides whether
//! a piece of caller memory is safe to hand over: exact element type,
//! exact shape, dense row-major layout. It never copies or allocates.
//!
//! - [`ArrayLike`] is the seam callers implement (numpy arrays, C
//!   descriptors, [`SharedBuffer`]).
//! - [`validate_and_view`] runs the checks and yields a [`TypedView`].
//! - [`BufferHold`] keeps the backing memory alive while it is bound.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod descriptor;
pub mod shared;
pub mod validate;

pub use array::{ArrayLike, BufferHold};
pub use descriptor::ArrayDescriptor;
pub use shared::{SharedBuffer, SharedElement};
pub use validate::{validate_and_view, ErrorClass, TypedView, ValidationError};
