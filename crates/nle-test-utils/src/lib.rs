//! Test utilities for NLE development.
//!
//! - [`ScriptedEngine`]: a deterministic in-process [`Engine`] that needs
//!   no shared library, with an [`EngineProbe`] to observe its calls.
//! - [`ObsBuffers`]: one correctly shaped buffer per slot.
//! - [`RawArray`] and [`NotAnArray`]: array-likes with arbitrary or no
//!   layout, for exercising validation failures.
//!
//! [`Engine`]: nle_session::Engine

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
mod scripted;

pub use fixtures::{NotAnArray, ObsBuffers, RawArray};
pub use scripted::{EngineProbe, ScriptedEngine, ScriptedHandle};
