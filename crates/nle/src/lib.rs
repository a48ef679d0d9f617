//! NLE: a session bridge for driving a NetHack engine over caller-owned
//! observation buffers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all NLE sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use nle::prelude::*;
//!
//! // An engine that ends every episode after three steps.
//! struct ThreeTurns(u32);
//! impl Engine for ThreeTurns {
//!     type Handle = ();
//!     fn start(&mut self, obs: &mut ObsRecord) -> Result<(), EngineError> {
//!         self.0 = 0;
//!         obs.done = 0;
//!         Ok(())
//!     }
//!     fn step(&mut self, _: &mut (), obs: &mut ObsRecord) -> Result<(), EngineError> {
//!         self.0 += 1;
//!         obs.done = i32::from(self.0 == 3);
//!         Ok(())
//!     }
//!     fn reset(&mut self, _: &mut (), obs: &mut ObsRecord) -> Result<(), EngineError> {
//!         self.start(obs)
//!     }
//!     fn end(&mut self, _: ()) {}
//! }
//!
//! let glyphs = SharedBuffer::<i16>::zeros(&GRID_SHAPE);
//! let mut session = Session::new(ThreeTurns(0));
//! session.bind_buffers(&BufferSet::new().with(Slot::Glyphs, &glyphs)).unwrap();
//! session.reset().unwrap();
//! while !session.done() {
//!     session.step(0).unwrap();
//! }
//! assert!(session.step(0).is_err());
//! session.close();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `nle-core` | Element types, slot table, constants, glyph predicates, descriptors |
//! | [`buffer`] | `nle-buffer` | Buffer validation and shared buffers |
//! | [`session`] | `nle-session` | Session controller, engine trait, shared-library engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Element types, the slot table, and the NetHack constant surface
/// (`nle-core`).
///
/// Glyph predicates live in [`types::glyph`], named constants in
/// [`types::nethack`].
pub use nle_core as types;

/// Buffer validation (`nle-buffer`).
///
/// Implement [`buffer::ArrayLike`] to offer your own memory to a session.
pub use nle_buffer as buffer;

/// Session controller and engines (`nle-session`).
///
/// [`session::Session`] drives any [`session::Engine`];
/// [`session::DlEngine`] loads the real one from a shared library.
pub use nle_session as session;

/// Common imports for typical NLE usage.
pub mod prelude {
    // Core
    pub use nle_core::{DType, Element, Long, Slot, GRID_SHAPE};

    // Buffers
    pub use nle_buffer::{ArrayLike, SharedBuffer, ValidationError};

    // Sessions
    pub use nle_session::{
        BufferSet, DlEngine, Engine, EngineError, ObsRecord, Session, SessionConfig,
        SessionError, SessionState,
    };
}
