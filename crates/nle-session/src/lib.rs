//! Session controller for a NetHack engine instance.
//!
//! A [`Session`] owns one engine handle and one [`ObsRecord`]. Callers bind
//! their own buffers into the record's slots with
//! [`bind_buffers`](Session::bind_buffers), then drive the engine with
//! [`reset`](Session::reset) and [`step`](Session::step). The engine writes
//! each turn straight into the bound memory; nothing is copied back.
//!
//! # State machine
//!
//! ```text
//! Unstarted --reset--> Running --step--> Done --reset--> Running ...
//!     any state --close--> Closed   (terminal)
//!     engine failure ----> Failed   (only close remains legal)
//! ```
//!
//! Engines plug in through the [`Engine`] trait. [`DlEngine`] loads the
//! real engine from a shared library; tests use the scripted engine from
//! `nle-test-utils`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod dl;
pub mod engine;
pub mod error;
pub mod obs;
pub mod session;

pub use config::{SessionConfig, DLPATH_ENV, LIBRARY_ENV};
pub use dl::{DlContext, DlEngine};
pub use engine::{Engine, EngineOp};
pub use error::{BindError, ConfigError, EngineError, SessionError};
pub use obs::{BufferSet, ObsRecord};
pub use session::{Session, SessionState};
