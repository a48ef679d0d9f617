//! Error types for the session controller.
//!
//! Three families, matching how a caller recovers:
//! - [`BindError`]: a buffer was rejected; fix the buffer and rebind.
//! - [`SessionError::IllegalState`]: the call is not legal in the current
//!   state; no engine interaction happened.
//! - [`EngineError`]: the engine itself failed; the session is unusable.

use std::path::PathBuf;

use nle_buffer::{ErrorClass, ValidationError};
use nle_core::Slot;
use thiserror::Error;

use crate::engine::EngineOp;
use crate::session::SessionState;

/// A caller buffer was rejected for one slot.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot bind '{slot}': {source}")]
pub struct BindError {
    /// Slot the buffer was offered for.
    pub slot: Slot,
    /// The failed check.
    #[source]
    pub source: ValidationError,
}

impl BindError {
    /// Coarse class of the underlying validation failure.
    pub fn class(&self) -> ErrorClass {
        self.source.class()
    }
}

/// Invalid session configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The engine path is empty.
    #[error("engine path is empty")]
    EmptyPath,
    /// The engine path cannot be passed to C.
    #[error("engine path contains an interior NUL byte")]
    InteriorNul,
    /// Nothing exists at the engine path.
    #[error("engine library not found at '{}'", .0.display())]
    NotFound(PathBuf),
    /// The environment does not name an engine path.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    /// No loader library was configured.
    #[error("no loader library configured (set NLE_LIBRARY)")]
    MissingLibrary,
    /// The loader and the game library are the same file.
    #[error("loader library '{}' is the game library itself", .0.display())]
    LoaderIsGameLibrary(PathBuf),
}

/// The engine failed or could not be loaded.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration was rejected before loading.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The shared library could not be opened.
    #[error("failed to load engine library '{}': {source}", .path.display())]
    Load {
        /// Library path.
        path: PathBuf,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },
    /// A required entry point is missing from the library.
    #[error("engine library '{}' does not export '{symbol}': {source}", .path.display())]
    MissingSymbol {
        /// Library path.
        path: PathBuf,
        /// Symbol name.
        symbol: &'static str,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },
    /// An engine lifecycle operation failed.
    #[error("engine {op} failed: {reason}")]
    Failed {
        /// The failing operation.
        op: EngineOp,
        /// Human-readable description.
        reason: String,
    },
}

/// Errors from [`Session`](crate::Session) operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A buffer was rejected; bindings are unchanged.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// The operation is not legal in the current state.
    #[error("illegal call: {operation} while session is {state}")]
    IllegalState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the session was in.
        state: SessionState,
    },
    /// The engine failed; the session must be closed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nle_core::DType;

    #[test]
    fn bind_error_names_slot_and_cause() {
        let err = BindError {
            slot: Slot::Glyphs,
            source: ValidationError::ElementTypeMismatch {
                expected: DType::I16,
                found: DType::I32,
            },
        };
        assert_eq!(
            err.to_string(),
            "cannot bind 'glyphs': element type mismatch: expected int16, found int32"
        );
        assert_eq!(err.class(), ErrorClass::Type);
    }

    #[test]
    fn illegal_state_message() {
        let err = SessionError::IllegalState {
            operation: "step",
            state: SessionState::Done,
        };
        assert_eq!(err.to_string(), "illegal call: step while session is done");
    }

    #[test]
    fn engine_failure_message() {
        let err = EngineError::Failed {
            op: EngineOp::Reset,
            reason: "out of memory".into(),
        };
        assert_eq!(err.to_string(), "engine reset failed: out of memory");
    }

    #[test]
    fn config_error_is_transparent() {
        let err = EngineError::from(ConfigError::EmptyPath);
        assert_eq!(err.to_string(), "engine path is empty");
    }
}
