//! C-compatible status codes.
//!
//! [`NleStatus`] is a `repr(i32)` enum returned by every FFI function.
//! Conversions from the session and validation error types are provided.

use nle_buffer::ValidationError;
use nle_session::{BindError, ConfigError, EngineError, SessionError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NleStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// A pointer argument is null or otherwise unusable.
    InvalidArgument = -2,
    /// A buffer does not describe an array.
    NotArrayLike = -3,
    /// A buffer has the wrong element type.
    ElementTypeMismatch = -4,
    /// A buffer has the wrong number of dimensions.
    WrongRank = -5,
    /// A buffer has the wrong dimension sizes.
    WrongShape = -6,
    /// A buffer is not dense, row-major, and aligned.
    NotContiguous = -7,
    /// The call is not legal in the session's current state.
    IllegalState = -8,
    /// The engine failed; the session can only be closed.
    EngineFailed = -9,
    /// The engine path is unusable.
    ConfigError = -10,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&ValidationError> for NleStatus {
    fn from(e: &ValidationError) -> Self {
        match e {
            ValidationError::NotArrayLike => NleStatus::NotArrayLike,
            ValidationError::ElementTypeMismatch { .. } => NleStatus::ElementTypeMismatch,
            ValidationError::WrongRank { .. } => NleStatus::WrongRank,
            ValidationError::WrongShape { .. } => NleStatus::WrongShape,
            ValidationError::NotContiguous | ValidationError::Misaligned { .. } => {
                NleStatus::NotContiguous
            }
        }
    }
}

impl From<&BindError> for NleStatus {
    fn from(e: &BindError) -> Self {
        NleStatus::from(&e.source)
    }
}

impl From<&ConfigError> for NleStatus {
    fn from(_e: &ConfigError) -> Self {
        NleStatus::ConfigError
    }
}

impl From<&EngineError> for NleStatus {
    fn from(e: &EngineError) -> Self {
        match e {
            EngineError::Config(c) => NleStatus::from(c),
            EngineError::Load { .. }
            | EngineError::MissingSymbol { .. }
            | EngineError::Failed { .. } => NleStatus::EngineFailed,
        }
    }
}

impl From<&SessionError> for NleStatus {
    fn from(e: &SessionError) -> Self {
        match e {
            SessionError::Bind(b) => NleStatus::from(b),
            SessionError::IllegalState { .. } => NleStatus::IllegalState,
            SessionError::Engine(en) => NleStatus::from(en),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nle_core::{DType, Slot};
    use nle_session::{EngineOp, SessionState};

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(NleStatus::Ok as i32, 0);
        assert_eq!(NleStatus::InvalidHandle as i32, -1);
        assert_eq!(NleStatus::InvalidArgument as i32, -2);
        assert_eq!(NleStatus::NotArrayLike as i32, -3);
        assert_eq!(NleStatus::ElementTypeMismatch as i32, -4);
        assert_eq!(NleStatus::WrongRank as i32, -5);
        assert_eq!(NleStatus::WrongShape as i32, -6);
        assert_eq!(NleStatus::NotContiguous as i32, -7);
        assert_eq!(NleStatus::IllegalState as i32, -8);
        assert_eq!(NleStatus::EngineFailed as i32, -9);
        assert_eq!(NleStatus::ConfigError as i32, -10);
        assert_eq!(NleStatus::InternalError as i32, -20);
        assert_eq!(NleStatus::Panicked as i32, -128);
    }

    #[test]
    fn bind_errors_map_per_check() {
        let bind = |source| {
            NleStatus::from(&SessionError::Bind(BindError {
                slot: Slot::Glyphs,
                source,
            }))
        };
        assert_eq!(bind(ValidationError::NotArrayLike), NleStatus::NotArrayLike);
        assert_eq!(
            bind(ValidationError::ElementTypeMismatch {
                expected: DType::I16,
                found: DType::U16
            }),
            NleStatus::ElementTypeMismatch
        );
        assert_eq!(
            bind(ValidationError::WrongRank {
                expected: 2,
                found: 1
            }),
            NleStatus::WrongRank
        );
        assert_eq!(
            bind(ValidationError::Misaligned { align: 2 }),
            NleStatus::NotContiguous
        );
    }

    #[test]
    fn session_errors_map() {
        let illegal = SessionError::IllegalState {
            operation: "step",
            state: SessionState::Done,
        };
        assert_eq!(NleStatus::from(&illegal), NleStatus::IllegalState);

        let failed = SessionError::Engine(EngineError::Failed {
            op: EngineOp::Step,
            reason: "boom".into(),
        });
        assert_eq!(NleStatus::from(&failed), NleStatus::EngineFailed);

        let config = SessionError::Engine(EngineError::Config(ConfigError::EmptyPath));
        assert_eq!(NleStatus::from(&config), NleStatus::ConfigError);
    }
}
