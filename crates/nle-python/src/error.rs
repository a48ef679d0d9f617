//! Session errors -> Python exceptions.
//!
//! | error | exception |
//! |---|---|
//! | not array-like, wrong element type | `TypeError` |
//! | wrong rank, wrong shape | `ShapeError` (`ValueError`) |
//! | not contiguous, misaligned | `LayoutError` (`ValueError`) |
//! | illegal call for the state | `IllegalStateError` (`RuntimeError`) |
//! | engine load or run failure | `EngineError` (`RuntimeError`) |

use nle_buffer::ErrorClass;
use nle_session::{BindError, ConfigError, EngineError as EngineFailure, SessionError};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;

pyo3::create_exception!(
    _pynethack,
    ShapeError,
    PyValueError,
    "A buffer has the wrong number of dimensions or the wrong dimension sizes."
);
pyo3::create_exception!(
    _pynethack,
    LayoutError,
    PyValueError,
    "A buffer is not C-contiguous or not aligned for its element type."
);
pyo3::create_exception!(
    _pynethack,
    IllegalStateError,
    PyRuntimeError,
    "The call is not legal in the session's current state."
);
pyo3::create_exception!(
    _pynethack,
    EngineError,
    PyRuntimeError,
    "The engine failed to load or run; the session can only be closed."
);

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("ShapeError", py.get_type::<ShapeError>())?;
    m.add("LayoutError", py.get_type::<LayoutError>())?;
    m.add("IllegalStateError", py.get_type::<IllegalStateError>())?;
    m.add("EngineError", py.get_type::<EngineError>())?;
    Ok(())
}

/// Remedy appended to a rejected buffer's message.
fn bind_hint(err: &BindError) -> String {
    match err.class() {
        ErrorClass::Type => format!(
            "pass a numpy array of dtype {}, e.g. np.zeros({:?}, dtype=...)",
            err.slot.dtype(),
            err.slot.shape()
        ),
        ErrorClass::Shape => format!("'{}' must have shape {:?}", err.slot, err.slot.shape()),
        ErrorClass::Layout => "use np.ascontiguousarray() or allocate a fresh array".to_owned(),
    }
}

fn engine_hint(err: &EngineFailure) -> Option<&'static str> {
    match err {
        EngineFailure::Config(ConfigError::MissingLibrary) => {
            Some("pass library= or set NLE_LIBRARY to the loader library")
        }
        EngineFailure::Config(ConfigError::LoaderIsGameLibrary(_)) => {
            Some("library= names the loader; dlpath names the game library it opens")
        }
        _ => None,
    }
}

/// Message and hint for `err`, as raised to Python.
fn detail(err: &SessionError) -> String {
    let hint = match err {
        SessionError::Bind(b) => Some(bind_hint(b)),
        SessionError::IllegalState { operation, .. } if *operation == "step" => Some(
            "call reset() after the episode ends and before the first step()".to_owned(),
        ),
        SessionError::IllegalState { .. } => None,
        SessionError::Engine(e) => engine_hint(e).map(str::to_owned),
    };
    match hint {
        Some(hint) => format!("{err}\n  Hint: {hint}"),
        None => err.to_string(),
    }
}

pub(crate) fn engine_err(err: &EngineFailure) -> PyErr {
    let msg = match engine_hint(err) {
        Some(hint) => format!("{err}\n  Hint: {hint}"),
        None => err.to_string(),
    };
    EngineError::new_err(msg)
}

pub(crate) fn session_err(err: SessionError) -> PyErr {
    let msg = detail(&err);
    match &err {
        SessionError::Bind(b) => match b.class() {
            ErrorClass::Type => PyTypeError::new_err(msg),
            ErrorClass::Shape => ShapeError::new_err(msg),
            ErrorClass::Layout => LayoutError::new_err(msg),
        },
        SessionError::IllegalState { .. } => IllegalStateError::new_err(msg),
        SessionError::Engine(_) => EngineError::new_err(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nle_buffer::ValidationError;
    use nle_core::{DType, Slot};
    use nle_session::SessionState;

    fn bind(slot: Slot, source: ValidationError) -> SessionError {
        SessionError::Bind(BindError { slot, source })
    }

    #[test]
    fn type_hint_names_the_required_dtype() {
        let err = bind(
            Slot::Glyphs,
            ValidationError::ElementTypeMismatch {
                expected: DType::I16,
                found: DType::I32,
            },
        );
        let msg = detail(&err);
        assert!(msg.starts_with("cannot bind 'glyphs'"), "{msg}");
        assert!(msg.contains("Hint: pass a numpy array of dtype int16"), "{msg}");
        assert!(msg.contains("[21, 79]"), "{msg}");
    }

    #[test]
    fn shape_hint_names_the_required_shape() {
        let err = bind(
            Slot::Blstats,
            ValidationError::WrongShape {
                expected: vec![23],
                found: vec![22],
            },
        );
        assert!(detail(&err).contains("Hint: 'blstats' must have shape [23]"));
    }

    #[test]
    fn layout_hint_suggests_a_contiguous_copy() {
        let err = bind(Slot::Chars, ValidationError::NotContiguous);
        assert!(detail(&err).contains("np.ascontiguousarray()"));
    }

    #[test]
    fn only_step_gets_an_illegal_state_hint() {
        let step = SessionError::IllegalState {
            operation: "step",
            state: SessionState::Done,
        };
        assert!(detail(&step).contains("Hint: call reset()"));

        let reset = SessionError::IllegalState {
            operation: "reset",
            state: SessionState::Closed,
        };
        assert!(!detail(&reset).contains("Hint"));
    }

    #[test]
    fn missing_loader_points_at_the_library_argument() {
        let err = EngineFailure::Config(ConfigError::MissingLibrary);
        assert_eq!(
            engine_hint(&err),
            Some("pass library= or set NLE_LIBRARY to the loader library")
        );
        assert_eq!(engine_hint(&EngineFailure::Config(ConfigError::EmptyPath)), None);
    }
}
