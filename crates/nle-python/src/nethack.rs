//! `Nethack`: Python wrapper around one engine session.
//!
//! Engine calls (load, reset, step, close) release the GIL via
//! `py.detach()`. Binding keeps the GIL because it inspects the arrays;
//! the session keeps a strong reference to every bound array until the
//! next `set_buffers` or `close`.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use nle_core::Slot;
use nle_session::{BufferSet, DlEngine, Session, SessionConfig, SessionError};
use pyo3::exceptions::{PyIndexError, PyRuntimeError};
use pyo3::prelude::*;

use crate::array::NumpyBuffer;
use crate::descriptor::{ClassSym, Permonst};
use crate::error::{engine_err, session_err};

/// A NetHack session writing observations into caller-owned numpy arrays.
///
/// Args:
///     dlpath: Path to the NetHack game shared library.
///     library: Path to the loader library exporting the ``nle_*`` entry
///         points. Defaults to the ``NLE_LIBRARY`` environment variable.
#[pyclass(module = "nle._pynethack")]
pub(crate) struct Nethack {
    session: Mutex<Session<DlEngine>>,
}

fn poisoned() -> PyErr {
    PyRuntimeError::new_err("Nethack session lock poisoned by an earlier panic")
}

impl Nethack {
    fn lock(&self) -> PyResult<MutexGuard<'_, Session<DlEngine>>> {
        self.session.lock().map_err(|_| poisoned())
    }

    /// Runs `f` on the session with the GIL released.
    fn detached<R, F>(&self, py: Python<'_>, f: F) -> PyResult<R>
    where
        F: FnOnce(&mut Session<DlEngine>) -> Result<R, SessionError> + Send,
        R: Send,
    {
        py.detach(|| {
            let mut session = self.session.lock().map_err(|_| None)?;
            f(&mut *session).map_err(Some)
        })
        .map_err(|e| e.map_or_else(poisoned, session_err))
    }
}

#[pymethods]
impl Nethack {
    /// Load the engine library. No game starts until `reset()`.
    #[new]
    #[pyo3(signature = (dlpath, library=None))]
    fn new(py: Python<'_>, dlpath: PathBuf, library: Option<PathBuf>) -> PyResult<Self> {
        let mut config = SessionConfig::new(dlpath);
        if let Some(library) = library {
            config = config.with_library(library);
        }
        let config = config.with_library_from_env();
        let engine = py
            .detach(|| DlEngine::load(&config))
            .map_err(|e| engine_err(&e))?;
        Ok(Self {
            session: Mutex::new(Session::new(engine)),
        })
    }

    /// Advance the game by one action.
    ///
    /// Raises:
    ///     IllegalStateError: If the episode is done or never started.
    ///     EngineError: If the engine fails.
    fn step(&self, py: Python<'_>, action: i32) -> PyResult<()> {
        self.detached(py, |s| s.step(action))
    }

    /// Whether the current episode has ended.
    fn done(&self) -> PyResult<bool> {
        Ok(self.lock()?.done())
    }

    /// Start a new game, or restart the running one.
    fn reset(&self, py: Python<'_>) -> PyResult<()> {
        self.detached(py, |s| s.reset())
    }

    /// Bind output arrays. Every argument defaults to None, which leaves
    /// that observation unwritten; each call replaces all bindings.
    ///
    /// Raises:
    ///     TypeError: Not a numpy array, or wrong dtype.
    ///     ShapeError: Wrong number of dimensions or wrong sizes.
    ///     LayoutError: Not C-contiguous.
    #[pyo3(signature = (
        glyphs=None, chars=None, colors=None, specials=None, blstats=None, program_state=None
    ))]
    fn set_buffers<'py>(
        &self,
        glyphs: Option<Bound<'py, PyAny>>,
        chars: Option<Bound<'py, PyAny>>,
        colors: Option<Bound<'py, PyAny>>,
        specials: Option<Bound<'py, PyAny>>,
        blstats: Option<Bound<'py, PyAny>>,
        program_state: Option<Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let offered = [glyphs, chars, colors, specials, blstats, program_state]
            .map(|obj| obj.map(NumpyBuffer));
        let mut set = BufferSet::new();
        for slot in Slot::ALL {
            set.insert(
                slot,
                offered[slot.index()]
                    .as_ref()
                    .map(|b| b as &dyn nle_buffer::ArrayLike),
            );
        }
        self.lock()?.bind_buffers(&set).map_err(session_err)
    }

    /// End the game and release all bound arrays. Safe to call twice.
    fn close(&self, py: Python<'_>) -> PyResult<()> {
        self.detached(py, |s| {
            s.close();
            Ok(())
        })
    }

    /// Lifecycle state: "unstarted", "running", "done", "failed", "closed".
    #[getter]
    fn state(&self) -> PyResult<String> {
        Ok(self.lock()?.state().to_string())
    }

    /// Descriptor of monster species `index`.
    fn permonst(&self, index: usize) -> PyResult<Permonst> {
        self.lock()?
            .engine()
            .monster(index)
            .map(Permonst::from)
            .ok_or_else(|| PyIndexError::new_err(format!("no monster descriptor at {index}")))
    }

    /// Descriptor of monster class `mlet`.
    fn class_sym(&self, mlet: usize) -> PyResult<ClassSym> {
        self.lock()?
            .engine()
            .class_sym(mlet)
            .map(ClassSym::from)
            .ok_or_else(|| PyIndexError::new_err(format!("no class descriptor at {mlet}")))
    }

    fn __enter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    #[pyo3(signature = (_exc_type=None, _exc_val=None, _exc_tb=None))]
    fn __exit__(
        &self,
        py: Python<'_>,
        _exc_type: Option<&Bound<'_, PyAny>>,
        _exc_val: Option<&Bound<'_, PyAny>>,
        _exc_tb: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<()> {
        self.close(py)
    }

    fn __repr__(&self) -> PyResult<String> {
        let session = self.lock()?;
        Ok(format!(
            "Nethack(path={:?}, state={})",
            session.engine().path(),
            session.state()
        ))
    }
}
