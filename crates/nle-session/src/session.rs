//! The session controller.

use std::fmt;
use std::os::raw::c_int;

use nle_core::Slot;
use tracing::{debug, trace, warn};

use crate::engine::Engine;
use crate::error::SessionError;
use crate::obs::{Bindings, BufferSet, ObsRecord};

/// Lifecycle state of a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No engine instance exists yet.
    Unstarted,
    /// An episode is in progress.
    Running,
    /// The engine reported the episode over; only reset advances.
    Done,
    /// The engine failed; only close is legal.
    Failed,
    /// Closed for good.
    Closed,
}

impl SessionState {
    /// Stable integer code, used across the C ABI.
    pub fn code(self) -> i32 {
        match self {
            Self::Unstarted => 0,
            Self::Running => 1,
            Self::Done => 2,
            Self::Failed => 3,
            Self::Closed => 4,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unstarted => "unstarted",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Closed => "closed",
        })
    }
}

/// One engine instance plus the caller buffers it writes into.
///
/// The observation record is boxed so its address never changes: the
/// engine may keep a pointer to it from `start` until `end`.
pub struct Session<E: Engine> {
    engine: E,
    handle: Option<E::Handle>,
    obs: Box<ObsRecord>,
    bindings: Bindings,
    state: SessionState,
}

impl<E: Engine> Session<E> {
    /// A session in [`SessionState::Unstarted`] with every slot unbound.
    /// No engine call is made until the first [`reset`](Self::reset).
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            handle: None,
            obs: Box::new(ObsRecord::new()),
            bindings: Bindings::default(),
            state: SessionState::Unstarted,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The episode-ended flag as last written by the engine.
    pub fn done(&self) -> bool {
        self.obs.is_done()
    }

    /// Whether `slot` currently has caller memory bound.
    pub fn is_bound(&self, slot: Slot) -> bool {
        self.obs.is_bound(slot)
    }

    /// The engine driving this session.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn illegal(&self, operation: &'static str) -> SessionError {
        SessionError::IllegalState {
            operation,
            state: self.state,
        }
    }

    /// Replaces every slot binding with the entries of `buffers`.
    ///
    /// All six entries are validated before anything changes. On error the
    /// previous bindings stay in place; on success every slot takes the new
    /// entry, and absent entries unbind their slot. Holds on previously
    /// bound memory are released.
    ///
    /// # Errors
    ///
    /// [`SessionError::Bind`] for the first rejected slot.
    /// [`SessionError::IllegalState`] once failed or closed.
    pub fn bind_buffers(&mut self, buffers: &BufferSet<'_>) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Failed | SessionState::Closed) {
            return Err(self.illegal("bind_buffers"));
        }
        let bindings = Bindings::from_set(buffers)?;
        bindings.write_into(&mut self.obs);
        self.bindings = bindings;
        debug!(bound = self.bindings.bound(), "buffers bound");
        Ok(())
    }

    /// Starts the engine on first use, otherwise reinitialises it.
    ///
    /// Clears the done flag and leaves the session running (or done, if
    /// the engine ends the episode immediately).
    ///
    /// # Errors
    ///
    /// [`SessionError::Engine`] if the engine fails; the session is then
    /// [`Failed`](SessionState::Failed).
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Failed | SessionState::Closed) {
            return Err(self.illegal("reset"));
        }
        self.obs.done = 0;
        let result = match self.handle.as_mut() {
            Some(handle) => self.engine.reset(handle, &mut self.obs),
            None => self.engine.start(&mut self.obs).map(|h| {
                self.handle = Some(h);
            }),
        };
        if let Err(err) = result {
            warn!(error = %err, "engine reset failed");
            self.state = SessionState::Failed;
            return Err(err.into());
        }
        self.state = self.settled_state();
        debug!(state = %self.state, "session reset");
        Ok(())
    }

    /// Advances the engine by one action.
    ///
    /// # Errors
    ///
    /// [`SessionError::IllegalState`] unless the session is running; in
    /// particular stepping a finished episode fails without touching the
    /// engine. [`SessionError::Engine`] if the engine fails.
    pub fn step(&mut self, action: i32) -> Result<(), SessionError> {
        if self.state != SessionState::Running {
            return Err(self.illegal("step"));
        }
        let Some(handle) = self.handle.as_mut() else {
            return Err(self.illegal("step"));
        };
        self.obs.action = action as c_int;
        if let Err(err) = self.engine.step(handle, &mut self.obs) {
            warn!(action, error = %err, "engine step failed");
            self.state = SessionState::Failed;
            return Err(err.into());
        }
        self.state = self.settled_state();
        trace!(action, done = self.done(), "step");
        Ok(())
    }

    fn settled_state(&self) -> SessionState {
        if self.obs.is_done() {
            SessionState::Done
        } else {
            SessionState::Running
        }
    }

    /// Ends the engine instance and releases every binding. Idempotent.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.end(handle);
        }
        self.bindings = Bindings::default();
        self.bindings.write_into(&mut self.obs);
        if self.state != SessionState::Closed {
            debug!(from = %self.state, "session closed");
            self.state = SessionState::Closed;
        }
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            warn!(state = %self.state, "session dropped without close; ending engine");
        }
        self.close();
    }
}

impl<E: Engine> fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("done", &self.done())
            .field("bound", &self.bindings.bound())
            .finish_non_exhaustive()
    }
}
