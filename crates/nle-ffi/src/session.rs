//! Session lifecycle FFI: create, bind, reset, step, done, state, close,
//! destroy.
//!
//! Each session sits behind its own `Arc<Mutex<..>>` so the global table
//! lock is only held for handle lookup. Engine calls never run while the
//! table is locked.

use std::ffi::{c_char, CStr};
use std::sync::{Arc, Mutex};

use nle_session::{
    BufferSet, DlEngine, Engine, Session, SessionConfig, SessionError, SessionState,
};
use tracing::debug;

use crate::buffer::NleBufferSet;
use crate::handle::HandleTable;
use crate::status::NleStatus;
use crate::{clear_last_error, set_last_error};

/// Object-safe view of a [`Session`], independent of its engine type.
pub trait SessionDriver: Send {
    /// See [`Session::bind_buffers`].
    fn bind_buffers(&mut self, buffers: &BufferSet<'_>) -> Result<(), SessionError>;
    /// See [`Session::reset`].
    fn reset(&mut self) -> Result<(), SessionError>;
    /// See [`Session::step`].
    fn step(&mut self, action: i32) -> Result<(), SessionError>;
    /// See [`Session::done`].
    fn done(&self) -> bool;
    /// See [`Session::state`].
    fn state(&self) -> SessionState;
    /// See [`Session::close`].
    fn close(&mut self);
}

impl<E> SessionDriver for Session<E>
where
    E: Engine + Send,
    E::Handle: Send,
{
    fn bind_buffers(&mut self, buffers: &BufferSet<'_>) -> Result<(), SessionError> {
        Session::bind_buffers(self, buffers)
    }

    fn reset(&mut self) -> Result<(), SessionError> {
        Session::reset(self)
    }

    fn step(&mut self, action: i32) -> Result<(), SessionError> {
        Session::step(self, action)
    }

    fn done(&self) -> bool {
        Session::done(self)
    }

    fn state(&self) -> SessionState {
        Session::state(self)
    }

    fn close(&mut self) {
        Session::close(self)
    }
}

type SessionArc = Arc<Mutex<Box<dyn SessionDriver>>>;

static SESSIONS: Mutex<HandleTable<SessionArc>> = Mutex::new(HandleTable::new());

fn get_session(handle: u64) -> Option<SessionArc> {
    SESSIONS.lock().ok()?.get(handle).cloned()
}

/// Registers a session built in Rust and returns its C handle.
///
/// Lets embedders drive sessions over custom engines through the same C
/// entry points. Returns `None` if the handle table is poisoned.
pub fn register(session: Box<dyn SessionDriver>) -> Option<u64> {
    let handle = SESSIONS
        .lock()
        .ok()?
        .insert(Arc::new(Mutex::new(session)));
    debug!(handle, "session registered");
    Some(handle)
}

fn fail(err: &SessionError) -> i32 {
    set_last_error(err.to_string());
    NleStatus::from(err) as i32
}

fn invalid_handle(handle: u64) -> i32 {
    set_last_error(format!("invalid session handle {handle:#x}"));
    NleStatus::InvalidHandle as i32
}

fn invalid_argument(what: &str) -> i32 {
    set_last_error(format!("invalid argument: {what}"));
    NleStatus::InvalidArgument as i32
}

/// Load the loader library and create an unstarted session for the game
/// library at `dlpath`.
///
/// `library` names the loader exporting the `nle_*` entry points; when
/// null, `NLE_LIBRARY` is consulted. On success writes the session handle
/// to `handle_out`. No engine instance exists until the first
/// `nle_session_reset`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_create(
    library: *const c_char,
    dlpath: *const c_char,
    handle_out: *mut u64,
) -> i32 {
    ffi_guard!({
        clear_last_error();
        if dlpath.is_null() {
            return invalid_argument("dlpath is null");
        }
        if handle_out.is_null() {
            return invalid_argument("handle_out is null");
        }
        // SAFETY: dlpath is a NUL-terminated string per caller contract.
        let dlpath = unsafe { CStr::from_ptr(dlpath) };
        let Ok(dlpath) = dlpath.to_str() else {
            return invalid_argument("dlpath is not valid UTF-8");
        };
        let mut config = SessionConfig::new(dlpath);
        if !library.is_null() {
            // SAFETY: library is a NUL-terminated string per caller contract.
            let Ok(library) = unsafe { CStr::from_ptr(library) }.to_str() else {
                return invalid_argument("library is not valid UTF-8");
            };
            config = config.with_library(library);
        }
        let config = config.with_library_from_env();

        let engine = match DlEngine::load(&config) {
            Ok(engine) => engine,
            Err(e) => {
                set_last_error(e.to_string());
                return NleStatus::from(&e) as i32;
            }
        };
        let session = Arc::new(Mutex::new(
            Box::new(Session::new(engine)) as Box<dyn SessionDriver>
        ));
        let handle = ffi_lock!(SESSIONS).insert(session);
        // SAFETY: handle_out is valid per caller contract.
        unsafe { *handle_out = handle };
        NleStatus::Ok as i32
    })
}

/// Replace every slot binding of a session.
///
/// Null members of `buffers` unbind their slot. On any validation failure
/// no binding changes and the status names the failed check. The memory
/// of every bound buffer must stay valid and in place until the next bind,
/// close, or destroy.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_bind_buffers(handle: u64, buffers: *const NleBufferSet) -> i32 {
    ffi_guard!({
        clear_last_error();
        // SAFETY: buffers is null or valid per caller contract.
        let Some(buffers) = (unsafe { buffers.as_ref() }) else {
            return invalid_argument("buffers is null");
        };
        let Some(session) = get_session(handle) else {
            return invalid_handle(handle);
        };
        let mut session = ffi_lock!(session);
        // SAFETY: members are null or valid per caller contract.
        let set = unsafe { buffers.as_buffer_set() };
        match session.bind_buffers(&set) {
            Ok(()) => NleStatus::Ok as i32,
            Err(e) => fail(&e),
        }
    })
}

/// Start the engine on first use, otherwise reset it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_reset(handle: u64) -> i32 {
    ffi_guard!({
        clear_last_error();
        let Some(session) = get_session(handle) else {
            return invalid_handle(handle);
        };
        let mut session = ffi_lock!(session);
        match session.reset() {
            Ok(()) => NleStatus::Ok as i32,
            Err(e) => fail(&e),
        }
    })
}

/// Advance the engine by one action.
///
/// Returns `IllegalState` without touching the engine if the episode is
/// already done.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_step(handle: u64, action: i32) -> i32 {
    ffi_guard!({
        clear_last_error();
        let Some(session) = get_session(handle) else {
            return invalid_handle(handle);
        };
        let mut session = ffi_lock!(session);
        match session.step(action) {
            Ok(()) => NleStatus::Ok as i32,
            Err(e) => fail(&e),
        }
    })
}

/// Write the episode-ended flag (0 or 1) to `done_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_done(handle: u64, done_out: *mut u8) -> i32 {
    ffi_guard!({
        clear_last_error();
        if done_out.is_null() {
            return invalid_argument("done_out is null");
        }
        let Some(session) = get_session(handle) else {
            return invalid_handle(handle);
        };
        let session = ffi_lock!(session);
        // SAFETY: done_out is valid per caller contract.
        unsafe { *done_out = u8::from(session.done()) };
        NleStatus::Ok as i32
    })
}

/// Write the session state code to `state_out`: 0 unstarted, 1 running,
/// 2 done, 3 failed, 4 closed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_state(handle: u64, state_out: *mut i32) -> i32 {
    ffi_guard!({
        clear_last_error();
        if state_out.is_null() {
            return invalid_argument("state_out is null");
        }
        let Some(session) = get_session(handle) else {
            return invalid_handle(handle);
        };
        let session = ffi_lock!(session);
        // SAFETY: state_out is valid per caller contract.
        unsafe { *state_out = session.state().code() };
        NleStatus::Ok as i32
    })
}

/// End the engine instance and release all bindings. Idempotent; the
/// handle stays valid until `nle_session_destroy`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_close(handle: u64) -> i32 {
    ffi_guard!({
        clear_last_error();
        let Some(session) = get_session(handle) else {
            return invalid_handle(handle);
        };
        let mut session = ffi_lock!(session);
        session.close();
        NleStatus::Ok as i32
    })
}

/// Close the session and invalidate its handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_session_destroy(handle: u64) -> i32 {
    ffi_guard!({
        clear_last_error();
        let (session, remaining) = {
            let mut table = ffi_lock!(SESSIONS);
            let session = table.remove(handle);
            (session, table.len())
        };
        let Some(session) = session else {
            return invalid_handle(handle);
        };
        let mut session = ffi_lock!(session);
        session.close();
        debug!(handle, remaining, "session destroyed");
        NleStatus::Ok as i32
    })
}
