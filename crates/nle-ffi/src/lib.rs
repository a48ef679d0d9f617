//! C ABI for NLE sessions.
//!
//! Exposes session create, bind, reset, step, done, close, and destroy as
//! `extern "C"` functions over generation-checked `u64` handles. Every
//! entry point returns an [`NleStatus`] code and catches panics. The last
//! error message on the calling thread is available from
//! [`nle_last_error`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::cell::RefCell;
use std::ffi::c_char;

/// Runs an FFI body, converting a panic into [`NleStatus::Panicked`] and
/// recording its message as the thread's last error.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::NleStatus::Panicked as i32, $body)
    };
}

/// Like `ffi_guard!`, with an explicit value for the panic case.
macro_rules! ffi_guard_or {
    ($on_panic:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $on_panic
            }
        }
    };
}

/// Locks a mutex or returns [`NleStatus::InternalError`] if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => {
                $crate::set_last_error("internal lock poisoned by an earlier panic");
                return $crate::status::NleStatus::InternalError as i32;
            }
        }
    };
}

pub mod buffer;
mod handle;
pub mod session;
pub mod status;

pub use buffer::{NleBuffer, NleBufferSet};
pub use session::{register, SessionDriver};
pub use status::NleStatus;

thread_local! {
    static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn set_last_error(message: impl Into<String>) {
    let message = message.into();
    LAST_ERROR.with(|cell| *cell.borrow_mut() = message);
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|cell| cell.borrow_mut().clear());
}

pub(crate) fn record_panic(payload: &(dyn std::any::Any + Send)) {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_owned()
    };
    tracing::error!(%message, "panic caught at FFI boundary");
    set_last_error(format!("panic: {message}"));
}

/// Copies the calling thread's last error message into `buf`.
///
/// Writes at most `cap - 1` bytes followed by a NUL terminator. Returns the
/// full message length in bytes (excluding the terminator), so a caller
/// can pass a null `buf` first to size its buffer. Returns 0 when the last
/// call on this thread succeeded.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn nle_last_error(buf: *mut c_char, cap: usize) -> i32 {
    ffi_guard_or!(0, {
        LAST_ERROR.with(|cell| {
            let message = cell.borrow();
            let bytes = message.as_bytes();
            if !buf.is_null() && cap > 0 {
                let copy_len = bytes.len().min(cap - 1);
                // SAFETY: buf points to cap writable bytes.
                unsafe {
                    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), copy_len);
                    *buf.add(copy_len) = 0;
                }
            }
            i32::try_from(bytes.len()).unwrap_or(i32::MAX)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_error() -> String {
        let len = nle_last_error(std::ptr::null_mut(), 0) as usize;
        let mut buf = vec![0u8; len + 1];
        let len2 = nle_last_error(buf.as_mut_ptr().cast(), buf.len());
        assert_eq!(len, len2 as usize);
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn guard_catches_panic_and_records_message() {
        clear_last_error();
        let status: i32 = ffi_guard!({
            panic!("deliberate test panic");
        });
        assert_eq!(status, NleStatus::Panicked as i32);
        assert_eq!(last_error(), "panic: deliberate test panic");
    }

    #[test]
    fn guard_passes_value_through() {
        let status: i32 = ffi_guard!({ NleStatus::Ok as i32 });
        assert_eq!(status, 0);
    }

    #[test]
    fn last_error_truncates_to_capacity() {
        set_last_error("abcdef");
        let mut buf = [0xffu8; 4];
        let len = nle_last_error(buf.as_mut_ptr().cast(), buf.len());
        assert_eq!(len, 6);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn last_error_empty_after_clear() {
        set_last_error("something");
        clear_last_error();
        assert_eq!(last_error(), "");
    }
}
