//! The engine lifecycle contract consumed by the session.

use std::fmt;

use crate::error::EngineError;
use crate::obs::ObsRecord;

/// One of the four engine lifecycle operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineOp {
    /// Create an instance and play its first turn.
    Start,
    /// Advance one turn.
    Step,
    /// Reinitialise an existing instance.
    Reset,
    /// Release the instance.
    End,
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Step => "step",
            Self::Reset => "reset",
            Self::End => "end",
        })
    }
}

/// A turn-based engine driven through a four-operation lifecycle.
///
/// Every operation receives the session's [`ObsRecord`]. The record lives
/// at a fixed address for as long as a handle exists, so an engine may
/// keep a pointer to it between calls. Engines write observations through
/// the record's slot pointers and must skip null slots.
pub trait Engine {
    /// A running instance. Consumed by [`end`](Engine::end).
    type Handle;

    /// Creates an instance, plays its first turn, and fills bound slots.
    fn start(&mut self, obs: &mut ObsRecord) -> Result<Self::Handle, EngineError>;

    /// Plays `obs.action` and fills bound slots; sets `obs.done` when the
    /// episode ends.
    fn step(&mut self, handle: &mut Self::Handle, obs: &mut ObsRecord)
        -> Result<(), EngineError>;

    /// Reinitialises the instance as if freshly started.
    fn reset(&mut self, handle: &mut Self::Handle, obs: &mut ObsRecord)
        -> Result<(), EngineError>;

    /// Releases every engine-side resource of `handle`.
    fn end(&mut self, handle: Self::Handle);
}
