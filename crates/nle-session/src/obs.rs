//! The observation record shared with the engine, and the bindings that
//! fill its slot pointers.

use std::os::raw::c_int;
use std::ptr;

use nle_buffer::{validate_and_view, ArrayLike, BufferHold};
use nle_core::{Element, Long, Slot};

use crate::error::BindError;

/// The per-session record the engine reads the action from and writes
/// observations through (`nle_obs`).
///
/// Each slot pointer is either null (the engine skips that output) or
/// points at caller memory of the slot's exact type and shape.
#[repr(C)]
#[derive(Debug)]
pub struct ObsRecord {
    /// Action for the next step.
    pub action: c_int,
    /// Non-zero once the episode has ended.
    pub done: c_int,
    /// `int16[21][79]` glyph ids.
    pub glyphs: *mut i16,
    /// `uint8[21][79]` characters.
    pub chars: *mut u8,
    /// `uint8[21][79]` colours.
    pub colors: *mut u8,
    /// `uint8[21][79]` glyph flags.
    pub specials: *mut u8,
    /// `long[23]` bottom-line statistics.
    pub blstats: *mut Long,
    /// `int[5]` program state.
    pub program_state: *mut c_int,
}

// SAFETY: the record only carries addresses of memory whose lifetime is
// pinned by the owning session's holds. The session is driven from one
// thread at a time.
#[allow(unsafe_code)]
unsafe impl Send for ObsRecord {}

impl Default for ObsRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ObsRecord {
    /// A record with action 0, not done, and every slot unbound.
    pub const fn new() -> Self {
        Self {
            action: 0,
            done: 0,
            glyphs: ptr::null_mut(),
            chars: ptr::null_mut(),
            colors: ptr::null_mut(),
            specials: ptr::null_mut(),
            blstats: ptr::null_mut(),
            program_state: ptr::null_mut(),
        }
    }

    /// Whether the engine flagged the episode as ended.
    pub fn is_done(&self) -> bool {
        self.done != 0
    }

    /// Whether `slot` currently points at caller memory.
    pub fn is_bound(&self, slot: Slot) -> bool {
        !self.raw_ptr(slot).is_null()
    }

    fn raw_ptr(&self, slot: Slot) -> *mut u8 {
        match slot {
            Slot::Glyphs => self.glyphs.cast(),
            Slot::Chars => self.chars,
            Slot::Colors => self.colors,
            Slot::Specials => self.specials,
            Slot::Blstats => self.blstats.cast(),
            Slot::ProgramState => self.program_state.cast(),
        }
    }

    fn set_raw_ptr(&mut self, slot: Slot, p: *mut u8) {
        match slot {
            Slot::Glyphs => self.glyphs = p.cast(),
            Slot::Chars => self.chars = p,
            Slot::Colors => self.colors = p,
            Slot::Specials => self.specials = p,
            Slot::Blstats => self.blstats = p.cast(),
            Slot::ProgramState => self.program_state = p.cast(),
        }
    }

    /// The bound memory of `slot` as a mutable slice of `T`.
    ///
    /// Returns `None` if the slot is unbound or `T` is not the slot's
    /// element type.
    ///
    /// # Safety
    ///
    /// The slot pointer must address `slot.len()` live elements that no
    /// one else accesses for the lifetime of the returned slice. Inside
    /// [`Engine`](crate::Engine) calls the session guarantees this.
    #[allow(unsafe_code)]
    pub unsafe fn slot_slice_mut<T: Element>(&mut self, slot: Slot) -> Option<&mut [T]> {
        if T::DTYPE != slot.dtype() {
            return None;
        }
        let p = self.raw_ptr(slot);
        if p.is_null() {
            return None;
        }
        // SAFETY: guaranteed by the caller; the type was checked above.
        Some(unsafe { std::slice::from_raw_parts_mut(p.cast::<T>(), slot.len()) })
    }
}

/// Candidate buffers for one [`bind_buffers`](crate::Session::bind_buffers)
/// call, one optional entry per slot.
#[derive(Clone, Copy, Default)]
pub struct BufferSet<'a> {
    entries: [Option<&'a dyn ArrayLike>; Slot::COUNT],
}

impl<'a> BufferSet<'a> {
    /// An empty set: binding it unbinds every slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, slot: Slot, buffer: &'a dyn ArrayLike) -> Self {
        self.insert(slot, Some(buffer));
        self
    }

    /// Sets or clears the candidate for `slot`.
    pub fn insert(&mut self, slot: Slot, buffer: Option<&'a dyn ArrayLike>) {
        self.entries[slot.index()] = buffer;
    }

    /// The candidate for `slot`, if any.
    pub fn get(&self, slot: Slot) -> Option<&'a dyn ArrayLike> {
        self.entries[slot.index()]
    }
}

/// Validated slot pointers plus the holds keeping their memory alive.
#[derive(Debug)]
pub(crate) struct Bindings {
    ptrs: [*mut u8; Slot::COUNT],
    holds: [BufferHold; Slot::COUNT],
}

// SAFETY: see `ObsRecord`.
#[allow(unsafe_code)]
unsafe impl Send for Bindings {}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            ptrs: [ptr::null_mut(); Slot::COUNT],
            holds: std::array::from_fn(|_| BufferHold::none()),
        }
    }
}

fn view_ptr<T: Element>(
    slot: Slot,
    buffer: Option<&dyn ArrayLike>,
) -> Result<*mut u8, BindError> {
    let view = validate_and_view::<T>(buffer, slot.shape())
        .map_err(|source| BindError { slot, source })?;
    Ok(view.map_or(ptr::null_mut(), |v| v.as_ptr().cast()))
}

impl Bindings {
    /// Validates every entry of `set`. Either all entries pass and a new
    /// binding is returned, or nothing is retained.
    pub(crate) fn from_set(set: &BufferSet<'_>) -> Result<Self, BindError> {
        let mut ptrs = [ptr::null_mut(); Slot::COUNT];
        for slot in Slot::ALL {
            let buffer = set.get(slot);
            ptrs[slot.index()] = match slot {
                Slot::Glyphs => view_ptr::<i16>(slot, buffer)?,
                Slot::Chars | Slot::Colors | Slot::Specials => view_ptr::<u8>(slot, buffer)?,
                Slot::Blstats => view_ptr::<Long>(slot, buffer)?,
                Slot::ProgramState => view_ptr::<c_int>(slot, buffer)?,
            };
        }
        let holds = std::array::from_fn(|i| match set.entries[i] {
            Some(buffer) => buffer.retain(),
            None => BufferHold::none(),
        });
        Ok(Self { ptrs, holds })
    }

    /// Copies the slot pointers into `obs`.
    pub(crate) fn write_into(&self, obs: &mut ObsRecord) {
        for slot in Slot::ALL {
            obs.set_raw_ptr(slot, self.ptrs[slot.index()]);
        }
    }

    /// Number of bound slots.
    pub(crate) fn bound(&self) -> usize {
        self.ptrs.iter().filter(|p| !p.is_null()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nle_buffer::SharedBuffer;
    use nle_core::GRID_SHAPE;

    #[test]
    fn new_record_is_unbound() {
        let obs = ObsRecord::new();
        assert!(!obs.is_done());
        for slot in Slot::ALL {
            assert!(!obs.is_bound(slot));
        }
    }

    #[test]
    fn binding_copies_pointers_and_retains() {
        let glyphs = SharedBuffer::<i16>::zeros(&GRID_SHAPE);
        let blstats = SharedBuffer::<Long>::zeros(&[23]);
        let set = BufferSet::new()
            .with(Slot::Glyphs, &glyphs)
            .with(Slot::Blstats, &blstats);

        let bindings = Bindings::from_set(&set).unwrap();
        assert_eq!(bindings.bound(), 2);
        assert_eq!(glyphs.holders(), 2);

        let mut obs = ObsRecord::new();
        bindings.write_into(&mut obs);
        assert_eq!(obs.glyphs, glyphs.as_ptr());
        assert_eq!(obs.blstats, blstats.as_ptr());
        assert!(obs.chars.is_null());

        drop(bindings);
        assert_eq!(glyphs.holders(), 1);
    }

    #[test]
    fn failing_slot_retains_nothing() {
        let glyphs = SharedBuffer::<i16>::zeros(&GRID_SHAPE);
        let chars = SharedBuffer::<i8>::zeros(&GRID_SHAPE);
        let set = BufferSet::new()
            .with(Slot::Glyphs, &glyphs)
            .with(Slot::Chars, &chars);

        let err = Bindings::from_set(&set).unwrap_err();
        assert_eq!(err.slot, Slot::Chars);
        assert_eq!(glyphs.holders(), 1);
    }

    #[test]
    #[allow(unsafe_code)]
    fn slot_slice_checks_element_type() {
        let chars = SharedBuffer::<u8>::zeros(&GRID_SHAPE);
        let bindings = Bindings::from_set(&BufferSet::new().with(Slot::Chars, &chars)).unwrap();
        let mut obs = ObsRecord::new();
        bindings.write_into(&mut obs);

        unsafe {
            assert!(obs.slot_slice_mut::<i16>(Slot::Chars).is_none());
            assert!(obs.slot_slice_mut::<u8>(Slot::Colors).is_none());
            let s = obs.slot_slice_mut::<u8>(Slot::Chars).unwrap();
            assert_eq!(s.len(), 21 * 79);
            s[0] = b'@';
        }
        assert_eq!(chars.get(0), Some(b'@'));
    }
}
