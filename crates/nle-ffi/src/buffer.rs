//! C descriptors for caller-owned buffers.
//!
//! The C side keeps full ownership: binding an [`NleBuffer`] takes no
//! hold, so its memory must stay valid and in place until the next
//! bind, close, or destroy on the same session.

use std::ffi::c_void;

use nle_buffer::{ArrayDescriptor, ArrayLike, BufferHold};
use nle_core::{DType, Slot};
use nle_session::BufferSet;
use smallvec::SmallVec;

/// Upper bound on `ndim`; slot buffers are at most two-dimensional.
pub const NLE_MAX_NDIM: u32 = 8;

/// A typed, strided view of caller memory.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct NleBuffer {
    /// First element.
    pub data: *mut c_void,
    /// Element type code (see `DType::code`: 0 bool, 1 int8, 2 uint8,
    /// 3 int16, 4 uint16, 5 int32, 6 uint32, 7 int64, 8 uint64,
    /// 9 float32, 10 float64).
    pub dtype: i32,
    /// Number of dimensions.
    pub ndim: u32,
    /// `ndim` extents.
    pub shape: *const i64,
    /// `ndim` byte strides, or null for C-contiguous.
    pub strides: *const i64,
}

impl NleBuffer {
    #[allow(unsafe_code)]
    unsafe fn dims(&self) -> Option<(SmallVec<[usize; 4]>, Option<SmallVec<[isize; 4]>>)> {
        if self.ndim > NLE_MAX_NDIM || (self.ndim > 0 && self.shape.is_null()) {
            return None;
        }
        let n = self.ndim as usize;
        // SAFETY: shape points to ndim values per caller contract.
        let shape = if n == 0 {
            &[][..]
        } else {
            unsafe { std::slice::from_raw_parts(self.shape, n) }
        };
        let shape = shape
            .iter()
            .map(|&d| usize::try_from(d).ok())
            .collect::<Option<SmallVec<[usize; 4]>>>()?;
        let strides = if self.strides.is_null() || n == 0 {
            None
        } else {
            // SAFETY: strides points to ndim values per caller contract.
            let raw = unsafe { std::slice::from_raw_parts(self.strides, n) };
            Some(
                raw.iter()
                    .map(|&s| isize::try_from(s).ok())
                    .collect::<Option<SmallVec<[isize; 4]>>>()?,
            )
        };
        Some((shape, strides))
    }

    /// Reads the descriptor, or `None` if it is malformed: null data,
    /// unknown dtype code, negative extents, too many dimensions, or
    /// extents too large to lay out.
    ///
    /// # Safety
    ///
    /// `shape` must point to `ndim` values, and `strides` must be null or
    /// point to `ndim` values.
    #[allow(unsafe_code)]
    pub unsafe fn descriptor(&self) -> Option<ArrayDescriptor> {
        if self.data.is_null() {
            return None;
        }
        let dtype = DType::from_code(self.dtype)?;
        // SAFETY: guaranteed by the caller.
        let (shape, strides) = unsafe { self.dims() }?;
        let data = self.data.cast::<u8>();
        match strides {
            Some(strides) => Some(ArrayDescriptor::new(data, dtype, &shape, &strides)),
            None => ArrayDescriptor::contiguous(data, dtype, &shape),
        }
    }
}

/// An [`NleBuffer`] the C caller has vouched for.
///
/// Only [`NleBufferSet::as_buffer_set`] produces these, under its safety
/// contract.
#[repr(transparent)]
struct CallerBuffer(NleBuffer);

// SAFETY: `as_buffer_set` requires the C caller to keep every described
// buffer valid for writes and in place until the next bind, close, or
// destroy, which is the no-hold contract.
#[allow(unsafe_code)]
unsafe impl ArrayLike for CallerBuffer {
    fn describe(&self) -> Option<ArrayDescriptor> {
        // SAFETY: shape/strides validity is part of the same contract.
        unsafe { self.0.descriptor() }
    }

    fn retain(&self) -> BufferHold {
        BufferHold::none()
    }
}

/// One optional buffer per slot. Null members leave their slot unbound.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct NleBufferSet {
    /// `int16[21][79]`.
    pub glyphs: *const NleBuffer,
    /// `uint8[21][79]`.
    pub chars: *const NleBuffer,
    /// `uint8[21][79]`.
    pub colors: *const NleBuffer,
    /// `uint8[21][79]`.
    pub specials: *const NleBuffer,
    /// `long[23]`.
    pub blstats: *const NleBuffer,
    /// `int32[5]`.
    pub program_state: *const NleBuffer,
}

impl Default for NleBufferSet {
    fn default() -> Self {
        Self {
            glyphs: std::ptr::null(),
            chars: std::ptr::null(),
            colors: std::ptr::null(),
            specials: std::ptr::null(),
            blstats: std::ptr::null(),
            program_state: std::ptr::null(),
        }
    }
}

impl NleBufferSet {
    fn member(&self, slot: Slot) -> *const NleBuffer {
        match slot {
            Slot::Glyphs => self.glyphs,
            Slot::Chars => self.chars,
            Slot::Colors => self.colors,
            Slot::Specials => self.specials,
            Slot::Blstats => self.blstats,
            Slot::ProgramState => self.program_state,
        }
    }

    /// Borrows every non-null member as a [`BufferSet`] entry.
    ///
    /// # Safety
    ///
    /// Every non-null member must point to a valid [`NleBuffer`] for `'a`
    /// whose `shape` and `strides` satisfy [`NleBuffer::descriptor`]. The
    /// memory each one describes must be writable and must stay allocated
    /// and in place until the session is rebound, closed, or destroyed.
    #[allow(unsafe_code)]
    pub unsafe fn as_buffer_set<'a>(&'a self) -> BufferSet<'a> {
        let mut set = BufferSet::new();
        for slot in Slot::ALL {
            // SAFETY: guaranteed by the caller; `CallerBuffer` is a
            // transparent wrapper.
            let member = unsafe { self.member(slot).cast::<CallerBuffer>().as_ref() };
            set.insert(slot, member.map(|b| b as &dyn ArrayLike));
        }
        set
    }
}
