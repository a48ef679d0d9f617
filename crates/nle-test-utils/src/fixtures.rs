//! Buffer fixtures and mock arrays.

use std::cell::Cell;

use nle_buffer::{ArrayDescriptor, ArrayLike, BufferHold, SharedBuffer};
use nle_core::{DType, Long, Slot, BLSTATS_LEN, GRID_SHAPE, PROGRAM_STATE_LEN};
use nle_session::BufferSet;

// Initial element values of `ObsBuffers`, per element type.
pub const SENTINEL_I16: i16 = -7;
pub const SENTINEL_U8: u8 = 0xEE;
pub const SENTINEL_LONG: Long = -7;
pub const SENTINEL_I32: i32 = -7;

/// One correctly typed and shaped buffer for each slot, filled with
/// sentinels so untouched memory is recognisable.
#[derive(Clone, Debug)]
pub struct ObsBuffers {
    pub glyphs: SharedBuffer<i16>,
    pub chars: SharedBuffer<u8>,
    pub colors: SharedBuffer<u8>,
    pub specials: SharedBuffer<u8>,
    pub blstats: SharedBuffer<Long>,
    pub program_state: SharedBuffer<i32>,
}

impl Default for ObsBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl ObsBuffers {
    pub fn new() -> Self {
        Self {
            glyphs: SharedBuffer::filled(&GRID_SHAPE, SENTINEL_I16),
            chars: SharedBuffer::filled(&GRID_SHAPE, SENTINEL_U8),
            colors: SharedBuffer::filled(&GRID_SHAPE, SENTINEL_U8),
            specials: SharedBuffer::filled(&GRID_SHAPE, SENTINEL_U8),
            blstats: SharedBuffer::filled(&[BLSTATS_LEN], SENTINEL_LONG),
            program_state: SharedBuffer::filled(&[PROGRAM_STATE_LEN], SENTINEL_I32),
        }
    }

    /// The buffer for `slot`, as an array-like.
    pub fn get(&self, slot: Slot) -> &dyn ArrayLike {
        match slot {
            Slot::Glyphs => &self.glyphs,
            Slot::Chars => &self.chars,
            Slot::Colors => &self.colors,
            Slot::Specials => &self.specials,
            Slot::Blstats => &self.blstats,
            Slot::ProgramState => &self.program_state,
        }
    }

    /// A set binding every slot.
    pub fn buffer_set(&self) -> BufferSet<'_> {
        Slot::ALL
            .into_iter()
            .fold(BufferSet::new(), |set, slot| set.with(slot, self.get(slot)))
    }

    /// A set binding every slot except `skip`.
    pub fn buffer_set_without(&self, skip: Slot) -> BufferSet<'_> {
        let mut set = self.buffer_set();
        set.insert(skip, None);
        set
    }

    /// Reference count of the memory behind `slot`.
    pub fn holders(&self, slot: Slot) -> usize {
        match slot {
            Slot::Glyphs => self.glyphs.holders(),
            Slot::Chars => self.chars.holders(),
            Slot::Colors => self.colors.holders(),
            Slot::Specials => self.specials.holders(),
            Slot::Blstats => self.blstats.holders(),
            Slot::ProgramState => self.program_state.holders(),
        }
    }

    /// Whether every element of `slot` still holds its sentinel.
    pub fn untouched(&self, slot: Slot) -> bool {
        match slot {
            Slot::Glyphs => self.glyphs.to_vec().iter().all(|&v| v == SENTINEL_I16),
            Slot::Chars => self.chars.to_vec().iter().all(|&v| v == SENTINEL_U8),
            Slot::Colors => self.colors.to_vec().iter().all(|&v| v == SENTINEL_U8),
            Slot::Specials => self.specials.to_vec().iter().all(|&v| v == SENTINEL_U8),
            Slot::Blstats => self.blstats.to_vec().iter().all(|&v| v == SENTINEL_LONG),
            Slot::ProgramState => self
                .program_state
                .to_vec()
                .iter()
                .all(|&v| v == SENTINEL_I32),
        }
    }
}

/// Array-like with a free-form descriptor over zeroed, 8-byte aligned
/// storage. Never retains anything.
#[derive(Debug)]
pub struct RawArray {
    storage: Box<[Cell<u64>]>,
    dtype: DType,
    shape: Vec<usize>,
    strides: Option<Vec<isize>>,
    offset: usize,
}

impl RawArray {
    /// A C-contiguous array of `dtype` and `shape`.
    pub fn new(dtype: DType, shape: &[usize]) -> Self {
        let itemsize = dtype.size().unwrap_or(1);
        let bytes = shape.iter().product::<usize>() * itemsize;
        Self {
            storage: (0..bytes / 8 + 2).map(|_| Cell::new(0)).collect(),
            dtype,
            shape: shape.to_vec(),
            strides: None,
            offset: 0,
        }
    }

    /// A correctly typed, shaped, and laid out array for `slot`.
    pub fn for_slot(slot: Slot) -> Self {
        Self::new(slot.dtype(), slot.shape())
    }

    /// Overrides the byte strides.
    pub fn with_strides(mut self, strides: &[isize]) -> Self {
        self.strides = Some(strides.to_vec());
        self
    }

    /// Shifts the data pointer by `bytes` from the aligned base.
    ///
    /// # Panics
    ///
    /// If `bytes` is eight or more.
    pub fn with_offset(mut self, bytes: usize) -> Self {
        assert!(bytes < 8, "offset {bytes} leaves the spare storage");
        self.offset = bytes;
        self
    }

    fn data(&self) -> *mut u8 {
        self.storage
            .as_ptr()
            .cast::<u8>()
            .cast_mut()
            .wrapping_add(self.offset)
    }
}

// SAFETY: storage is `Cell`s with eight spare bytes past the described
// extent, so any contiguous descriptor with an offset below eight stays
// in bounds. The test owning the array keeps it alive.
#[allow(unsafe_code)]
unsafe impl ArrayLike for RawArray {
    fn describe(&self) -> Option<ArrayDescriptor> {
        match &self.strides {
            Some(strides) => Some(ArrayDescriptor::new(
                self.data(),
                self.dtype,
                &self.shape,
                strides,
            )),
            None => ArrayDescriptor::contiguous(self.data(), self.dtype, &self.shape),
        }
    }

    fn retain(&self) -> BufferHold {
        BufferHold::none()
    }
}

/// Something that is not an array at all.
#[derive(Debug, Default)]
pub struct NotAnArray;

// SAFETY: describes nothing.
#[allow(unsafe_code)]
unsafe impl ArrayLike for NotAnArray {
    fn describe(&self) -> Option<ArrayDescriptor> {
        None
    }

    fn retain(&self) -> BufferHold {
        BufferHold::none()
    }
}
