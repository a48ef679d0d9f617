//! The fixed slot table of the observation record.
//!
//! Every slot has one required element type and one required shape. The
//! engine writes into slots with raw stores sized by its own compiled-in
//! geometry, so these values must match the engine build exactly.

use std::fmt;

use crate::dtype::{DType, Element, Long};

/// Map rows of the dungeon level.
pub const ROWNO: usize = 21;

/// Map columns of the dungeon level, including the unused column 0.
pub const COLNO: usize = 80;

/// Number of entries in the bottom-line status vector.
pub const BLSTATS_LEN: usize = 23;

/// Number of entries in the program-state vector.
pub const PROGRAM_STATE_LEN: usize = 5;

/// Shape shared by every map-grid slot: `ROWNO x (COLNO - 1)`.
pub const GRID_SHAPE: [usize; 2] = [ROWNO, COLNO - 1];

const BLSTATS_SHAPE: [usize; 1] = [BLSTATS_LEN];
const PROGRAM_STATE_SHAPE: [usize; 1] = [PROGRAM_STATE_LEN];

/// One named output channel of the observation record.
///
/// Variants are listed in the engine's record order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Glyph code per map cell (`int16`).
    Glyphs,
    /// Display character per map cell (`uint8`).
    Chars,
    /// Display colour per map cell (`uint8`).
    Colors,
    /// `MG_*` special flags per map cell (`uint8`).
    Specials,
    /// Bottom-line statistics (platform `long`).
    Blstats,
    /// Program-state flags (`int32`).
    ProgramState,
}

impl Slot {
    /// Number of slots in the record.
    pub const COUNT: usize = 6;

    /// Every slot, in record order.
    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::Glyphs,
        Slot::Chars,
        Slot::Colors,
        Slot::Specials,
        Slot::Blstats,
        Slot::ProgramState,
    ];

    /// Position of this slot in [`Slot::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Keyword name of the slot, as used by the Python binding.
    pub fn name(self) -> &'static str {
        match self {
            Self::Glyphs => "glyphs",
            Self::Chars => "chars",
            Self::Colors => "colors",
            Self::Specials => "specials",
            Self::Blstats => "blstats",
            Self::ProgramState => "program_state",
        }
    }

    /// Required element type.
    pub fn dtype(self) -> DType {
        match self {
            Self::Glyphs => <i16 as Element>::DTYPE,
            Self::Chars | Self::Colors | Self::Specials => <u8 as Element>::DTYPE,
            Self::Blstats => <Long as Element>::DTYPE,
            Self::ProgramState => <i32 as Element>::DTYPE,
        }
    }

    /// Required shape, outermost dimension first.
    pub fn shape(self) -> &'static [usize] {
        match self {
            Self::Glyphs | Self::Chars | Self::Colors | Self::Specials => &GRID_SHAPE,
            Self::Blstats => &BLSTATS_SHAPE,
            Self::ProgramState => &PROGRAM_STATE_SHAPE,
        }
    }

    /// Total number of elements the engine writes into this slot.
    pub fn len(self) -> usize {
        self.shape().iter().product()
    }

    /// Looks a slot up by its keyword name.
    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
