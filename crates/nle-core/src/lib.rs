//! Core types and tables for the NLE session bridge.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the element types the engine understands, the fixed slot table of the
//! observation record, and the read-only NetHack constant, glyph
//! predicate, and descriptor surface.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod descriptor;
pub mod dtype;
pub mod glyph;
pub mod nethack;
pub mod slot;

pub use descriptor::{ClassInfo, ClassSym, MonsterInfo, Permonst};
pub use dtype::{DType, Element, Long};
pub use slot::{Slot, BLSTATS_LEN, COLNO, GRID_SHAPE, PROGRAM_STATE_LEN, ROWNO};
