//! Glyph category predicates.
//!
//! A glyph is the integer the engine writes into the `glyphs` slot for
//! each map cell. Categories are contiguous ranges laid out by the offsets
//! in [`crate::nethack`]; every predicate here is a pure range comparison.

use crate::nethack::{
    GLYPH_BODY_OFF, GLYPH_CMAP_OFF, GLYPH_DETECT_OFF, GLYPH_INVISIBLE, GLYPH_MON_OFF,
    GLYPH_OBJ_OFF, GLYPH_PET_OFF, GLYPH_RIDDEN_OFF, GLYPH_STATUE_OFF, GLYPH_SWALLOW_OFF,
    GLYPH_WARNING_OFF, MAXPCHARS, NO_GLYPH, NUMMONS, NUM_OBJECTS, S_ARROW_TRAP, TRAPNUM,
    WARNCOUNT,
};

fn in_range(glyph: i32, start: i32, count: i32) -> bool {
    glyph >= start && glyph < start + count
}

/// A monster drawn normally.
pub fn glyph_is_normal_monster(glyph: i32) -> bool {
    in_range(glyph, GLYPH_MON_OFF, NUMMONS)
}

/// A tame monster.
pub fn glyph_is_pet(glyph: i32) -> bool {
    in_range(glyph, GLYPH_PET_OFF, NUMMONS)
}

/// A monster's corpse.
pub fn glyph_is_body(glyph: i32) -> bool {
    in_range(glyph, GLYPH_BODY_OFF, NUMMONS)
}

/// A statue of a monster.
pub fn glyph_is_statue(glyph: i32) -> bool {
    in_range(glyph, GLYPH_STATUE_OFF, NUMMONS)
}

/// A monster being ridden.
pub fn glyph_is_ridden_monster(glyph: i32) -> bool {
    in_range(glyph, GLYPH_RIDDEN_OFF, NUMMONS)
}

/// A monster seen through detection.
pub fn glyph_is_detected_monster(glyph: i32) -> bool {
    in_range(glyph, GLYPH_DETECT_OFF, NUMMONS)
}

/// Any monster glyph: normal, pet, ridden, or detected.
pub fn glyph_is_monster(glyph: i32) -> bool {
    glyph_is_normal_monster(glyph)
        || glyph_is_pet(glyph)
        || glyph_is_ridden_monster(glyph)
        || glyph_is_detected_monster(glyph)
}

/// The remembered, unseen monster marker.
pub fn glyph_is_invisible(glyph: i32) -> bool {
    glyph == GLYPH_INVISIBLE
}

/// An object drawn normally.
pub fn glyph_is_normal_object(glyph: i32) -> bool {
    in_range(glyph, GLYPH_OBJ_OFF, NUM_OBJECTS)
}

/// Any object, including statues and corpses.
pub fn glyph_is_object(glyph: i32) -> bool {
    glyph_is_normal_object(glyph) || glyph_is_statue(glyph) || glyph_is_body(glyph)
}

/// A trap.
pub fn glyph_is_trap(glyph: i32) -> bool {
    in_range(glyph, GLYPH_CMAP_OFF + S_ARROW_TRAP, TRAPNUM)
}

/// A map feature (walls, floor, doors, traps, effects).
pub fn glyph_is_cmap(glyph: i32) -> bool {
    in_range(glyph, GLYPH_CMAP_OFF, MAXPCHARS)
}

/// The inside of an engulfing monster.
pub fn glyph_is_swallow(glyph: i32) -> bool {
    in_range(glyph, GLYPH_SWALLOW_OFF, NUMMONS << 3)
}

/// A warning level marker.
pub fn glyph_is_warning(glyph: i32) -> bool {
    in_range(glyph, GLYPH_WARNING_OFF, WARNCOUNT)
}

/// Monster species index behind a monster or statue glyph.
///
/// Returns [`NO_GLYPH`] for glyphs that do not name a species.
pub fn glyph_to_mon(glyph: i32) -> i32 {
    if glyph_is_normal_monster(glyph) {
        glyph - GLYPH_MON_OFF
    } else if glyph_is_pet(glyph) {
        glyph - GLYPH_PET_OFF
    } else if glyph_is_detected_monster(glyph) {
        glyph - GLYPH_DETECT_OFF
    } else if glyph_is_ridden_monster(glyph) {
        glyph - GLYPH_RIDDEN_OFF
    } else if glyph_is_statue(glyph) {
        glyph - GLYPH_STATUE_OFF
    } else {
        NO_GLYPH
    }
}

/// Every exported predicate by name, in export order.
pub const PREDICATES: &[(&str, fn(i32) -> bool)] = &[
    ("glyph_is_monster", glyph_is_monster),
    ("glyph_is_normal_monster", glyph_is_normal_monster),
    ("glyph_is_pet", glyph_is_pet),
    ("glyph_is_body", glyph_is_body),
    ("glyph_is_statue", glyph_is_statue),
    ("glyph_is_ridden_monster", glyph_is_ridden_monster),
    ("glyph_is_detected_monster", glyph_is_detected_monster),
    ("glyph_is_invisible", glyph_is_invisible),
    ("glyph_is_normal_object", glyph_is_normal_object),
    ("glyph_is_object", glyph_is_object),
    ("glyph_is_trap", glyph_is_trap),
    ("glyph_is_cmap", glyph_is_cmap),
    ("glyph_is_swallow", glyph_is_swallow),
    ("glyph_is_warning", glyph_is_warning),
];
