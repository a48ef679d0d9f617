//! NetHack constants exported alongside the session bridge.
//!
//! Values match a NetHack 3.6 engine build. The glyph offsets are derived
//! the same way the engine's `display.h` derives them, so a change to one
//! of the base counts moves every later offset.

/// Message window.
pub const NHW_MESSAGE: i32 = 1;
/// Status window.
pub const NHW_STATUS: i32 = 2;
/// Map window.
pub const NHW_MAP: i32 = 3;
/// Menu window.
pub const NHW_MENU: i32 = 4;
/// Text window.
pub const NHW_TEXT: i32 = 5;

/// Number of monster species.
pub const NUMMONS: i32 = 381;
/// Number of object types.
pub const NUM_OBJECTS: i32 = 453;
/// Number of map-feature symbols.
pub const MAXPCHARS: i32 = 96;
/// Number of explosion symbols per explosion type.
pub const MAXEXPCHARS: i32 = 9;
/// Number of explosion types.
pub const EXPL_MAX: i32 = 7;
/// Number of zap beam types.
pub const NUM_ZAP: i32 = 8;
/// Number of warning levels.
pub const WARNCOUNT: i32 = 6;
/// Number of monster classes, including the placeholder class 0.
pub const MAXMCLASSES: i32 = 61;

/// First monster glyph.
pub const GLYPH_MON_OFF: i32 = 0;
/// First pet glyph.
pub const GLYPH_PET_OFF: i32 = NUMMONS + GLYPH_MON_OFF;
/// The "remembered, unseen monster" glyph.
pub const GLYPH_INVIS_OFF: i32 = NUMMONS + GLYPH_PET_OFF;
/// First detected-monster glyph.
pub const GLYPH_DETECT_OFF: i32 = 1 + GLYPH_INVIS_OFF;
/// First corpse glyph.
pub const GLYPH_BODY_OFF: i32 = NUMMONS + GLYPH_DETECT_OFF;
/// First ridden-monster glyph.
pub const GLYPH_RIDDEN_OFF: i32 = NUMMONS + GLYPH_BODY_OFF;
/// First object glyph.
pub const GLYPH_OBJ_OFF: i32 = NUMMONS + GLYPH_RIDDEN_OFF;
/// First map-feature glyph.
pub const GLYPH_CMAP_OFF: i32 = NUM_OBJECTS + GLYPH_OBJ_OFF;
/// First explosion glyph.
pub const GLYPH_EXPLODE_OFF: i32 = (MAXPCHARS - MAXEXPCHARS) + GLYPH_CMAP_OFF;
/// First zap-beam glyph.
pub const GLYPH_ZAP_OFF: i32 = (MAXEXPCHARS * EXPL_MAX) + GLYPH_EXPLODE_OFF;
/// First engulfing-monster glyph.
pub const GLYPH_SWALLOW_OFF: i32 = (NUM_ZAP << 2) + GLYPH_ZAP_OFF;
/// First warning glyph.
pub const GLYPH_WARNING_OFF: i32 = (NUMMONS << 3) + GLYPH_SWALLOW_OFF;
/// First statue glyph.
pub const GLYPH_STATUE_OFF: i32 = WARNCOUNT + GLYPH_WARNING_OFF;
/// One past the last valid glyph.
pub const MAX_GLYPH: i32 = NUMMONS + GLYPH_STATUE_OFF;

/// Glyph written for cells with nothing to show.
pub const NO_GLYPH: i32 = MAX_GLYPH;
/// Glyph for a remembered, unseen monster.
pub const GLYPH_INVISIBLE: i32 = GLYPH_INVIS_OFF;

/// Map-feature index of the first trap symbol (`S_arrow_trap`).
pub const S_ARROW_TRAP: i32 = 42;
/// Number of trap kinds, including the `NO_TRAP` placeholder.
pub const TRAPNUM: i32 = 24;

/// Used for generating random objects.
pub const RANDOM_CLASS: i32 = 0;
/// Illegal object (should never be seen).
pub const ILLOBJ_CLASS: i32 = 1;
/// Weapon.
pub const WEAPON_CLASS: i32 = 2;
/// Armour.
pub const ARMOR_CLASS: i32 = 3;
/// Ring.
pub const RING_CLASS: i32 = 4;
/// Amulet.
pub const AMULET_CLASS: i32 = 5;
/// Tool.
pub const TOOL_CLASS: i32 = 6;
/// Food.
pub const FOOD_CLASS: i32 = 7;
/// Potion.
pub const POTION_CLASS: i32 = 8;
/// Scroll.
pub const SCROLL_CLASS: i32 = 9;
/// Spellbook.
pub const SPBOOK_CLASS: i32 = 10;
/// Wand.
pub const WAND_CLASS: i32 = 11;
/// Gold.
pub const COIN_CLASS: i32 = 12;
/// Gem or rock.
pub const GEM_CLASS: i32 = 13;
/// Boulder or statue.
pub const ROCK_CLASS: i32 = 14;
/// Iron ball.
pub const BALL_CLASS: i32 = 15;
/// Iron chain.
pub const CHAIN_CLASS: i32 = 16;
/// Venom.
pub const VENOM_CLASS: i32 = 17;
/// Number of object classes.
pub const MAXOCLASSES: i32 = 18;

/// Cell shows a corpse.
pub const MG_CORPSE: i32 = 0x01;
/// Cell shows an invisible monster.
pub const MG_INVIS: i32 = 0x02;
/// Cell shows a detected monster.
pub const MG_DETECT: i32 = 0x04;
/// Cell shows a pet.
pub const MG_PET: i32 = 0x08;
/// Cell shows a ridden monster.
pub const MG_RIDDEN: i32 = 0x10;
/// Cell shows a statue.
pub const MG_STATUE: i32 = 0x20;
/// More than one stack of objects.
pub const MG_OBJPILE: i32 = 0x40;
/// Black-and-white lava.
pub const MG_BW_LAVA: i32 = 0x80;

/// Every exported constant by name, in export order.
pub const CONSTANTS: &[(&str, i32)] = &[
    ("NHW_MESSAGE", NHW_MESSAGE),
    ("NHW_STATUS", NHW_STATUS),
    ("NHW_MAP", NHW_MAP),
    ("NHW_MENU", NHW_MENU),
    ("NHW_TEXT", NHW_TEXT),
    ("NUMMONS", NUMMONS),
    ("GLYPH_MON_OFF", GLYPH_MON_OFF),
    ("GLYPH_PET_OFF", GLYPH_PET_OFF),
    ("GLYPH_INVIS_OFF", GLYPH_INVIS_OFF),
    ("GLYPH_DETECT_OFF", GLYPH_DETECT_OFF),
    ("GLYPH_BODY_OFF", GLYPH_BODY_OFF),
    ("GLYPH_RIDDEN_OFF", GLYPH_RIDDEN_OFF),
    ("GLYPH_OBJ_OFF", GLYPH_OBJ_OFF),
    ("GLYPH_CMAP_OFF", GLYPH_CMAP_OFF),
    ("GLYPH_EXPLODE_OFF", GLYPH_EXPLODE_OFF),
    ("GLYPH_ZAP_OFF", GLYPH_ZAP_OFF),
    ("GLYPH_SWALLOW_OFF", GLYPH_SWALLOW_OFF),
    ("GLYPH_WARNING_OFF", GLYPH_WARNING_OFF),
    ("GLYPH_STATUE_OFF", GLYPH_STATUE_OFF),
    ("MAX_GLYPH", MAX_GLYPH),
    ("NO_GLYPH", NO_GLYPH),
    ("GLYPH_INVISIBLE", GLYPH_INVISIBLE),
    ("MAXPCHARS", MAXPCHARS),
    ("EXPL_MAX", EXPL_MAX),
    ("NUM_ZAP", NUM_ZAP),
    ("WARNCOUNT", WARNCOUNT),
    ("RANDOM_CLASS", RANDOM_CLASS),
    ("ILLOBJ_CLASS", ILLOBJ_CLASS),
    ("WEAPON_CLASS", WEAPON_CLASS),
    ("ARMOR_CLASS", ARMOR_CLASS),
    ("RING_CLASS", RING_CLASS),
    ("AMULET_CLASS", AMULET_CLASS),
    ("TOOL_CLASS", TOOL_CLASS),
    ("FOOD_CLASS", FOOD_CLASS),
    ("POTION_CLASS", POTION_CLASS),
    ("SCROLL_CLASS", SCROLL_CLASS),
    ("SPBOOK_CLASS", SPBOOK_CLASS),
    ("WAND_CLASS", WAND_CLASS),
    ("COIN_CLASS", COIN_CLASS),
    ("GEM_CLASS", GEM_CLASS),
    ("ROCK_CLASS", ROCK_CLASS),
    ("BALL_CLASS", BALL_CLASS),
    ("CHAIN_CLASS", CHAIN_CLASS),
    ("VENOM_CLASS", VENOM_CLASS),
    ("MAXOCLASSES", MAXOCLASSES),
    ("MG_CORPSE", MG_CORPSE),
    ("MG_INVIS", MG_INVIS),
    ("MG_DETECT", MG_DETECT),
    ("MG_PET", MG_PET),
    ("MG_RIDDEN", MG_RIDDEN),
    ("MG_STATUE", MG_STATUE),
    ("MG_OBJPILE", MG_OBJPILE),
    ("MG_BW_LAVA", MG_BW_LAVA),
];

/// Looks an exported constant up by name.
pub fn constant(name: &str) -> Option<i32> {
    CONSTANTS
        .iter()
        .find_map(|&(n, v)| (n == name).then_some(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn glyph_offsets_match_engine_build() {
        assert_eq!(GLYPH_MON_OFF, 0);
        assert_eq!(GLYPH_PET_OFF, 381);
        assert_eq!(GLYPH_INVIS_OFF, 762);
        assert_eq!(GLYPH_DETECT_OFF, 763);
        assert_eq!(GLYPH_BODY_OFF, 1144);
        assert_eq!(GLYPH_RIDDEN_OFF, 1525);
        assert_eq!(GLYPH_OBJ_OFF, 1906);
        assert_eq!(GLYPH_CMAP_OFF, 2359);
        assert_eq!(GLYPH_EXPLODE_OFF, 2446);
        assert_eq!(GLYPH_ZAP_OFF, 2509);
        assert_eq!(GLYPH_SWALLOW_OFF, 2541);
        assert_eq!(GLYPH_WARNING_OFF, 5589);
        assert_eq!(GLYPH_STATUE_OFF, 5595);
        assert_eq!(MAX_GLYPH, 5976);
    }

    #[test]
    fn offsets_are_strictly_increasing() {
        let offsets = [
            GLYPH_MON_OFF,
            GLYPH_PET_OFF,
            GLYPH_INVIS_OFF,
            GLYPH_DETECT_OFF,
            GLYPH_BODY_OFF,
            GLYPH_RIDDEN_OFF,
            GLYPH_OBJ_OFF,
            GLYPH_CMAP_OFF,
            GLYPH_EXPLODE_OFF,
            GLYPH_ZAP_OFF,
            GLYPH_SWALLOW_OFF,
            GLYPH_WARNING_OFF,
            GLYPH_STATUE_OFF,
            MAX_GLYPH,
        ];
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn constant_names_are_unique() {
        let names: HashSet<_> = CONSTANTS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), CONSTANTS.len());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(constant("NHW_MESSAGE"), Some(1));
        assert_eq!(constant("GLYPH_MON_OFF"), Some(0));
        assert!(constant("NUMMONS").is_some_and(|n| n > 300));
        assert_eq!(constant("MAXWIN"), None);
    }

    #[test]
    fn special_flags_are_distinct_bits() {
        let flags = [
            MG_CORPSE, MG_INVIS, MG_DETECT, MG_PET, MG_RIDDEN, MG_STATUE, MG_OBJPILE, MG_BW_LAVA,
        ];
        let mut seen = 0;
        for flag in flags {
            assert_eq!(flag.count_ones(), 1);
            assert_eq!(seen & flag, 0);
            seen |= flag;
        }
        assert_eq!(seen, 0xff);
    }
}
