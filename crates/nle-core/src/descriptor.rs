//! Read-only per-species and per-class descriptor records.
//!
//! [`Permonst`] and [`ClassSym`] mirror the engine's C structs so the
//! tables exported by the engine library (`mons`, `def_monsyms`) can be
//! read in place. [`MonsterInfo`] and [`ClassInfo`] are owned copies safe
//! to hand out beyond the library's lifetime.

use std::ffi::CStr;
use std::os::raw::{c_char, c_schar, c_uchar, c_ulong, c_ushort};

/// Attacks per monster.
pub const NATTK: usize = 6;

/// One attack of a monster (`struct attack`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attack {
    /// Attack type (`AT_*`).
    pub aatyp: c_uchar,
    /// Damage type (`AD_*`).
    pub adtyp: c_uchar,
    /// Number of damage dice.
    pub damn: c_uchar,
    /// Sides per damage die.
    pub damd: c_uchar,
}

/// Engine layout of one monster species (`struct permonst`).
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Permonst {
    /// Full name, NUL-terminated.
    pub mname: *const c_char,
    /// Monster class (index into the class table).
    pub mlet: c_char,
    /// Base monster level.
    pub mlevel: c_schar,
    /// Move speed.
    pub mmove: c_schar,
    /// Base armour class.
    pub ac: c_schar,
    /// Base magic resistance.
    pub mr: c_schar,
    /// Basic alignment.
    pub maligntyp: c_schar,
    /// Creation and genocide mask.
    pub geno: c_ushort,
    /// Attack matrix.
    pub mattk: [Attack; NATTK],
    /// Corpse weight.
    pub cwt: c_ushort,
    /// Corpse nutritional value.
    pub cnutrit: c_ushort,
    /// Noise it makes.
    pub msound: c_uchar,
    /// Physical size.
    pub msize: c_uchar,
    /// Resistances.
    pub mresists: c_uchar,
    /// Resistances conveyed by eating.
    pub mconveys: c_uchar,
    /// Boolean flags.
    pub mflags1: c_ulong,
    /// More boolean flags.
    pub mflags2: c_ulong,
    /// Yet more boolean flags.
    pub mflags3: c_ushort,
    /// Display colour.
    pub mcolor: c_uchar,
}

/// Engine layout of one monster class symbol (`struct class_sym`).
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ClassSym {
    /// Map symbol.
    pub sym: c_char,
    /// Short name, NUL-terminated.
    pub name: *const c_char,
    /// Long description, NUL-terminated.
    pub explain: *const c_char,
}

/// Owned copy of a [`Permonst`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterInfo {
    /// Full name.
    pub mname: String,
    /// Monster class.
    pub mlet: u8,
    /// Base monster level.
    pub mlevel: i8,
    /// Move speed.
    pub mmove: i8,
    /// Base armour class.
    pub ac: i8,
    /// Base magic resistance.
    pub mr: i8,
    /// Creation and genocide mask.
    pub geno: u16,
    /// Corpse weight.
    pub cwt: u16,
    /// Corpse nutritional value.
    pub cnutrit: u16,
    /// Noise it makes.
    pub msound: u8,
    /// Physical size.
    pub msize: u8,
    /// Resistances.
    pub mresists: u8,
    /// Resistances conveyed by eating.
    pub mconveys: u8,
    /// Boolean flags.
    pub mflags1: u64,
    /// More boolean flags.
    pub mflags2: u64,
    /// Yet more boolean flags.
    pub mflags3: u16,
    /// Display colour.
    pub mcolor: u8,
}

/// Owned copy of a [`ClassSym`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassInfo {
    /// Map symbol.
    pub sym: char,
    /// Short name.
    pub name: String,
    /// Long description.
    pub explain: String,
}

/// Copies a NUL-terminated engine string; null pointers read as empty.
#[allow(unsafe_code)]
fn owned_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: engine tables hold static NUL-terminated strings.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

impl Permonst {
    /// Copies the record out of engine memory.
    pub fn to_info(&self) -> MonsterInfo {
        MonsterInfo {
            mname: owned_str(self.mname),
            mlet: self.mlet as u8,
            mlevel: self.mlevel,
            mmove: self.mmove,
            ac: self.ac,
            mr: self.mr,
            geno: self.geno,
            cwt: self.cwt,
            cnutrit: self.cnutrit,
            msound: self.msound,
            msize: self.msize,
            mresists: self.mresists,
            mconveys: self.mconveys,
            mflags1: self.mflags1 as u64,
            mflags2: self.mflags2 as u64,
            mflags3: self.mflags3,
            mcolor: self.mcolor,
        }
    }
}

impl ClassSym {
    /// Copies the record out of engine memory.
    pub fn to_info(&self) -> ClassInfo {
        ClassInfo {
            sym: self.sym as u8 as char,
            name: owned_str(self.name),
            explain: owned_str(self.explain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lichen() -> Permonst {
        Permonst {
            mname: c"lichen".as_ptr(),
            mlet: 32,
            mlevel: 0,
            mmove: 1,
            ac: 9,
            mr: 0,
            maligntyp: 0,
            geno: 0x1000,
            mattk: [Attack::default(); NATTK],
            cwt: 20,
            cnutrit: 200,
            msound: 0,
            msize: 1,
            mresists: 0,
            mconveys: 0,
            mflags1: 0x10,
            mflags2: 0,
            mflags3: 0,
            mcolor: 10,
        }
    }

    #[test]
    fn permonst_copies_every_exposed_field() {
        let info = lichen().to_info();
        assert_eq!(info.mname, "lichen");
        assert_eq!(info.mlet, 32);
        assert_eq!(info.mmove, 1);
        assert_eq!(info.ac, 9);
        assert_eq!(info.cwt, 20);
        assert_eq!(info.cnutrit, 200);
        assert_eq!(info.mflags1, 0x10);
        assert_eq!(info.mcolor, 10);
    }

    #[test]
    fn null_name_reads_as_empty() {
        let mut mon = lichen();
        mon.mname = std::ptr::null();
        assert_eq!(mon.to_info().mname, "");
    }

    #[test]
    fn class_sym_copies_strings() {
        let cs = ClassSym {
            sym: b'F' as c_char,
            name: c"".as_ptr(),
            explain: c"fungus or mold".as_ptr(),
        };
        let info = cs.to_info();
        assert_eq!(info.sym, 'F');
        assert_eq!(info.name, "");
        assert_eq!(info.explain, "fungus or mold");
    }
}
