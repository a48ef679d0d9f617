//! Read-only descriptor classes, copied out of the engine's tables.

use nle_core::{ClassInfo, MonsterInfo};
use pyo3::prelude::*;

/// One monster species (`permonst`).
#[pyclass(name = "permonst", module = "nle._pynethack", frozen, get_all)]
pub(crate) struct Permonst {
    mname: String,
    mlet: u8,
    mlevel: i8,
    mmove: i8,
    ac: i8,
    mr: i8,
    geno: u16,
    cwt: u16,
    cnutrit: u16,
    msound: u8,
    msize: u8,
    mresists: u8,
    mconveys: u8,
    mflags1: u64,
    mflags2: u64,
    mflags3: u16,
    mcolor: u8,
}

impl From<MonsterInfo> for Permonst {
    fn from(m: MonsterInfo) -> Self {
        Self {
            mname: m.mname,
            mlet: m.mlet,
            mlevel: m.mlevel,
            mmove: m.mmove,
            ac: m.ac,
            mr: m.mr,
            geno: m.geno,
            cwt: m.cwt,
            cnutrit: m.cnutrit,
            msound: m.msound,
            msize: m.msize,
            mresists: m.mresists,
            mconveys: m.mconveys,
            mflags1: m.mflags1,
            mflags2: m.mflags2,
            mflags3: m.mflags3,
            mcolor: m.mcolor,
        }
    }
}

#[pymethods]
impl Permonst {
    fn __repr__(&self) -> String {
        format!(
            "<nethack.pynle.permonst mname='{}' mlevel={}>",
            self.mname, self.mlevel
        )
    }
}

/// One monster class (`class_sym`).
#[pyclass(name = "class_sym", module = "nle._pynethack", frozen, get_all)]
pub(crate) struct ClassSym {
    sym: char,
    name: String,
    explain: String,
}

impl From<ClassInfo> for ClassSym {
    fn from(c: ClassInfo) -> Self {
        Self {
            sym: c.sym,
            name: c.name,
            explain: c.explain,
        }
    }
}

#[pymethods]
impl ClassSym {
    fn __repr__(&self) -> String {
        format!(
            "<nethack.pynle.class_sym sym='{}' explain='{}'>",
            self.sym, self.explain
        )
    }
}
