//! The `nethack` submodule: named constants and glyph predicates.

use nle_core::nethack::CONSTANTS;
use pyo3::prelude::*;

macro_rules! glyph_functions {
    ($($name:ident),* $(,)?) => {
        $(
            #[pyfunction]
            fn $name(glyph: i32) -> bool {
                nle_core::glyph::$name(glyph)
            }
        )*

        fn add_predicates(m: &Bound<'_, PyModule>) -> PyResult<()> {
            $( m.add_function(wrap_pyfunction!($name, m)?)?; )*
            Ok(())
        }
    };
}

glyph_functions!(
    glyph_is_monster,
    glyph_is_normal_monster,
    glyph_is_pet,
    glyph_is_body,
    glyph_is_statue,
    glyph_is_ridden_monster,
    glyph_is_detected_monster,
    glyph_is_invisible,
    glyph_is_normal_object,
    glyph_is_object,
    glyph_is_trap,
    glyph_is_cmap,
    glyph_is_swallow,
    glyph_is_warning,
);

/// Monster index of a monster glyph, or `NO_GLYPH` for any other glyph.
#[pyfunction]
fn glyph_to_mon(glyph: i32) -> i32 {
    nle_core::glyph::glyph_to_mon(glyph)
}

pub(crate) fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "nethack")?;
    m.add("__doc__", "Collection of NetHack constants and functions")?;
    for &(name, value) in CONSTANTS {
        m.add(name, value)?;
    }
    add_predicates(&m)?;
    m.add_function(wrap_pyfunction!(glyph_to_mon, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
