//! Python bindings for NLE sessions.
//!
//! The native extension is named `_pynethack` and is imported by the
//! pure-Python `nle` package. It exposes the `Nethack` session class, the
//! descriptor classes, typed exceptions, and a `nethack` submodule of
//! constants and glyph predicates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![allow(unsafe_code)]

use pyo3::prelude::*;

mod array;
mod constants;
mod descriptor;
mod error;
mod nethack;

/// The NetHack Learning Environment.
#[pymodule]
fn _pynethack(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<nethack::Nethack>()?;
    m.add_class::<descriptor::Permonst>()?;
    m.add_class::<descriptor::ClassSym>()?;

    error::register(m)?;
    constants::register(m)?;

    Ok(())
}
