//! numpy arrays as slot buffers.
//!
//! Only real `numpy.ndarray` objects are array-like here. Nothing is
//! converted: lists, scalars, and buffer-protocol objects are rejected so
//! the engine can never write into a temporary copy.

use nle_buffer::{ArrayDescriptor, ArrayLike, BufferHold};
use nle_core::DType;
use numpy::{dtype, PyArrayDescr, PyArrayDescrMethods, PyUntypedArray, PyUntypedArrayMethods};
use pyo3::prelude::*;

/// A Python object offered for a slot.
pub(crate) struct NumpyBuffer<'py>(pub(crate) Bound<'py, PyAny>);

/// Maps a numpy dtype onto [`DType`] by equivalence, never by casting.
fn element_type(descr: &Bound<'_, PyArrayDescr>) -> DType {
    let py = descr.py();
    let known = [
        (dtype::<bool>(py), DType::Bool),
        (dtype::<i8>(py), DType::I8),
        (dtype::<u8>(py), DType::U8),
        (dtype::<i16>(py), DType::I16),
        (dtype::<u16>(py), DType::U16),
        (dtype::<i32>(py), DType::I32),
        (dtype::<u32>(py), DType::U32),
        (dtype::<i64>(py), DType::I64),
        (dtype::<u64>(py), DType::U64),
        (dtype::<f32>(py), DType::F32),
        (dtype::<f64>(py), DType::F64),
    ];
    known
        .into_iter()
        .find(|(candidate, _)| descr.is_equiv_to(candidate))
        .map_or(DType::Other(descr.char()), |(_, dt)| dt)
}

// SAFETY: only `numpy.ndarray` objects are described, with numpy's own
// data pointer, shape, and strides. `retain` keeps a reference to the
// array, which keeps its data allocated and in place.
unsafe impl ArrayLike for NumpyBuffer<'_> {
    fn describe(&self) -> Option<ArrayDescriptor> {
        let array = self.0.cast::<PyUntypedArray>().ok()?;
        // SAFETY: `array` is a live ndarray; only the data pointer is read.
        let data = unsafe { (*array.as_array_ptr()).data }.cast::<u8>();
        Some(ArrayDescriptor::new(
            data,
            element_type(&array.dtype()),
            array.shape(),
            array.strides(),
        ))
    }

    fn retain(&self) -> BufferHold {
        BufferHold::new(self.0.clone().unbind())
    }
}
