//! Type, shape, and stride description of a strided array.

use nle_core::DType;
use smallvec::SmallVec;

/// Describes the memory behind an array-like value.
///
/// Strides are in bytes and may be negative (reversed views). The
/// descriptor is a transient inspection result: it does not keep the
/// memory alive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayDescriptor {
    /// Address of the first element.
    pub data: *mut u8,
    /// Element type.
    pub dtype: DType,
    /// Extent of each dimension, outermost first.
    pub shape: SmallVec<[usize; 4]>,
    /// Byte step between consecutive elements of each dimension.
    pub strides: SmallVec<[isize; 4]>,
}

impl ArrayDescriptor {
    /// Descriptor with explicit strides.
    pub fn new(data: *mut u8, dtype: DType, shape: &[usize], strides: &[isize]) -> Self {
        Self {
            data,
            dtype,
            shape: SmallVec::from_slice(shape),
            strides: SmallVec::from_slice(strides),
        }
    }

    /// Descriptor of a dense row-major array.
    ///
    /// Elements of [`DType::Other`] are treated as one byte wide. Returns
    /// `None` if the extents span more bytes than `isize` can address.
    pub fn contiguous(data: *mut u8, dtype: DType, shape: &[usize]) -> Option<Self> {
        let strides = c_strides(shape, dtype.size().unwrap_or(1))?;
        Some(Self {
            data,
            dtype,
            shape: SmallVec::from_slice(shape),
            strides,
        })
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.shape.iter().fold(1, |n: usize, &dim| n.saturating_mul(dim))
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Whether the elements are laid out densely in row-major order.
    ///
    /// Dimensions of extent 1 place no constraint on their stride, and an
    /// array with no elements is trivially contiguous.
    pub fn is_c_contiguous(&self) -> bool {
        if self.strides.len() != self.shape.len() {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        let Some(itemsize) = self.dtype.size() else {
            return false;
        };
        let mut expected = itemsize as isize;
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if dim != 1 && stride != expected {
                return false;
            }
            let Some(next) = isize::try_from(dim)
                .ok()
                .and_then(|dim| expected.checked_mul(dim))
            else {
                return false;
            };
            expected = next;
        }
        true
    }
}

/// Row-major byte strides for `shape`, or `None` on overflow.
pub(crate) fn c_strides(shape: &[usize], itemsize: usize) -> Option<SmallVec<[isize; 4]>> {
    let mut strides: SmallVec<[isize; 4]> = SmallVec::from_elem(0, shape.len());
    let mut step = isize::try_from(itemsize).ok()?;
    for (stride, &dim) in strides.iter_mut().zip(shape).rev() {
        *stride = step;
        step = step.checked_mul(isize::try_from(dim.max(1)).ok()?)?;
    }
    Some(strides)
}
