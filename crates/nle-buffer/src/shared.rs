//! Reference-counted Rust-owned array usable as a slot buffer.

use std::fmt;
use std::sync::atomic::{
    AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicU16, AtomicU32, AtomicU64, AtomicU8,
    Ordering,
};
use std::sync::Arc;

use nle_core::Element;
use smallvec::SmallVec;

use crate::array::{ArrayLike, BufferHold};
use crate::descriptor::ArrayDescriptor;
use crate::validate::ValidationError;

/// An [`Element`] stored in an atomic cell of identical size.
///
/// Cells are what a [`SharedBuffer`] is made of: an array of them has the
/// layout of an array of `Self`, and every Rust-side access is a relaxed
/// atomic load or store.
pub trait SharedElement: Element {
    /// Atomic cell with the size and bit layout of `Self`.
    type Cell: Send + Sync + 'static;

    /// A cell holding `value`.
    fn cell(value: Self) -> Self::Cell;

    /// Reads a cell.
    fn load(cell: &Self::Cell) -> Self;

    /// Overwrites a cell.
    fn store(cell: &Self::Cell, value: Self);
}

macro_rules! impl_shared_element {
    ($($ty:ty => $atomic:ty),* $(,)?) => {
        $(impl SharedElement for $ty {
            type Cell = $atomic;

            fn cell(value: Self) -> $atomic {
                <$atomic>::new(value)
            }

            fn load(cell: &$atomic) -> Self {
                cell.load(Ordering::Relaxed)
            }

            fn store(cell: &$atomic, value: Self) {
                cell.store(value, Ordering::Relaxed);
            }
        })*
    };
}

impl_shared_element! {
    i8 => AtomicI8,
    u8 => AtomicU8,
    i16 => AtomicI16,
    u16 => AtomicU16,
    i32 => AtomicI32,
    u32 => AtomicU32,
    i64 => AtomicI64,
    u64 => AtomicU64,
}

macro_rules! impl_shared_float {
    ($($ty:ty => $atomic:ty),* $(,)?) => {
        $(impl SharedElement for $ty {
            type Cell = $atomic;

            fn cell(value: Self) -> $atomic {
                <$atomic>::new(value.to_bits())
            }

            fn load(cell: &$atomic) -> Self {
                <$ty>::from_bits(cell.load(Ordering::Relaxed))
            }

            fn store(cell: &$atomic, value: Self) {
                cell.store(value.to_bits(), Ordering::Relaxed);
            }
        })*
    };
}

impl_shared_float! {
    f32 => AtomicU32,
    f64 => AtomicU64,
}

struct Storage<T: SharedElement> {
    cells: Box<[T::Cell]>,
}

/// A dense row-major array shared between its owner and a session.
///
/// Cloning shares the same memory. Binding the buffer to a session adds a
/// reference; rebinding or closing the session drops it again, which
/// [`holders`](SharedBuffer::holders) makes observable.
///
/// Element reads and writes from Rust are atomic, so clones may be used
/// from several threads. The engine writes only inside a session call;
/// a read racing one on another thread may see a mix of old and new
/// elements.
pub struct SharedBuffer<T: SharedElement> {
    storage: Arc<Storage<T>>,
    shape: SmallVec<[usize; 4]>,
}

impl<T: SharedElement> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            shape: self.shape.clone(),
        }
    }
}

impl<T: SharedElement> SharedBuffer<T> {
    /// A buffer of `shape` with every element set to `value`.
    pub fn filled(shape: &[usize], value: T) -> Self {
        let len = shape.iter().product();
        let cells = (0..len).map(|_| T::cell(value)).collect();
        Self {
            storage: Arc::new(Storage { cells }),
            shape: SmallVec::from_slice(shape),
        }
    }

    /// A buffer of `shape` filled with `T::default()`.
    pub fn zeros(shape: &[usize]) -> Self
    where
        T: Default,
    {
        Self::filled(shape, T::default())
    }

    /// Wraps `data` as an array of `shape`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::WrongShape`] if `data.len()` does not match.
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self, ValidationError> {
        let len: usize = shape.iter().product();
        if data.len() != len {
            return Err(ValidationError::WrongShape {
                expected: shape.to_vec(),
                found: vec![data.len()],
            });
        }
        let cells = data.into_iter().map(T::cell).collect();
        Ok(Self {
            storage: Arc::new(Storage { cells }),
            shape: SmallVec::from_slice(shape),
        })
    }

    /// Extent of each dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.storage.cells.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.storage.cells.is_empty()
    }

    /// Pointer to the first element.
    pub fn as_ptr(&self) -> *mut T {
        self.storage.cells.as_ptr().cast::<T>().cast_mut()
    }

    /// Element at flat row-major `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.storage.cells.get(index).map(T::load)
    }

    /// Element at the multi-dimensional position `at`.
    pub fn get_at(&self, at: &[usize]) -> Option<T> {
        if at.len() != self.shape.len() {
            return None;
        }
        let mut index = 0;
        for (&i, &dim) in at.iter().zip(self.shape.iter()) {
            if i >= dim {
                return None;
            }
            index = index * dim + i;
        }
        self.get(index)
    }

    /// Overwrites one element. Returns `false` if `index` is out of range.
    pub fn set(&self, index: usize, value: T) -> bool {
        match self.storage.cells.get(index) {
            Some(cell) => {
                T::store(cell, value);
                true
            }
            None => false,
        }
    }

    /// Overwrites every element.
    pub fn fill(&self, value: T) {
        for cell in self.storage.cells.iter() {
            T::store(cell, value);
        }
    }

    /// Copies the contents out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.storage.cells.iter().map(T::load).collect()
    }

    /// Number of live references to the memory, including this one.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.storage)
    }
}

// SAFETY: the cells are atomics laid out like `[T]`, so the engine may
// write through a shared pointer to them. `retain` hands out the `Arc`
// that owns the allocation, which never moves.
#[allow(unsafe_code)]
unsafe impl<T: SharedElement> ArrayLike for SharedBuffer<T> {
    fn describe(&self) -> Option<ArrayDescriptor> {
        ArrayDescriptor::contiguous(self.as_ptr().cast::<u8>(), T::DTYPE, &self.shape)
    }

    fn retain(&self) -> BufferHold {
        BufferHold::new(Arc::clone(&self.storage))
    }
}

impl<T: SharedElement + fmt::Debug> fmt::Debug for SharedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("dtype", &T::DTYPE)
            .field("shape", &self.shape.as_slice())
            .field("holders", &self.holders())
            .finish()
    }
}
