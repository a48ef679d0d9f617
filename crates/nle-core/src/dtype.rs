//! Element types accepted by the engine's output slots.
//!
//! [`DType`] is the runtime tag carried by array descriptors; [`Element`]
//! ties a Rust primitive to its tag so validation can be instantiated once
//! per required element type.

use std::fmt;

/// The platform C `long`, used by the status-line slot.
///
/// 64-bit on LP64 targets (Linux, macOS), 32-bit on LLP64 (Windows).
pub type Long = std::os::raw::c_long;

/// Runtime element-type tag of an array.
///
/// Tags compare exactly: there is no notion of a "compatible" or "wider"
/// type. Byte order is always native; foreign-endian arrays surface as
/// [`DType::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean stored as one byte.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    F64,
    /// Any other element type, identified by its one-byte type code.
    Other(u8),
}

impl DType {
    /// Size of one element in bytes, or `None` for [`DType::Other`].
    pub fn size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::Other(_) => None,
        }
    }

    /// Stable integer code used across the C ABI.
    pub fn code(self) -> i32 {
        match self {
            Self::Bool => 0,
            Self::I8 => 1,
            Self::U8 => 2,
            Self::I16 => 3,
            Self::U16 => 4,
            Self::I32 => 5,
            Self::U32 => 6,
            Self::I64 => 7,
            Self::U64 => 8,
            Self::F32 => 9,
            Self::F64 => 10,
            Self::Other(c) => -(c as i32) - 1,
        }
    }

    /// Inverse of [`code`](Self::code). Unknown non-negative codes return `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Bool,
            1 => Self::I8,
            2 => Self::U8,
            3 => Self::I16,
            4 => Self::U16,
            5 => Self::I32,
            6 => Self::U32,
            7 => Self::I64,
            8 => Self::U64,
            9 => Self::F32,
            10 => Self::F64,
            c if (-256..0).contains(&c) => Self::Other((-(c + 1)) as u8),
            _ => return None,
        })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::I8 => write!(f, "int8"),
            Self::U8 => write!(f, "uint8"),
            Self::I16 => write!(f, "int16"),
            Self::U16 => write!(f, "uint16"),
            Self::I32 => write!(f, "int32"),
            Self::U32 => write!(f, "uint32"),
            Self::I64 => write!(f, "int64"),
            Self::U64 => write!(f, "uint64"),
            Self::F32 => write!(f, "float32"),
            Self::F64 => write!(f, "float64"),
            Self::Other(c) if c.is_ascii_graphic() => write!(f, "other('{}')", *c as char),
            Self::Other(c) => write!(f, "other(0x{c:02x})"),
        }
    }
}

/// A primitive that can back an output slot.
pub trait Element: Copy + Send + Sync + 'static {
    /// The runtime tag matching this type.
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(impl Element for $ty {
            const DTYPE: DType = DType::$tag;
        })*
    };
}

impl_element! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_rust_primitives() {
        assert_eq!(DType::I16.size(), Some(std::mem::size_of::<i16>()));
        assert_eq!(DType::U8.size(), Some(1));
        assert_eq!(DType::I32.size(), Some(4));
        assert_eq!(<Long as Element>::DTYPE.size(), Some(std::mem::size_of::<Long>()));
        assert_eq!(DType::Other(b'e').size(), None);
    }

    #[test]
    fn code_round_trips_for_every_tag() {
        let tags = [
            DType::Bool,
            DType::I8,
            DType::U8,
            DType::I16,
            DType::U16,
            DType::I32,
            DType::U32,
            DType::I64,
            DType::U64,
            DType::F32,
            DType::F64,
            DType::Other(0),
            DType::Other(b'O'),
            DType::Other(255),
        ];
        for tag in tags {
            assert_eq!(DType::from_code(tag.code()), Some(tag), "{tag}");
        }
        assert_eq!(DType::from_code(11), None);
        assert_eq!(DType::from_code(-257), None);
    }

    #[test]
    fn display_uses_numpy_names() {
        assert_eq!(DType::I16.to_string(), "int16");
        assert_eq!(DType::U8.to_string(), "uint8");
        assert_eq!(DType::Other(b'e').to_string(), "other('e')");
        assert_eq!(DType::Other(0).to_string(), "other(0x00)");
    }

    #[cfg(target_pointer_width = "64")]
    #[cfg(not(windows))]
    #[test]
    fn long_is_64_bit_on_lp64() {
        assert_eq!(<Long as Element>::DTYPE, DType::I64);
    }
}
