//! Scalar type tags stored inside single value containers

use std::fmt;

use crate::constants::WORD_ALIGNMENT;

/// Type tag of a single value payload
///
/// Discriminants are the on-wire tag values.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodedType {
    /// Boolean, stored as one byte (0 or 1)
    Bool = 0xa1,
    /// Platform signed integer, always stored as 8 bytes
    Int = 0xa2,
    /// Signed 8-bit integer
    Int8 = 0xa3,
    /// Signed 16-bit integer
    Int16 = 0xa4,
    /// Signed 32-bit integer
    Int32 = 0xa5,
    /// Signed 64-bit integer
    Int64 = 0xa6,
    /// Platform unsigned integer, always stored as 8 bytes
    UInt = 0xa7,
    /// Unsigned 8-bit integer
    UInt8 = 0xa8,
    /// Unsigned 16-bit integer
    UInt16 = 0xa9,
    /// Unsigned 32-bit integer
    UInt32 = 0xaa,
    /// Unsigned 64-bit integer
    UInt64 = 0xab,
    /// IEEE 754 single precision float
    Float32 = 0xac,
    /// IEEE 754 double precision float
    Float64 = 0xad,
    /// UTF-8 string of arbitrary length
    String = 0xb0,
}

impl EncodedType {
    /// Every tag in wire order
    pub const ALL: [EncodedType; 14] = [
        EncodedType::Bool,
        EncodedType::Int,
        EncodedType::Int8,
        EncodedType::Int16,
        EncodedType::Int32,
        EncodedType::Int64,
        EncodedType::UInt,
        EncodedType::UInt8,
        EncodedType::UInt16,
        EncodedType::UInt32,
        EncodedType::UInt64,
        EncodedType::Float32,
        EncodedType::Float64,
        EncodedType::String,
    ];

    /// Convert a wire tag to an EncodedType
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0xa1 => Some(EncodedType::Bool),
            0xa2 => Some(EncodedType::Int),
            0xa3 => Some(EncodedType::Int8),
            0xa4 => Some(EncodedType::Int16),
            0xa5 => Some(EncodedType::Int32),
            0xa6 => Some(EncodedType::Int64),
            0xa7 => Some(EncodedType::UInt),
            0xa8 => Some(EncodedType::UInt8),
            0xa9 => Some(EncodedType::UInt16),
            0xaa => Some(EncodedType::UInt32),
            0xab => Some(EncodedType::UInt64),
            0xac => Some(EncodedType::Float32),
            0xad => Some(EncodedType::Float64),
            0xb0 => Some(EncodedType::String),
            _ => None,
        }
    }

    /// Wire tag value
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Human readable type name
    pub fn name(self) -> &'static str {
        match self {
            EncodedType::Bool => "Bool",
            EncodedType::Int => "Int",
            EncodedType::Int8 => "Int8",
            EncodedType::Int16 => "Int16",
            EncodedType::Int32 => "Int32",
            EncodedType::Int64 => "Int64",
            EncodedType::UInt => "UInt",
            EncodedType::UInt8 => "UInt8",
            EncodedType::UInt16 => "UInt16",
            EncodedType::UInt32 => "UInt32",
            EncodedType::UInt64 => "UInt64",
            EncodedType::Float32 => "Float",
            EncodedType::Float64 => "Double",
            EncodedType::String => "String",
        }
    }

    /// Storage width of fixed-size types; `None` for strings
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            EncodedType::Bool | EncodedType::Int8 | EncodedType::UInt8 => Some(1),
            EncodedType::Int16 | EncodedType::UInt16 => Some(2),
            EncodedType::Int32 | EncodedType::UInt32 | EncodedType::Float32 => Some(4),
            EncodedType::Int
            | EncodedType::Int64
            | EncodedType::UInt
            | EncodedType::UInt64
            | EncodedType::Float64 => Some(8),
            EncodedType::String => None,
        }
    }

    /// Natural alignment of the stored value
    pub fn alignment(self) -> usize {
        self.fixed_size().unwrap_or(1).min(WORD_ALIGNMENT)
    }

    /// Whether this tag holds a string
    pub fn is_string(self) -> bool {
        self == EncodedType::String
    }
}

impl fmt::Display for EncodedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width scalar that can be packed into a single value container
///
/// Implemented for `bool`, the integer primitives and the two float widths.
/// The trait is sealed; strings are handled separately.
pub trait Scalar: Copy + sealed::Sealed {
    /// Tag recorded on the wire
    const ENCODED_TYPE: EncodedType;

    /// Stored width in bytes
    const SIZE: usize;

    /// Write the little-endian form into `out`, which is exactly `SIZE` bytes
    fn write_le(self, out: &mut [u8]);

    /// Decode from at least `SIZE` bytes; `None` when the value is not representable
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const ENCODED_TYPE: EncodedType = EncodedType::$tag;
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_le(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                    let raw = bytes.get(..Self::SIZE)?.try_into().ok()?;
                    Some(<$ty>::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_scalar! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const ENCODED_TYPE: EncodedType = EncodedType::Bool;
    const SIZE: usize = 1;

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        match bytes.first()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl sealed::Sealed for isize {}

impl Scalar for isize {
    const ENCODED_TYPE: EncodedType = EncodedType::Int;
    const SIZE: usize = 8;

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out.copy_from_slice(&(self as i64).to_le_bytes());
    }

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        i64::from_le_slice(bytes).and_then(|value| isize::try_from(value).ok())
    }
}

impl sealed::Sealed for usize {}

impl Scalar for usize {
    const ENCODED_TYPE: EncodedType = EncodedType::UInt;
    const SIZE: usize = 8;

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out.copy_from_slice(&(self as u64).to_le_bytes());
    }

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        u64::from_le_slice(bytes).and_then(|value| usize::try_from(value).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_values_match_wire_format() {
        assert_eq!(EncodedType::Bool.as_i32(), 0xa1);
        assert_eq!(EncodedType::Int32.as_i32(), 0xa5);
        assert_eq!(EncodedType::UInt64.as_i32(), 0xab);
        assert_eq!(EncodedType::Float64.as_i32(), 0xad);
        assert_eq!(EncodedType::String.as_i32(), 0xb0);
    }

    #[test]
    fn from_i32_round_trips_every_tag() {
        for tag in EncodedType::ALL {
            assert_eq!(EncodedType::from_i32(tag.as_i32()), Some(tag));
        }
        assert_eq!(EncodedType::from_i32(0xae), None);
        assert_eq!(EncodedType::from_i32(0xaf), None);
        assert_eq!(EncodedType::from_i32(0), None);
        assert_eq!(EncodedType::from_i32(-1), None);
    }

    #[test]
    fn sizes_match_scalar_widths() {
        assert_eq!(EncodedType::Bool.fixed_size(), Some(bool::SIZE));
        assert_eq!(EncodedType::Int.fixed_size(), Some(isize::SIZE));
        assert_eq!(EncodedType::UInt.fixed_size(), Some(usize::SIZE));
        assert_eq!(EncodedType::Int16.fixed_size(), Some(i16::SIZE));
        assert_eq!(EncodedType::Float32.fixed_size(), Some(f32::SIZE));
        assert_eq!(EncodedType::String.fixed_size(), None);
        assert_eq!(EncodedType::String.alignment(), 1);
        assert_eq!(EncodedType::Int64.alignment(), 8);
    }

    #[test]
    fn display_uses_type_names() {
        assert_eq!(EncodedType::Int32.to_string(), "Int32");
        assert_eq!(EncodedType::Float64.to_string(), "Double");
        assert_eq!(EncodedType::String.to_string(), "String");
    }

    #[test]
    fn scalar_little_endian_layout() {
        let mut out = [0u8; 4];
        0x0102_0304i32.write_le(&mut out);
        assert_eq!(out, [4, 3, 2, 1]);
        assert_eq!(i32::from_le_slice(&out), Some(0x0102_0304));
        assert_eq!(i32::from_le_slice(&out[..3]), None);
    }

    #[test]
    fn bool_rejects_non_canonical_bytes() {
        assert_eq!(bool::from_le_slice(&[0]), Some(false));
        assert_eq!(bool::from_le_slice(&[1]), Some(true));
        assert_eq!(bool::from_le_slice(&[2]), None);
        assert_eq!(bool::from_le_slice(&[]), None);
    }

    #[test]
    fn platform_integers_use_eight_bytes() {
        let mut out = [0u8; 8];
        (-2isize).write_le(&mut out);
        assert_eq!(out, (-2i64).to_le_bytes());
        assert_eq!(isize::from_le_slice(&out), Some(-2));

        usize::MAX.write_le(&mut out);
        assert_eq!(usize::from_le_slice(&out), Some(usize::MAX));
    }
}
