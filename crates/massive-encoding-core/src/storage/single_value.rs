//! Binary packing of one scalar or string value
//!
//! Layout of the packed bytes, which are also the wire payload:
//!
//! ```text
//! [typeTag: i32][size: i32][value: size bytes]
//!  0             4          8
//! ```

use std::fmt;

use crate::constants::{INT32_SIZE, MAX_STRING_SIZE, SINGLE_VALUE_SIZE_OFFSET, SINGLE_VALUE_VALUE_OFFSET};
use crate::types::encoded_type::{EncodedType, Scalar};
use crate::types::error::SingleValueError;

/// Immutable packed scalar or string
///
/// Equality compares the packed bytes, so a NaN compares equal to the same NaN.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SingleValueContainer {
    bytes: Box<[u8]>,
}

impl SingleValueContainer {
    /// Pack a fixed-width scalar
    pub fn new<T: Scalar>(value: T) -> Self {
        let mut bytes = Self::with_header(T::ENCODED_TYPE, T::SIZE);
        value.write_le(&mut bytes[SINGLE_VALUE_VALUE_OFFSET..]);
        Self { bytes: bytes.into_boxed_slice() }
    }

    /// Pack a UTF-8 string
    ///
    /// # Panics
    ///
    /// Panics if the string is too long for a 32-bit size field.
    pub fn string(value: &str) -> Self {
        assert!(
            value.len() <= MAX_STRING_SIZE,
            "string of {} bytes exceeds the encodable size",
            value.len()
        );
        let mut bytes = Self::with_header(EncodedType::String, value.len());
        bytes[SINGLE_VALUE_VALUE_OFFSET..].copy_from_slice(value.as_bytes());
        Self { bytes: bytes.into_boxed_slice() }
    }

    fn with_header(encoded_type: EncodedType, size: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; SINGLE_VALUE_VALUE_OFFSET + size];
        bytes[..INT32_SIZE].copy_from_slice(&encoded_type.as_i32().to_le_bytes());
        bytes[SINGLE_VALUE_SIZE_OFFSET..SINGLE_VALUE_SIZE_OFFSET + INT32_SIZE]
            .copy_from_slice(&(size as i32).to_le_bytes());
        bytes
    }

    /// Copy a packed payload out of a buffer
    ///
    /// Returns `None` when the header is incomplete, the tag is unknown, the
    /// size is negative or the size exceeds the tag's fixed width. A size
    /// larger than the bytes present is kept and reported as value-corrupt
    /// when the value is read. Bytes past the declared size are dropped.
    pub fn from_slice(payload: &[u8]) -> Option<Self> {
        if payload.len() < SINGLE_VALUE_VALUE_OFFSET {
            return None;
        }
        let encoded_type = EncodedType::from_i32(read_i32(payload, 0))?;
        let size = usize::try_from(read_i32(payload, SINGLE_VALUE_SIZE_OFFSET)).ok()?;
        if matches!(encoded_type.fixed_size(), Some(width) if size > width) {
            return None;
        }
        let end = payload.len().min(SINGLE_VALUE_VALUE_OFFSET + size);
        Some(Self { bytes: payload[..end].into() })
    }

    /// Stored type tag
    pub fn encoded_type(&self) -> EncodedType {
        // Tag validity is checked on construction
        EncodedType::from_i32(read_i32(&self.bytes, 0)).unwrap_or(EncodedType::String)
    }

    /// Declared value size in bytes
    pub fn size(&self) -> usize {
        read_i32(&self.bytes, SINGLE_VALUE_SIZE_OFFSET).max(0) as usize
    }

    /// Value bytes actually present after the header
    pub fn value_bytes(&self) -> &[u8] {
        &self.bytes[SINGLE_VALUE_VALUE_OFFSET..]
    }

    /// Complete packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the packed bytes
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    /// Read the value back as `T`
    ///
    /// The stored tag must be exactly `T`'s tag; no numeric coercion happens.
    pub fn value<T: Scalar>(&self) -> Result<T, SingleValueError> {
        let value = self.checked_value(T::ENCODED_TYPE, T::SIZE)?;
        T::from_le_slice(value).ok_or_else(|| {
            SingleValueError::value_corrupt(
                T::ENCODED_TYPE,
                format!("Stored bytes are not a valid {} value.", T::ENCODED_TYPE),
            )
        })
    }

    /// Borrow the value as a string
    pub fn as_str(&self) -> Result<&str, SingleValueError> {
        let value = self.checked_value(EncodedType::String, 0)?;
        std::str::from_utf8(value).map_err(|error| {
            SingleValueError::value_corrupt(
                EncodedType::String,
                format!("String value is not valid UTF-8: {}.", error),
            )
        })
    }

    /// Read the value as an owned string
    pub fn string_value(&self) -> Result<String, SingleValueError> {
        self.as_str().map(str::to_owned)
    }

    fn checked_value(&self, expected: EncodedType, width: usize) -> Result<&[u8], SingleValueError> {
        let actual = self.encoded_type();
        if actual != expected {
            return Err(SingleValueError::TypeMismatch { expected, actual });
        }
        let size = self.size();
        let available = self.value_bytes().len();
        if size > available || size < width {
            return Err(SingleValueError::value_corrupt(
                expected,
                format!(
                    "Single value corrupt, expected {} bytes but found {}.",
                    size.max(width),
                    available.min(size)
                ),
            ));
        }
        Ok(&self.value_bytes()[..size])
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = match self.encoded_type() {
            EncodedType::Bool => self.value::<bool>().map(|v| v.to_string()),
            EncodedType::Int => self.value::<isize>().map(|v| v.to_string()),
            EncodedType::Int8 => self.value::<i8>().map(|v| v.to_string()),
            EncodedType::Int16 => self.value::<i16>().map(|v| v.to_string()),
            EncodedType::Int32 => self.value::<i32>().map(|v| v.to_string()),
            EncodedType::Int64 => self.value::<i64>().map(|v| v.to_string()),
            EncodedType::UInt => self.value::<usize>().map(|v| v.to_string()),
            EncodedType::UInt8 => self.value::<u8>().map(|v| v.to_string()),
            EncodedType::UInt16 => self.value::<u16>().map(|v| v.to_string()),
            EncodedType::UInt32 => self.value::<u32>().map(|v| v.to_string()),
            EncodedType::UInt64 => self.value::<u64>().map(|v| v.to_string()),
            EncodedType::Float32 => self.value::<f32>().map(|v| v.to_string()),
            EncodedType::Float64 => self.value::<f64>().map(|v| v.to_string()),
            EncodedType::String => self.as_str().map(|v| format!("{:?}", v)),
        };
        match shown {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<corrupt>"),
        }
    }
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; INT32_SIZE];
    raw.copy_from_slice(&bytes[offset..offset + INT32_SIZE]);
    i32::from_le_bytes(raw)
}

impl fmt::Display for SingleValueContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_value(f)
    }
}

impl fmt::Debug for SingleValueContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SingleValueContainer(type: {}, size: {}, value: ",
            self.encoded_type(),
            self.size()
        )?;
        self.fmt_value(f)?;
        f.write_str(")")
    }
}

impl<T: Scalar> From<T> for SingleValueContainer {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SingleValueContainer {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}
