//! Single-pass recursive reader
//!
//! Every element is bounded by its parent's payload, and every cursor move
//! mirrors the writer, so a well-formed buffer is consumed exactly.

use crate::codec::align::align;
use crate::codec::element::{read_i32, ContainerType};
use crate::constants::{
    DEFAULT_MAX_DEPTH, HEADER_ALIGNMENT, HEADER_SIZE, INT32_ALIGNMENT, INT32_SIZE,
    SINGLE_VALUE_SIZE_OFFSET, SINGLE_VALUE_VALUE_OFFSET, UTF8_ALIGNMENT,
};
use crate::storage::{KeyedContainer, SingleValueContainer, StorageContainer, UnkeyedContainer};
use crate::types::{CodingKey, CodingPath, DecodingError, EncodedType, Result};

/// Bounds applied while reading untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Maximum number of nested keyed/unkeyed containers
    pub max_depth: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Read one element from the start of `bytes`
pub fn read(bytes: &[u8], limits: &ReadLimits) -> Result<StorageContainer> {
    let mut reader = Reader {
        bytes,
        limits: *limits,
        path: CodingPath::root(),
        depth: 0,
    };
    reader.read_element(0, bytes.len()).map(|(container, _)| container)
}

struct Reader<'a> {
    bytes: &'a [u8],
    limits: ReadLimits,
    path: CodingPath,
    depth: usize,
}

impl<'a> Reader<'a> {
    /// Read the element at `offset`, which must end at or before `limit`.
    /// Returns the container and the offset just past its payload.
    fn read_element(&mut self, offset: usize, limit: usize) -> Result<(StorageContainer, usize)> {
        let (tag, byte_count) = match (
            read_i32(self.bytes, offset, limit),
            read_i32(self.bytes, offset + INT32_SIZE, limit),
        ) {
            (Some(tag), Some(byte_count)) => (tag, byte_count),
            _ => return Err(self.corrupted("Binary data does not contain a proper header.")),
        };
        if byte_count < 0 {
            return Err(self.corrupted("Element header declares a negative byte count."));
        }

        let start = offset + HEADER_SIZE;
        let end = start + byte_count as usize;
        if end > limit {
            return Err(self.corrupted("Binary data truncated or missing."));
        }

        let container = match ContainerType::from_i32(tag) {
            Some(ContainerType::Null) => StorageContainer::Null,
            Some(ContainerType::SingleValue) => self.read_single_value(start, end)?,
            Some(ContainerType::Unkeyed) => self.nested(|reader| reader.read_unkeyed(start, end))?,
            Some(ContainerType::Keyed) => self.nested(|reader| reader.read_keyed(start, end))?,
            None => return Err(self.corrupted("Binary data contains an unknown container type.")),
        };
        Ok((container, end))
    }

    fn nested(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<StorageContainer>,
    ) -> Result<StorageContainer> {
        if self.depth >= self.limits.max_depth {
            return Err(self.corrupted(format!(
                "Containers nested deeper than the limit of {}.",
                self.limits.max_depth
            )));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_single_value(&self, start: usize, end: usize) -> Result<StorageContainer> {
        let header = read_i32(self.bytes, start, end)
            .zip(read_i32(self.bytes, start + SINGLE_VALUE_SIZE_OFFSET, end));
        let (tag, size) = match header {
            Some(header) if end - start >= SINGLE_VALUE_VALUE_OFFSET => header,
            _ => return Err(self.corrupted("Single value container header missing or corrupt.")),
        };
        let encoded_type = match EncodedType::from_i32(tag) {
            Some(encoded_type) => encoded_type,
            None => return Err(self.corrupted("Binary data contains an unknown value type.")),
        };
        if size < 0 {
            return Err(self.corrupted("Single value container header missing or corrupt."));
        }
        if let Some(width) = encoded_type.fixed_size().filter(|&width| size as usize > width) {
            return Err(self.corrupted(format!(
                "Single value size {} exceeds the {} bytes of {}.",
                size, width, encoded_type
            )));
        }
        SingleValueContainer::from_slice(&self.bytes[start..end])
            .map(StorageContainer::SingleValue)
            .ok_or_else(|| self.corrupted("Single value container header missing or corrupt."))
    }

    fn read_unkeyed(&mut self, start: usize, end: usize) -> Result<StorageContainer> {
        let count = self.read_count(start, end, "Unkeyed container header missing or corrupt.")?;
        let mut cursor = start + INT32_SIZE;
        let mut unkeyed = UnkeyedContainer::with_capacity(count.min((end - cursor) / HEADER_SIZE));

        for index in 0..count {
            cursor = align(cursor, HEADER_ALIGNMENT);
            self.path.push(CodingKey::Index(index));
            let (element, next) = self.read_element(cursor, end)?;
            self.path.pop();
            unkeyed.push(element);
            cursor = next;
        }
        Ok(StorageContainer::Unkeyed(unkeyed))
    }

    fn read_keyed(&mut self, start: usize, end: usize) -> Result<StorageContainer> {
        let count = self.read_count(start, end, "Keyed container header missing or corrupt.")?;
        let mut cursor = start + INT32_SIZE;
        let mut keyed = KeyedContainer::new();

        for _ in 0..count {
            cursor = align(cursor, INT32_ALIGNMENT);
            let key_len = match read_i32(self.bytes, cursor, end) {
                Some(len) if len >= 0 => len as usize,
                _ => return Err(self.corrupted("Key value header missing or corrupt.")),
            };
            cursor = align(cursor + INT32_SIZE, UTF8_ALIGNMENT);

            let available = end - cursor.min(end);
            if key_len > available {
                return Err(self.corrupted(format!(
                    "Key value corrupt, expected {} bytes but found {}.",
                    key_len, available
                )));
            }
            let key = std::str::from_utf8(&self.bytes[cursor..cursor + key_len])
                .map_err(|_| self.corrupted("Key value is not valid UTF-8."))?
                .to_owned();
            cursor = align(cursor + key_len, HEADER_ALIGNMENT);

            self.path.push(CodingKey::Key(key.clone()));
            let (element, next) = self.read_element(cursor, end)?;
            self.path.pop();
            keyed.set(key, element);
            cursor = next;
        }
        Ok(StorageContainer::Keyed(keyed))
    }

    fn read_count(&self, start: usize, end: usize, message: &str) -> Result<usize> {
        match read_i32(self.bytes, start, end) {
            Some(count) if count >= 0 => Ok(count as usize),
            _ => Err(self.corrupted(message)),
        }
    }

    fn corrupted(&self, description: impl Into<String>) -> DecodingError {
        DecodingError::data_corrupted(self.path.clone(), description)
    }
}
