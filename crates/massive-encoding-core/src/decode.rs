//! Typed read access to a decoded storage tree
//!
//! A consumer starts from [`ValueDecoder::new`] on the root and walks down
//! through keyed and unkeyed decoders. Every failure carries the coding path
//! of the slot that produced it.

use crate::storage::{KeyedContainer, SingleValueContainer, StorageContainer, UnkeyedContainer};
use crate::types::{CodingPath, DecodingError, EncodedType, Result, Scalar};

const KEYED_NAME: &str = "a keyed container";
const UNKEYED_NAME: &str = "an unkeyed container";

/// Read access to one slot
#[derive(Debug, Clone)]
pub struct ValueDecoder<'a> {
    container: &'a StorageContainer,
    path: CodingPath,
}

impl<'a> ValueDecoder<'a> {
    /// Decoder for a document root
    pub fn new(container: &'a StorageContainer) -> Self {
        Self::with_path(container, CodingPath::root())
    }

    /// Decoder for a slot located at `path`
    pub fn with_path(container: &'a StorageContainer, path: CodingPath) -> Self {
        Self { container, path }
    }

    /// Underlying container
    pub fn container(&self) -> &'a StorageContainer {
        self.container
    }

    /// Path of this slot
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Whether the slot holds null
    pub fn is_null(&self) -> bool {
        self.container.is_null()
    }

    /// Packed value in this slot
    pub fn single_value(&self, expected: &str) -> Result<&'a SingleValueContainer> {
        match self.container {
            StorageContainer::SingleValue(value) => Ok(value),
            StorageContainer::Null => Err(DecodingError::value_not_found(expected, self.path.clone())),
            other => Err(DecodingError::type_mismatch(expected, other.kind_name(), self.path.clone())),
        }
    }

    /// Read a scalar whose stored tag is exactly `T`'s
    pub fn scalar<T: Scalar>(&self) -> Result<T> {
        self.single_value(T::ENCODED_TYPE.name())?
            .value::<T>()
            .map_err(|error| DecodingError::from_single_value(error, self.path.clone()))
    }

    /// Borrow a string value
    pub fn string(&self) -> Result<&'a str> {
        self.single_value(EncodedType::String.name())?
            .as_str()
            .map_err(|error| DecodingError::from_single_value(error, self.path.clone()))
    }

    /// Open the keyed container in this slot
    pub fn keyed(&self) -> Result<KeyedDecoder<'a>> {
        match self.container {
            StorageContainer::Keyed(container) => Ok(KeyedDecoder {
                container,
                path: self.path.clone(),
            }),
            StorageContainer::Null => Err(DecodingError::value_not_found(KEYED_NAME, self.path.clone())),
            other => Err(DecodingError::type_mismatch(KEYED_NAME, other.kind_name(), self.path.clone())),
        }
    }

    /// Open the unkeyed container in this slot
    pub fn unkeyed(&self) -> Result<UnkeyedDecoder<'a>> {
        match self.container {
            StorageContainer::Unkeyed(container) => Ok(UnkeyedDecoder {
                container,
                path: self.path.clone(),
                index: 0,
            }),
            StorageContainer::Null => {
                Err(DecodingError::value_not_found(UNKEYED_NAME, self.path.clone()))
            }
            other => Err(DecodingError::type_mismatch(UNKEYED_NAME, other.kind_name(), self.path.clone())),
        }
    }
}

/// Read access to a keyed container
#[derive(Debug, Clone)]
pub struct KeyedDecoder<'a> {
    container: &'a KeyedContainer,
    path: CodingPath,
}

impl<'a> KeyedDecoder<'a> {
    /// Path of the container
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Whether `key` has a value, null included
    pub fn contains(&self, key: &str) -> bool {
        self.container.contains(key)
    }

    /// Keys in wire order
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &'a str> + 'a {
        self.container.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.container.len()
    }

    /// Whether the container has no entries
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Decoder for the value under `key`
    pub fn value(&self, key: &str) -> Result<ValueDecoder<'a>> {
        self.value_if_present(key)
            .ok_or_else(|| DecodingError::key_not_found(key, self.path.clone()))
    }

    /// Decoder for the value under `key`, or `None` if absent
    pub fn value_if_present(&self, key: &str) -> Option<ValueDecoder<'a>> {
        self.container
            .get(key)
            .map(|container| ValueDecoder::with_path(container, self.path.appending(key)))
    }

    /// Whether the value under `key` is null
    pub fn is_null(&self, key: &str) -> Result<bool> {
        self.value(key).map(|value| value.is_null())
    }

    /// Entries in wire order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a str, ValueDecoder<'a>)> + 'a {
        let path = self.path.clone();
        self.container.iter().map(move |(key, container)| {
            (
                key.as_str(),
                ValueDecoder::with_path(container, path.appending(key.as_str())),
            )
        })
    }
}

/// Cursor over an unkeyed container
#[derive(Debug, Clone)]
pub struct UnkeyedDecoder<'a> {
    container: &'a UnkeyedContainer,
    path: CodingPath,
    index: usize,
}

impl<'a> UnkeyedDecoder<'a> {
    /// Path of the container
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Total number of elements
    pub fn count(&self) -> usize {
        self.container.len()
    }

    /// Index of the next element
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Whether every element has been consumed
    pub fn is_at_end(&self) -> bool {
        self.index >= self.container.len()
    }

    /// Number of elements not yet consumed
    pub fn remaining(&self) -> usize {
        self.container.len().saturating_sub(self.index)
    }

    /// Decoder for the next element; advances the cursor
    pub fn next_value(&mut self) -> Result<ValueDecoder<'a>> {
        let container = self.peek()?;
        let path = self.path.appending(self.index);
        self.index += 1;
        Ok(ValueDecoder::with_path(container, path))
    }

    /// Consume the next element if it is null
    ///
    /// Returns `false` and leaves the cursor in place otherwise.
    pub fn decode_null(&mut self) -> Result<bool> {
        if self.peek()?.is_null() {
            self.index += 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn peek(&self) -> Result<&'a StorageContainer> {
        self.container
            .get(self.index)
            .ok_or_else(|| DecodingError::unkeyed_at_end("a value", self.path.appending(self.index)))
    }
}
