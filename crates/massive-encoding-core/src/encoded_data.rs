//! Top-level handle owning one encoded document

use bytes::{Bytes, BytesMut};
use once_cell::unsync::OnceCell;

use crate::codec::{self, ReadLimits};
use crate::constants::HEADER_SIZE;
use crate::decode::ValueDecoder;
use crate::storage::StorageContainer;
use crate::types::{DecodingError, Result};

/// Immutable encoded document
///
/// Holds the root container (null when nothing was written). The byte count
/// is computed on first use and cached.
#[derive(Debug, Clone, Default)]
pub struct EncodedData {
    storage: StorageContainer,
    byte_count: OnceCell<usize>,
}

impl EncodedData {
    /// Wrap a finished storage tree
    pub fn new(storage: StorageContainer) -> Self {
        Self {
            storage,
            byte_count: OnceCell::new(),
        }
    }

    /// Root container
    pub fn storage(&self) -> &StorageContainer {
        &self.storage
    }

    /// Take the root container back
    pub fn into_storage(self) -> StorageContainer {
        self.storage
    }

    /// Decoder positioned at the root
    pub fn decoder(&self) -> ValueDecoder<'_> {
        ValueDecoder::new(&self.storage)
    }

    /// Number of bytes the encoded form occupies
    pub fn byte_count(&self) -> usize {
        *self.byte_count.get_or_init(|| codec::byte_count(&self.storage))
    }

    /// Encode into a new vector
    pub fn to_vec(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.byte_count()];
        codec::writer::emit(&self.storage, &mut buffer);
        buffer
    }

    /// Encode into a new `Bytes`
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_vec())
    }

    /// Encode into caller memory, returning the bytes written
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is shorter than [`byte_count`](Self::byte_count).
    pub fn write_to(&self, buffer: &mut [u8]) -> usize {
        let needed = self.byte_count();
        assert!(
            buffer.len() >= needed,
            "destination holds {} bytes but {} are required",
            buffer.len(),
            needed
        );
        codec::writer::emit(&self.storage, &mut buffer[..needed])
    }

    /// Append the encoded form to `buffer`
    pub fn write_into(&self, buffer: &mut BytesMut) -> usize {
        let start = buffer.len();
        buffer.resize(start + self.byte_count(), 0);
        codec::writer::emit(&self.storage, &mut buffer[start..])
    }

    /// Decode with the default read limits
    ///
    /// A buffer shorter than one header decodes as null.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes, &ReadLimits::default())
    }

    /// Decode from caller memory with explicit limits
    pub fn read_from(bytes: &[u8], limits: &ReadLimits) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Ok(Self::default());
        }
        let storage = codec::read(bytes, limits)?;
        let byte_count = OnceCell::new();
        Ok(Self { storage, byte_count })
    }
}

impl From<StorageContainer> for EncodedData {
    fn from(storage: StorageContainer) -> Self {
        Self::new(storage)
    }
}

impl From<EncodedData> for StorageContainer {
    fn from(data: EncodedData) -> Self {
        data.storage
    }
}

impl From<&EncodedData> for Vec<u8> {
    fn from(data: &EncodedData) -> Self {
        data.to_vec()
    }
}

impl From<EncodedData> for Vec<u8> {
    fn from(data: EncodedData) -> Self {
        data.to_vec()
    }
}

impl TryFrom<&[u8]> for EncodedData {
    type Error = DecodingError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl PartialEq for EncodedData {
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

impl Eq for EncodedData {}
