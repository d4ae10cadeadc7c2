//! Element headers: `[containerType: i32][byteCount: i32]`

use crate::constants::INT32_SIZE;
use crate::storage::StorageContainer;

/// Container tag stored in an element header
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    /// Empty payload
    Null = 0xa,
    /// Key/element pairs
    Keyed = 0xb,
    /// Sequence of elements
    Unkeyed = 0xc,
    /// Packed scalar or string
    SingleValue = 0xd,
}

impl ContainerType {
    /// Convert a wire tag to a ContainerType
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0xa => Some(ContainerType::Null),
            0xb => Some(ContainerType::Keyed),
            0xc => Some(ContainerType::Unkeyed),
            0xd => Some(ContainerType::SingleValue),
            _ => None,
        }
    }

    /// Tag for the variant of `container`
    pub fn of(container: &StorageContainer) -> Self {
        match container {
            StorageContainer::Null => ContainerType::Null,
            StorageContainer::Keyed(_) => ContainerType::Keyed,
            StorageContainer::Unkeyed(_) => ContainerType::Unkeyed,
            StorageContainer::SingleValue(_) => ContainerType::SingleValue,
        }
    }

    /// Wire tag value
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Write a little-endian i32 at `offset`
#[inline]
pub(crate) fn write_i32(buffer: &mut [u8], offset: usize, value: i32) {
    buffer[offset..offset + INT32_SIZE].copy_from_slice(&value.to_le_bytes());
}

/// Read a little-endian i32 at `offset`, or `None` if it does not fit before `limit`
#[inline]
pub(crate) fn read_i32(buffer: &[u8], offset: usize, limit: usize) -> Option<i32> {
    let end = offset.checked_add(INT32_SIZE)?;
    if end > limit {
        return None;
    }
    let raw = buffer.get(offset..end)?.try_into().ok()?;
    Some(i32::from_le_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_tags() {
        assert_eq!(ContainerType::from_i32(0xa), Some(ContainerType::Null));
        assert_eq!(ContainerType::from_i32(0xd), Some(ContainerType::SingleValue));
        assert_eq!(ContainerType::from_i32(0xf), None);
        assert_eq!(ContainerType::Keyed.as_i32(), 0xb);
        assert_eq!(ContainerType::of(&StorageContainer::Null), ContainerType::Null);
    }

    #[test]
    fn i32_respects_limit() {
        let bytes = [1, 0, 0, 0, 2, 0, 0, 0];
        assert_eq!(read_i32(&bytes, 4, 8), Some(2));
        assert_eq!(read_i32(&bytes, 4, 7), None);
        assert_eq!(read_i32(&bytes, 6, 8), None);
    }
}
