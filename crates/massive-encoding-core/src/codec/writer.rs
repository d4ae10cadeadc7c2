//! Two-pass writer: size the tree, then emit it
//!
//! Both passes walk the tree in the same order and place every field with
//! [`align`], so the emitted length always equals the computed byte count.

use crate::codec::align::align;
use crate::codec::element::{write_i32, ContainerType};
use crate::constants::{
    HEADER_ALIGNMENT, HEADER_SIZE, INT32_ALIGNMENT, INT32_SIZE, MAX_BYTE_COUNT, UTF8_ALIGNMENT,
};
use crate::storage::{KeyedContainer, StorageContainer, UnkeyedContainer};

/// Exact number of bytes `write` will emit for `container`
pub fn byte_count(container: &StorageContainer) -> usize {
    element_end(container, 0)
}

/// Emit `container` at the start of `buffer`, returning the bytes written
///
/// # Panics
///
/// Panics if `buffer` is shorter than [`byte_count`] or a payload exceeds the
/// 32-bit byte count field.
pub fn write(container: &StorageContainer, buffer: &mut [u8]) -> usize {
    let needed = byte_count(container);
    assert!(
        buffer.len() >= needed,
        "destination holds {} bytes but {} are required",
        buffer.len(),
        needed
    );
    emit(container, buffer)
}

/// Emit without the size pre-check; callers must have sized `buffer`
pub(crate) fn emit(container: &StorageContainer, buffer: &mut [u8]) -> usize {
    write_element(container, buffer, 0)
}

fn element_end(container: &StorageContainer, offset: usize) -> usize {
    let payload_start = offset + HEADER_SIZE;
    match container {
        StorageContainer::Null => payload_start,
        StorageContainer::SingleValue(value) => payload_start + value.byte_count(),
        StorageContainer::Unkeyed(unkeyed) => unkeyed_end(unkeyed, payload_start),
        StorageContainer::Keyed(keyed) => keyed_end(keyed, payload_start),
    }
}

fn unkeyed_end(unkeyed: &UnkeyedContainer, start: usize) -> usize {
    let mut cursor = start + INT32_SIZE;
    for element in unkeyed {
        cursor = element_end(element, align(cursor, HEADER_ALIGNMENT));
    }
    cursor
}

fn keyed_end(keyed: &KeyedContainer, start: usize) -> usize {
    let mut cursor = start + INT32_SIZE;
    for (key, element) in keyed {
        cursor = align(cursor, INT32_ALIGNMENT) + INT32_SIZE;
        cursor = align(cursor, UTF8_ALIGNMENT) + key.len();
        cursor = element_end(element, align(cursor, HEADER_ALIGNMENT));
    }
    cursor
}

fn write_element(container: &StorageContainer, buffer: &mut [u8], offset: usize) -> usize {
    let payload_start = offset + HEADER_SIZE;
    let payload_end = match container {
        StorageContainer::Null => payload_start,
        StorageContainer::SingleValue(value) => {
            let end = payload_start + value.byte_count();
            buffer[payload_start..end].copy_from_slice(value.as_bytes());
            end
        }
        StorageContainer::Unkeyed(unkeyed) => write_unkeyed(unkeyed, buffer, payload_start),
        StorageContainer::Keyed(keyed) => write_keyed(keyed, buffer, payload_start),
    };

    // Header is stamped once the payload length is known
    write_i32(buffer, offset, ContainerType::of(container).as_i32());
    write_i32(buffer, offset + INT32_SIZE, to_i32(payload_end - payload_start));
    payload_end
}

fn write_unkeyed(unkeyed: &UnkeyedContainer, buffer: &mut [u8], start: usize) -> usize {
    write_i32(buffer, start, to_i32(unkeyed.len()));
    let mut cursor = start + INT32_SIZE;
    for element in unkeyed {
        cursor = pad(buffer, cursor, HEADER_ALIGNMENT);
        cursor = write_element(element, buffer, cursor);
    }
    cursor
}

fn write_keyed(keyed: &KeyedContainer, buffer: &mut [u8], start: usize) -> usize {
    write_i32(buffer, start, to_i32(keyed.len()));
    let mut cursor = start + INT32_SIZE;
    for (key, element) in keyed {
        cursor = pad(buffer, cursor, INT32_ALIGNMENT);
        write_i32(buffer, cursor, to_i32(key.len()));
        cursor = pad(buffer, cursor + INT32_SIZE, UTF8_ALIGNMENT);
        buffer[cursor..cursor + key.len()].copy_from_slice(key.as_bytes());
        cursor = pad(buffer, cursor + key.len(), HEADER_ALIGNMENT);
        cursor = write_element(element, buffer, cursor);
    }
    cursor
}

/// Zero-fill up to the next `alignment` boundary
#[inline]
fn pad(buffer: &mut [u8], cursor: usize, alignment: usize) -> usize {
    let next = align(cursor, alignment);
    buffer[cursor..next].fill(0);
    next
}

#[inline]
fn to_i32(value: usize) -> i32 {
    assert!(value <= MAX_BYTE_COUNT, "{} does not fit a 32-bit length field", value);
    value as i32
}
