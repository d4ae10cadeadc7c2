//! Global constants used throughout the Massive Encoding codec
//!
//! This module contains the compile-time layout constants that the writer and
//! the reader must agree on. Changing any of them changes the wire format.

/// Size in bytes of every length, count and tag field on the wire
///
/// All integers in the format are fixed-width 32-bit little-endian values.
pub const INT32_SIZE: usize = 4;

/// Natural alignment of a 32-bit field
pub const INT32_ALIGNMENT: usize = 4;

/// Natural alignment of UTF-8 code units (key and string bytes)
pub const UTF8_ALIGNMENT: usize = 1;

/// Word alignment used for element headers and single value payloads
///
/// Fixed at 8 bytes (the 64-bit pointer width) on every platform so that
/// the layout does not depend on the host that produced it.
pub const WORD_ALIGNMENT: usize = 8;

/// Size of an element header: `containerType:int32` + `byteCount:int32`
pub const HEADER_SIZE: usize = 2 * INT32_SIZE;

/// Alignment of an element header
///
/// Headers sit on word boundaries, which in turn keeps every payload that
/// follows a header word aligned.
pub const HEADER_ALIGNMENT: usize = WORD_ALIGNMENT;

/// Offset of the `size` field inside a single value payload
pub const SINGLE_VALUE_SIZE_OFFSET: usize = INT32_SIZE;

/// Offset of the value bytes inside a single value payload
///
/// The value is placed on the next word boundary after `typeTag` and
/// `size`, which satisfies the natural alignment of every scalar type.
pub const SINGLE_VALUE_VALUE_OFFSET: usize = WORD_ALIGNMENT;

/// Largest payload length representable in a header `byteCount` field
pub const MAX_BYTE_COUNT: usize = i32::MAX as usize;

/// Longest string a single value can hold
pub const MAX_STRING_SIZE: usize = MAX_BYTE_COUNT - SINGLE_VALUE_VALUE_OFFSET;

/// Default nesting limit applied by the reader
///
/// Every nesting level costs at least one header on the wire, so without a
/// limit a small hostile buffer could exhaust the stack of the recursive
/// reader.
pub const DEFAULT_MAX_DEPTH: usize = 512;
