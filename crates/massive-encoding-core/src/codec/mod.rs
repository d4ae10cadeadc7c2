//! Aligned binary wire codec
//!
//! An encoded document is a single element:
//!
//! ```text
//! Element        [containerType: i32][byteCount: i32][payload: byteCount bytes]
//! Null           (empty)
//! SingleValue    [typeTag: i32][size: i32][value: size bytes]
//! Unkeyed        [count: i32] then count x (pad8, Element)
//! Keyed          [count: i32] then count x (pad4, [keyLen: i32][key bytes], pad8, Element)
//! ```
//!
//! Integers are little-endian. Alignment is measured from the start of the
//! document, and all padding bytes are zero.

pub mod align;
pub mod element;
pub mod reader;
pub mod writer;

pub use align::align;
pub use element::ContainerType;
pub use reader::{read, ReadLimits};
pub use writer::{byte_count, write};
