//! # Massive Encoding Core
//!
//! Storage model and aligned binary wire codec for Massive Encoding.
//! The crate performs no I/O and no logging; everything happens on byte
//! slices supplied by the caller.

#![warn(missing_docs)]

/// Layout constants shared by the writer and the reader
pub mod constants;

/// Scalar tags, coding paths and errors
pub mod types;

/// Intermediate storage model
pub mod storage;

/// Binary wire codec
pub mod codec;

/// Typed read access to a decoded tree
pub mod decode;

/// Top-level encoded document handle
pub mod encoded_data;

// Re-export commonly used items
pub use codec::ReadLimits;
pub use decode::{KeyedDecoder, UnkeyedDecoder, ValueDecoder};
pub use encoded_data::EncodedData;
pub use storage::{KeyedContainer, SingleValueContainer, StorageContainer, StorageReference, UnkeyedContainer};
pub use types::{CodingKey, CodingPath, DecodingError, EncodedType, Result, Scalar, SingleValueError};
