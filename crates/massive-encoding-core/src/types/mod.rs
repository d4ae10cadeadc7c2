//! Shared types: scalar tags, coding paths and errors

pub mod coding_path;
pub mod encoded_type;
pub mod error;

pub use coding_path::{CodingKey, CodingPath};
pub use encoded_type::{EncodedType, Scalar};
pub use error::{DecodingError, Result, SingleValueError};
