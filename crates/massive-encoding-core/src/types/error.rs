//! Error types for the Massive Encoding core
//!
//! Writing never fails, so every error here comes from reading: either the
//! wire reader rejecting a buffer or a consumer asking the decoded tree for
//! something it does not hold.

use thiserror::Error;

use crate::types::coding_path::{CodingKey, CodingPath};
use crate::types::encoded_type::EncodedType;

/// Result type used throughout the core crate
pub type Result<T> = std::result::Result<T, DecodingError>;

/// Failure while reading bytes or decoding the storage tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodingError {
    /// Key absent from a keyed container
    #[error("{description} (at {path})")]
    KeyNotFound {
        /// Missing key
        key: CodingKey,
        /// Path of the keyed container that was searched
        path: CodingPath,
        /// Human readable description
        description: String,
    },

    /// Null found where a value was required, or an unkeyed cursor ran out
    #[error("{description} (at {path})")]
    ValueNotFound {
        /// Name of the requested type
        expected: String,
        /// Path of the slot
        path: CodingPath,
        /// Human readable description
        description: String,
    },

    /// Stored tag or container kind differs from the requested one
    #[error("{description} (at {path})")]
    TypeMismatch {
        /// Name of the requested type
        expected: String,
        /// Path of the slot
        path: CodingPath,
        /// Human readable description
        description: String,
    },

    /// Stored value bytes cannot be decoded as the requested type
    #[error("{description} (at {path})")]
    ValueCorrupt {
        /// Name of the requested type
        expected: String,
        /// Path of the slot
        path: CodingPath,
        /// Human readable description
        description: String,
    },

    /// Structural violation of the wire format
    #[error("{description} (at {path})")]
    DataCorrupted {
        /// Path of the element being read
        path: CodingPath,
        /// Human readable description
        description: String,
    },
}

impl DecodingError {
    /// Create a key-not-found error for `key` inside the container at `path`
    pub fn key_not_found(key: impl Into<CodingKey>, path: CodingPath) -> Self {
        let key = key.into();
        let description = format!("No value associated with key {}.", key);
        Self::KeyNotFound { key, path, description }
    }

    /// Create a value-not-found error for a null slot
    pub fn value_not_found(expected: impl Into<String>, path: CodingPath) -> Self {
        let expected = expected.into();
        let description = format!("Expected {} value but found null instead.", expected);
        Self::ValueNotFound { expected, path, description }
    }

    /// Create a value-not-found error for an exhausted unkeyed cursor
    pub fn unkeyed_at_end(expected: impl Into<String>, path: CodingPath) -> Self {
        Self::ValueNotFound {
            expected: expected.into(),
            path,
            description: "Unkeyed container is at end.".to_string(),
        }
    }

    /// Create a type-mismatch error
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl AsRef<str>,
        path: CodingPath,
    ) -> Self {
        let expected = expected.into();
        let description = format!(
            "Expected to decode {} but found {} instead.",
            expected,
            found.as_ref()
        );
        Self::TypeMismatch { expected, path, description }
    }

    /// Create a value-corrupt error
    pub fn value_corrupt(
        expected: impl Into<String>,
        path: CodingPath,
        description: impl Into<String>,
    ) -> Self {
        Self::ValueCorrupt {
            expected: expected.into(),
            path,
            description: description.into(),
        }
    }

    /// Create a data-corrupted error
    pub fn data_corrupted(path: CodingPath, description: impl Into<String>) -> Self {
        Self::DataCorrupted {
            path,
            description: description.into(),
        }
    }

    /// Attach a coding path to an error raised by a single value read
    pub fn from_single_value(error: SingleValueError, path: CodingPath) -> Self {
        match error {
            SingleValueError::TypeMismatch { expected, actual } => {
                Self::type_mismatch(expected.name(), actual.name(), path)
            }
            SingleValueError::ValueCorrupt { expected, description } => {
                Self::value_corrupt(expected.name(), path, description)
            }
        }
    }

    /// Coding path at which the error was raised
    pub fn path(&self) -> &CodingPath {
        match self {
            Self::KeyNotFound { path, .. }
            | Self::ValueNotFound { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::ValueCorrupt { path, .. }
            | Self::DataCorrupted { path, .. } => path,
        }
    }

    /// Description without the path suffix
    pub fn description(&self) -> &str {
        match self {
            Self::KeyNotFound { description, .. }
            | Self::ValueNotFound { description, .. }
            | Self::TypeMismatch { description, .. }
            | Self::ValueCorrupt { description, .. }
            | Self::DataCorrupted { description, .. } => description,
        }
    }

    /// Replace an empty path with `path`; errors that already carry one keep it
    pub fn with_path_if_unset(mut self, new_path: &CodingPath) -> Self {
        let path = match &mut self {
            Self::KeyNotFound { path, .. }
            | Self::ValueNotFound { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::ValueCorrupt { path, .. }
            | Self::DataCorrupted { path, .. } => path,
        };
        if path.is_empty() {
            *path = new_path.clone();
        }
        self
    }

    /// Check if this error describes a malformed buffer
    pub fn is_data_corrupted(&self) -> bool {
        matches!(self, Self::DataCorrupted { .. })
    }
}

/// Failure reading a typed value out of a single value container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SingleValueError {
    /// Requested tag differs from the stored tag
    #[error("Expected to decode {expected} but found {actual} instead.")]
    TypeMismatch {
        /// Requested type
        expected: EncodedType,
        /// Stored type
        actual: EncodedType,
    },

    /// Stored bytes cannot represent a value of the requested type
    #[error("{description}")]
    ValueCorrupt {
        /// Requested type
        expected: EncodedType,
        /// Human readable description
        description: String,
    },
}

impl SingleValueError {
    /// Create a value-corrupt error
    pub fn value_corrupt(expected: EncodedType, description: impl Into<String>) -> Self {
        Self::ValueCorrupt {
            expected,
            description: description.into(),
        }
    }
}
