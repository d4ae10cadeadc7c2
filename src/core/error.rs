//! Error types and handling for Massive Encoding
//!
//! Wraps the core decoding taxonomy and adds the failures that only the
//! serde front door and configuration loading can produce.

use std::fmt::Display;

use massive_encoding_core::{CodingPath, DecodingError};
use serde::{de, ser};
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Massive Encoding
#[derive(Error, Debug)]
pub enum Error {
    /// Value could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Bytes or storage tree could not be decoded
    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Free-form message raised by a serde implementation
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Underlying decoding error, if any
    pub fn as_decoding(&self) -> Option<&DecodingError> {
        match self {
            Error::Decoding(error) => Some(error),
            _ => None,
        }
    }

    /// Coding path of a decoding error
    pub fn path(&self) -> Option<&CodingPath> {
        self.as_decoding().map(DecodingError::path)
    }

    /// Give a decoding error raised without a path the path of `path`
    pub fn with_path_if_unset(self, path: &CodingPath) -> Self {
        match self {
            Error::Decoding(error) => Error::Decoding(error.with_path_if_unset(path)),
            other => other,
        }
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Encoding(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    fn invalid_type(unexp: de::Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        Error::Decoding(DecodingError::type_mismatch(
            exp.to_string(),
            unexp.to_string(),
            CodingPath::root(),
        ))
    }

    fn invalid_value(unexp: de::Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        Error::Decoding(DecodingError::value_corrupt(
            exp.to_string(),
            CodingPath::root(),
            format!("Invalid value: {}, expected {}.", unexp, exp),
        ))
    }

    fn missing_field(field: &'static str) -> Self {
        Error::Decoding(DecodingError::key_not_found(field, CodingPath::root()))
    }
}
