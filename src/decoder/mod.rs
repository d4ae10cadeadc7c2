//! Decoding front door
//!
//! [`BinaryDecoder`] drives a type's `Deserialize` impl from a decoded
//! storage tree, or from raw bytes read under the configured limits.

mod deserializer;

pub use deserializer::Deserializer;

use massive_encoding_core::EncodedData;
use serde::de::{Deserialize, DeserializeOwned};

use crate::core::config::Config;
use crate::core::error::Result;
use crate::log_debug;

/// Decodes `Deserialize` values from [`EncodedData`] or bytes
#[derive(Debug, Clone, Default)]
pub struct BinaryDecoder {
    config: Config,
}

impl BinaryDecoder {
    /// Decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder using `config`
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode a value from an in-memory document
    ///
    /// Borrowed strings in `T` point into `data`.
    pub fn decode<'a, T: Deserialize<'a>>(&self, data: &'a EncodedData) -> Result<T> {
        T::deserialize(Deserializer::new(data.decoder())).map_err(|error| {
            log_debug!(%error, "decode failed");
            error
        })
    }

    /// Read `bytes` under the configured limits, then decode
    pub fn decode_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let data = EncodedData::read_from(bytes, &self.config.read_limits()).map_err(|error| {
            log_debug!(%error, len = bytes.len(), "rejected encoded bytes");
            error
        })?;
        self.decode(&data)
    }
}

/// Decode a value from bytes with default settings
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    BinaryDecoder::new().decode_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::encoder::{to_vec, BinaryEncoder};
    use massive_encoding_core::DecodingError;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Inner {
        label: String,
        weight: Option<f32>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Outer {
        id: u64,
        inner: Inner,
        items: Vec<Inner>,
    }

    #[test]
    fn borrowed_strings_point_into_the_document() {
        let data = BinaryEncoder::new().encode(&"borrowed").unwrap();
        let text: &str = BinaryDecoder::new().decode(&data).unwrap();
        assert_eq!(text, "borrowed");
    }

    #[test]
    fn strict_integer_widths() {
        let bytes = to_vec(&10i32).unwrap();
        assert_eq!(from_slice::<i32>(&bytes).unwrap(), 10);
        let error = from_slice::<i64>(&bytes).unwrap_err();
        assert!(matches!(
            error,
            Error::Decoding(DecodingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn missing_field_reports_container_path() {
        #[derive(Serialize)]
        struct Partial {
            label: String,
        }
        #[derive(Serialize)]
        struct Wrapper {
            id: u64,
            inner: Partial,
            items: Vec<Partial>,
        }

        let bytes = to_vec(&Wrapper {
            id: 1,
            inner: Partial { label: "x".into() },
            items: vec![],
        })
        .unwrap();
        let decoded: Outer = from_slice(&bytes).unwrap();
        assert_eq!(decoded.inner.weight, None);

        #[derive(Serialize)]
        struct NoLabel {
            weight: f32,
        }
        #[derive(Serialize)]
        struct Broken {
            id: u64,
            inner: NoLabel,
            items: Vec<NoLabel>,
        }
        let bytes = to_vec(&Broken {
            id: 1,
            inner: NoLabel { weight: 1.0 },
            items: vec![],
        })
        .unwrap();
        let error = from_slice::<Outer>(&bytes).unwrap_err();
        assert!(matches!(
            error,
            Error::Decoding(DecodingError::KeyNotFound { .. })
        ));
        assert_eq!(error.path().map(ToString::to_string), Some("inner".to_string()));
    }

    #[test]
    fn nested_errors_keep_their_own_path() {
        let mut map = HashMap::new();
        map.insert("a", vec!["1", "2"]);
        let bytes = to_vec(&map).unwrap();
        let error = from_slice::<HashMap<String, Vec<u8>>>(&bytes).unwrap_err();
        assert_eq!(error.path().map(ToString::to_string), Some("a[0]".to_string()));
    }

    #[test]
    fn depth_limit_comes_from_config() {
        let bytes = to_vec(&vec![vec![vec![1u8]]]).unwrap();
        let mut config = Config::default();
        config.decoding.max_depth = 2;
        let error = BinaryDecoder::with_config(config)
            .decode_slice::<Vec<Vec<Vec<u8>>>>(&bytes)
            .unwrap_err();
        assert!(matches!(error, Error::Decoding(DecodingError::DataCorrupted { .. })));
        assert_eq!(from_slice::<Vec<Vec<Vec<u8>>>>(&bytes).unwrap(), vec![vec![vec![1u8]]]);
    }
}
