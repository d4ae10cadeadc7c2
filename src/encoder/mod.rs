//! Encoding front door
//!
//! [`BinaryEncoder`] drives a value's `Serialize` impl into a storage tree
//! and hands the finished tree over as [`EncodedData`].

mod serializer;

pub use serializer::{MapSerializer, SeqSerializer, Serializer};

use bytes::Bytes;
use massive_encoding_core::{EncodedData, StorageReference};
use serde::Serialize;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::log_trace;

/// Encodes `Serialize` values into [`EncodedData`]
#[derive(Debug, Clone, Default)]
pub struct BinaryEncoder {
    config: Config,
}

impl BinaryEncoder {
    /// Encoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder using `config`
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the storage tree for `value`
    ///
    /// Fails if serialization fails or the document would exceed
    /// `encoding.max_byte_count`.
    pub fn encode<T: ?Sized + Serialize>(&self, value: &T) -> Result<EncodedData> {
        let mut root = None;
        value.serialize(Serializer::new(StorageReference::local(&mut root)))?;

        let data = EncodedData::new(root.unwrap_or_default());
        let byte_count = data.byte_count();
        let limit = self.config.encoding.max_byte_count;
        if byte_count > limit {
            return Err(Error::encoding(format!(
                "Encoded size {} bytes exceeds the limit of {} bytes",
                byte_count, limit
            )));
        }

        log_trace!(byte_count, "encoded value");
        Ok(data)
    }

    /// Encode `value` straight into a byte vector
    pub fn encode_to_vec<T: ?Sized + Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        self.encode(value).map(|data| data.to_vec())
    }
}

/// Encode `value` with default settings into a byte vector
pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    BinaryEncoder::new().encode_to_vec(value)
}

/// Encode `value` with default settings into `Bytes`
pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Bytes> {
    BinaryEncoder::new().encode(value).map(|data| data.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use massive_encoding_core::{EncodedType, StorageContainer};
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Line(Point, Point),
        Rect { w: u16, h: u16 },
    }

    fn tree<T: Serialize>(value: &T) -> StorageContainer {
        BinaryEncoder::new().encode(value).unwrap().into_storage()
    }

    #[test]
    fn int32_matches_wire_bytes() {
        assert_eq!(
            to_vec(&10i32).unwrap(),
            vec![0xd, 0, 0, 0, 0xc, 0, 0, 0, 0xa5, 0, 0, 0, 4, 0, 0, 0, 0xa, 0, 0, 0]
        );
    }

    #[test]
    fn none_is_null() {
        assert_eq!(tree(&Option::<i32>::None), StorageContainer::Null);
        assert_eq!(tree(&()), StorageContainer::Null);
        assert_eq!(tree(&Some(5u8)), StorageContainer::scalar(5u8));
    }

    #[test]
    fn structs_become_keyed() {
        let root = tree(&Point { x: 1, y: -2 });
        let keyed = root.as_keyed().unwrap();
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(keyed.get("y"), Some(&StorageContainer::scalar(-2i32)));
    }

    #[test]
    fn sequences_become_unkeyed() {
        let root = tree(&vec!["a", "b"]);
        let unkeyed = root.as_unkeyed().unwrap();
        assert_eq!(unkeyed.len(), 2);
        assert_eq!(unkeyed.get(1), Some(&StorageContainer::string("b")));
    }

    #[test]
    fn chars_and_bytes() {
        assert_eq!(tree(&'é'), StorageContainer::string("é"));
        let root = tree(&BytesValue(&[1, 2]));
        assert_eq!(
            root.as_unkeyed().unwrap().iter().cloned().collect::<Vec<_>>(),
            vec![StorageContainer::scalar(1u8), StorageContainer::scalar(2u8)]
        );
    }

    struct BytesValue<'a>(&'a [u8]);

    impl Serialize for BytesValue<'_> {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.0)
        }
    }

    #[test]
    fn enum_variants() {
        assert_eq!(tree(&Shape::Empty), StorageContainer::string("Empty"));

        let circle = tree(&Shape::Circle(1.5));
        assert_eq!(
            circle.as_keyed().unwrap().get("Circle"),
            Some(&StorageContainer::scalar(1.5f64))
        );

        let line = tree(&Shape::Line(Point { x: 0, y: 0 }, Point { x: 1, y: 1 }));
        let payload = line.as_keyed().unwrap().get("Line").unwrap();
        assert_eq!(payload.as_unkeyed().map(|u| u.len()), Some(2));

        let rect = tree(&Shape::Rect { w: 3, h: 4 });
        let payload = rect.as_keyed().unwrap().get("Rect").unwrap().as_keyed().unwrap();
        assert_eq!(payload.get("w"), Some(&StorageContainer::scalar(3u16)));
    }

    #[test]
    fn integer_map_keys_become_strings() {
        let mut map = BTreeMap::new();
        map.insert(10u32, true);
        map.insert(2u32, false);
        let root = tree(&map);
        assert_eq!(root.as_keyed().unwrap().keys().collect::<Vec<_>>(), vec!["10", "2"]);
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1u8);
        assert!(matches!(BinaryEncoder::new().encode(&map), Err(Error::Encoding(_))));
    }

    #[test]
    fn size_limit_is_enforced() {
        let mut config = Config::default();
        config.encoding.max_byte_count = 24;
        let encoder = BinaryEncoder::with_config(config);
        assert!(encoder.encode(&1u8).is_ok());
        assert!(matches!(encoder.encode(&"long enough to overflow"), Err(Error::Encoding(_))));
    }

    #[test]
    fn oversized_strings_are_an_encoding_error() {
        use massive_encoding_core::constants::MAX_STRING_SIZE;

        assert!(super::serializer::check_string_size(MAX_STRING_SIZE).is_ok());
        assert!(matches!(
            super::serializer::check_string_size(MAX_STRING_SIZE + 1),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn platform_integers_are_not_produced_by_serde() {
        // serde maps usize to u64, so the Int/UInt tags only come from the core API
        let root = tree(&7usize);
        assert_eq!(root.as_single_value().map(|v| v.encoded_type()), Some(EncodedType::UInt64));
    }
}
