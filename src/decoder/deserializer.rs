//! `serde::Deserializer` over a decoded storage tree
//!
//! Typed requests are strict: `deserialize_u32` only accepts a UInt32 value.
//! `deserialize_any` dispatches on whatever the tree holds.

use massive_encoding_core::{
    CodingPath, DecodingError, EncodedType, StorageContainer, UnkeyedDecoder, ValueDecoder,
};
use serde::de::{self, DeserializeSeed, Deserializer as _, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::core::error::{Error, Result};

/// Deserializer for the value held by one slot
pub struct Deserializer<'de> {
    value: ValueDecoder<'de>,
}

impl<'de> Deserializer<'de> {
    /// Deserialize from `value`
    pub fn new(value: ValueDecoder<'de>) -> Self {
        Self { value }
    }

    fn path(&self) -> CodingPath {
        self.value.path().clone()
    }

    fn mismatch(&self, expected: &str) -> Error {
        let container = self.value.container();
        let error = if container.is_null() {
            DecodingError::value_not_found(expected, self.path())
        } else {
            DecodingError::type_mismatch(expected, container.kind_name(), self.path())
        };
        Error::Decoding(error)
    }

    fn visit_keyed<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let path = self.path();
        let keyed = self.value.keyed()?;
        let mut access = KeyedAccess {
            entries: keyed.iter(),
            pending: None,
        };
        visitor
            .visit_map(&mut access)
            .map_err(|e: Error| e.with_path_if_unset(&path))
    }

    fn visit_unkeyed<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let path = self.path();
        let unkeyed = self.value.unkeyed()?;
        visitor
            .visit_seq(UnkeyedAccess { decoder: unkeyed })
            .map_err(|e: Error| e.with_path_if_unset(&path))
    }
}

macro_rules! deserialize_scalar {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let path = self.path();
                let value = self.value.scalar::<$ty>()?;
                visitor.$visit(value).map_err(|e: Error| e.with_path_if_unset(&path))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let path = self.path();
        let single = match self.value.container() {
            StorageContainer::Null => return visitor.visit_unit(),
            StorageContainer::Keyed(_) => return self.visit_keyed(visitor),
            StorageContainer::Unkeyed(_) => return self.visit_unkeyed(visitor),
            StorageContainer::SingleValue(single) => single,
        };
        let result: Result<V::Value> = match single.encoded_type() {
            EncodedType::Bool => visitor.visit_bool(self.value.scalar()?),
            EncodedType::Int => visitor.visit_i64(self.value.scalar::<isize>()? as i64),
            EncodedType::Int8 => visitor.visit_i8(self.value.scalar()?),
            EncodedType::Int16 => visitor.visit_i16(self.value.scalar()?),
            EncodedType::Int32 => visitor.visit_i32(self.value.scalar()?),
            EncodedType::Int64 => visitor.visit_i64(self.value.scalar()?),
            EncodedType::UInt => visitor.visit_u64(self.value.scalar::<usize>()? as u64),
            EncodedType::UInt8 => visitor.visit_u8(self.value.scalar()?),
            EncodedType::UInt16 => visitor.visit_u16(self.value.scalar()?),
            EncodedType::UInt32 => visitor.visit_u32(self.value.scalar()?),
            EncodedType::UInt64 => visitor.visit_u64(self.value.scalar()?),
            EncodedType::Float32 => visitor.visit_f32(self.value.scalar()?),
            EncodedType::Float64 => visitor.visit_f64(self.value.scalar()?),
            EncodedType::String => visitor.visit_borrowed_str(self.value.string()?),
        };
        result.map_err(|e: Error| e.with_path_if_unset(&path))
    }

    deserialize_scalar! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let path = self.path();
        let text = self.value.string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c).map_err(|e: Error| e.with_path_if_unset(&path)),
            _ => Err(Error::Decoding(DecodingError::value_corrupt(
                "a single character",
                path,
                format!("Expected a single character but found {:?}.", text),
            ))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let path = self.path();
        let text = self.value.string()?;
        visitor
            .visit_borrowed_str(text)
            .map_err(|e: Error| e.with_path_if_unset(&path))
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let path = self.path();
        let mut unkeyed = self.value.unkeyed()?;
        let mut bytes = Vec::with_capacity(unkeyed.count());
        while !unkeyed.is_at_end() {
            bytes.push(unkeyed.next_value()?.scalar::<u8>()?);
        }
        visitor
            .visit_byte_buf(bytes)
            .map_err(|e: Error| e.with_path_if_unset(&path))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_null() {
            visitor.visit_unit()
        } else {
            Err(Error::Decoding(DecodingError::type_mismatch(
                "a null value",
                self.value.container().kind_name(),
                self.path(),
            )))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_unkeyed(visitor)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.visit_unkeyed(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.visit_unkeyed(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_keyed(visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.visit_keyed(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let path = self.path();
        let access = match self.value.container() {
            StorageContainer::SingleValue(_) => EnumAccess {
                variant: self.value.string()?,
                value: None,
                path: path.clone(),
            },
            StorageContainer::Keyed(_) => {
                let keyed = self.value.keyed()?;
                let mut entries = keyed.iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => EnumAccess {
                        variant,
                        value: Some(value),
                        path: path.clone(),
                    },
                    _ => {
                        return Err(Error::Decoding(DecodingError::type_mismatch(
                            "an enum",
                            format!("a keyed container with {} entries", keyed.len()),
                            path,
                        )))
                    }
                }
            }
            _ => return Err(self.mismatch("an enum")),
        };
        visitor
            .visit_enum(access)
            .map_err(|e: Error| e.with_path_if_unset(&path))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

/// Walks the entries of a keyed container
struct KeyedAccess<'de, I> {
    entries: I,
    pending: Option<ValueDecoder<'de>>,
}

impl<'de, I> de::MapAccess<'de> for KeyedAccess<'de, I>
where
    I: ExactSizeIterator<Item = (&'de str, ValueDecoder<'de>)>,
{
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.entries.next() {
            Some((key, value)) => {
                let path = value.path().clone();
                self.pending = Some(value);
                seed.deserialize(MapKeyDeserializer { key })
                    .map(Some)
                    .map_err(|e: Error| e.with_path_if_unset(&path))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let value = self
            .pending
            .take()
            .ok_or_else(|| Error::Message("Map value requested before its key".to_string()))?;
        seed.deserialize(Deserializer::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Walks the elements of an unkeyed container
struct UnkeyedAccess<'de> {
    decoder: UnkeyedDecoder<'de>,
}

impl<'de> de::SeqAccess<'de> for UnkeyedAccess<'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.decoder.is_at_end() {
            return Ok(None);
        }
        let value = self.decoder.next_value()?;
        seed.deserialize(Deserializer::new(value)).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.decoder.remaining())
    }
}

/// Variant name plus the optional payload of an encoded enum
struct EnumAccess<'de> {
    variant: &'de str,
    value: Option<ValueDecoder<'de>>,
    path: CodingPath,
}

impl<'de> de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self)> {
        let variant = seed.deserialize(MapKeyDeserializer { key: self.variant })?;
        Ok((variant, self))
    }
}

impl<'de> EnumAccess<'de> {
    fn payload(self, expected: &str) -> Result<ValueDecoder<'de>> {
        self.value.ok_or_else(|| {
            Error::Decoding(DecodingError::type_mismatch(expected, "a unit variant", self.path))
        })
    }
}

impl<'de> de::VariantAccess<'de> for EnumAccess<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(value) if value.is_null() => Ok(()),
            Some(value) => Err(Error::Decoding(DecodingError::type_mismatch(
                "a unit variant",
                value.container().kind_name(),
                value.path().clone(),
            ))),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        let value = self.payload("a newtype variant")?;
        seed.deserialize(Deserializer::new(value))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        let value = self.payload("a tuple variant")?;
        Deserializer::new(value).visit_unkeyed(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let value = self.payload("a struct variant")?;
        Deserializer::new(value).visit_keyed(visitor)
    }
}

/// Deserializes keyed container keys, parsing integers from their decimal form
struct MapKeyDeserializer<'de> {
    key: &'de str,
}

macro_rules! deserialize_integer_key {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                match self.key.parse::<$ty>() {
                    Ok(value) => visitor.$visit(value),
                    Err(_) => Err(Error::Decoding(DecodingError::type_mismatch(
                        stringify!($ty),
                        format!("key {:?}", self.key),
                        CodingPath::root(),
                    ))),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.key)
    }

    deserialize_integer_key! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
