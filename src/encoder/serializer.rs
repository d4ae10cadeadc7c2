//! `serde::Serializer` that writes into a storage tree through slots

use massive_encoding_core::constants::MAX_STRING_SIZE;
use massive_encoding_core::{KeyedContainer, StorageContainer, StorageReference, UnkeyedContainer};
use serde::ser::{self, Impossible, Serialize, Serializer as _};

use crate::core::error::{Error, Result};

/// Serializer for the value held by one slot
pub struct Serializer<'a> {
    slot: StorageReference<'a>,
}

impl<'a> Serializer<'a> {
    /// Serialize into `slot`
    pub fn new(slot: StorageReference<'a>) -> Self {
        Self { slot }
    }

    fn fresh_keyed(mut self) -> &'a mut KeyedContainer {
        self.slot.set(KeyedContainer::new());
        self.slot.keyed()
    }

    fn fresh_unkeyed(mut self, capacity: usize) -> &'a mut UnkeyedContainer {
        self.slot.set(UnkeyedContainer::with_capacity(capacity));
        self.slot.unkeyed()
    }
}

macro_rules! serialize_scalar {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(mut self, v: $ty) -> Result<()> {
                self.slot.encode_scalar(v);
                Ok(())
            }
        )*
    };
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = SeqSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = MapSerializer<'a>;
    type SerializeStructVariant = MapSerializer<'a>;

    serialize_scalar! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_f32: f32,
        serialize_f64: f64,
    }

    fn serialize_char(mut self, v: char) -> Result<()> {
        self.slot.encode_string(v.encode_utf8(&mut [0u8; 4]));
        Ok(())
    }

    fn serialize_str(mut self, v: &str) -> Result<()> {
        check_string_size(v.len())?;
        self.slot.encode_string(v);
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        let unkeyed = self.fresh_unkeyed(v.len());
        for byte in v {
            unkeyed.push(StorageContainer::scalar(*byte));
        }
        Ok(())
    }

    fn serialize_none(mut self) -> Result<()> {
        self.slot.encode_null();
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(mut self) -> Result<()> {
        self.slot.encode_null();
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.slot.encode_string(variant);
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        let keyed = self.fresh_keyed();
        value.serialize(Serializer::new(StorageReference::for_key(keyed, variant)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer<'a>> {
        Ok(SeqSerializer {
            container: self.fresh_unkeyed(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqSerializer<'a>> {
        let keyed = self.fresh_keyed();
        Serializer::new(StorageReference::for_key(keyed, variant)).serialize_seq(Some(len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapSerializer<'a>> {
        Ok(MapSerializer {
            container: self.fresh_keyed(),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapSerializer<'a>> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<MapSerializer<'a>> {
        let keyed = self.fresh_keyed();
        Serializer::new(StorageReference::for_key(keyed, variant)).serialize_map(Some(len))
    }
}

/// Appends elements to an unkeyed container
pub struct SeqSerializer<'a> {
    container: &'a mut UnkeyedContainer,
}

impl SeqSerializer<'_> {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(Serializer::new(self.container.push_reference()))
    }
}

impl ser::SerializeSeq for SeqSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for SeqSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for SeqSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for SeqSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Writes entries into a keyed container
pub struct MapSerializer<'a> {
    container: &'a mut KeyedContainer,
    pending_key: Option<String>,
}

impl MapSerializer<'_> {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        value.serialize(Serializer::new(StorageReference::for_key(&mut *self.container, key)))
    }
}

impl ser::SerializeMap for MapSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.pending_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::encoding("Map value serialized before its key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for MapSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for MapSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Reject strings whose length does not fit a 32-bit size field
pub(crate) fn check_string_size(len: usize) -> Result<()> {
    if len > MAX_STRING_SIZE {
        return Err(Error::encoding(format!(
            "String of {} bytes exceeds the limit of {} bytes",
            len, MAX_STRING_SIZE
        )));
    }
    Ok(())
}

/// Turns map keys into strings; integers become their decimal form
struct MapKeySerializer;

fn key_must_be_string() -> Error {
    Error::encoding("Map keys must be strings, chars or integers")
}

macro_rules! serialize_integer_key {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<String> {
                Ok(v.to_string())
            }
        )*
    };
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    serialize_integer_key! {
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        check_string_size(v.len())?;
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_string())
    }
}
