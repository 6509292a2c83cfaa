//! Serde serializer that builds a [`Value`] directly
//!
//! Structs become [`Record`]s named after the type, with their fields in
//! declaration order. Errors reuse [`serde_json::Error`].

use serde::ser::{self, Error as _, Serialize};
use serde_json::Error;

use super::{Key, Record, Value};

pub(super) struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeList;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeRecord;

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, Error> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, Error> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, Error> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, Error> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, Error> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, Error> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, Error> {
        Ok(Value::List(v.iter().map(|b| Value::Int((*b).into())).collect()))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, Error> {
        Ok(Value::Record(Record::new(name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value, Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(ValueSerializer)?;
        Ok(Value::Map(vec![(Key::from(variant), inner)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList, Error> {
        Ok(SerializeList::new(None, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList, Error> {
        Ok(SerializeList::new(None, len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeList, Error> {
        Ok(SerializeList::new(None, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeList, Error> {
        Ok(SerializeList::new(Some(variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, Error> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeRecord, Error> {
        Ok(SerializeRecord::new(name.to_owned(), len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeRecord, Error> {
        Ok(SerializeRecord::new(format!("{name}::{variant}"), len))
    }
}

/// Sequences and tuples; a tuple variant is wrapped as `{variant: [...]}`
pub(super) struct SerializeList {
    items: Vec<Value>,
    variant: Option<&'static str>,
}

impl SerializeList {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        Self {
            items: Vec::with_capacity(len),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let list = Value::List(self.items);
        match self.variant {
            Some(variant) => Value::Map(vec![(Key::from(variant), list)]),
            None => list,
        }
    }
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeList {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

pub(super) struct SerializeMap {
    entries: Vec<(Key, Value)>,
    next_key: Option<Key>,
}

/// Map keys must be scalars; integers stay integer keys
fn map_key(value: Value) -> Result<Key, Error> {
    match value {
        Value::Int(i) => Ok(Key::Index(i)),
        Value::String(s) => Ok(Key::Name(s)),
        Value::Bool(b) => Ok(Key::Name(b.to_string())),
        Value::Float(f) => Ok(Key::Name(f.to_string())),
        _ => Err(Error::custom("map key must be a string or a number")),
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(map_key(key.serialize(ValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("map value serialized before its key"))?;
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Map(self.entries))
    }
}

pub(super) struct SerializeRecord {
    record: Record,
}

impl SerializeRecord {
    fn new(name: String, len: usize) -> Self {
        Self {
            record: Record {
                name,
                fields: Vec::with_capacity(len),
            },
        }
    }

    fn push<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(ValueSerializer)?;
        self.record.fields.push((key.to_owned(), value));
        Ok(())
    }
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Record(self.record))
    }
}

impl ser::SerializeStructVariant for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Record(self.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMethod;
    use crate::dump::render;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct User {
        zeta: i32,
        alpha: i32,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Pair(i32, i32),
        Rect { w: u8, h: u8 },
    }

    fn to_value<T: Serialize>(value: &T) -> Value {
        value.serialize(ValueSerializer).unwrap()
    }

    #[test]
    fn test_struct_keeps_declaration_order() {
        let value = to_value(&User { zeta: 1, alpha: 2 });
        assert_eq!(
            value,
            Value::Record(Record::new("User").field("zeta", 1).field("alpha", 2))
        );
        assert_eq!(
            render(&value, OutputMethod::Print),
            "User Object\n(\n    [zeta] => 1\n    [alpha] => 2\n)"
        );
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_value(&Shape::Empty), Value::from("Empty"));
        assert_eq!(
            to_value(&Shape::Circle(1.5)),
            Value::map([("Circle", Value::Float(1.5))])
        );
        assert_eq!(
            to_value(&Shape::Pair(1, 2)),
            Value::map([("Pair", Value::from(vec![1, 2]))])
        );
        assert_eq!(
            to_value(&Shape::Rect { w: 3, h: 4 }),
            Value::Record(Record::new("Shape::Rect").field("w", 3).field("h", 4))
        );
    }

    #[test]
    fn test_options_and_nested_sequences() {
        let value = to_value(&(Some(1), None::<i32>, vec![vec!["a"]]));
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::Null,
                Value::List(vec![Value::List(vec![Value::from("a")])]),
            ])
        );
    }

    #[test]
    fn test_integer_map_keys_stay_indexes() {
        let map = BTreeMap::from([(2, "b"), (1, "a")]);
        assert_eq!(
            to_value(&map),
            Value::Map(vec![
                (Key::Index(1), Value::from("a")),
                (Key::Index(2), Value::from("b")),
            ])
        );
    }

    #[test]
    fn test_container_map_key_is_rejected() {
        let map = BTreeMap::from([(vec![1], 1)]);
        assert!(map.serialize(ValueSerializer).is_err());
    }
}
