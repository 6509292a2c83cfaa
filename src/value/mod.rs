//! Loggable values
//!
//! Everything handed to the logger is converted into a [`Value`] first. The set of
//! variants is closed so every output method can render any value, nested to any depth.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;

mod ser;

/// Key of a map entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    /// Integer key (also used for the positions of a list)
    Index(i64),
    /// String key
    Name(String),
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(index.into())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

/// A named structure with ordered fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Type name shown by the renderers
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// Create a record with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// A value that can be written to the log
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered sequence, keyed by position when rendered
    List(Vec<Value>),
    /// Key-value map in insertion order
    Map(Vec<(Key, Value)>),
    Record(Record),
}

impl Value {
    /// Build a map from key-value pairs, keeping their order
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert any serializable value
    ///
    /// Structs become [`Record`]s with fields in declaration order, sequences become
    /// lists and maps keep the order the type iterates them in.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(value.serialize(ser::ValueSerializer)?)
    }

    /// Whether this value renders as a block (list, map or record)
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_) | Value::Record(_))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(n.into())
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Float(n as f64),
        }
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::from(n as u64)
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<Key>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Build a `Vec<Value>` from a list of convertible expressions
///
/// ```
/// let values = aclog::values!["hello", 42, vec![1, 2]];
/// assert_eq!(values.len(), 3);
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),*]
    };
}
