//! Records that queries are checked against.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::dsl::EvalError;

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(OffsetDateTime),
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "date-time",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
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

impl From<OffsetDateTime> for Value {
    fn from(dt: OffsetDateTime) -> Self {
        Value::DateTime(dt)
    }
}

/// Naive date-times are taken as UTC.
impl From<PrimitiveDateTime> for Value {
    fn from(dt: PrimitiveDateTime) -> Self {
        Value::DateTime(dt.assume_utc())
    }
}

/// Dates are taken as midnight UTC.
impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::DateTime(d.midnight().assume_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Arrays and objects are kept as their JSON text; nested paths are not
/// addressable.
impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            other => Value::String(other.to_string()),
        }
    }
}

/// Anything with readable named fields.
pub trait FieldAccessor {
    /// Current value of the field called `key`, matched case-sensitively.
    fn field(&self, key: &str) -> Option<Value>;
}

impl<S: BuildHasher> FieldAccessor for HashMap<String, Value, S> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl FieldAccessor for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl FieldAccessor for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).map(Value::from)
    }
}

/// Only objects have fields.
impl FieldAccessor for serde_json::Value {
    fn field(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.field(key))
    }
}

/// Named-field view over any serializable value.
///
/// Fields are named as serde names them, so `#[serde(rename)]` applies and
/// `#[serde(skip)]` fields are not readable.
#[derive(Debug, Clone)]
pub struct StructFields {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl StructFields {
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> Result<Self, EvalError> {
        match serde_json::to_value(record)? {
            serde_json::Value::Object(fields) => Ok(StructFields { fields }),
            _ => Err(EvalError::NotAnObject),
        }
    }
}

impl FieldAccessor for StructFields {
    fn field(&self, key: &str) -> Option<Value> {
        self.fields.field(key)
    }
}
