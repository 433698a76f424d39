//! Value Module
//!
//! Defines the payload type held by store entries and the snapshot capability
//! used to hand out isolated copies of write-once composite values.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// == Value ==
/// A stored payload.
///
/// Composite variants hold their container behind an `Arc`, so a value read
/// back from a mutable entry shares the container the store holds, while a
/// [`Snapshot`] of it gets a freshly allocated one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence of values
    List(Arc<Vec<Value>>),
    /// String-keyed mapping of values
    Map(Arc<HashMap<String, Value>>),
}

impl Value {
    // == Constructors ==
    /// Creates a list value from any iterable of values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates a map value from any iterable of key/value pairs.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(Arc::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Returns the variant name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(pairs) => Some(pairs.as_ref()),
            _ => None,
        }
    }

    /// Mutable access to a list's elements.
    ///
    /// Copies the container first if anyone else still holds it.
    pub fn list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(Arc::make_mut(items)),
            _ => None,
        }
    }

    /// Mutable access to a map's pairs.
    ///
    /// Copies the container first if anyone else still holds it.
    pub fn map_mut(&mut self) -> Option<&mut HashMap<String, Value>> {
        match self {
            Value::Map(pairs) => Some(Arc::make_mut(pairs)),
            _ => None,
        }
    }

    /// Returns true when both values are composites backed by the same
    /// container allocation.
    pub fn shares_container(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// == Snapshot ==
/// Produces a copy of a value that is isolated from the original container.
pub trait Snapshot {
    fn snapshot(&self) -> Self;
}

impl Snapshot for Value {
    /// Scalars are returned as-is. Lists and maps get a new container holding
    /// the same elements; nested composites are shared, not copied.
    fn snapshot(&self) -> Self {
        match self {
            Value::List(items) => Value::List(Arc::new(items.iter().cloned().collect())),
            Value::Map(pairs) => Value::Map(Arc::new(
                pairs.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            )),
            scalar => scalar.clone(),
        }
    }
}

// == Conversions ==
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(Arc::new(v))
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(v: HashMap<String, Value>) -> Self {
        Value::Map(Arc::new(v))
    }
}
