//! Runtime values.
//!
//! Arrays, objects and strings live behind [`Heap`], so cloning a value is
//! a reference-count bump and updates copy only the containers they touch.
//! All heap values are built through the factory methods on [`Value`]:
//!
//! ```text
//! let s = Value::string("hello");
//! let a = Value::array(vec![Value::from(1.0), Value::Null]);
//! ```
//!
//! # Absent
//!
//! [`Value::Absent`] is the result of reading something that is not there:
//! a missing key, an index past the end, a hole left by a sparse write. It
//! compares and computes exactly like `null`, reports `"null"` as its type,
//! and renders as `null`, except that the codec drops it from objects.

mod heap;
mod order;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;

pub use heap::Heap;
pub use order::compare;

/// Object storage: insertion-ordered, re-inserting a key keeps its place.
pub type Map = IndexMap<String, Value, FxBuildHasher>;

/// A jet value.
#[derive(Clone)]
pub enum Value {
    Null,
    /// Missing value; see the module docs.
    Absent,
    Bool(bool),
    Number(f64),
    String(Heap<String>),
    Array(Heap<Vec<Value>>),
    Object(Heap<Map>),
}

// Factory methods (the only way to construct heap values)

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    #[inline]
    pub fn object(entries: Map) -> Self {
        Value::Object(Heap::new(entries))
    }

    /// An empty object.
    #[inline]
    pub fn empty_object() -> Self {
        Value::object(Map::default())
    }

    /// Build an object from key/value pairs; later keys overwrite earlier ones.
    pub fn object_from<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// Value methods

impl Value {
    /// Type name as reported by `type`. Absent reports `"null"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null | Value::Absent => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// `false`, `null` and Absent are falsy; everything else is truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Absent | Value::Bool(false))
    }

    /// `null` or Absent.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Absent)
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable array contents, copying them if shared.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.make_mut()),
            _ => None,
        }
    }

    /// Mutable object contents, copying them if shared.
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map.make_mut()),
            _ => None,
        }
    }

    /// Array elements, cloned only if shared.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.into_inner()),
            _ => None,
        }
    }

    /// Object entries, cloned only if shared.
    pub fn into_object(self) -> Option<Map> {
        match self {
            Value::Object(map) => Some(map.into_inner()),
            _ => None,
        }
    }

    /// String contents, cloned only if shared.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.into_inner()),
            _ => None,
        }
    }

    /// Absent becomes `null`; everything else is unchanged.
    #[inline]
    #[must_use]
    pub fn materialize(self) -> Value {
        match self {
            Value::Absent => Value::Null,
            other => other,
        }
    }

    /// Short description for error messages: `number (1)`,
    /// `string ("abc...")`. Long renderings are truncated.
    pub fn describe(&self) -> String {
        const MAX: usize = 11;
        let json = self.to_string();
        let shown = if json.chars().count() > MAX {
            let cut: String = json.chars().take(MAX - 1).collect();
            format!("{cut}...")
        } else {
            json
        };
        format!("{} ({shown})", self.type_name())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::object(map)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::array(iter.into_iter().collect())
    }
}

/// JSON text, compact. Absent renders as `null`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::to_json(self))
    }
}

/// Like `Display`, but Absent shows as `<absent>` wherever it appears.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("<absent>"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            other => fmt::Display::fmt(other, f),
        }
    }
}
