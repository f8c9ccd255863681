//! JSON text in and out, via `serde_json`.
//!
//! Numbers: integral values below 1e17 in magnitude print without a
//! fraction, NaN prints `null`, infinities clamp to `±f64::MAX`. Other
//! numbers print the shortest text that reads back to the same value, in
//! exponent form (`1e17`, `1.5e-7`) outside `[1e-5, 1e17)`. Absent prints
//! `null` except as an object member, where it is left out.

use crate::{Map, Value};
use jet_stack::ensure_sufficient_stack;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::fmt;
use std::io;

/// Integral numbers below this magnitude print as integers.
const INTEGER_LIMIT: f64 = 1e17;

/// Smaller non-zero magnitudes print in exponent form.
const DECIMAL_FLOOR: f64 = 1e-5;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Absent => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => ensure_sufficient_stack(|| {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }),
            Value::Object(map) => ensure_sufficient_stack(|| {
                let present = map.values().filter(|v| !v.is_absent()).count();
                let mut out = serializer.serialize_map(Some(present))?;
                for (k, v) in map.iter().filter(|(_, v)| !v.is_absent()) {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }),
        }
    }
}

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_nan() {
        serializer.serialize_unit()
    } else if n.is_infinite() {
        serializer.serialize_f64(if n > 0.0 { f64::MAX } else { f64::MIN })
    } else if n.fract() == 0.0 && n.abs() < INTEGER_LIMIT {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Number(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::string(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::string(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::default();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::object(map))
    }
}

/// How [`write_json`] lays out containers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    Compact,
    /// One member per line, indented by this many spaces.
    Spaces(usize),
    /// One member per line, indented by tabs.
    Tabs,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Spaces(2)
    }
}

/// Compact JSON text.
pub fn to_json(value: &Value) -> String {
    write_json(value, Layout::Compact)
}

/// Indented JSON text with two spaces per level.
pub fn to_json_pretty(value: &Value) -> String {
    write_json(value, Layout::default())
}

/// JSON text in the given layout.
pub fn write_json(value: &Value, layout: Layout) -> String {
    let bytes = match layout {
        Layout::Compact | Layout::Spaces(0) => write_with(value, CompactFormatter),
        Layout::Spaces(n) => {
            let indent = vec![b' '; n];
            write_with(value, PrettyFormatter::with_indent(&indent))
        }
        Layout::Tabs => write_with(value, PrettyFormatter::with_indent(b"\t")),
    };
    String::from_utf8(bytes).unwrap_or_default()
}

/// Text for a finite float: `1.5`, `0.001`, `1e17`, `1.7976931348623157e308`.
fn float_text(n: f64) -> String {
    let magnitude = n.abs();
    if magnitude == 0.0 || (DECIMAL_FLOOR..INTEGER_LIMIT).contains(&magnitude) {
        format!("{n}")
    } else {
        format!("{n:e}")
    }
}

/// Wraps a layout formatter and writes floats as [`float_text`] does.
struct Numbers<F>(F);

impl<F: Formatter> Formatter for Numbers<F> {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(float_text(value).as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

fn write_with<F: Formatter>(value: &Value, formatter: F) -> Vec<u8> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, Numbers(formatter));
    // Serializing into memory cannot fail; a failure would leave partial text.
    if value.serialize(&mut serializer).is_err() {
        out.clear();
        out.extend_from_slice(b"null");
    }
    out
}

/// Parse exactly one JSON value.
pub fn from_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

/// Like [`from_json`], but also accepts a bare `nan` or `NaN`.
pub fn from_json_lenient(text: &str) -> Result<Value, serde_json::Error> {
    match text.trim() {
        "nan" | "NaN" => Ok(Value::Number(f64::NAN)),
        _ => from_json(text),
    }
}

/// Parse a whitespace-separated sequence of JSON values.
pub fn from_json_stream(text: &str) -> impl Iterator<Item = Result<Value, serde_json::Error>> + '_ {
    serde_json::Deserializer::from_str(text).into_iter::<Value>()
}
