//! Reading into values: `.[k]`, `.[a:b]`, `.[]`.

use crate::errors::{cannot_index, cannot_iterate, type_mismatch, EvalError, EvalResult};
use crate::path::PathSegment;
use crate::value::Heap;
use crate::{Map, Value};

/// Resolve an array index for reading: floors fractions, counts negative
/// indices from the end. `None` when NaN or out of range.
pub fn resolve_index(len: usize, index: f64) -> Option<usize> {
    if index.is_nan() {
        return None;
    }
    let mut i = index.floor();
    if i < 0.0 {
        i += len as f64;
    }
    (i >= 0.0 && i < len as f64).then_some(i as usize)
}

/// Clamp optional slice bounds into `start..end` within `0..=len`.
pub fn slice_bounds(len: usize, start: Option<f64>, end: Option<f64>) -> (usize, usize) {
    let resolve = |bound: f64| {
        let b = if bound < 0.0 { bound + len as f64 } else { bound };
        if b.is_nan() {
            0
        } else {
            b.floor().clamp(0.0, len as f64) as usize
        }
    };
    let start = start.map_or(0, resolve);
    let end = end.map_or(len, resolve).max(start);
    (start, end)
}

/// `.[key]`: object field, array element, sub-array search or slice object.
///
/// `null` and Absent read as Absent for any key.
pub fn index(target: &Value, key: &Value) -> EvalResult {
    match (target, key) {
        (Value::Null | Value::Absent, _) => Ok(Value::Absent),
        (Value::Object(map), Value::String(k)) => {
            Ok(map.get(k.as_str()).cloned().unwrap_or(Value::Absent))
        }
        (Value::Array(items), Value::Number(n)) => Ok(resolve_index(items.len(), *n)
            .map_or(Value::Absent, |i| items[i].clone())),
        (Value::Array(items), Value::Array(needle)) => Ok(array_indices(items, needle)),
        (Value::Array(_) | Value::String(_), Value::Object(bounds)) => {
            let (start, end) = slice_object_bounds(bounds).ok_or_else(|| cannot_index(target, key))?;
            slice(target, &start, &end)
        }
        _ => Err(cannot_index(target, key)),
    }
}

/// `{"start": a, "end": b}` as slice bounds.
pub(crate) fn slice_object_bounds(bounds: &Map) -> Option<(Value, Value)> {
    if bounds.len() > 2 {
        return None;
    }
    let start = bounds.get("start").cloned().unwrap_or(Value::Null);
    let end = bounds.get("end").cloned().unwrap_or(Value::Null);
    if bounds.keys().all(|k| k == "start" || k == "end") {
        Some((start, end))
    } else {
        None
    }
}

/// Positions where `needle` occurs in `items`; `null` for an empty needle.
pub fn array_indices(items: &[Value], needle: &[Value]) -> Value {
    if needle.is_empty() {
        return Value::Null;
    }
    if needle.len() > items.len() {
        return Value::array(Vec::new());
    }
    (0..=items.len() - needle.len())
        .filter(|&i| items[i..i + needle.len()] == *needle)
        .map(Value::from)
        .collect()
}

/// Slice bound: a number or `null` for open.
fn bound(value: &Value) -> Result<Option<f64>, EvalError> {
    match value {
        Value::Null | Value::Absent => Ok(None),
        Value::Number(n) => Ok(Some(*n)),
        _ => Err(type_mismatch(
            "Start and end indices of an array slice must be numbers",
        )),
    }
}

/// `.[from:to]` on arrays and strings (by code point); `null` slices to Absent.
pub fn slice(target: &Value, from: &Value, to: &Value) -> EvalResult {
    let start = bound(from)?;
    let end = bound(to)?;
    match target {
        Value::Null | Value::Absent => Ok(Value::Absent),
        Value::Array(items) => {
            let (s, e) = slice_bounds(items.len(), start, end);
            Ok(Value::array(items[s..e].to_vec()))
        }
        Value::String(text) => {
            let len = text.chars().count();
            let (s, e) = slice_bounds(len, start, end);
            Ok(Value::string(
                text.chars().skip(s).take(e - s).collect::<String>(),
            ))
        }
        _ => Err(cannot_index(target, &Value::empty_object())),
    }
}

/// Lazy iteration over the elements of an array or the values of an object.
pub struct Children {
    source: Source,
    pos: usize,
}

enum Source {
    Array(Heap<Vec<Value>>),
    Object(Heap<Map>),
}

impl Children {
    /// The next child together with its path segment.
    pub fn next_entry(&mut self) -> Option<(PathSegment, Value)> {
        let pos = self.pos;
        let entry = match &self.source {
            Source::Array(items) => items
                .get(pos)
                .map(|v| (PathSegment::Index(pos as f64), v.clone())),
            Source::Object(map) => map
                .get_index(pos)
                .map(|(k, v)| (PathSegment::Key(k.clone()), v.clone())),
        };
        if entry.is_some() {
            self.pos += 1;
        }
        entry
    }

    pub fn len(&self) -> usize {
        match &self.source {
            Source::Array(items) => items.len(),
            Source::Object(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for Children {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let pos = self.pos;
        let value = match &self.source {
            Source::Array(items) => items.get(pos).cloned(),
            Source::Object(map) => map.get_index(pos).map(|(_, v)| v.clone()),
        };
        if value.is_some() {
            self.pos += 1;
        }
        value
    }
}

/// `.[]`: children of an array or object.
pub fn children(target: &Value) -> Result<Children, EvalError> {
    let source = match target {
        Value::Array(items) => Source::Array(items.clone()),
        Value::Object(map) => Source::Object(map.clone()),
        _ => return Err(cannot_iterate(target)),
    };
    Ok(Children { source, pos: 0 })
}
