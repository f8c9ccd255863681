//! Paths and the read/write/delete kernels behind `getpath`, `setpath`,
//! `delpaths` and the update operators.
//!
//! Writes never touch the caller's value: containers along the path are
//! copied on write (`Heap::make_mut`) when shared and reused when unique.

use crate::access::{resolve_index, slice, slice_bounds, slice_object_bounds};
use crate::errors::{
    invalid_index, negative_index_out_of_bounds, path_through_scalar, type_mismatch, EvalError,
    EvalResult,
};
use crate::value::compare;
use crate::{Map, Value};
use std::fmt;

/// Largest array index a write may create.
const MAX_WRITE_INDEX: f64 = 536_870_911.0;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(f64),
    /// Open bounds are `None`.
    Slice {
        start: Option<f64>,
        end: Option<f64>,
    },
}

impl PathSegment {
    /// `"key"`, `3` or `{"start": a, "end": b}`.
    pub fn to_value(&self) -> Value {
        match self {
            PathSegment::Key(k) => Value::string(k.as_str()),
            PathSegment::Index(i) => Value::Number(*i),
            PathSegment::Slice { start, end } => {
                let bound = |b: &Option<f64>| b.map_or(Value::Null, Value::Number);
                Value::object_from([("start", bound(start)), ("end", bound(end))])
            }
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, EvalError> {
        match value {
            Value::String(s) => Ok(PathSegment::Key(s.to_string())),
            Value::Number(n) => Ok(PathSegment::Index(*n)),
            Value::Object(map) => {
                let (start, end) = slice_object_bounds(map)
                    .ok_or_else(|| invalid_path_component(value))?;
                let bound = |b: Value| match b {
                    Value::Null | Value::Absent => Ok(None),
                    Value::Number(n) => Ok(Some(n)),
                    _ => Err(invalid_path_component(value)),
                };
                Ok(PathSegment::Slice {
                    start: bound(start)?,
                    end: bound(end)?,
                })
            }
            _ => Err(invalid_path_component(value)),
        }
    }
}

#[cold]
fn invalid_path_component(value: &Value) -> EvalError {
    type_mismatch(format!("Invalid path component {}", value.describe()))
}

/// A sequence of segments relative to some root value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn new() -> Self {
        Path(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// This path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Path {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment);
        Path(segments)
    }

    /// This path followed by `other`.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.0.clone();
        segments.extend_from_slice(&other.0);
        Path(segments)
    }

    /// The path as an array value.
    pub fn to_value(&self) -> Value {
        self.0.iter().map(PathSegment::to_value).collect()
    }

    /// Parse an array of keys, indices and slice objects.
    pub fn from_value(value: &Value) -> Result<Self, EvalError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(PathSegment::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Path),
            _ => Err(type_mismatch("Path must be specified as an array")),
        }
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

/// Read the value at `path`. Missing steps read as Absent; stepping into a
/// scalar is [`PathThroughScalar`](crate::EvalErrorKind::PathThroughScalar).
pub fn getpath(root: &Value, path: &[PathSegment]) -> EvalResult {
    let mut current = root.clone();
    for segment in path {
        current = match (&current, segment) {
            (Value::Null | Value::Absent, _) => return Ok(Value::Absent),
            (Value::Object(map), PathSegment::Key(key)) => {
                map.get(key.as_str()).cloned().unwrap_or(Value::Absent)
            }
            (Value::Array(items), PathSegment::Index(i)) => {
                resolve_index(items.len(), *i).map_or(Value::Absent, |i| items[i].clone())
            }
            (Value::Array(_) | Value::String(_), PathSegment::Slice { start, end }) => {
                let bound = |b: &Option<f64>| b.map_or(Value::Null, Value::Number);
                slice(&current, &bound(start), &bound(end))?
            }
            (container, segment) => {
                return Err(path_through_scalar(container, &segment.to_value()))
            }
        };
    }
    Ok(current)
}

/// `root` with `value` stored at `path`, creating objects and arrays
/// along the way. Arrays grow with Absent holes; the stored value itself
/// is never Absent.
pub fn setpath(root: Value, path: &[PathSegment], value: Value) -> EvalResult {
    let Some((segment, rest)) = path.split_first() else {
        return Ok(value.materialize());
    };
    match (root, segment) {
        (Value::Null | Value::Absent, PathSegment::Key(key)) => {
            let child = setpath(Value::Absent, rest, value)?;
            let mut map = Map::default();
            map.insert(key.clone(), child);
            Ok(Value::object(map))
        }
        (Value::Object(mut map), PathSegment::Key(key)) => {
            let slot = map.make_mut().entry(key.clone()).or_insert(Value::Absent);
            let child = std::mem::replace(slot, Value::Null);
            *slot = setpath(child, rest, value)?;
            Ok(Value::Object(map))
        }
        (Value::Null | Value::Absent, PathSegment::Index(i)) => {
            set_index(Vec::new(), *i, rest, value)
        }
        (Value::Array(items), PathSegment::Index(i)) => {
            set_index(items.into_inner(), *i, rest, value)
        }
        (Value::Null | Value::Absent, PathSegment::Slice { start, end }) => {
            set_slice(Vec::new(), *start, *end, rest, value)
        }
        (Value::Array(items), PathSegment::Slice { start, end }) => {
            set_slice(items.into_inner(), *start, *end, rest, value)
        }
        (container, segment) => Err(path_through_scalar(&container, &segment.to_value())),
    }
}

fn set_index(mut items: Vec<Value>, index: f64, rest: &[PathSegment], value: Value) -> EvalResult {
    if index.is_nan() {
        return Err(invalid_index(
            "Cannot set array element at NaN index",
            &Value::Number(index),
        ));
    }
    let mut i = index.floor();
    if i < 0.0 {
        i += items.len() as f64;
        if i < 0.0 {
            return Err(negative_index_out_of_bounds(index));
        }
    }
    if i > MAX_WRITE_INDEX {
        return Err(invalid_index("Array index too large", &Value::Number(index)));
    }
    let i = i as usize;
    if i >= items.len() {
        items.resize(i + 1, Value::Absent);
    }
    let child = std::mem::replace(&mut items[i], Value::Null);
    items[i] = setpath(child, rest, value)?;
    Ok(Value::array(items))
}

fn set_slice(
    mut items: Vec<Value>,
    start: Option<f64>,
    end: Option<f64>,
    rest: &[PathSegment],
    value: Value,
) -> EvalResult {
    let (s, e) = slice_bounds(items.len(), start, end);
    let current = Value::array(items[s..e].to_vec());
    match setpath(current, rest, value)? {
        Value::Array(replacement) => {
            items.splice(s..e, replacement.iter().cloned());
            Ok(Value::array(items))
        }
        _ => Err(type_mismatch(
            "A slice of an array can only be assigned another array",
        )),
    }
}

/// Delete every path in `paths`. Paths are applied in descending order so
/// removing one array element never shifts another pending deletion.
pub fn delpaths(root: Value, paths: &[Path]) -> EvalResult {
    let mut keyed: Vec<(Value, &Path)> = paths.iter().map(|p| (p.to_value(), p)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare(b, a));
    keyed.dedup_by(|(a, _), (b, _)| a == b);

    let mut root = root;
    for (_, path) in keyed {
        root = delpath(root, path.segments())?;
    }
    Ok(root)
}

/// Delete one path. Deleting the root yields `null`; deleting something
/// that is not there is a no-op.
pub fn delpath(root: Value, path: &[PathSegment]) -> EvalResult {
    let Some((segment, rest)) = path.split_first() else {
        return Ok(Value::Null);
    };
    match (root, segment) {
        (root @ (Value::Null | Value::Absent), _) => Ok(root),
        (Value::Object(mut map), PathSegment::Key(key)) => {
            if !map.contains_key(key.as_str()) {
                return Ok(Value::Object(map));
            }
            let entries = map.make_mut();
            if rest.is_empty() {
                entries.shift_remove(key.as_str());
            } else if let Some(slot) = entries.get_mut(key.as_str()) {
                let child = std::mem::replace(slot, Value::Null);
                *slot = delpath(child, rest)?;
            }
            Ok(Value::Object(map))
        }
        (Value::Array(mut items), PathSegment::Index(i)) => {
            let Some(i) = resolve_index(items.len(), *i) else {
                return Ok(Value::Array(items));
            };
            let elements = items.make_mut();
            if rest.is_empty() {
                elements.remove(i);
            } else {
                let child = std::mem::replace(&mut elements[i], Value::Null);
                elements[i] = delpath(child, rest)?;
            }
            Ok(Value::Array(items))
        }
        (Value::Array(items), PathSegment::Slice { start, end }) => {
            let mut elements = items.into_inner();
            let (s, e) = slice_bounds(elements.len(), *start, *end);
            if rest.is_empty() {
                elements.drain(s..e);
            } else {
                let current = Value::array(elements[s..e].to_vec());
                if let Value::Array(kept) = delpath(current, rest)? {
                    elements.splice(s..e, kept.iter().cloned());
                }
            }
            Ok(Value::array(elements))
        }
        (container, segment) => Err(path_through_scalar(&container, &segment.to_value())),
    }
}
