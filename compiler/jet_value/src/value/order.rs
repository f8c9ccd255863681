//! Total order and equality over values.
//!
//! `null < false < true < numbers < strings < arrays < objects`. Absent
//! ranks as `null`. NaN sorts below every other number and equals itself,
//! so the order stays total. Strings compare by code point, arrays
//! lexicographically, objects by their sorted key lists and then by the
//! values under those keys in key order.

use super::{Map, Value};
use jet_stack::ensure_sufficient_stack;
use std::cmp::Ordering;

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null | Value::Absent => 0,
        Value::Bool(false) => 1,
        Value::Bool(true) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

/// Compare two numbers, placing NaN below everything else.
pub(crate) fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Total order over values.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    ensure_sufficient_stack(|| compare_nested(a, b))
}

fn compare_nested(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(*x, *y),
        (Value::String(x), Value::String(y)) => x.as_str().cmp(y.as_str()),
        (Value::Array(x), Value::Array(y)) => {
            if x.ptr_eq(y) {
                return Ordering::Equal;
            }
            compare_slices(x, y)
        }
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return Ordering::Equal;
            }
            compare_objects(x, y)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_slices(x: &[Value], y: &[Value]) -> Ordering {
    for (a, b) in x.iter().zip(y) {
        let ord = compare(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.len().cmp(&y.len())
}

/// Keys in code point order.
pub(crate) fn sorted_keys(map: &Map) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

fn compare_objects(x: &Map, y: &Map) -> Ordering {
    let kx = sorted_keys(x);
    let ky = sorted_keys(y);
    let by_keys = kx.cmp(&ky);
    if by_keys != Ordering::Equal {
        return by_keys;
    }
    for key in kx {
        let ord = match (x.get(key), y.get(key)) {
            (Some(a), Some(b)) => compare(a, b),
            _ => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| equal(self, other))
    }
}

fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(k, a)| y.get(k).is_some_and(|b| a == b))
        }
        (Value::Array(x), Value::Array(y)) => {
            x.ptr_eq(y) || (x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| a == b))
        }
        _ => compare(a, b) == Ordering::Equal,
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

#[cfg(test)]
mod tests;
