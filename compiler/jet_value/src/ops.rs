//! Arithmetic and comparison operators.
//!
//! Operands are taken by value so that `+` on uniquely owned arrays,
//! objects and strings extends them in place.

use crate::errors::{argument_error, cannot_apply, division_by_zero, EvalResult};
use crate::value::compare;
use crate::{Map, Value};
use jet_ir::BinaryOp;
use jet_stack::ensure_sufficient_stack;

/// Longest string `*` may produce.
const MAX_REPEAT_LEN: usize = 1 << 28;

/// Apply a binary operator.
pub fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => sub(lhs, rhs),
        BinaryOp::Mul => mul(lhs, rhs),
        BinaryOp::Div => div(lhs, rhs),
        BinaryOp::Rem => rem(lhs, rhs),
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => Ok(Value::Bool(compare_with(op, &lhs, &rhs))),
    }
}

/// Evaluate a comparison operator under the total order.
pub fn compare_with(op: BinaryOp, lhs: &Value, rhs: &Value) -> bool {
    let ord = compare(lhs, rhs);
    match op {
        BinaryOp::Eq => lhs == rhs,
        BinaryOp::NotEq => lhs != rhs,
        BinaryOp::Lt => ord.is_lt(),
        BinaryOp::LtEq => ord.is_le(),
        BinaryOp::Gt => ord.is_gt(),
        BinaryOp::GtEq => ord.is_ge(),
        _ => false,
    }
}

/// `null` is the identity on either side.
pub fn add(lhs: Value, rhs: Value) -> EvalResult {
    match (lhs, rhs) {
        (Value::Null | Value::Absent, rhs) => Ok(rhs),
        (lhs, Value::Null | Value::Absent) => Ok(lhs),
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(mut a), Value::String(b)) => {
            a.make_mut().push_str(&b);
            Ok(Value::String(a))
        }
        (Value::Array(mut a), Value::Array(b)) => {
            a.make_mut().extend(b.iter().cloned());
            Ok(Value::Array(a))
        }
        (Value::Object(mut a), Value::Object(b)) => {
            let merged = a.make_mut();
            for (k, v) in b.iter() {
                merged.insert(k.clone(), v.clone());
            }
            Ok(Value::Object(a))
        }
        (lhs, rhs) => Err(cannot_apply(BinaryOp::Add, &lhs, &rhs)),
    }
}

/// Numbers, or array difference removing every element equal to one in `rhs`.
pub fn sub(lhs: Value, rhs: Value) -> EvalResult {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Value::Array(a), Value::Array(b)) => Ok(a
            .iter()
            .filter(|item| !b.contains(item))
            .cloned()
            .collect()),
        (lhs, rhs) => Err(cannot_apply(BinaryOp::Sub, &lhs, &rhs)),
    }
}

pub fn mul(lhs: Value, rhs: Value) -> EvalResult {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            repeat_string(&s, n)
        }
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.into_inner();
            deep_merge(&mut merged, &b);
            Ok(Value::object(merged))
        }
        (lhs, rhs) => Err(cannot_apply(BinaryOp::Mul, &lhs, &rhs)),
    }
}

/// `floor(n)` copies of `s`: Absent when negative or NaN, `""` for zero.
fn repeat_string(s: &str, n: f64) -> EvalResult {
    let count = n.floor();
    if count.is_nan() || count < 0.0 {
        return Ok(Value::Absent);
    }
    if s.is_empty() {
        return Ok(Value::string(""));
    }
    if count * s.len() as f64 > MAX_REPEAT_LEN as f64 {
        return Err(argument_error("Repeat string result too long"));
    }
    Ok(Value::string(s.repeat(count as usize)))
}

/// Recursive right-biased merge.
fn deep_merge(into: &mut Map, from: &Map) {
    for (key, value) in from {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) = (into.get_mut(key), value)
        {
            ensure_sufficient_stack(|| deep_merge(existing.make_mut(), incoming));
            continue;
        }
        into.insert(key.clone(), value.clone());
    }
}

/// Numbers, or string split.
pub fn div(lhs: Value, rhs: Value) -> EvalResult {
    match (&lhs, &rhs) {
        (Value::Number(_), Value::Number(b)) if *b == 0.0 => Err(division_by_zero(&lhs, &rhs)),
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        (Value::String(s), Value::String(sep)) => Ok(Value::array(split(s, sep))),
        _ => Err(cannot_apply(BinaryOp::Div, &lhs, &rhs)),
    }
}

/// Floating-point remainder, sign of the dividend.
pub fn rem(lhs: Value, rhs: Value) -> EvalResult {
    match (&lhs, &rhs) {
        (Value::Number(_), Value::Number(b)) if *b == 0.0 => Err(division_by_zero(&lhs, &rhs)),
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a % b)),
        _ => Err(cannot_apply(BinaryOp::Rem, &lhs, &rhs)),
    }
}

/// Split `s` on every occurrence of `sep`. An empty input yields no
/// pieces; an empty separator splits into characters.
pub fn split(s: &str, sep: &str) -> Vec<Value> {
    if s.is_empty() {
        return Vec::new();
    }
    if sep.is_empty() {
        return s.chars().map(|c| Value::string(c.to_string())).collect();
    }
    s.split(sep).map(Value::from).collect()
}

#[cfg(test)]
mod tests;
