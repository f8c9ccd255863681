#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use crate::EvalErrorKind;
use pretty_assertions::assert_eq;

fn arr(items: &[f64]) -> Value {
    items.iter().copied().map(Value::from).collect()
}

#[test]
fn null_is_the_additive_identity() {
    assert_eq!(add(Value::Null, Value::from(3)).unwrap(), Value::from(3));
    assert_eq!(add(Value::from("a"), Value::Absent).unwrap(), Value::from("a"));
    assert_eq!(add(Value::Null, Value::Null).unwrap(), Value::Null);
}

#[test]
fn add_concatenates_and_merges() {
    assert_eq!(add(Value::from("ab"), Value::from("cd")).unwrap(), Value::from("abcd"));
    assert_eq!(add(arr(&[1.0]), arr(&[2.0, 3.0])).unwrap(), arr(&[1.0, 2.0, 3.0]));
    let merged = add(
        Value::object_from([("a", Value::from(1)), ("b", Value::from(2))]),
        Value::object_from([("b", Value::from(3))]),
    )
    .unwrap();
    assert_eq!(merged.to_string(), r#"{"a":1,"b":3}"#);
}

#[test]
fn add_leaves_shared_operands_alone() {
    let left = arr(&[1.0]);
    let sum = add(left.clone(), arr(&[2.0])).unwrap();
    assert_eq!(left, arr(&[1.0]));
    assert_eq!(sum, arr(&[1.0, 2.0]));
}

#[test]
fn add_type_mismatch() {
    let err = add(Value::from(1), Value::from("a")).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
}

#[test]
fn subtract_arrays_removes_all_matches() {
    let result = sub(arr(&[1.0, 2.0, 1.0, 3.0]), arr(&[1.0])).unwrap();
    assert_eq!(result, arr(&[2.0, 3.0]));
    assert!(sub(Value::from("a"), Value::from("a")).is_err());
}

#[test]
fn string_repetition() {
    assert_eq!(mul(Value::from("ab"), Value::from(2.7)).unwrap(), Value::from("abab"));
    assert_eq!(mul(Value::from(0), Value::from("ab")).unwrap(), Value::from(""));
    assert!(mul(Value::from("ab"), Value::from(-1)).unwrap().is_absent());
    assert!(mul(Value::from("ab"), Value::from(f64::NAN)).unwrap().is_absent());
    let err = mul(Value::from("ab"), Value::from(1e12)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ArgumentError);
}

#[test]
fn object_multiplication_merges_deeply() {
    let a = Value::object_from([(
        "k",
        Value::object_from([("a", Value::from(1)), ("b", Value::from(2))]),
    )]);
    let b = Value::object_from([("k", Value::object_from([("b", Value::from(3))]))]);
    assert_eq!(mul(a, b).unwrap().to_string(), r#"{"k":{"a":1,"b":3}}"#);
}

#[test]
fn division() {
    assert_eq!(div(Value::from(7), Value::from(2)).unwrap(), Value::from(3.5));
    let err = div(Value::from(1), Value::from(0)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionError);
    assert_eq!(
        err.message(),
        "number (1) and number (0) cannot be divided because the divisor is zero"
    );
    assert_eq!(
        div(Value::from("a,b"), Value::from(",")).unwrap().to_string(),
        r#"["a","b"]"#
    );
}

#[test]
fn remainder_keeps_sign_of_dividend() {
    assert_eq!(rem(Value::from(-5), Value::from(3)).unwrap(), Value::from(-2));
    assert_eq!(rem(Value::from(5.5), Value::from(2)).unwrap(), Value::from(1.5));
    let err = rem(Value::from(1), Value::from(0)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionError);
}

#[test]
fn split_edge_cases() {
    assert!(split("", ",").is_empty());
    assert_eq!(split("abc", "").len(), 3);
    assert_eq!(split("a,,b", ",").len(), 3);
}

#[test]
fn comparisons_use_total_order() {
    assert_eq!(
        binary(BinaryOp::Lt, Value::Null, Value::from(false)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        binary(BinaryOp::Eq, Value::from(1), Value::from(1.0)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        binary(BinaryOp::GtEq, Value::from("b"), Value::from("a")).unwrap(),
        Value::Bool(true)
    );
    assert!(compare_with(BinaryOp::NotEq, &Value::from(1), &Value::from("1")));
}
