#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use proptest::prelude::*;
use std::cmp::Ordering;

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        Just(Value::Absent),
        any::<bool>().prop_map(Value::Bool),
        prop_oneof![
            (-100i32..100).prop_map(|n| Value::Number(f64::from(n))),
            Just(Value::Number(f64::NAN)),
            Just(Value::Number(-0.0)),
            any::<f64>().prop_map(Value::Number),
        ],
        "[a-c]{0,3}".prop_map(Value::string),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            prop::collection::vec(("[a-c]{1,2}", inner), 0..4)
                .prop_map(Value::object_from),
        ]
    })
}

#[test]
fn kinds_are_ranked() {
    let ascending = [
        Value::Null,
        Value::Bool(false),
        Value::Bool(true),
        Value::Number(f64::NAN),
        Value::Number(-1.0),
        Value::string(""),
        Value::array(vec![]),
        Value::empty_object(),
    ];
    for pair in ascending.windows(2) {
        assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less, "{pair:?}");
    }
}

#[test]
fn nan_equals_itself_and_zero_is_signless() {
    assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    assert_eq!(Value::Number(-0.0), Value::Number(0.0));
}

#[test]
fn objects_compare_keys_before_values() {
    let a = Value::object_from([("a", Value::from(5))]);
    let b = Value::object_from([("b", Value::from(1))]);
    assert_eq!(compare(&a, &b), Ordering::Less);

    let small = Value::object_from([("a", Value::from(1)), ("b", Value::from(9))]);
    let large = Value::object_from([("b", Value::from(0)), ("a", Value::from(2))]);
    assert_eq!(compare(&small, &large), Ordering::Less);
}

#[test]
fn object_equality_ignores_insertion_order() {
    let a = Value::object_from([("x", Value::from(1)), ("y", Value::from(2))]);
    let b = Value::object_from([("y", Value::from(2)), ("x", Value::from(1))]);
    assert_eq!(a, b);
}

#[test]
fn arrays_compare_lexicographically() {
    let short = Value::array(vec![Value::from(1)]);
    let long = Value::array(vec![Value::from(1), Value::from(0)]);
    let bigger = Value::array(vec![Value::from(2)]);
    assert_eq!(compare(&short, &long), Ordering::Less);
    assert_eq!(compare(&long, &bigger), Ordering::Less);
}

proptest! {
    #[test]
    fn order_is_reflexive(a in arb_value()) {
        prop_assert_eq!(compare(&a, &a), Ordering::Equal);
        prop_assert!(a == a.clone());
    }

    #[test]
    fn order_is_antisymmetric(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
    }

    #[test]
    fn order_is_transitive(a in arb_value(), b in arb_value(), c in arb_value()) {
        let mut sorted = [a, b, c];
        sorted.sort_by(compare);
        prop_assert!(compare(&sorted[0], &sorted[1]).is_le());
        prop_assert!(compare(&sorted[1], &sorted[2]).is_le());
        prop_assert!(compare(&sorted[0], &sorted[2]).is_le());
    }

    #[test]
    fn equality_agrees_with_order(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(a == b, compare(&a, &b) == Ordering::Equal);
    }
}
