//! Algebraic laws of the evaluator, checked on generated JSON.
//!
//! Filters are drawn from a fixed pool of fragments so that every
//! generated program compiles; the inputs are arbitrary values.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use jet_eval::{EvalConfig, Interpreter, RunError};
use jet_value::Value;
use proptest::prelude::*;

thread_local! {
    static INTERP: Interpreter = Interpreter::new(EvalConfig::new().expose_env(false)).unwrap();
}

fn run(filter: &str, input: &Value) -> Vec<Result<Value, RunError>> {
    INTERP.with(|interp| {
        let program = interp
            .compile(filter)
            .unwrap_or_else(|e| panic!("{filter}: {e}"));
        interp.run(&program, input.clone()).collect()
    })
}

/// The outputs, or `None` if the stream ended in an error.
fn values(filter: &str, input: &Value) -> Option<Vec<Value>> {
    run(filter, input).into_iter().collect::<Result<_, _>>().ok()
}

fn is_true(filter: &str, input: &Value) -> bool {
    run(filter, input) == vec![Ok(Value::Bool(true))]
}

const FRAGMENTS: &[&str] = &[
    ".",
    ".[]?",
    ".a?",
    ".[0]?",
    "..",
    "(., .)",
    "empty",
    "type",
    "length?",
    "tostring",
    "[.]",
    "keys?",
    "select(type == \"number\")",
    "if type == \"array\" then .[1:] else . end",
    "try error catch .",
    ". as $x | [$x]",
];

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(FRAGMENTS)
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(|n| Value::Number(f64::from(n))),
        (-1e6f64..1e6).prop_map(Value::Number),
        "[a-c ]{0,4}".prop_map(Value::string),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            prop::collection::vec(("[a-c]{1,2}", inner), 0..4).prop_map(Value::object_from),
        ]
    })
}

proptest! {
    #[test]
    fn identity_yields_the_input(v in arb_json()) {
        prop_assert_eq!(run(".", &v), vec![Ok(v.clone())]);
    }

    #[test]
    fn pipe_is_associative(v in arb_json(), a in fragment(), b in fragment(), c in fragment()) {
        let left = run(&format!("({a} | {b}) | {c}"), &v);
        let right = run(&format!("{a} | ({b} | {c})"), &v);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn comma_concatenates(v in arb_json(), a in fragment(), b in fragment()) {
        let (Some(mut first), Some(second)) = (values(a, &v), values(b, &v)) else {
            return Ok(());
        };
        first.extend(second);
        prop_assert_eq!(values(&format!("[{a}, {b}]"), &v), Some(vec![Value::array(first)]));
    }

    #[test]
    fn paths_and_values_agree(v in arb_json()) {
        prop_assert!(is_true("[path(..)] as $ps | [..] == [$ps[] as $p | getpath($p)]", &v));
        prop_assert!(is_true("[paths(true)] == [paths]", &v));
    }

    #[test]
    fn identity_update_changes_nothing(v in arb_json()) {
        prop_assert_eq!(run(".. |= .", &v), vec![Ok(v.clone())]);
        prop_assert_eq!(run(".[]? |= .", &v), vec![Ok(v.clone())]);
    }

    #[test]
    fn setpath_of_getpath_round_trips(v in arb_json()) {
        prop_assert!(is_true(
            ". as $r | all(paths; . as $p | $r | setpath($p; getpath($p)) == $r)",
            &v
        ));
    }

    #[test]
    fn sort_orders_and_keeps_everything(v in prop::collection::vec(arb_json(), 0..6)) {
        let input = Value::array(v);
        prop_assert!(is_true(
            "sort as $s | ($s | length) == length \
             and all(range(1; $s | length); $s[. - 1] <= $s[.])",
            &input
        ));
    }
}
