//! Evaluator behaviour, one file per area.
//!
//! Every test runs a filter text against JSON input through the public
//! [`Interpreter`] API and compares the full output sequence.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod binding_tests;
mod operators_tests;

use crate::{EvalConfig, Interpreter, RunError};
use jet_value::codec::from_json;
use jet_value::{EvalErrorKind, Value};

pub(crate) fn json(text: &str) -> Value {
    from_json(text).unwrap_or_else(|e| panic!("bad test JSON {text}: {e}"))
}

/// Every output of `filter` on `input`, errors included.
pub(crate) fn run(filter: &str, input: &str) -> Vec<Result<Value, RunError>> {
    let interp = Interpreter::new(EvalConfig::new().expose_env(false)).unwrap();
    let program = interp
        .compile(filter)
        .unwrap_or_else(|e| panic!("{filter}: {e}"));
    interp.run(&program, json(input)).collect()
}

/// The outputs of a filter that must not fail.
pub(crate) fn eval(filter: &str, input: &str) -> Vec<Value> {
    run(filter, input)
        .into_iter()
        .map(|out| out.unwrap_or_else(|e| panic!("{filter}: {e}")))
        .collect()
}

/// Assert the outputs, written as one JSON value per expected output.
#[track_caller]
pub(crate) fn check(filter: &str, input: &str, expected: &[&str]) {
    let expected: Vec<Value> = expected.iter().map(|text| json(text)).collect();
    pretty_assertions::assert_eq!(eval(filter, input), expected, "{filter}");
}

/// The kind of the error that ends the stream.
#[track_caller]
pub(crate) fn error_kind(filter: &str, input: &str) -> EvalErrorKind {
    match run(filter, input).pop() {
        Some(Err(RunError::Eval(err))) => err.kind,
        other => panic!("{filter}: expected an error, got {other:?}"),
    }
}
