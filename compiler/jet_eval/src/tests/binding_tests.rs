use super::{check, error_kind};
use jet_value::EvalErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn variable_binding() {
    check(". as $x | $x + 1", "1", &["2"]);
    check(".[] as $x | $x * 2", "[1,2]", &["2", "4"]);
    check(". as $x | [$x, .]", "3", &["[3,3]"]);
}

#[test]
fn inner_bindings_shadow_and_then_expire() {
    check("1 as $x | (2 as $x | $x), $x", "null", &["2", "1"]);
    check("1 as $x | [2 as $x | $x] | ., $x", "null", &["[2]", "1"]);
}

#[test]
fn array_patterns() {
    check(". as [$a, $b] | {a: $a, b: $b}", "[1,2,3]", &[r#"{"a":1,"b":2}"#]);
    check(". as [$a, $b] | [$a, $b]", "[1]", &["[1,null]"]);
    check(". as [$a, [$b]] | $b", "[1,[2]]", &["2"]);
    assert_eq!(error_kind(". as [$a] | $a", r#"{"a":1}"#), EvalErrorKind::TypeMismatch);
}

#[test]
fn object_patterns() {
    check(". as {a: $x} | $x", r#"{"a":1}"#, &["1"]);
    check(". as {$a, $b} | [$a, $b]", r#"{"a":1}"#, &["[1,null]"]);
    check(". as {\"a b\": $x} | $x", r#"{"a b":1}"#, &["1"]);
    check(". as {$a: [$first]} | [$a, $first]", r#"{"a":[5,6]}"#, &["[[5,6],5]"]);
    check(
        ". as {a: {b: $deep}} | $deep",
        r#"{"a":{"b":"x"}}"#,
        &[r#""x""#],
    );
}

#[test]
fn computed_keys_see_earlier_bindings() {
    check(". as {k: $k, ($k): $v} | $v", r#"{"k":"z","z":9}"#, &["9"]);
    check(". as {(\"a\", \"b\"): $v} | $v", r#"{"a":1,"b":2}"#, &["1", "2"]);
    assert_eq!(
        error_kind(". as {(1): $v} | $v", r#"{"a":1}"#),
        EvalErrorKind::TypeMismatch
    );
}

#[test]
fn key_expressions_run_against_the_input() {
    check(".[0] as {(.[1]): $v} | $v", r#"[{"x":7},"x"]"#, &["7"]);
}

#[test]
fn sequential_bindings_each_add_a_frame() {
    check(". as $a | .b as $b | $a.c + $b", r#"{"b":1,"c":2}"#, &["3"]);
    check(
        "[.[] as [$a, $b] | $a + $b]",
        "[[1,2],[10,20]]",
        &["[3,30]"],
    );
}

#[test]
fn patterns_in_reduce_and_foreach() {
    check(
        "reduce .[] as {k: $k, v: $v} ({}; .[$k] = $v)",
        r#"[{"k":"a","v":1},{"k":"b","v":2}]"#,
        &[r#"{"a":1,"b":2}"#],
    );
    check("[foreach .[] as [$a] (0; . + $a)]", "[[1],[2]]", &["[1,3]"]);
}

#[test]
fn value_parameters_are_also_filters() {
    check("def f($x): x + $x; f(.[])", "[1,2]", &["2", "4"]);
}
