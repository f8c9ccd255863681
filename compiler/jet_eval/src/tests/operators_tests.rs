use super::{check, error_kind, eval, json, run};
use crate::RunError;
use jet_value::EvalErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn identity_and_literals() {
    check(".", r#"{"a":[1,2]}"#, &[r#"{"a":[1,2]}"#]);
    check("null, true, 1.5, \"s\"", "0", &["null", "true", "1.5", "\"s\""]);
    check("[], {}", "0", &["[]", "{}"]);
}

#[test]
fn field_index_and_slice() {
    check(".a.b", r#"{"a":{"b":7}}"#, &["7"]);
    check(r#"."a-b""#, r#"{"a-b":1}"#, &["1"]);
    check(".[1], .[-1], .[9]", "[1,2,3]", &["2", "3", "null"]);
    check(".[1.7]", "[1,2,3]", &["2"]);
    check(".[1:], .[:-1], .[-2:]", "[1,2,3]", &["[2,3]", "[1,2]", "[2,3]"]);
    check(".[1:3]", r#""héllo""#, &[r#""él""#]);
    check(".a, .[0]", "null", &["null", "null"]);
    check(".[[2,3]]", "[1,2,3,2,3]", &["[1,3]"]);
}

#[test]
fn index_key_sees_the_original_input() {
    check(".a[.k]", r#"{"a":{"x":1},"k":"x"}"#, &["1"]);
}

#[test]
fn iterate_arrays_and_objects() {
    check(".[]", "[1,[2]]", &["1", "[2]"]);
    check(".[]", r#"{"b":1,"a":2}"#, &["1", "2"]);
    assert_eq!(error_kind(".[]", "3"), EvalErrorKind::IterateOnNonIterable);
}

#[test]
fn optional_suppresses_errors_of_its_term_only() {
    check(
        "[.[] | .foo?]",
        r#"[1,[2],{"foo":3,"bar":4},{},{"foo":5}]"#,
        &["[3,null,5]"],
    );
    check("[.[]?]", "3", &["[]"]);
    check("try (1, error(\"x\"), 3)", "null", &["1"]);
}

#[test]
fn pipe_feeds_every_output_forward() {
    check(".[] | . * 10", "[1,2]", &["10", "20"]);
    check("(1, 2) | (., . + 10)", "null", &["1", "11", "2", "12"]);
}

#[test]
fn comma_concatenates_in_order() {
    check("[.[] , .[]]", "[1,2]", &["[1,2,1,2]"]);
    check("1, empty, 2", "null", &["1", "2"]);
}

#[test]
fn arithmetic_by_type() {
    check("1 + 2, 5 - 3, 2 * 3, 7 / 2, 7 % 3", "null", &["3", "2", "6", "3.5", "1"]);
    check("-5 % 3", "null", &["-2"]);
    check(r#""ab" + "cd""#, "null", &[r#""abcd""#]);
    check("[1,2] + [3], [1,2,3,1] - [1]", "null", &["[1,2,3]", "[2,3]"]);
    check(r#"{"a":1} + {"b":2}"#, "null", &[r#"{"a":1,"b":2}"#]);
    check(
        r#"{"a":{"x":1,"y":2}} * {"a":{"y":3}}"#,
        "null",
        &[r#"{"a":{"x":1,"y":3}}"#],
    );
    check(r#""ab" * 3, "ab" * 0"#, "null", &[r#""ababab""#, r#""""#]);
    check(r#""a,b" / ",""#, "null", &[r#"["a","b"]"#]);
    check("null + 1, 1 + null", "null", &["1", "1"]);
    check("-.", "4", &["-4"]);
}

#[test]
fn arithmetic_errors() {
    assert_eq!(error_kind(r#"1 + "a""#, "null"), EvalErrorKind::TypeMismatch);
    assert_eq!(error_kind("1 / 0", "null"), EvalErrorKind::DivisionError);
    assert_eq!(error_kind("1 % 0", "null"), EvalErrorKind::DivisionError);
    assert_eq!(error_kind("-\"a\"", "null"), EvalErrorKind::TypeMismatch);
    check(
        r#"try (1 + "a") catch ."#,
        "null",
        &[r#""number (1) and string (\"a\") cannot be added""#],
    );
}

#[test]
fn right_operand_is_the_outer_loop() {
    check("(1, 2) + (10, 20)", "null", &["11", "12", "21", "22"]);
    check("[(1, 2) * (3, 4)]", "null", &["[3,6,4,8]"]);
}

#[test]
fn comparisons_follow_the_total_order() {
    check(
        "[null < false, false < true, true < 0, 0 < \"\", \"\" < [], [] < {}]",
        "null",
        &["[true,true,true,true,true,true]"],
    );
    check("[1 == 1.0, [1,2] < [1,3], {\"a\":1} == {\"a\":1}]", "null", &["[true,true,true]"]);
    check("[nan == nan, nan < 0]", "null", &["[true,true]"]);
}

#[test]
fn self_join_equality_matrix() {
    let outputs = eval("[.[] as $a | [.[] | $a == .]]", r#"[{"a":42},10,null,"b"]"#);
    assert_eq!(
        outputs,
        vec![json(
            "[[true,false,false,false],[false,true,false,false],\
             [false,false,true,false],[false,false,false,true]]"
        )]
    );
}

#[test]
fn and_or_short_circuit() {
    check("false and error(\"x\"), true or error(\"x\")", "null", &["false", "true"]);
    check("[(true, false) and (true, false)]", "null", &["[true,false,false]"]);
    check("[(true, false) or (true, false)]", "null", &["[true,true,false]"]);
    check("null and true, 0 or false", "null", &["false", "true"]);
}

#[test]
fn alternative_skips_false_null_and_errors() {
    check(".a // 5", "{}", &["5"]);
    check(".a // 5", r#"{"a":false}"#, &["5"]);
    check(".a // 5", r#"{"a":0}"#, &["0"]);
    check("(false, 1, null, 2) // 3", "null", &["1", "2"]);
    check("(error(\"x\"), 1) // 2", "null", &["1"]);
    check("empty // 7", "null", &["7"]);
    check("[.[] // 0]", "[]", &["[0]"]);
}

#[test]
fn array_construction_collects_all_outputs() {
    check("[.[] | . + 1]", "[1,2]", &["[2,3]"]);
    check("[empty]", "null", &["[]"]);
    assert_eq!(error_kind("[1, error(\"x\")]", "null"), EvalErrorKind::UserError);
}

#[test]
fn object_construction_crosses_entries() {
    check("{a: 1, b: .}", "2", &[r#"{"a":1,"b":2}"#]);
    check("{(.[]): 1}", r#"["x","y"]"#, &[r#"{"x":1}"#, r#"{"y":1}"#]);
    check(
        "{a: (1, 2), b: (3, 4)}",
        "null",
        &[
            r#"{"a":1,"b":3}"#,
            r#"{"a":1,"b":4}"#,
            r#"{"a":2,"b":3}"#,
            r#"{"a":2,"b":4}"#,
        ],
    );
    check("{a, $__loc__}", r#"{"a":1}"#, &[r#"{"a":1,"__loc__":{"file":"<top-level>","line":1}}"#]);
    check(". as $v | {$v}", "3", &[r#"{"v":3}"#]);
    check(r#"{"x\(1 + 1)": 3}"#, "null", &[r#"{"x2":3}"#]);
    assert_eq!(error_kind("{(1): 2}", "null"), EvalErrorKind::TypeMismatch);
}

#[test]
fn string_interpolation() {
    check(r#""a\(1 + 2)b""#, "null", &[r#""a3b""#]);
    check(r#""\(.)""#, r#"{"k":[1]}"#, &[r#""{\"k\":[1]}""#]);
    check(r#""\(1, 2)-\(3, 4)""#, "null", &[r#""1-3""#, r#""1-4""#, r#""2-3""#, r#""2-4""#]);
}

#[test]
fn top_level_error_ends_only_that_stream() {
    let outputs = run(r#".[] | if . == 2 then error("two") else . end"#, "[1,2,3]");
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0], Ok(json("1")));
    assert!(matches!(&outputs[1], Err(RunError::Eval(e)) if e.kind == EvalErrorKind::UserError));
}
