//! End-to-end runs of the `jet` command over in-memory streams.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs;

use jetc::{parse_args, run, Command, Exit};
use pretty_assertions::assert_eq;

struct Outcome {
    exit: Exit,
    out: String,
    err: String,
}

fn jet(args: &[&str], stdin: &str) -> Outcome {
    let Command::Run(options) = parse_args(args).unwrap() else {
        panic!("not a run: {args:?}");
    };
    let mut out = Vec::new();
    let mut err = Vec::new();
    let exit = run(&options, &mut stdin.as_bytes(), &mut out, &mut err);
    Outcome {
        exit,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

fn ok(args: &[&str], stdin: &str) -> String {
    let outcome = jet(args, stdin);
    assert_eq!(outcome.exit, Exit::Success, "stderr: {}", outcome.err);
    assert_eq!(outcome.err, "");
    outcome.out
}

#[test]
fn every_input_value_is_run() {
    assert_eq!(ok(&[".a"], r#"{"a":1} {"a":[1,2]}"#), "1\n[\n  1,\n  2\n]\n");
}

#[test]
fn compact_output() {
    assert_eq!(
        ok(&["-c", ".[]"], r#"[{"a": 1}, "x", []]"#),
        "{\"a\":1}\n\"x\"\n[]\n"
    );
}

#[test]
fn indentation() {
    assert_eq!(ok(&["--tab", "."], r#"{"a":[1]}"#), "{\n\t\"a\": [\n\t\t1\n\t]\n}\n");
    assert_eq!(ok(&["--indent", "1", "."], "[1]"), "[\n 1\n]\n");
    assert_eq!(ok(&["--indent", "0", "."], "[1, 2]"), "[1,2]\n");
}

#[test]
fn raw_output_only_affects_strings() {
    assert_eq!(ok(&["-r", ".[]"], r#"["a\tb", 1, ["c"]]"#), "a\tb\n1\n[\n  \"c\"\n]\n");
}

#[test]
fn null_input_ignores_stdin() {
    assert_eq!(ok(&["-n", "1 + 1"], "not json"), "2\n");
    assert_eq!(ok(&["-n", "."], ""), "null\n");
}

#[test]
fn slurp_collects_inputs() {
    assert_eq!(ok(&["-c", "-s", "."], "1 [2]\n\"3\""), "[1,[2],\"3\"]\n");
    assert_eq!(ok(&["-s", "length"], ""), "0\n");
}

#[test]
fn no_input_means_no_run() {
    assert_eq!(ok(&["1"], "  \n"), "");
}

#[test]
fn named_arguments() {
    assert_eq!(
        ok(
            &["-nc", "--arg", "x", "1", "--argjson", "y", "{\"z\":2}", "[$x, $y.z]"],
            ""
        ),
        "[\"1\",2]\n"
    );
}

#[test]
fn environment_is_visible() {
    assert_eq!(ok(&["-n", "$ENV | type"], ""), "\"object\"\n");
}

#[test]
fn runtime_error_moves_on_to_the_next_input() {
    let outcome = jet(&[".a"], r#"1 {"a": 2}"#);
    assert_eq!(outcome.exit, Exit::Runtime);
    assert_eq!(outcome.out, "2\n");
    assert!(outcome.err.starts_with("jet: error (at <stdin>): "), "{}", outcome.err);
    assert_eq!(outcome.err.lines().count(), 1);
}

#[test]
fn outputs_before_an_error_are_kept() {
    let outcome = jet(&["-n", "1, error(\"boom\"), 2"], "");
    assert_eq!(outcome.exit, Exit::Runtime);
    assert_eq!(outcome.out, "1\n");
    assert_eq!(outcome.err, "jet: error (at <unknown>): boom\n");
}

#[test]
fn non_string_error_values_are_shown_as_json() {
    let outcome = jet(&["-n", "error({a: 1})"], "");
    assert_eq!(outcome.exit, Exit::Runtime);
    assert!(outcome.err.contains("(not a string)"), "{}", outcome.err);
}

#[test]
fn bad_input_json_stops_the_run() {
    let outcome = jet(&["."], "1 {");
    assert_eq!(outcome.exit, Exit::Usage);
    assert_eq!(outcome.out, "1\n");
    assert!(outcome.err.contains("while parsing <stdin>"), "{}", outcome.err);
}

#[test]
fn compile_errors() {
    let outcome = jet(&["-n", ".["], "");
    assert_eq!(outcome.exit, Exit::Compile);
    assert_eq!(outcome.out, "");
    assert!(outcome.err.starts_with("jet: error: "));

    assert_eq!(jet(&["-n", "$nope"], "").exit, Exit::Compile);
}

#[test]
fn exit_status_follows_the_last_output() {
    assert_eq!(jet(&["-e", "."], "1").exit, Exit::Success);
    assert_eq!(jet(&["-e", "."], "false").exit, Exit::FalsyOutput);
    assert_eq!(jet(&["-e", "."], "1 null").exit, Exit::FalsyOutput);
    assert_eq!(jet(&["-e", "empty"], "1").exit, Exit::FalsyOutput);
    assert_eq!(jet(&[".", "-e"], "null 0").exit, Exit::Success);
}

#[test]
fn input_and_filter_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    let prog = dir.path().join("prog.jet");
    fs::write(&a, r#"{"x": 1}"#).unwrap();
    fs::write(&b, "2\n3").unwrap();
    fs::write(&prog, "# keep numbers\n.x? // .\n").unwrap();
    let (a, b, prog) = (
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        prog.to_str().unwrap(),
    );

    assert_eq!(ok(&["-c", ".", a, b], "ignored"), "{\"x\":1}\n2\n3\n");
    assert_eq!(ok(&["-f", prog, a, b], ""), "1\n2\n3\n");
    assert_eq!(ok(&["-s", "-c", "-f", prog, a, b], ""), "[{\"x\":1},2,3]\n");
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let outcome = jet(&[".", missing.to_str().unwrap()], "");
    assert_eq!(outcome.exit, Exit::Usage);
    assert!(outcome.err.contains("could not read"), "{}", outcome.err);
}
