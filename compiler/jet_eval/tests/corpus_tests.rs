//! Table-driven behaviour corpus.
//!
//! Every `*.test` file in `tests/corpus/` holds blocks separated by blank
//! lines. A block is a filter line, an input line, then one JSON value per
//! expected output. A block that starts with `%%FAIL` expects the stream to
//! end in a runtime error: its last line is the error kind instead of an
//! output. Lines starting with `#` are comments.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs;
use std::path::{Path, PathBuf};

use jet_eval::{EvalConfig, Interpreter, RunError};
use jet_value::codec::{from_json, to_json};
use jet_value::Value;

struct Case {
    file: String,
    line: usize,
    filter: String,
    input: String,
    expect: Expect,
}

enum Expect {
    Outputs(Vec<String>),
    Failure { outputs: Vec<String>, kind: String },
}

fn corpus_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("corpus")
}

fn parse_cases(file: &str, text: &str) -> Vec<Case> {
    let mut cases = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();
    let lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    for (number, line) in lines.chain(std::iter::once((0, ""))) {
        if line.starts_with('#') {
            continue;
        }
        if !line.trim().is_empty() {
            block.push((number, line));
            continue;
        }
        if block.is_empty() {
            continue;
        }
        let fail = block[0].1.trim() == "%%FAIL";
        let body = if fail { &block[1..] } else { &block[..] };
        assert!(body.len() >= 2, "{file}:{}: incomplete case", block[0].0);
        let mut rest: Vec<String> = body[2..].iter().map(|(_, l)| (*l).to_owned()).collect();
        let expect = if fail {
            let kind = rest.pop().unwrap_or_else(|| {
                panic!("{file}:{}: missing error kind", block[0].0)
            });
            Expect::Failure {
                outputs: rest,
                kind,
            }
        } else {
            Expect::Outputs(rest)
        };
        cases.push(Case {
            file: file.to_owned(),
            line: body[0].0,
            filter: body[0].1.to_owned(),
            input: body[1].1.to_owned(),
            expect,
        });
        block.clear();
    }
    cases
}

fn load_corpus() -> Vec<Case> {
    let mut files: Vec<PathBuf> = fs::read_dir(corpus_dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "test"))
        .collect();
    files.sort();
    files
        .iter()
        .flat_map(|path| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let text = fs::read_to_string(path).unwrap();
            parse_cases(&name, &text)
        })
        .collect()
}

fn normalize(text: &str, case: &Case) -> String {
    let value: Value = from_json(text)
        .unwrap_or_else(|e| panic!("{}:{}: bad JSON {text}: {e}", case.file, case.line));
    to_json(&value)
}

/// Run one case; `Err` describes the mismatch.
fn run_case(interp: &Interpreter, case: &Case) -> Result<(), String> {
    let program = interp
        .compile(&case.filter)
        .map_err(|e| format!("does not compile: {e}"))?;
    let input = from_json(&case.input).map_err(|e| format!("bad input: {e}"))?;

    let mut outputs = Vec::new();
    let mut failure = None;
    for out in interp.run(&program, input) {
        match out {
            Ok(value) => outputs.push(to_json(&value)),
            Err(RunError::Eval(err)) => failure = Some(err.kind.name().to_owned()),
            Err(RunError::UnmatchedBreak) => failure = Some("break".to_owned()),
        }
    }

    let (expected, expected_failure) = match &case.expect {
        Expect::Outputs(expected) => (expected, None),
        Expect::Failure { outputs, kind } => (outputs, Some(kind.trim().to_owned())),
    };
    let expected: Vec<String> = expected.iter().map(|e| normalize(e, case)).collect();
    if outputs != expected || failure != expected_failure {
        return Err(format!(
            "expected {expected:?} then {expected_failure:?}, got {outputs:?} then {failure:?}"
        ));
    }
    Ok(())
}

#[test]
fn corpus() {
    let interp = Interpreter::new(EvalConfig::new().expose_env(false)).unwrap();
    let cases = load_corpus();
    assert!(!cases.is_empty(), "no corpus cases found");

    let failures: Vec<String> = cases
        .iter()
        .filter_map(|case| {
            run_case(&interp, case)
                .err()
                .map(|why| format!("{}:{}: {}\n    {why}", case.file, case.line, case.filter))
        })
        .collect();

    assert!(
        failures.is_empty(),
        "{} of {} corpus cases failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}

#[test]
fn block_parsing() {
    let cases = parse_cases(
        "inline",
        "# comment\n.a\n{\"a\":1}\n1\n\n%%FAIL\n.[]\n1\nIterateOnNonIterable\n",
    );
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].filter, ".a");
    assert_eq!(cases[0].line, 2);
    assert!(matches!(&cases[0].expect, Expect::Outputs(o) if o == &["1"]));
    assert!(matches!(
        &cases[1].expect,
        Expect::Failure { outputs, kind } if outputs.is_empty() && kind == "IterateOnNonIterable"
    ));
}
