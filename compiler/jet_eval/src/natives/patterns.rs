//! Regular expressions.
//!
//! `_match_impl(re; flags; test)` is the only regex kernel; `test`,
//! `match`, `capture`, `scan`, `split/2`, `sub` and `gsub` are written on
//! top of it in the prelude. Offsets and lengths in match objects count
//! code points.

use super::{Entry, Native};
use jet_value::errors::{argument_error, type_error, EvalError, EvalResult};
use jet_value::Value;
use regex::{Captures, Regex, RegexBuilder};

pub(super) const FUNCTIONS: &[Entry] = &[("_match_impl", 3, Native::Fn(match_impl))];

#[derive(Default, Debug, PartialEq)]
struct Flags {
    global: bool,
    skip_empty: bool,
    case_insensitive: bool,
    extended: bool,
    dot_all: bool,
}

impl Flags {
    fn parse(flags: &Value) -> Result<Flags, EvalError> {
        let text = match flags {
            Value::Null | Value::Absent => return Ok(Flags::default()),
            Value::String(s) => s.as_str(),
            other => return Err(type_error(other, "is not a string")),
        };
        let mut parsed = Flags::default();
        for c in text.chars() {
            match c {
                'g' => parsed.global = true,
                'n' => parsed.skip_empty = true,
                'i' => parsed.case_insensitive = true,
                'x' => parsed.extended = true,
                's' => parsed.dot_all = true,
                _ => {
                    return Err(argument_error(format!(
                        "{text} is not a valid modifier string"
                    )))
                }
            }
        }
        Ok(parsed)
    }

    fn compile(&self, pattern: &str) -> Result<Regex, EvalError> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .ignore_whitespace(self.extended)
            .dot_matches_new_line(self.dot_all)
            .build()
            .map_err(|err| argument_error(format!("{pattern} is not a valid regex: {err}")))
    }
}

fn match_impl(input: Value, args: &[Value]) -> EvalResult {
    let text = input
        .as_str()
        .ok_or_else(|| type_error(&input, "cannot be matched, as it is not a string"))?;
    let pattern = args[0]
        .as_str()
        .ok_or_else(|| type_error(&args[0], "cannot be matched, as it is not a string"))?;
    let flags = Flags::parse(&args[1])?;
    let regex = flags.compile(pattern)?;

    if args[2].is_truthy() {
        return Ok(Value::Bool(regex.is_match(text)));
    }
    let names: Vec<Option<&str>> = regex.capture_names().skip(1).collect();
    let found = regex
        .captures_iter(text)
        .filter(|caps| !(flags.skip_empty && caps.get(0).is_some_and(|m| m.is_empty())))
        .take(if flags.global { usize::MAX } else { 1 })
        .map(|caps| match_object(text, &caps, &names))
        .collect();
    Ok(found)
}

/// Code points in `text[..byte]`.
fn position(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

fn match_object(text: &str, caps: &Captures<'_>, names: &[Option<&str>]) -> Value {
    let whole = caps.get(0);
    let (offset, matched) = whole.map_or((0, ""), |m| (position(text, m.start()), m.as_str()));
    let captures: Value = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.map_or(Value::Null, Value::from);
            match caps.get(i + 1) {
                Some(group) => Value::object_from([
                    ("offset", Value::from(position(text, group.start()))),
                    ("length", Value::from(group.as_str().chars().count())),
                    ("string", Value::from(group.as_str())),
                    ("name", name),
                ]),
                None => Value::object_from([
                    ("offset", Value::Number(-1.0)),
                    ("length", Value::from(0)),
                    ("string", Value::Null),
                    ("name", name),
                ]),
            }
        })
        .collect();
    Value::object_from([
        ("offset", Value::from(offset)),
        ("length", Value::from(matched.chars().count())),
        ("string", Value::from(matched)),
        ("captures", captures),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use jet_value::codec::from_json;
    use jet_value::EvalErrorKind;
    use pretty_assertions::assert_eq;

    fn run(text: &str, pattern: &str, flags: Value) -> EvalResult {
        match_impl(
            Value::from(text),
            &[Value::from(pattern), flags, Value::Bool(false)],
        )
    }

    #[test]
    fn first_match_with_named_and_missing_groups() {
        let result = run("xyz-abc", "(?<word>[a-c]+)|(\\d)", Value::Null);
        let expected = from_json(
            r#"[{"offset":4,"length":3,"string":"abc","captures":[
                {"offset":4,"length":3,"string":"abc","name":"word"},
                {"offset":-1,"length":0,"string":null,"name":null}]}]"#,
        )
        .ok();
        assert_eq!(result.ok(), expected);
    }

    #[test]
    fn global_flag_returns_every_match() {
        let result = run("aXbxc", "x", Value::from("gi")).ok();
        let offsets: Vec<f64> = result
            .as_ref()
            .and_then(Value::as_array)
            .map(|ms| ms.iter().filter_map(|m| jet_value::access::index(m, &Value::from("offset")).ok()?.as_f64()).collect())
            .unwrap_or_default();
        assert_eq!(offsets, vec![1.0, 3.0]);
    }

    #[test]
    fn offsets_count_code_points() {
        let result = run("ééx", "x", Value::Null).ok();
        let first = result.as_ref().and_then(|v| v.as_array()?.first().cloned());
        let offset = first.and_then(|m| jet_value::access::index(&m, &Value::from("offset")).ok());
        assert_eq!(offset, Some(Value::from(2)));
    }

    #[test]
    fn skip_empty_matches() {
        let all = run("ab", "x*", Value::from("g")).ok();
        assert_eq!(all.as_ref().and_then(Value::as_array).map(<[Value]>::len), Some(3));
        let non_empty = run("ab", "x*", Value::from("gn")).ok();
        assert_eq!(non_empty, Some(Value::array(vec![])));
    }

    #[test]
    fn test_mode_and_errors() {
        let hit = match_impl(
            Value::from("Foo"),
            &[Value::from("foo"), Value::from("i"), Value::Bool(true)],
        );
        assert_eq!(hit, Ok(Value::Bool(true)));
        assert_eq!(
            run("a", "(", Value::Null).unwrap_err().kind,
            EvalErrorKind::ArgumentError
        );
        assert_eq!(
            run("a", "a", Value::from("q")).unwrap_err().kind,
            EvalErrorKind::ArgumentError
        );
        assert_eq!(
            match_impl(Value::from(1), &[Value::from("a"), Value::Null, Value::Bool(true)])
                .unwrap_err()
                .kind,
            EvalErrorKind::TypeMismatch
        );
    }
}
