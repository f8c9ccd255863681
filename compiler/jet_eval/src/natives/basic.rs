//! Type inspection, conversion, containment and path kernels.

use super::{Entry, Native};
use jet_value::codec::{from_json_lenient, to_json};
use jet_value::errors::{
    argument_error, type_error, type_mismatch, user_error, EvalResult,
};
use jet_value::path::{delpaths, setpath};
use jet_value::{Path, Value};

pub(super) const FUNCTIONS: &[Entry] = &[
    ("error", 0, Native::Fn(error0)),
    ("error", 1, Native::Fn(error1)),
    ("_argument_error", 1, Native::Fn(raise_argument_error)),
    ("length", 0, Native::Fn(length)),
    ("utf8bytelength", 0, Native::Fn(utf8bytelength)),
    ("type", 0, Native::Fn(type_of)),
    ("keys", 0, Native::Fn(keys)),
    ("keys_unsorted", 0, Native::Fn(keys_unsorted)),
    ("has", 1, Native::Fn(has)),
    ("contains", 1, Native::Fn(contains)),
    ("tostring", 0, Native::Fn(tostring)),
    ("tonumber", 0, Native::Fn(tonumber)),
    ("tojson", 0, Native::Fn(tojson)),
    ("fromjson", 0, Native::Fn(fromjson)),
    ("setpath", 2, Native::Fn(set_path)),
    ("delpaths", 1, Native::Fn(del_paths)),
];

fn error0(input: Value, _: &[Value]) -> EvalResult {
    Err(user_error(input))
}

fn error1(_: Value, args: &[Value]) -> EvalResult {
    Err(user_error(args[0].clone()))
}

/// Domain errors raised from prelude definitions.
fn raise_argument_error(_: Value, args: &[Value]) -> EvalResult {
    let message = match &args[0] {
        Value::String(s) => s.to_string(),
        other => other.to_string(),
    };
    Err(argument_error(message))
}

/// Element count, code points, `null` → 0, numbers → absolute value.
fn length(input: Value, _: &[Value]) -> EvalResult {
    let n = match &input {
        Value::Null | Value::Absent => 0.0,
        Value::Number(n) => n.abs(),
        Value::String(s) => s.chars().count() as f64,
        Value::Array(items) => items.len() as f64,
        Value::Object(map) => map.len() as f64,
        Value::Bool(_) => return Err(type_error(&input, "has no length")),
    };
    Ok(Value::Number(n))
}

fn utf8bytelength(input: Value, _: &[Value]) -> EvalResult {
    match &input {
        Value::String(s) => Ok(Value::from(s.len())),
        _ => Err(type_error(&input, "only strings have UTF-8 byte length")),
    }
}

fn type_of(input: Value, _: &[Value]) -> EvalResult {
    Ok(Value::from(input.type_name()))
}

fn keys(input: Value, _: &[Value]) -> EvalResult {
    match &input {
        Value::Object(map) => {
            let mut names: Vec<&String> = map.keys().collect();
            names.sort_unstable();
            Ok(names.into_iter().map(|k| Value::from(k.as_str())).collect())
        }
        Value::Array(items) => Ok((0..items.len()).map(Value::from).collect()),
        _ => Err(type_error(&input, "has no keys")),
    }
}

fn keys_unsorted(input: Value, _: &[Value]) -> EvalResult {
    match &input {
        Value::Object(map) => Ok(map.keys().map(|k| Value::from(k.as_str())).collect()),
        _ => keys(input, &[]),
    }
}

fn has(input: Value, args: &[Value]) -> EvalResult {
    let key = &args[0];
    match (&input, key) {
        (Value::Object(map), Value::String(k)) => Ok(Value::Bool(map.contains_key(k.as_str()))),
        (Value::Array(items), Value::Number(i)) => {
            Ok(Value::Bool(*i >= 0.0 && *i < items.len() as f64))
        }
        _ => Err(type_mismatch(format!(
            "Cannot check whether {} has a {} key",
            input.type_name(),
            key.type_name()
        ))),
    }
}

fn contains(input: Value, args: &[Value]) -> EvalResult {
    let needle = &args[0];
    if input.type_name() != needle.type_name() {
        return Err(type_mismatch(format!(
            "{} and {} cannot have their containment checked",
            input.describe(),
            needle.describe()
        )));
    }
    Ok(Value::Bool(contains_value(&input, needle)))
}

/// Strings by substring, arrays by "every needle element is contained in
/// some element", objects key-wise, everything else by equality.
pub(super) fn contains_value(haystack: &Value, needle: &Value) -> bool {
    jet_stack::ensure_sufficient_stack(|| contained(haystack, needle))
}

fn contained(haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::String(a), Value::String(b)) => a.contains(b.as_str()),
        (Value::Array(a), Value::Array(b)) => b
            .iter()
            .all(|n| a.iter().any(|h| h.type_name() == n.type_name() && contains_value(h, n))),
        (Value::Object(a), Value::Object(b)) => b.iter().all(|(k, n)| {
            a.get(k.as_str())
                .is_some_and(|h| h.type_name() == n.type_name() && contains_value(h, n))
        }),
        _ => haystack == needle,
    }
}

fn tostring(input: Value, _: &[Value]) -> EvalResult {
    match input {
        Value::String(_) => Ok(input),
        other => Ok(Value::string(to_json(&other))),
    }
}

fn tonumber(input: Value, _: &[Value]) -> EvalResult {
    match &input {
        Value::Number(_) => Ok(input),
        Value::String(s) => parse_number(s)
            .map(Value::Number)
            .ok_or_else(|| argument_error(format!("Cannot parse '{}' as a number", s.as_str()))),
        _ => Err(type_error(&input, "cannot be parsed as a number")),
    }
}

/// JSON number syntax plus `nan`.
fn parse_number(text: &str) -> Option<f64> {
    match text {
        "nan" | "NaN" => Some(f64::NAN),
        _ => match from_json_lenient(text) {
            Ok(Value::Number(n)) => Some(n),
            _ => None,
        },
    }
}

fn tojson(input: Value, _: &[Value]) -> EvalResult {
    Ok(Value::string(to_json(&input)))
}

fn fromjson(input: Value, _: &[Value]) -> EvalResult {
    match &input {
        Value::String(text) => from_json_lenient(text).map_err(|err| {
            argument_error(format!("{err} (while parsing '{}')", text.as_str()))
        }),
        _ => Err(type_error(&input, "only strings can be parsed")),
    }
}

fn set_path(input: Value, args: &[Value]) -> EvalResult {
    let path = Path::from_value(&args[0])?;
    setpath(input, path.segments(), args[1].clone())
}

fn del_paths(input: Value, args: &[Value]) -> EvalResult {
    let Value::Array(items) = &args[0] else {
        return Err(type_mismatch("Paths must be specified as an array"));
    };
    let paths = items
        .iter()
        .map(Path::from_value)
        .collect::<Result<Vec<_>, _>>()?;
    delpaths(input, &paths)
}
