//! String kernels. Positions and lengths count code points.

use super::{Entry, Native};
use jet_value::codec::to_json;
use jet_value::errors::{argument_error, type_error, type_mismatch, EvalError, EvalResult};
use jet_value::ops;
use jet_value::Value;

pub(super) const FUNCTIONS: &[Entry] = &[
    ("explode", 0, Native::Fn(explode)),
    ("implode", 0, Native::Fn(implode)),
    ("ltrimstr", 1, Native::Fn(ltrimstr)),
    ("rtrimstr", 1, Native::Fn(rtrimstr)),
    ("startswith", 1, Native::Fn(startswith)),
    ("endswith", 1, Native::Fn(endswith)),
    ("ascii_downcase", 0, Native::Fn(ascii_downcase)),
    ("ascii_upcase", 0, Native::Fn(ascii_upcase)),
    ("split", 1, Native::Fn(split)),
    ("join", 1, Native::Fn(join)),
    ("trim", 0, Native::Fn(trim)),
    ("ltrim", 0, Native::Fn(ltrim)),
    ("rtrim", 0, Native::Fn(rtrim)),
    ("_strindices", 1, Native::Fn(strindices)),
];

fn string<'v>(value: &'v Value, what: &str) -> Result<&'v str, EvalError> {
    value.as_str().ok_or_else(|| type_error(value, what))
}

fn explode(input: Value, _: &[Value]) -> EvalResult {
    let s = string(&input, "cannot be exploded")?;
    Ok(s.chars().map(|c| Value::from(c as usize)).collect())
}

fn implode(input: Value, _: &[Value]) -> EvalResult {
    let items = input
        .as_array()
        .ok_or_else(|| type_error(&input, "cannot be imploded"))?;
    items
        .iter()
        .map(|item| {
            let n = item
                .as_f64()
                .ok_or_else(|| type_error(item, "is not a valid codepoint"))?;
            (n >= 0.0 && n.fract() == 0.0)
                .then(|| char::from_u32(n as u32))
                .flatten()
                .ok_or_else(|| argument_error(format!("Invalid codepoint literal {}", item)))
        })
        .collect::<Result<String, _>>()
        .map(Value::string)
}

fn ltrimstr(input: Value, args: &[Value]) -> EvalResult {
    if let (Some(s), Some(prefix)) = (input.as_str(), args[0].as_str()) {
        if let Some(rest) = s.strip_prefix(prefix) {
            return Ok(Value::from(rest));
        }
    }
    Ok(input)
}

fn rtrimstr(input: Value, args: &[Value]) -> EvalResult {
    if let (Some(s), Some(suffix)) = (input.as_str(), args[0].as_str()) {
        if let Some(rest) = s.strip_suffix(suffix) {
            return Ok(Value::from(rest));
        }
    }
    Ok(input)
}

fn startswith(input: Value, args: &[Value]) -> EvalResult {
    match (input.as_str(), args[0].as_str()) {
        (Some(s), Some(prefix)) => Ok(Value::Bool(s.starts_with(prefix))),
        _ => Err(type_mismatch("startswith() requires string inputs")),
    }
}

fn endswith(input: Value, args: &[Value]) -> EvalResult {
    match (input.as_str(), args[0].as_str()) {
        (Some(s), Some(suffix)) => Ok(Value::Bool(s.ends_with(suffix))),
        _ => Err(type_mismatch("endswith() requires string inputs")),
    }
}

fn ascii_downcase(input: Value, _: &[Value]) -> EvalResult {
    string(&input, "cannot be lowercased").map(|s| Value::string(s.to_ascii_lowercase()))
}

fn ascii_upcase(input: Value, _: &[Value]) -> EvalResult {
    string(&input, "cannot be uppercased").map(|s| Value::string(s.to_ascii_uppercase()))
}

fn split(input: Value, args: &[Value]) -> EvalResult {
    match (input.as_str(), args[0].as_str()) {
        (Some(s), Some(sep)) => Ok(Value::array(ops::split(s, sep))),
        _ => Err(type_mismatch("split input and separator must be strings")),
    }
}

/// Scalars are joined as their JSON text, `null` as the empty string.
fn join(input: Value, args: &[Value]) -> EvalResult {
    let items: Vec<Value> = match &input {
        Value::Array(items) => items.to_vec(),
        Value::Object(map) => map.values().cloned().collect(),
        _ => return Err(type_error(&input, "cannot be joined")),
    };
    let sep = string(&args[0], "cannot be used as a separator")?;
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        match item {
            Value::Null | Value::Absent => {}
            Value::String(s) => out.push_str(s),
            Value::Number(_) | Value::Bool(_) => out.push_str(&to_json(item)),
            Value::Array(_) | Value::Object(_) => {
                return Err(type_mismatch(format!(
                    "Cannot join with {}",
                    item.type_name()
                )))
            }
        }
    }
    Ok(Value::string(out))
}

fn trim(input: Value, _: &[Value]) -> EvalResult {
    string(&input, "trim input must be a string").map(|s| Value::from(s.trim()))
}

fn ltrim(input: Value, _: &[Value]) -> EvalResult {
    string(&input, "trim input must be a string").map(|s| Value::from(s.trim_start()))
}

fn rtrim(input: Value, _: &[Value]) -> EvalResult {
    string(&input, "trim input must be a string").map(|s| Value::from(s.trim_end()))
}

/// Code point offsets of every occurrence, overlapping ones included.
fn strindices(input: Value, args: &[Value]) -> EvalResult {
    let (Some(s), Some(needle)) = (input.as_str(), args[0].as_str()) else {
        return Err(type_mismatch("indices input and argument must be strings"));
    };
    if needle.is_empty() {
        return Ok(Value::Null);
    }
    let found = s
        .char_indices()
        .enumerate()
        .filter(|(_, (byte, _))| s[*byte..].starts_with(needle))
        .map(|(position, _)| Value::from(position))
        .collect();
    Ok(found)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use jet_value::EvalErrorKind;
    use pretty_assertions::assert_eq;

    fn strs(items: &[&str]) -> Value {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    fn nums(items: &[usize]) -> Value {
        items.iter().map(|n| Value::from(*n)).collect()
    }

    #[test]
    fn explode_and_implode_use_code_points() {
        assert_eq!(explode(Value::from("aé"), &[]), Ok(nums(&[97, 233])));
        assert_eq!(implode(nums(&[97, 233]), &[]), Ok(Value::from("aé")));
        let err = implode(Value::array(vec![Value::Number(-1.0)]), &[]).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::ArgumentError);
        let surrogate = implode(nums(&[0xD800]), &[]).unwrap_err();
        assert_eq!(surrogate.kind, EvalErrorKind::ArgumentError);
    }

    #[test]
    fn trimming_by_affix_leaves_non_matches_alone() {
        let foobar = Value::from("foobar");
        assert_eq!(ltrimstr(foobar.clone(), &[Value::from("foo")]), Ok(Value::from("bar")));
        assert_eq!(rtrimstr(foobar.clone(), &[Value::from("foo")]), Ok(foobar.clone()));
        assert_eq!(ltrimstr(Value::from(1), &[Value::from("foo")]), Ok(Value::from(1)));
    }

    #[test]
    fn join_renders_scalars() {
        let items = Value::array(vec![
            Value::from("a"),
            Value::from(1),
            Value::Null,
            Value::Bool(true),
        ]);
        assert_eq!(join(items, &[Value::from("-")]), Ok(Value::from("a-1--true")));
        assert_eq!(join(Value::array(vec![]), &[Value::from(",")]), Ok(Value::from("")));
        let nested = Value::array(vec![Value::array(vec![])]);
        assert_eq!(
            join(nested, &[Value::from(",")]).unwrap_err().kind,
            EvalErrorKind::TypeMismatch
        );
    }

    #[test]
    fn split_on_separator() {
        assert_eq!(
            split(Value::from("a, b,c"), &[Value::from(", ")]),
            Ok(strs(&["a", "b,c"]))
        );
        assert_eq!(split(Value::from(""), &[Value::from(",")]), Ok(strs(&[])));
        assert!(split(Value::from(1), &[Value::from(",")]).is_err());
    }

    #[test]
    fn string_indices_overlap_and_count_code_points() {
        assert_eq!(
            strindices(Value::from("a,b, cd, efg"), &[Value::from(", ")]),
            Ok(nums(&[3, 7]))
        );
        assert_eq!(strindices(Value::from("aaa"), &[Value::from("aa")]), Ok(nums(&[0, 1])));
        assert_eq!(strindices(Value::from("éxéx"), &[Value::from("x")]), Ok(nums(&[1, 3])));
    }

    #[test]
    fn whitespace_trimming_requires_strings() {
        assert_eq!(trim(Value::from("  x \n"), &[]), Ok(Value::from("x")));
        assert_eq!(ltrim(Value::from("  x "), &[]), Ok(Value::from("x ")));
        assert_eq!(rtrim(Value::from("  x "), &[]), Ok(Value::from("  x")));
        assert_eq!(trim(Value::from(1), &[]).unwrap_err().kind, EvalErrorKind::TypeMismatch);
    }
}
