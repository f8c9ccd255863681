//! Array kernels. The `_*_by_impl` helpers take the input array and a
//! parallel array of sort keys computed by the prelude (`map([f])`).

use super::{Entry, Native};
use jet_value::errors::{argument_error, type_error, EvalError, EvalResult};
use jet_value::{compare, Value};
use std::cmp::Ordering;

pub(super) const FUNCTIONS: &[Entry] = &[
    ("sort", 0, Native::Fn(sort)),
    ("_sort_by_impl", 1, Native::Fn(sort_by)),
    ("_group_by_impl", 1, Native::Fn(group_by)),
    ("_min_by_impl", 1, Native::Fn(min_by)),
    ("_max_by_impl", 1, Native::Fn(max_by)),
    ("flatten", 1, Native::Fn(flatten)),
    ("bsearch", 1, Native::Fn(bsearch)),
];

fn array<'v>(value: &'v Value, what: &str) -> Result<&'v [Value], EvalError> {
    value.as_array().ok_or_else(|| type_error(value, what))
}

/// Items paired with their keys, stably sorted by key.
fn keyed<'v>(
    input: &'v Value,
    keys: &'v Value,
    what: &str,
) -> Result<Vec<(&'v Value, &'v Value)>, EvalError> {
    let items = array(input, what)?;
    let keys = array(keys, "is not a key array")?;
    if items.len() != keys.len() {
        return Err(argument_error("sort keys do not match the input length"));
    }
    let mut pairs: Vec<_> = keys.iter().zip(items).collect();
    pairs.sort_by(|a, b| compare(a.0, b.0));
    Ok(pairs)
}

fn sort(input: Value, _: &[Value]) -> EvalResult {
    let mut items = array(&input, "cannot be sorted, as it is not an array")?.to_vec();
    items.sort_by(compare);
    Ok(Value::array(items))
}

fn sort_by(input: Value, args: &[Value]) -> EvalResult {
    let pairs = keyed(&input, &args[0], "cannot be sorted, as it is not an array")?;
    Ok(pairs.into_iter().map(|(_, item)| item.clone()).collect())
}

fn group_by(input: Value, args: &[Value]) -> EvalResult {
    let pairs = keyed(&input, &args[0], "cannot be grouped, as it is not an array")?;
    let mut groups: Vec<Value> = Vec::new();
    let mut current: Vec<Value> = Vec::new();
    let mut current_key: Option<&Value> = None;
    for (key, item) in pairs {
        if current_key.is_some_and(|k| compare(k, key) != Ordering::Equal) {
            groups.push(Value::array(std::mem::take(&mut current)));
        }
        current_key = Some(key);
        current.push(item.clone());
    }
    if !current.is_empty() {
        groups.push(Value::array(current));
    }
    Ok(Value::array(groups))
}

/// First of the minimal elements; `null` for an empty array.
fn min_by(input: Value, args: &[Value]) -> EvalResult {
    let items = array(&input, "cannot be searched, as it is not an array")?;
    let keys = array(&args[0], "is not a key array")?;
    let best = keys
        .iter()
        .zip(items)
        .reduce(|best, next| if compare(next.0, best.0).is_lt() { next } else { best });
    Ok(best.map_or(Value::Null, |(_, item)| item.clone()))
}

/// Last of the maximal elements; `null` for an empty array.
fn max_by(input: Value, args: &[Value]) -> EvalResult {
    let items = array(&input, "cannot be searched, as it is not an array")?;
    let keys = array(&args[0], "is not a key array")?;
    let best = keys
        .iter()
        .zip(items)
        .reduce(|best, next| if compare(next.0, best.0).is_ge() { next } else { best });
    Ok(best.map_or(Value::Null, |(_, item)| item.clone()))
}

fn flatten(input: Value, args: &[Value]) -> EvalResult {
    let items = array(&input, "cannot be flattened")?;
    let depth = args[0]
        .as_f64()
        .ok_or_else(|| type_error(&args[0], "is not a valid flatten depth"))?;
    if depth < 0.0 {
        return Err(argument_error("flatten depth must not be negative"));
    }
    let mut out = Vec::with_capacity(items.len());
    flatten_into(items, depth, &mut out);
    Ok(Value::array(out))
}

fn flatten_into(items: &[Value], depth: f64, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) if depth > 0.0 => {
                jet_stack::ensure_sufficient_stack(|| flatten_into(inner, depth - 1.0, out));
            }
            other => out.push(other.clone()),
        }
    }
}

/// Index of `target` in a sorted array, or `-1 - insertion point`.
fn bsearch(input: Value, args: &[Value]) -> EvalResult {
    let items = array(&input, "cannot be searched from")?;
    let found = match items.binary_search_by(|probe| compare(probe, &args[0])) {
        Ok(i) => i as f64,
        Err(insert_at) => -1.0 - insert_at as f64,
    };
    Ok(Value::Number(found))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use jet_value::codec::from_json;
    use jet_value::EvalErrorKind;
    use pretty_assertions::assert_eq;

    fn json(text: &str) -> Value {
        from_json(text).unwrap_or(Value::Absent)
    }

    #[test]
    fn sort_uses_the_total_order() {
        assert_eq!(
            sort(json(r#"[{"a":1},"b",[2],3,true,false,null]"#), &[]),
            Ok(json(r#"[null,false,true,3,"b",[2],{"a":1}]"#))
        );
        assert!(sort(json("{}"), &[]).is_err());
    }

    #[test]
    fn sort_by_is_stable() {
        let input = json(r#"[{"k":2,"i":0},{"k":1,"i":1},{"k":2,"i":2}]"#);
        let keys = json("[[2],[1],[2]]");
        assert_eq!(
            sort_by(input, &[keys]),
            Ok(json(r#"[{"k":1,"i":1},{"k":2,"i":0},{"k":2,"i":2}]"#))
        );
    }

    #[test]
    fn group_by_collects_equal_keys() {
        let input = json("[1,2,3,4,5]");
        let keys = json("[[1],[0],[1],[0],[1]]");
        assert_eq!(group_by(input, &[keys]), Ok(json("[[2,4],[1,3,5]]")));
        assert_eq!(group_by(json("[]"), &[json("[]")]), Ok(json("[]")));
    }

    #[test]
    fn min_first_max_last() {
        let input = json(r#"["a","b","c"]"#);
        let keys = json("[[1],[0],[0]]");
        assert_eq!(min_by(input.clone(), &[keys.clone()]), Ok(json(r#""b""#)));
        let keys = json("[[1],[0],[1]]");
        assert_eq!(max_by(input, &[keys]), Ok(json(r#""c""#)));
        assert_eq!(min_by(json("[]"), &[json("[]")]), Ok(Value::Null));
    }

    #[test]
    fn flatten_depths() {
        let input = json("[1,[2,[3,[4]]]]");
        assert_eq!(flatten(input.clone(), &[json("1")]), Ok(json("[1,2,[3,[4]]]")));
        assert_eq!(flatten(input.clone(), &[json("1e9")]), Ok(json("[1,2,3,4]")));
        assert_eq!(flatten(input.clone(), &[json("0")]), Ok(input.clone()));
        assert_eq!(
            flatten(input, &[json("-1")]).unwrap_err().kind,
            EvalErrorKind::ArgumentError
        );
    }

    #[test]
    fn bsearch_reports_insertion_points() {
        let input = json("[1,3,5]");
        assert_eq!(bsearch(input.clone(), &[json("3")]), Ok(json("1")));
        assert_eq!(bsearch(input.clone(), &[json("0")]), Ok(json("-1")));
        assert_eq!(bsearch(input, &[json("4")]), Ok(json("-3")));
    }
}
