//! `@format` string conversions.

use super::{Entry, Native};
use jet_ir::Format;
use jet_value::codec::to_json;
use jet_value::errors::{argument_error, type_error, EvalError, EvalResult};
use jet_value::Value;
use std::fmt::Write;

pub(super) const FUNCTIONS: &[Entry] = &[("format", 1, Native::Fn(format))];

fn format(input: Value, args: &[Value]) -> EvalResult {
    let name = args[0]
        .as_str()
        .ok_or_else(|| type_error(&args[0], "is not a valid format"))?;
    let format = Format::from_name(name)
        .ok_or_else(|| argument_error(format!("{name} is not a valid format")))?;
    apply_format(format, &input)
}

/// Render `value` under `format`.
pub(crate) fn apply_format(format: Format, value: &Value) -> EvalResult {
    let text = match format {
        Format::Text => text(value),
        Format::Json => to_json(value),
        Format::Html => escape_html(&text(value)),
        Format::Uri => escape_uri(&text(value)),
        Format::Csv => row(value, "csv", ",", csv_field)?,
        Format::Tsv => row(value, "tsv", "\t", tsv_field)?,
        Format::Sh => match value {
            Value::Array(items) => items
                .iter()
                .map(sh_word)
                .collect::<Result<Vec<_>, _>>()?
                .join(" "),
            other => sh_word(other)?,
        },
        Format::Base64 => base64_encode(text(value).as_bytes()),
        Format::Base64d => {
            let source = text(value);
            let bytes = base64_decode(&source).ok_or_else(|| {
                argument_error(format!(
                    "{} is not valid base64 data",
                    Value::from(source.as_str()).describe()
                ))
            })?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };
    Ok(Value::string(text))
}

/// `tostring`.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        other => to_json(other),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_uri(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.~".contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

fn row(
    value: &Value,
    name: &str,
    sep: &str,
    field: fn(&Value) -> Result<String, EvalError>,
) -> Result<String, EvalError> {
    let items = value
        .as_array()
        .ok_or_else(|| type_error(value, &format!("cannot be {name}-formatted, only an array can be")))?;
    Ok(items
        .iter()
        .map(field)
        .collect::<Result<Vec<_>, _>>()?
        .join(sep))
}

fn csv_field(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::Null | Value::Absent => Ok(String::new()),
        Value::Bool(_) | Value::Number(_) => Ok(to_json(value)),
        Value::String(s) => Ok(format!("\"{}\"", s.replace('"', "\"\""))),
        _ => Err(type_error(value, "is not valid in a csv row")),
    }
}

fn tsv_field(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::Null | Value::Absent => Ok(String::new()),
        Value::Bool(_) | Value::Number(_) => Ok(to_json(value)),
        Value::String(s) => Ok(s
            .replace('\\', "\\\\")
            .replace('\t', "\\t")
            .replace('\n', "\\n")
            .replace('\r', "\\r")),
        _ => Err(type_error(value, "is not valid in a tsv row")),
    }
}

fn sh_word(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::String(s) => Ok(format!("'{}'", s.replace('\'', "'\\''"))),
        Value::Array(_) | Value::Object(_) => {
            Err(type_error(value, "can not be escaped for shell"))
        }
        other => Ok(to_json(other)),
    }
}

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let n = u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]);
        for i in 0..4 {
            if i <= chunk.len() {
                out.push(char::from(ALPHABET[(n >> (18 - 6 * i) & 0x3f) as usize]));
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Padding is optional; anything outside the alphabet is rejected.
fn base64_decode(text: &str) -> Option<Vec<u8>> {
    let digits = text.trim_end_matches('=').as_bytes();
    if digits.len() % 4 == 1 {
        return None;
    }
    let mut out = Vec::with_capacity(digits.len() * 3 / 4);
    for chunk in digits.chunks(4) {
        let mut n = 0u32;
        for (i, &c) in chunk.iter().enumerate() {
            let sextet = ALPHABET.iter().position(|&a| a == c)? as u32;
            n |= sextet << (18 - 6 * i);
        }
        let bytes = n.to_be_bytes();
        out.extend_from_slice(&bytes[1..chunk.len()]);
    }
    Some(out)
}
