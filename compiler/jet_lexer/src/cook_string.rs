//! String literal cooking: escapes and interpolation segments.

use crate::lex_error::{LexError, LexErrorKind};
use crate::raw_token::interpolation_end;
use jet_ir::Span;

/// Piece of a cooked string literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CookedPart {
    Literal(String),
    /// Source span of the expression between `\(` and `)`.
    Interp(Span),
}

/// Split a string token into literal text and interpolation spans.
///
/// `text` is the token slice including both quotes; `start` is its offset
/// in the full source so returned spans are absolute.
pub fn cook_string(text: &str, start: u32) -> Result<Vec<CookedPart>, LexError> {
    let bytes = text.as_bytes();
    let body_end = text.len().saturating_sub(1);
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut i = 1;

    let err_at = |from: usize, to: usize, kind: LexErrorKind| {
        LexError::new(Span::from_range(from..to).offset_by(start), kind)
    };

    while i < body_end {
        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        if ch != '\\' {
            buf.push(ch);
            i += ch.len_utf8();
            continue;
        }
        let Some(esc) = text[i + 1..].chars().next() else {
            return Err(err_at(i, i + 1, LexErrorKind::UnterminatedString));
        };
        match esc {
            '(' => {
                let end = interpolation_end(bytes, i + 2).ok_or_else(|| {
                    err_at(i, text.len(), LexErrorKind::UnterminatedInterpolation)
                })?;
                if !buf.is_empty() {
                    parts.push(CookedPart::Literal(std::mem::take(&mut buf)));
                }
                parts.push(CookedPart::Interp(
                    Span::from_range(i + 2..end - 1).offset_by(start),
                ));
                i = end;
            }
            'u' => {
                let (c, used) = decode_unicode_escape(&text[i..body_end])
                    .map_err(|kind| err_at(i, (i + 6).min(body_end), kind))?;
                buf.push(c);
                i += used;
            }
            _ => {
                let c = match esc {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => {
                        return Err(err_at(
                            i,
                            i + 1 + other.len_utf8(),
                            LexErrorKind::InvalidEscape(other),
                        ))
                    }
                };
                buf.push(c);
                i += 2;
            }
        }
    }

    if !buf.is_empty() || parts.is_empty() {
        parts.push(CookedPart::Literal(buf));
    }
    Ok(parts)
}

/// Decode `\uXXXX`, joining UTF-16 surrogate pairs. Returns the char and
/// the number of bytes consumed from `s` (which starts at the backslash).
fn decode_unicode_escape(s: &str) -> Result<(char, usize), LexErrorKind> {
    let unit = |s: &str| -> Result<u16, LexErrorKind> {
        let hex = s.get(2..6).unwrap_or(s);
        if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(LexErrorKind::InvalidUnicodeEscape(hex.to_owned()));
        }
        u16::from_str_radix(hex, 16).map_err(|_| LexErrorKind::InvalidUnicodeEscape(hex.to_owned()))
    };

    let first = unit(s)?;
    if (0xD800..0xDC00).contains(&first) {
        if let Some(rest) = s.get(6..) {
            if rest.starts_with("\\u") {
                if let Ok(second) = unit(rest) {
                    if (0xDC00..0xE000).contains(&second) {
                        let code = 0x10000
                            + ((u32::from(first) - 0xD800) << 10)
                            + (u32::from(second) - 0xDC00);
                        if let Some(c) = char::from_u32(code) {
                            return Ok((c, 12));
                        }
                    }
                }
            }
        }
        return Ok(('\u{FFFD}', 6));
    }
    Ok((char::from_u32(u32::from(first)).unwrap_or('\u{FFFD}'), 6))
}
