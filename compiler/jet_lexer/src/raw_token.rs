//! Raw token definitions driven by logos.

use logos::{Lexer, Logos};

/// Raw token from logos, before conversion to [`TokenKind`](crate::TokenKind).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    #[regex(r"#[^\n]*")]
    LineComment,

    // Keywords
    #[token("def")]
    Def,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("end")]
    End,
    #[token("as")]
    As,
    #[token("reduce")]
    Reduce,
    #[token("foreach")]
    Foreach,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("label")]
    Label,
    #[token("import")]
    Import,
    #[token("include")]
    Include,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("$__loc__")]
    Loc,

    // Punctuation
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,

    // Assignment
    #[token("=")]
    Eq,
    #[token("|=")]
    PipeEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("//=")]
    AltEq,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("//")]
    Alt,

    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Whole string literal including interpolations; cooked separately.
    #[token("\"", scan_string)]
    Str,

    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*")]
    Field,

    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    #[regex(r"@[A-Za-z0-9_]+")]
    Format,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// Consume the rest of a string literal whose opening quote was just matched.
///
/// Interpolations `\( ... )` may contain nested parentheses and strings.
fn scan_string(lex: &mut Lexer<RawToken>) -> bool {
    match string_body_len(lex.remainder().as_bytes()) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// Length of a string body up to and including the closing quote.
pub(crate) fn string_body_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i + 1),
            b'\\' if bytes.get(i + 1) == Some(&b'(') => {
                i = interpolation_end(bytes, i + 2)?;
            }
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    None
}

/// Index just past the `)` closing an interpolation whose body starts at `start`.
pub(crate) fn interpolation_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' => i += 1 + string_body_len(&bytes[i + 1..])?,
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    None
}
