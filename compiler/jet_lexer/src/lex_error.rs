//! Lexer errors.

use jet_ir::Span;

/// A lexer error located in the source.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What went wrong while lexing.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated string interpolation")]
    UnterminatedInterpolation,
    #[error("invalid escape `\\{0}` in string literal")]
    InvalidEscape(char),
    #[error("invalid unicode escape `\\u{0}`")]
    InvalidUnicodeEscape(String),
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("malformed number `{0}`")]
    MalformedNumber(String),
    #[error("source too large")]
    SourceTooLarge,
}

impl LexError {
    pub(crate) fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }
}
