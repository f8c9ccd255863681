//! Parse error types.
//!
//! A [`ParseError`] pairs a [`ParseErrorKind`] with the source span it
//! refers to and, when known, the [`ErrorContext`] the parser was in, so
//! messages read "unexpected `)`, expected expression at 4..5 while parsing
//! an object construction".

use jet_ir::Span;
use jet_lexer::{LexError, LexErrorKind, TokenKind};
use std::fmt;

/// What was being parsed when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    Expression,
    IfExpression,
    TryExpression,
    Reduce,
    Foreach,
    Label,
    ArrayConstruction,
    ObjectConstruction,
    StringInterpolation,
    IndexExpression,
    FunctionCall,
    FunctionDef,
    Pattern,
}

impl ErrorContext {
    /// Phrase suitable for "while parsing {description}".
    pub fn description(self) -> &'static str {
        match self {
            Self::Expression => "an expression",
            Self::IfExpression => "an if expression",
            Self::TryExpression => "a try expression",
            Self::Reduce => "a reduce expression",
            Self::Foreach => "a foreach expression",
            Self::Label => "a label",
            Self::ArrayConstruction => "an array construction",
            Self::ObjectConstruction => "an object construction",
            Self::StringInterpolation => "a string interpolation",
            Self::IndexExpression => "an index expression",
            Self::FunctionCall => "a function call",
            Self::FunctionDef => "a function definition",
            Self::Pattern => "a destructuring pattern",
        }
    }
}

/// Structured parse error kinds.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Lex(LexErrorKind),

    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
    },

    #[error("unknown format `@{0}`")]
    UnknownFormat(String),

    #[error("operator {0} is non-associative; use parentheses")]
    NonAssociative(TokenKind),

    #[error("{0} are not supported")]
    Unsupported(&'static str),
}

/// A located parse error.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub context: Option<ErrorContext>,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError {
            kind,
            span,
            context: None,
        }
    }

    #[cold]
    pub(crate) fn unexpected(found: TokenKind, expected: &'static str, span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken { found, expected }, span)
    }

    /// Attach `context` unless an inner rule already did.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context.get_or_insert(context);
        self
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(ParseErrorKind::Lex(err.kind), err.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)?;
        if let Some(context) = self.context {
            write!(f, " while parsing {}", context.description())?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
