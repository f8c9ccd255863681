//! Parser for jet filters.
//!
//! Precedence climbing over the tokens from `jet_lexer`, producing nodes in
//! a flat [`ExprArena`]. Surface sugar is removed here so the evaluator only
//! sees the core forms listed in [`jet_ir::ExprKind`].
//!
//! Binding strength, loosest first:
//!
//! | level | operators | assoc |
//! |---|---|---|
//! | pipe | `\|` | right |
//! | comma | `,` | left |
//! | alternative | `//` | right |
//! | update | `= \|= += -= *= /= %= //=` | none |
//! | or | `or` | left |
//! | and | `and` | left |
//! | compare | `== != < <= > >=` | none |
//! | sum | `+ -` | left |
//! | product | `* / %` | left |
//!
//! Unary minus and `try` bind tighter, postfix suffixes tighter still.
//! `def`, `label` and `term as $x | body` extend as far right as possible.

mod cursor;
mod error;
mod grammar;

pub use error::{ErrorContext, ParseError, ParseErrorKind};

use cursor::Cursor;
use jet_ir::{ExprArena, ExprId, ExprKind, Name, Span, StringInterner};
use jet_lexer::{Token, TokenKind, TokenList};

/// A parsed program that owns its arena.
#[derive(Clone, Debug)]
pub struct Parsed {
    pub arena: ExprArena,
    pub root: ExprId,
}

/// Parse a complete filter into a fresh arena.
pub fn parse(source: &str, interner: &StringInterner) -> Result<Parsed, ParseError> {
    let mut arena = ExprArena::new();
    let root = parse_into(source, interner, &mut arena)?;
    Ok(Parsed { arena, root })
}

/// Parse a complete filter, appending its nodes to `arena`.
///
/// An empty filter (or one consisting only of definitions) parses as `.`.
pub fn parse_into(
    source: &str,
    interner: &StringInterner,
    arena: &mut ExprArena,
) -> Result<ExprId, ParseError> {
    let tokens = jet_lexer::lex(source)?;
    let token_count = tokens.len();
    let first_node = arena.len();
    let mut parser = Parser::new(source, tokens, interner, arena);
    let root = parser.parse_program()?;
    tracing::debug!(
        tokens = token_count,
        nodes = parser.arena.len() - first_node,
        "parsed filter"
    );
    Ok(root)
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor,
    /// Full filter text; token spans index into it.
    source: &'a str,
    interner: &'a StringInterner,
    arena: &'a mut ExprArena,
}

impl<'a> Parser<'a> {
    fn new(
        source: &'a str,
        tokens: TokenList,
        interner: &'a StringInterner,
        arena: &'a mut ExprArena,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            source,
            interner,
            arena,
        }
    }

    /// Parse the whole token stream as one filter.
    fn parse_program(&mut self) -> Result<ExprId, ParseError> {
        if self.cursor.is_at_end() {
            let span = self.cursor.current_span();
            return Ok(self.alloc(ExprKind::Identity, span));
        }
        let root = self.parse_pipe()?;
        self.expect(TokenKind::Eof, "end of input")?;
        Ok(root)
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    /// Consume a `kind` token or fail with "expected {expected}".
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    #[cold]
    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.cursor.current();
        ParseError::unexpected(token.kind, expected, token.span)
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start, self.cursor.previous_end().max(start.start))
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(kind, span)
    }

    /// Source text of a token.
    fn text(&self, span: Span) -> &'a str {
        self.source.get(span.to_range()).unwrap_or("")
    }

    fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// Run `f`, tagging any error it returns with `context`.
    fn in_error_context<T>(
        &mut self,
        context: ErrorContext,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        f(self).map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests;
