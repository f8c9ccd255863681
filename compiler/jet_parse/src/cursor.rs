//! Token cursor for navigating the token stream.

use jet_ir::Span;
use jet_lexer::{Token, TokenKind, TokenList};
use std::mem::discriminant;

/// Position in a [`TokenList`].
///
/// The list always ends with `Eof`, and reads past the end keep returning
/// it, so the parser never has to bounds-check.
pub struct Cursor {
    tokens: TokenList,
    pos: usize,
    previous_end: u32,
}

impl Cursor {
    pub fn new(tokens: TokenList) -> Self {
        let previous_end = tokens.get(0).span.start;
        Cursor {
            tokens,
            pos: 0,
            previous_end,
        }
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.tokens.get(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token after the current one.
    #[inline]
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens.get(self.pos + 1).kind
    }

    /// Byte offset just past the last consumed token.
    #[inline]
    pub fn previous_end(&self) -> u32 {
        self.previous_end
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Same token kind, ignoring payloads such as number values.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        discriminant(&self.current_kind()) == discriminant(&kind)
    }

    /// Consume and return the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
            self.previous_end = token.span.end;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}
