//! Array and object constructors, string literals.

use crate::{ErrorContext, ParseError, ParseErrorKind, Parser};
use jet_ir::{ExprId, ExprKind, Format, Literal, ObjectEntry, Span, StringPart};
use jet_lexer::{cook_string, lex_at, CookedPart, TokenKind};

impl Parser<'_> {
    /// `[]` or `[e]`.
    pub(crate) fn parse_array(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::ArrayConstruction, |p| {
            let inner = if p.check(TokenKind::RBracket) {
                None
            } else {
                Some(p.parse_pipe()?)
            };
            p.expect(TokenKind::RBracket, "`]`")?;
            let span = p.span_from(start);
            Ok(p.alloc(ExprKind::Array(inner), span))
        })
    }

    /// `{entry, ...}`.
    pub(crate) fn parse_object(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::ObjectConstruction, |p| {
            let mut entries = Vec::new();
            if !p.eat(TokenKind::RBrace) {
                loop {
                    entries.push(p.parse_object_entry()?);
                    if !p.eat(TokenKind::Comma) {
                        break;
                    }
                }
                p.expect(TokenKind::RBrace, "`,` or `}`")?;
            }
            let span = p.span_from(start);
            Ok(p.alloc(ExprKind::Object(entries), span))
        })
    }

    /// One object entry, with shorthands expanded:
    ///
    /// - `name` → `"name": .name`
    /// - `$name` → `"name": $name`
    /// - `$__loc__` → `"__loc__": $__loc__`
    /// - `"str"` → `"str": .["str"]`
    fn parse_object_entry(&mut self) -> Result<ObjectEntry, ParseError> {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::Variable => {
                self.advance();
                let text = &self.text(token.span)[1..];
                let var = self.alloc(ExprKind::Var(self.intern(text)), token.span);
                if self.eat(TokenKind::Colon) {
                    let value = self.parse_object_value()?;
                    return Ok(ObjectEntry { key: var, value });
                }
                let key = self.string_literal(text, token.span);
                Ok(ObjectEntry { key, value: var })
            }
            TokenKind::Loc => {
                self.advance();
                let line = token.span.line_in(self.source);
                let key = self.string_literal("__loc__", token.span);
                let value = self.alloc(ExprKind::Loc { line }, token.span);
                Ok(ObjectEntry { key, value })
            }
            TokenKind::Ident => {
                self.advance();
                self.named_entry(token.span)
            }
            kind if kind.is_keyword() => {
                self.advance();
                self.named_entry(token.span)
            }
            TokenKind::Str | TokenKind::Format => {
                let key = if token.kind == TokenKind::Format {
                    self.parse_format_key()?
                } else {
                    self.parse_string(None)?
                };
                if self.eat(TokenKind::Colon) {
                    let value = self.parse_object_value()?;
                    return Ok(ObjectEntry { key, value });
                }
                let identity = self.alloc(ExprKind::Identity, token.span);
                let span = self.span_from(token.span);
                let value = self.alloc(
                    ExprKind::Index {
                        target: identity,
                        index: key,
                    },
                    span,
                );
                Ok(ObjectEntry { key, value })
            }
            TokenKind::LParen => {
                self.advance();
                let key = self.parse_pipe()?;
                self.expect(TokenKind::RParen, "`)`")?;
                self.expect(TokenKind::Colon, "`:` after computed key")?;
                let value = self.parse_object_value()?;
                Ok(ObjectEntry { key, value })
            }
            _ => Err(self.unexpected("object key")),
        }
    }

    /// `ident` or `keyword` key, with or without `: value`.
    fn named_entry(&mut self, span: Span) -> Result<ObjectEntry, ParseError> {
        let text = self.text(span);
        let key = self.string_literal(text, span);
        if self.eat(TokenKind::Colon) {
            let value = self.parse_object_value()?;
            return Ok(ObjectEntry { key, value });
        }
        let identity = self.alloc(ExprKind::Identity, span);
        let value = self.alloc(
            ExprKind::Field {
                target: identity,
                name: text.to_owned(),
            },
            span,
        );
        Ok(ObjectEntry { key, value })
    }

    /// Object values: no top-level `,`, but `|` chains are allowed.
    fn parse_object_value(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let value = self.parse_alternative()?;
        if !self.eat(TokenKind::Pipe) {
            return Ok(value);
        }
        let rest = self.parse_object_value()?;
        let span = self.span_from(start);
        Ok(self.alloc(ExprKind::Pipe(value, rest), span))
    }

    /// `@fmt "..."` used as an object key.
    fn parse_format_key(&mut self) -> Result<ExprId, ParseError> {
        let token = self.advance();
        let name = &self.text(token.span)[1..];
        let format = Format::from_name(name).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownFormat(name.to_owned()), token.span)
        })?;
        if !self.check(TokenKind::Str) {
            return Err(self.unexpected("string after format in object key"));
        }
        self.parse_string(Some(format))
    }

    fn string_literal(&mut self, text: &str, span: Span) -> ExprId {
        self.alloc(ExprKind::Literal(Literal::String(text.to_owned())), span)
    }

    /// String literal at the current token, optionally under `@format`.
    ///
    /// Each `\(...)` segment is lexed and parsed on its own, straight into
    /// the shared arena.
    pub(crate) fn parse_string(&mut self, format: Option<Format>) -> Result<ExprId, ParseError> {
        let token = self.expect(TokenKind::Str, "string")?;
        let cooked = cook_string(self.text(token.span), token.span.start)?;

        if format.is_none() {
            if let [CookedPart::Literal(text)] = cooked.as_slice() {
                return Ok(self.string_literal(text, token.span));
            }
        }

        let mut parts = Vec::with_capacity(cooked.len());
        for part in cooked {
            parts.push(match part {
                CookedPart::Literal(text) => StringPart::Literal(text),
                CookedPart::Interp(span) => StringPart::Interp(self.parse_interpolation(span)?),
            });
        }
        Ok(self.alloc(ExprKind::Str { format, parts }, token.span))
    }

    fn parse_interpolation(&mut self, span: Span) -> Result<ExprId, ParseError> {
        let tokens = lex_at(self.text(span), span.start)?;
        let mut sub = Parser::new(self.source, tokens, self.interner, &mut *self.arena);
        sub.in_error_context(ErrorContext::StringInterpolation, |p| {
            let inner = p.parse_pipe()?;
            p.expect(TokenKind::Eof, "`)` closing the interpolation")?;
            Ok(inner)
        })
    }
}
