//! Primary expressions and postfix suffixes.

use crate::{ErrorContext, ParseError, ParseErrorKind, Parser};
use jet_ir::{ExprId, ExprKind, Format, Literal};
use jet_lexer::TokenKind;

impl Parser<'_> {
    /// A term with its suffixes, then an optional `as $pattern | body`.
    pub(crate) fn parse_term(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let term = self.parse_postfix_term()?;
        if !self.eat(TokenKind::As) {
            return Ok(term);
        }
        let pattern = self.parse_pattern()?;
        self.expect(TokenKind::Pipe, "`|` after destructuring pattern")?;
        let body = self.parse_pipe()?;
        let span = self.span_from(start);
        Ok(self.alloc(
            ExprKind::Bind {
                source: term,
                pattern,
                body,
            },
            span,
        ))
    }

    /// A primary followed by `.foo`, `[...]` and `?` suffixes.
    pub(crate) fn parse_postfix_term(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let mut target = self.parse_primary()?;
        loop {
            target = match self.current_kind() {
                TokenKind::Field => {
                    let token = self.advance();
                    let name = self.text(token.span)[1..].to_owned();
                    let span = self.span_from(start);
                    self.alloc(ExprKind::Field { target, name }, span)
                }
                TokenKind::Dot if self.cursor.peek_kind() == TokenKind::Str => {
                    self.advance();
                    self.parse_string_suffix(target, start)?
                }
                TokenKind::Dot if self.cursor.peek_kind() == TokenKind::LBracket => {
                    self.advance();
                    continue;
                }
                TokenKind::LBracket => self.in_error_context(ErrorContext::IndexExpression, |p| {
                    p.parse_bracket_suffix(target, start)
                })?,
                TokenKind::Question => {
                    self.advance();
                    let span = self.span_from(start);
                    self.alloc(ExprKind::Optional(target), span)
                }
                _ => return Ok(target),
            };
        }
    }

    /// `."name"` after the dot: a field for a plain string, an index otherwise.
    fn parse_string_suffix(
        &mut self,
        target: ExprId,
        start: jet_ir::Span,
    ) -> Result<ExprId, ParseError> {
        let key = self.parse_string(None)?;
        let span = self.span_from(start);
        if let ExprKind::Literal(Literal::String(name)) = self.arena.kind(key) {
            let name = name.clone();
            return Ok(self.alloc(ExprKind::Field { target, name }, span));
        }
        Ok(self.alloc(ExprKind::Index { target, index: key }, span))
    }

    /// `[]`, `[e]`, `[e:]`, `[:e]` or `[e:e]`.
    fn parse_bracket_suffix(
        &mut self,
        target: ExprId,
        start: jet_ir::Span,
    ) -> Result<ExprId, ParseError> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let kind = if self.eat(TokenKind::RBracket) {
            ExprKind::Iterate { target }
        } else if self.eat(TokenKind::Colon) {
            let to = self.parse_pipe()?;
            self.expect(TokenKind::RBracket, "`]`")?;
            ExprKind::Slice {
                target,
                from: None,
                to: Some(to),
            }
        } else {
            let index = self.parse_pipe()?;
            if self.eat(TokenKind::Colon) {
                let to = if self.check(TokenKind::RBracket) {
                    None
                } else {
                    Some(self.parse_pipe()?)
                };
                self.expect(TokenKind::RBracket, "`]`")?;
                ExprKind::Slice {
                    target,
                    from: Some(index),
                    to,
                }
            } else {
                self.expect(TokenKind::RBracket, "`]` or `:`")?;
                ExprKind::Index { target, index }
            }
        };
        let span = self.span_from(start);
        Ok(self.alloc(kind, span))
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        let start = token.span;
        match token.kind {
            TokenKind::Dot => {
                self.advance();
                if self.check(TokenKind::Str) {
                    let identity = self.alloc(ExprKind::Identity, start);
                    return self.parse_string_suffix(identity, start);
                }
                Ok(self.alloc(ExprKind::Identity, start))
            }
            TokenKind::DotDot => {
                self.advance();
                let name = self.intern("recurse");
                Ok(self.alloc(ExprKind::Call { name, args: Vec::new() }, start))
            }
            TokenKind::Field => {
                self.advance();
                let identity = self.alloc(ExprKind::Identity, start);
                let name = self.text(start)[1..].to_owned();
                Ok(self.alloc(
                    ExprKind::Field {
                        target: identity,
                        name,
                    },
                    start,
                ))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(self.alloc(ExprKind::Literal(Literal::Number(n)), start))
            }
            TokenKind::Str => self.parse_string(None),
            TokenKind::Format => self.parse_format(),
            TokenKind::Variable => {
                self.advance();
                let name = self.intern(&self.text(start)[1..]);
                Ok(self.alloc(ExprKind::Var(name), start))
            }
            TokenKind::Loc => {
                self.advance();
                let line = start.line_in(self.source);
                Ok(self.alloc(ExprKind::Loc { line }, start))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_pipe()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Ident => self.parse_call_or_break(),
            TokenKind::If => self.parse_if(),
            TokenKind::Reduce => self.parse_reduce(),
            TokenKind::Foreach => self.parse_foreach(),
            TokenKind::Label => self.parse_label(),
            TokenKind::Def => self.parse_defs(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Import | TokenKind::Include => Err(ParseError::new(
                ParseErrorKind::Unsupported("modules"),
                start,
            )),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `@name` alone or as a prefix of a string literal.
    fn parse_format(&mut self) -> Result<ExprId, ParseError> {
        let token = self.advance();
        let name = &self.text(token.span)[1..];
        let format = Format::from_name(name).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownFormat(name.to_owned()), token.span)
        })?;
        if self.check(TokenKind::Str) {
            return self.parse_string(Some(format));
        }
        Ok(self.alloc(ExprKind::Format(format), token.span))
    }

    /// `name`, `name(a; b)` or `break $label`.
    fn parse_call_or_break(&mut self) -> Result<ExprId, ParseError> {
        let token = self.advance();
        let text = self.text(token.span);

        if text == "break" && self.check(TokenKind::Variable) {
            let label = self.advance();
            let name = self.intern(&self.text(label.span)[1..]);
            let span = self.span_from(token.span);
            return Ok(self.alloc(ExprKind::Break(name), span));
        }

        if !self.check(TokenKind::LParen) {
            let literal = match text {
                "true" => Some(Literal::Bool(true)),
                "false" => Some(Literal::Bool(false)),
                "null" => Some(Literal::Null),
                _ => None,
            };
            if let Some(literal) = literal {
                return Ok(self.alloc(ExprKind::Literal(literal), token.span));
            }
        }

        let name = self.intern(text);
        let mut args = Vec::new();
        if self.eat(TokenKind::LParen) {
            self.in_error_context(ErrorContext::FunctionCall, |p| {
                loop {
                    args.push(p.parse_pipe()?);
                    if !p.eat(TokenKind::Semicolon) {
                        break;
                    }
                }
                p.expect(TokenKind::RParen, "`;` or `)`")?;
                Ok(())
            })?;
        }
        let span = self.span_from(token.span);
        Ok(self.alloc(ExprKind::Call { name, args }, span))
    }
}
