//! Control forms: `if`, `try`, `reduce`, `foreach`, `label`, `def`.

use crate::{ErrorContext, ParseError, Parser};
use jet_ir::{ExprId, ExprKind, FuncDef, Param, Span};
use jet_lexer::TokenKind;

impl Parser<'_> {
    /// `if c then a (elif c then a)* (else b)? end`; `elif` nests.
    pub(crate) fn parse_if(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::IfExpression, |p| p.parse_if_rest(start))
    }

    fn parse_if_rest(&mut self, start: Span) -> Result<ExprId, ParseError> {
        let cond = self.parse_pipe()?;
        self.expect(TokenKind::Then, "`then`")?;
        let then_branch = self.parse_pipe()?;
        let else_branch = match self.current_kind() {
            TokenKind::Elif => {
                let elif = self.advance().span;
                Some(jet_stack::ensure_sufficient_stack(|| self.parse_if_rest(elif))?)
            }
            TokenKind::Else => {
                self.advance();
                let branch = self.parse_pipe()?;
                self.expect(TokenKind::End, "`end`")?;
                Some(branch)
            }
            TokenKind::End => {
                self.advance();
                None
            }
            _ => return Err(self.unexpected("`elif`, `else` or `end`")),
        };
        let span = self.span_from(start);
        Ok(self.alloc(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// `try body (catch handler)?`; both sides are postfix terms.
    pub(crate) fn parse_try(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::TryExpression, |p| {
            let body = p.parse_unary()?;
            let handler = if p.eat(TokenKind::Catch) {
                Some(p.parse_unary()?)
            } else {
                None
            };
            let span = p.span_from(start);
            Ok(p.alloc(ExprKind::Try { body, handler }, span))
        })
    }

    /// `reduce source as $p (init; update)`
    pub(crate) fn parse_reduce(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::Reduce, |p| {
            let source = p.parse_postfix_term()?;
            p.expect(TokenKind::As, "`as`")?;
            let pattern = p.parse_pattern()?;
            p.expect(TokenKind::LParen, "`(`")?;
            let init = p.parse_pipe()?;
            p.expect(TokenKind::Semicolon, "`;`")?;
            let update = p.parse_pipe()?;
            p.expect(TokenKind::RParen, "`)`")?;
            let span = p.span_from(start);
            Ok(p.alloc(
                ExprKind::Reduce {
                    source,
                    pattern,
                    init,
                    update,
                },
                span,
            ))
        })
    }

    /// `foreach source as $p (init; update; extract?)`
    pub(crate) fn parse_foreach(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::Foreach, |p| {
            let source = p.parse_postfix_term()?;
            p.expect(TokenKind::As, "`as`")?;
            let pattern = p.parse_pattern()?;
            p.expect(TokenKind::LParen, "`(`")?;
            let init = p.parse_pipe()?;
            p.expect(TokenKind::Semicolon, "`;`")?;
            let update = p.parse_pipe()?;
            let extract = if p.eat(TokenKind::Semicolon) {
                Some(p.parse_pipe()?)
            } else {
                None
            };
            p.expect(TokenKind::RParen, "`;` or `)`")?;
            let span = p.span_from(start);
            Ok(p.alloc(
                ExprKind::Foreach {
                    source,
                    pattern,
                    init,
                    update,
                    extract,
                },
                span,
            ))
        })
    }

    /// `label $name | body`
    pub(crate) fn parse_label(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span;
        self.in_error_context(ErrorContext::Label, |p| {
            let token = p.expect(TokenKind::Variable, "label name")?;
            let name = p.intern(&p.text(token.span)[1..]);
            p.expect(TokenKind::Pipe, "`|`")?;
            let body = p.parse_pipe()?;
            let span = p.span_from(start);
            Ok(p.alloc(ExprKind::Label { name, body }, span))
        })
    }

    /// Consecutive `def`s and the expression they scope over.
    ///
    /// With nothing after the last definition the scope is `.`, which is
    /// how a library of definitions parses.
    pub(crate) fn parse_defs(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let mut defs = Vec::new();
        while self.check(TokenKind::Def) {
            defs.push(self.in_error_context(ErrorContext::FunctionDef, Self::parse_def)?);
        }
        let rest = if self.cursor.is_at_end() || self.check(TokenKind::RParen) {
            let span = self.current_span();
            self.alloc(ExprKind::Identity, span)
        } else {
            self.parse_pipe()?
        };
        let span = self.span_from(start);
        Ok(self.alloc(ExprKind::FuncDefs { defs, rest }, span))
    }

    /// `def name(params): body;`
    fn parse_def(&mut self) -> Result<FuncDef, ParseError> {
        let start = self.advance().span;
        let token = self.expect(TokenKind::Ident, "function name")?;
        let name = self.intern(self.text(token.span));

        let mut params = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                let param = self.cursor.current();
                let param = match param.kind {
                    TokenKind::Ident => Param::Filter(self.intern(self.text(param.span))),
                    TokenKind::Variable => Param::Value(self.intern(&self.text(param.span)[1..])),
                    _ => return Err(self.unexpected("parameter name")),
                };
                self.advance();
                params.push(param);
                if !self.eat(TokenKind::Semicolon) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "`;` or `)`")?;
        }

        self.expect(TokenKind::Colon, "`:`")?;
        let body = self.parse_pipe()?;
        self.expect(TokenKind::Semicolon, "`;` after function body")?;
        tracing::trace!(name = self.text(token.span), arity = params.len(), "parsed def");
        Ok(FuncDef {
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }
}
