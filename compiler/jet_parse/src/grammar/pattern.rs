//! Destructuring patterns: `$x`, `[$a, $b]`, `{key: $v, $name, (e): $v}`.

use crate::{ErrorContext, ParseError, Parser};
use jet_ir::{ExprKind, Literal, ObjectPatternEntry, Pattern, PatternKey};
use jet_lexer::TokenKind;

impl Parser<'_> {
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.in_error_context(ErrorContext::Pattern, |p| {
            jet_stack::ensure_sufficient_stack(|| p.parse_pattern_inner())
        })
    }

    fn parse_pattern_inner(&mut self) -> Result<Pattern, ParseError> {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::Variable => {
                self.advance();
                Ok(Pattern::Var(self.intern(&self.text(token.span)[1..])))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                loop {
                    items.push(self.parse_pattern_inner()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket, "`,` or `]`")?;
                Ok(Pattern::Array(items))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut entries = Vec::new();
                loop {
                    entries.push(self.parse_object_pattern_entry()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace, "`,` or `}`")?;
                Ok(Pattern::Object(entries))
            }
            _ => Err(self.unexpected("`$name`, `[` or `{`")),
        }
    }

    fn parse_object_pattern_entry(&mut self) -> Result<ObjectPatternEntry, ParseError> {
        let token = self.cursor.current();
        let key = match token.kind {
            TokenKind::Variable => {
                self.advance();
                let name = self.intern(&self.text(token.span)[1..]);
                let pattern = if self.eat(TokenKind::Colon) {
                    Some(self.parse_pattern_inner()?)
                } else {
                    None
                };
                return Ok(ObjectPatternEntry {
                    key: PatternKey::Var(name),
                    pattern,
                });
            }
            TokenKind::Ident => {
                self.advance();
                let text = self.text(token.span).to_owned();
                self.alloc(ExprKind::Literal(Literal::String(text)), token.span)
            }
            kind if kind.is_keyword() => {
                self.advance();
                let text = self.text(token.span).to_owned();
                self.alloc(ExprKind::Literal(Literal::String(text)), token.span)
            }
            TokenKind::Str => self.parse_string(None)?,
            TokenKind::LParen => {
                self.advance();
                let key = self.parse_pipe()?;
                self.expect(TokenKind::RParen, "`)`")?;
                key
            }
            _ => return Err(self.unexpected("object pattern key")),
        };
        self.expect(TokenKind::Colon, "`:` after object pattern key")?;
        let pattern = self.parse_pattern_inner()?;
        Ok(ObjectPatternEntry {
            key: PatternKey::Expr(key),
            pattern: Some(pattern),
        })
    }
}
