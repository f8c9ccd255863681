//! Grammar rules.
//!
//! - this module: binary operators by precedence climbing
//! - `term`: primaries and postfix suffixes
//! - `construct`: arrays, objects and string literals
//! - `control`: `if`, `try`, `reduce`, `foreach`, `label`, `def`
//! - `pattern`: destructuring patterns

mod construct;
mod control;
mod pattern;
mod term;

use crate::{ParseError, ParseErrorKind, Parser};
use jet_ir::{BinaryOp, ExprId, ExprKind, UpdateOp};
use jet_lexer::TokenKind;
use jet_stack::ensure_sufficient_stack;

/// Binding strength of infix operators; larger binds tighter.
mod prec {
    pub const PIPE: u8 = 1;
    pub const COMMA: u8 = 2;
    pub const ALTERNATIVE: u8 = 3;
    pub const UPDATE: u8 = 4;
    pub const OR: u8 = 5;
    pub const AND: u8 = 6;
    pub const COMPARE: u8 = 7;
    pub const SUM: u8 = 8;
    pub const PRODUCT: u8 = 9;
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
    None,
}

#[derive(Copy, Clone)]
enum Infix {
    Pipe,
    Comma,
    Alternative,
    Update(UpdateOp),
    Or,
    And,
    Binary(BinaryOp),
}

fn infix_of(kind: TokenKind) -> Option<(Infix, u8, Assoc)> {
    let update = |op| Some((Infix::Update(op), prec::UPDATE, Assoc::None));
    let compare = |op| Some((Infix::Binary(op), prec::COMPARE, Assoc::None));
    match kind {
        TokenKind::Pipe => Some((Infix::Pipe, prec::PIPE, Assoc::Right)),
        TokenKind::Comma => Some((Infix::Comma, prec::COMMA, Assoc::Left)),
        TokenKind::Alt => Some((Infix::Alternative, prec::ALTERNATIVE, Assoc::Right)),
        TokenKind::Eq => update(UpdateOp::Assign),
        TokenKind::PipeEq => update(UpdateOp::Modify),
        TokenKind::PlusEq => update(UpdateOp::Arith(BinaryOp::Add)),
        TokenKind::MinusEq => update(UpdateOp::Arith(BinaryOp::Sub)),
        TokenKind::StarEq => update(UpdateOp::Arith(BinaryOp::Mul)),
        TokenKind::SlashEq => update(UpdateOp::Arith(BinaryOp::Div)),
        TokenKind::PercentEq => update(UpdateOp::Arith(BinaryOp::Rem)),
        TokenKind::AltEq => update(UpdateOp::Alternative),
        TokenKind::Or => Some((Infix::Or, prec::OR, Assoc::Left)),
        TokenKind::And => Some((Infix::And, prec::AND, Assoc::Left)),
        TokenKind::EqEq => compare(BinaryOp::Eq),
        TokenKind::NotEq => compare(BinaryOp::NotEq),
        TokenKind::Lt => compare(BinaryOp::Lt),
        TokenKind::LtEq => compare(BinaryOp::LtEq),
        TokenKind::Gt => compare(BinaryOp::Gt),
        TokenKind::GtEq => compare(BinaryOp::GtEq),
        TokenKind::Plus => Some((Infix::Binary(BinaryOp::Add), prec::SUM, Assoc::Left)),
        TokenKind::Minus => Some((Infix::Binary(BinaryOp::Sub), prec::SUM, Assoc::Left)),
        TokenKind::Star => Some((Infix::Binary(BinaryOp::Mul), prec::PRODUCT, Assoc::Left)),
        TokenKind::Slash => Some((Infix::Binary(BinaryOp::Div), prec::PRODUCT, Assoc::Left)),
        TokenKind::Percent => Some((Infix::Binary(BinaryOp::Rem), prec::PRODUCT, Assoc::Left)),
        _ => None,
    }
}

impl Parser<'_> {
    /// Full expression, pipes included.
    pub(crate) fn parse_pipe(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary(prec::PIPE)
    }

    /// Expression without top-level `|` or `,`: object values.
    pub(crate) fn parse_alternative(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary(prec::ALTERNATIVE)
    }

    /// Operators binding at least as tightly as `min`.
    fn parse_binary(&mut self, min: u8) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary_inner(min))
    }

    fn parse_binary_inner(&mut self, min: u8) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let mut lhs = self.parse_unary()?;
        let mut chained: Option<u8> = None;

        while let Some((op, level, assoc)) = infix_of(self.current_kind()) {
            if level < min {
                break;
            }
            let op_token = self.advance();
            if assoc == Assoc::None && chained == Some(level) {
                return Err(ParseError::new(
                    ParseErrorKind::NonAssociative(op_token.kind),
                    op_token.span,
                ));
            }
            let next_min = if assoc == Assoc::Right { level } else { level + 1 };
            let rhs = self.parse_binary(next_min)?;
            let kind = match op {
                Infix::Pipe => ExprKind::Pipe(lhs, rhs),
                Infix::Comma => ExprKind::Comma(lhs, rhs),
                Infix::Alternative => ExprKind::Alternative(lhs, rhs),
                Infix::Update(op) => ExprKind::Update {
                    op,
                    target: lhs,
                    value: rhs,
                },
                Infix::Or => ExprKind::Or(lhs, rhs),
                Infix::And => ExprKind::And(lhs, rhs),
                Infix::Binary(op) => ExprKind::Binary {
                    op,
                    left: lhs,
                    right: rhs,
                },
            };
            let span = self.span_from(start);
            lhs = self.alloc(kind, span);
            chained = (assoc == Assoc::None).then_some(level);
        }
        Ok(lhs)
    }

    /// Unary minus, `try`, then a term.
    pub(crate) fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        match self.current_kind() {
            TokenKind::Minus => {
                let start = self.advance().span;
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                let span = self.span_from(start);
                if let ExprKind::Literal(jet_ir::Literal::Number(n)) = self.arena.kind(operand) {
                    let negated = -*n;
                    return Ok(self.alloc(ExprKind::Literal(jet_ir::Literal::Number(negated)), span));
                }
                Ok(self.alloc(ExprKind::Neg(operand), span))
            }
            TokenKind::Try => self.parse_try(),
            _ => self.parse_term(),
        }
    }
}
