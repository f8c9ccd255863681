//! Filter syntax tree stored in a flat arena.
//!
//! Every node lives in an [`ExprArena`] and refers to its children through
//! [`ExprId`]s. Surface sugar is removed by the parser: `elif` becomes a
//! nested `If`, `..` a call to `recurse`, `.foo?` an `Optional` around the
//! access, object shorthands explicit key/value pairs.

use crate::{BinaryOp, ExprId, Format, Name, Span, UpdateOp};
use std::ops::Index;

/// Constant appearing in the source.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// Segment of a string literal.
#[derive(Clone, Debug, PartialEq)]
pub enum StringPart {
    Literal(String),
    /// `\(expr)`
    Interp(ExprId),
}

/// `key: value` pair of an object constructor, both sides generators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: ExprId,
    pub value: ExprId,
}

/// Destructuring pattern for `as`, `reduce` and `foreach`.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// `$name`
    Var(Name),
    /// `[$a, $b, ...]`
    Array(Vec<Pattern>),
    /// `{key: $a, $b, ...}`
    Object(Vec<ObjectPatternEntry>),
}

impl Pattern {
    /// Variables bound by this pattern, in source order.
    pub fn bound_names(&self, out: &mut Vec<Name>) {
        match self {
            Pattern::Var(name) => out.push(*name),
            Pattern::Array(items) => items.iter().for_each(|p| p.bound_names(out)),
            Pattern::Object(entries) => {
                for entry in entries {
                    if let PatternKey::Var(name) = entry.key {
                        out.push(name);
                    }
                    if let Some(p) = &entry.pattern {
                        p.bound_names(out);
                    }
                }
            }
        }
    }
}

/// Key of an object pattern entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatternKey {
    /// `$name` binds the field `name` to `$name`.
    Var(Name),
    /// Any expression producing string keys.
    Expr(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectPatternEntry {
    pub key: PatternKey,
    /// Pattern for the field value; `None` only for a bare `$name`.
    pub pattern: Option<Pattern>,
}

/// Formal parameter of a `def`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// `f`: re-evaluated closure over the caller's environment.
    Filter(Name),
    /// `$x`: bound to each output of the argument in turn.
    Value(Name),
}

impl Param {
    pub fn name(self) -> Name {
        match self {
            Param::Filter(name) | Param::Value(name) => name,
        }
    }
}

/// `def name(params): body;`
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub name: Name,
    pub params: Vec<Param>,
    pub body: ExprId,
    pub span: Span,
}

impl FuncDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `.`
    Identity,
    Literal(Literal),
    /// String literal, possibly interpolated and formatted (`@base64 "\(.)"`).
    Str {
        format: Option<Format>,
        parts: Vec<StringPart>,
    },
    /// Bare `@format`, applied to the input.
    Format(Format),
    /// `$__loc__`
    Loc { line: u32 },
    /// `target.name`
    Field { target: ExprId, name: String },
    /// `target[index]`
    Index { target: ExprId, index: ExprId },
    /// `target[from:to]`
    Slice {
        target: ExprId,
        from: Option<ExprId>,
        to: Option<ExprId>,
    },
    /// `target[]`
    Iterate { target: ExprId },
    /// Postfix `?`: `try inner` with no handler.
    Optional(ExprId),
    Pipe(ExprId, ExprId),
    Comma(ExprId, ExprId),
    /// Unary minus.
    Neg(ExprId),
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    And(ExprId, ExprId),
    Or(ExprId, ExprId),
    /// `left // right`
    Alternative(ExprId, ExprId),
    Update {
        op: UpdateOp,
        target: ExprId,
        value: ExprId,
    },
    /// `[inner]`, `[]` when `None`.
    Array(Option<ExprId>),
    Object(Vec<ObjectEntry>),
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    Try {
        body: ExprId,
        handler: Option<ExprId>,
    },
    Reduce {
        source: ExprId,
        pattern: Pattern,
        init: ExprId,
        update: ExprId,
    },
    Foreach {
        source: ExprId,
        pattern: Pattern,
        init: ExprId,
        update: ExprId,
        extract: Option<ExprId>,
    },
    /// `label $name | body`
    Label { name: Name, body: ExprId },
    /// `break $name`
    Break(Name),
    /// One or more consecutive `def`s followed by the expression they scope.
    FuncDefs { defs: Vec<FuncDef>, rest: ExprId },
    /// `name` or `name(a; b)`
    Call { name: Name, args: Vec<ExprId> },
    /// `$name`
    Var(Name),
    /// `source as pattern | body`
    Bind {
        source: ExprId,
        pattern: Pattern,
        body: ExprId,
    },
}

/// Arena node: kind plus source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Owner of every node of one parsed program.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    ///
    /// # Panics
    /// Panics past `u32::MAX - 1` nodes.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("expression arena overflow"));
        self.exprs.push(Expr { kind, span });
        ExprId::new(index)
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        self.get(id)
    }
}

#[cfg(test)]
mod tests;
