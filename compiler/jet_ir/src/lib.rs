//! Intermediate representation for jet filters.
//!
//! - [`Span`]: byte ranges into the filter source
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`ExprArena`] / [`ExprId`] / [`ExprKind`]: the flat syntax tree the
//!   parser produces and the evaluator walks
//! - [`BinaryOp`], [`UpdateOp`], [`Format`]: operator vocabularies

pub mod ast;
mod expr_id;
mod interner;
mod name;
mod ops;
mod span;

pub use ast::{
    Expr, ExprArena, ExprKind, FuncDef, Literal, ObjectEntry, ObjectPatternEntry, Param,
    Pattern, PatternKey, StringPart,
};
pub use expr_id::ExprId;
pub use interner::{InternOverflow, StringInterner};
pub use name::Name;
pub use ops::{BinaryOp, Format, UpdateOp};
pub use span::Span;
