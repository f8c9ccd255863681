//! Native kernels: the functions the prelude cannot express in jet itself.
//!
//! Most natives are plain functions of the input and their argument values
//! ([`Native::Fn`]); the interpreter feeds them every combination of
//! argument outputs, first argument slowest. The few that need their
//! arguments as generators, or must take part in path mode, are
//! [`Native::Gen`].
//!
//! Names starting with `_` are helpers for the prelude and are left out of
//! `builtins`.

mod basic;
mod collections;
mod format;
mod generators;
mod math;
mod patterns;
mod strings;

pub(crate) use format::apply_format;

use crate::env::Env;
use crate::generator::{Gen, Item};
use crate::Interpreter;
use jet_ir::{ExprArena, ExprId, Name, StringInterner};
use jet_value::{EvalResult, Value};
use rustc_hash::FxHashMap;

/// A kernel over the input and one combination of argument values.
pub(crate) type NativeFn = fn(Value, &[Value]) -> EvalResult;

/// A kernel that drives its own argument generators.
pub(crate) type NativeGen = for<'a> fn(&'a Interpreter, NativeCall<'a>) -> Gen<'a>;

#[derive(Copy, Clone)]
pub(crate) enum Native {
    Fn(NativeFn),
    Gen(NativeGen),
}

/// Everything a [`NativeGen`] gets to work with.
pub(crate) struct NativeCall<'a> {
    pub(crate) arena: &'a ExprArena,
    pub(crate) env: Env<'a>,
    pub(crate) args: &'a [ExprId],
    pub(crate) input: Item,
}

type Entry = (&'static str, usize, Native);

/// Natives by name and arity.
pub(crate) struct Natives {
    table: FxHashMap<(Name, usize), Native>,
    signatures: Vec<(&'static str, usize)>,
}

impl Natives {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        let groups: [&[Entry]; 7] = [
            basic::FUNCTIONS,
            math::FUNCTIONS,
            strings::FUNCTIONS,
            patterns::FUNCTIONS,
            format::FUNCTIONS,
            collections::FUNCTIONS,
            generators::FUNCTIONS,
        ];
        let mut table = FxHashMap::default();
        let mut signatures = Vec::new();
        for &(name, arity, native) in groups.into_iter().flatten() {
            table.insert((interner.intern(name), arity), native);
            signatures.push((name, arity));
        }
        tracing::trace!(count = table.len(), "registered natives");
        Natives { table, signatures }
    }

    #[inline]
    pub(crate) fn get(&self, name: Name, arity: usize) -> Option<Native> {
        self.table.get(&(name, arity)).copied()
    }

    pub(crate) fn signatures(&self) -> &[(&'static str, usize)] {
        &self.signatures
    }
}
