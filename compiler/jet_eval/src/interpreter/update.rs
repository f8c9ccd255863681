//! The assignment operators.
//!
//! Targets are evaluated in path mode against the original root. The
//! paths are applied one after another to a working copy that shares
//! every untouched subtree with the root.

use super::Interpreter;
use crate::env::Env;
use crate::generator::{deferred, fail, one, Gen, Item, Output};
use jet_ir::{BinaryOp, ExprArena, ExprId, UpdateOp};
use jet_value::path::{delpaths, getpath, setpath};
use jet_value::{ops, EvalError, Path, Value};

/// How a right-hand value combines with the current value at a path.
#[derive(Copy, Clone)]
enum Combine {
    /// `=`
    Replace,
    /// `+=` and friends
    Arith(BinaryOp),
    /// `//=`
    Default,
}

impl Combine {
    fn apply(self, current: Value, rhs: &Value) -> Result<Value, EvalError> {
        match self {
            Combine::Replace => Ok(rhs.clone()),
            Combine::Arith(op) => ops::binary(op, current, rhs.clone()),
            Combine::Default if current.is_truthy() => Ok(current),
            Combine::Default => Ok(rhs.clone()),
        }
    }
}

impl Interpreter {
    /// Evaluate `target <op> value` against `root`. Outputs are new roots.
    pub(super) fn eval_update<'a>(
        &'a self,
        arena: &'a ExprArena,
        op: UpdateOp,
        target: ExprId,
        value: ExprId,
        env: Env<'a>,
        root: Value,
    ) -> Gen<'a> {
        let combine = match op {
            UpdateOp::Modify => return self.eval_modify(arena, target, value, env, root),
            UpdateOp::Assign => Combine::Replace,
            UpdateOp::Arith(op) => Combine::Arith(op),
            UpdateOp::Alternative => Combine::Default,
        };
        let rights = self.eval_value(arena, value, env.clone(), root.clone());
        Box::new(rights.map(move |out| -> Output {
            let rhs = out?.value;
            let mut result = root.clone();
            let mut applied = 0usize;
            for path in self.eval(arena, target, env.clone(), Item::root(root.clone())) {
                let path = path?.path.unwrap_or_default();
                let current = getpath(&result, path.segments())?.materialize();
                let updated = combine.apply(current, &rhs)?;
                result = setpath(result, path.segments(), updated)?;
                applied += 1;
            }
            tracing::debug!(%op, paths = applied, "applied update");
            Ok(Item::value(result))
        }))
    }

    /// `target |= f`: the first output of `f` replaces the value at each
    /// path; paths where `f` produces nothing are deleted afterwards.
    fn eval_modify<'a>(
        &'a self,
        arena: &'a ExprArena,
        target: ExprId,
        f: ExprId,
        env: Env<'a>,
        root: Value,
    ) -> Gen<'a> {
        deferred(move || {
            let mut result = root.clone();
            let mut doomed: Vec<Path> = Vec::new();
            let mut applied = 0usize;
            for out in self.eval(arena, target, env.clone(), Item::root(root)) {
                let path = match out {
                    Ok(item) => item.path.unwrap_or_default(),
                    Err(action) => return fail(action),
                };
                let current = match getpath(&result, path.segments()) {
                    Ok(current) => current.materialize(),
                    Err(err) => return fail(err),
                };
                match self.eval_value(arena, f, env.clone(), current).next() {
                    Some(Ok(item)) => match setpath(result, path.segments(), item.value) {
                        Ok(updated) => result = updated,
                        Err(err) => return fail(err),
                    },
                    Some(Err(action)) => return fail(action),
                    None => doomed.push(path),
                }
                applied += 1;
            }
            tracing::debug!(paths = applied, deleted = doomed.len(), "applied |=");
            match delpaths(result, &doomed) {
                Ok(result) => one(Item::value(result)),
                Err(err) => fail(err),
            }
        })
    }
}
