//! Destructuring for `as`, `reduce` and `foreach`.
//!
//! A pattern can bind in several ways when an object key expression
//! produces several outputs, so destructuring yields a lazy stream of
//! environments.

use super::Interpreter;
use crate::env::Env;
use crate::generator::Item;
use jet_ir::{ExprArena, ObjectPatternEntry, Pattern, PatternKey};
use jet_value::access;
use jet_value::errors::type_mismatch;
use jet_value::{ControlAction, Value};

/// Environments produced by one destructuring.
pub(crate) type Bindings<'a> = Box<dyn Iterator<Item = Result<Env<'a>, ControlAction>> + 'a>;

fn bound<'a>(env: Env<'a>) -> Bindings<'a> {
    Box::new(std::iter::once(Ok(env)))
}

fn failed<'a>(action: impl Into<ControlAction>) -> Bindings<'a> {
    Box::new(std::iter::once(Err(action.into())))
}

impl Interpreter {
    /// Match `value` against `pattern`. Key expressions in object patterns
    /// run against `dot`, the input at the binding site, and see the
    /// variables bound by the entries before them.
    pub(crate) fn destructure<'a>(
        &'a self,
        arena: &'a ExprArena,
        pattern: &'a Pattern,
        value: Value,
        env: Env<'a>,
        dot: &Value,
    ) -> Bindings<'a> {
        match pattern {
            Pattern::Var(name) => bound(env.bind_var(*name, value)),
            Pattern::Array(elements) => {
                self.destructure_elements(arena, elements, 0, value, env, dot.clone())
            }
            Pattern::Object(entries) => {
                self.destructure_entries(arena, entries, value, env, dot.clone())
            }
        }
    }

    fn destructure_elements<'a>(
        &'a self,
        arena: &'a ExprArena,
        elements: &'a [Pattern],
        index: usize,
        value: Value,
        env: Env<'a>,
        dot: Value,
    ) -> Bindings<'a> {
        let Some((first, rest)) = elements.split_first() else {
            return bound(env);
        };
        let element = match access::index(&value, &Value::from(index)) {
            Ok(element) => element,
            Err(err) => return failed(err),
        };
        let heads = self.destructure(arena, first, element, env, &dot);
        Box::new(heads.flat_map(move |head| match head {
            Ok(env) => {
                self.destructure_elements(arena, rest, index + 1, value.clone(), env, dot.clone())
            }
            Err(action) => failed(action),
        }))
    }

    fn destructure_entries<'a>(
        &'a self,
        arena: &'a ExprArena,
        entries: &'a [ObjectPatternEntry],
        value: Value,
        env: Env<'a>,
        dot: Value,
    ) -> Bindings<'a> {
        let Some((entry, rest)) = entries.split_first() else {
            return bound(env);
        };
        let continue_with = move |env: Env<'a>, value: Value, dot: Value| -> Bindings<'a> {
            self.destructure_entries(arena, rest, value, env, dot)
        };
        match entry.key {
            PatternKey::Var(name) => {
                let key = Value::from(self.interner.lookup(name));
                let field = match access::index(&value, &key) {
                    Ok(field) => field,
                    Err(err) => return failed(err),
                };
                let env = env.bind_var(name, field.clone());
                match &entry.pattern {
                    None => continue_with(env, value, dot),
                    Some(pattern) => {
                        let inner = self.destructure(arena, pattern, field, env, &dot);
                        Box::new(inner.flat_map(move |bound| match bound {
                            Ok(env) => continue_with(env, value.clone(), dot.clone()),
                            Err(action) => failed(action),
                        }))
                    }
                }
            }
            PatternKey::Expr(key_expr) => {
                let Some(pattern) = &entry.pattern else {
                    return failed(type_mismatch("Object pattern key needs a pattern"));
                };
                let keys = self.eval(arena, key_expr, env.clone(), Item::value(dot.clone()));
                Box::new(keys.flat_map(move |key| -> Bindings<'a> {
                    let key = match key {
                        Ok(item) => item.value,
                        Err(action) => return failed(action),
                    };
                    if key.as_str().is_none() {
                        return failed(type_mismatch(format!(
                            "Cannot index {} with {}",
                            value.type_name(),
                            key.type_name()
                        )));
                    }
                    let field = match access::index(&value, &key) {
                        Ok(field) => field,
                        Err(err) => return failed(err),
                    };
                    let inner = self.destructure(arena, pattern, field, env.clone(), &dot);
                    let (value, dot) = (value.clone(), dot.clone());
                    Box::new(inner.flat_map(move |bound| match bound {
                        Ok(env) => continue_with(env, value.clone(), dot.clone()),
                        Err(action) => failed(action),
                    }))
                }))
            }
        }
    }
}
