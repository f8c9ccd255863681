//! Main dispatch over [`ExprKind`].

use super::Interpreter;
use crate::env::Env;
use crate::generator::{collect_values, deferred, fail, one, values_only, Gen, Item, Output};
use crate::natives::apply_format;
use jet_ir::{ExprArena, ExprId, ExprKind, Format, Literal, ObjectEntry, StringPart};
use jet_stack::ensure_sufficient_stack;
use jet_value::access::{self, children};
use jet_value::errors::{
    argument_error, negative_index_out_of_bounds, type_error, type_mismatch, EvalResult,
};
use jet_value::{ops, ControlAction, Map, PathSegment, Value};

/// Outputs of string pieces while interpolating.
type Texts<'a> = Box<dyn Iterator<Item = Result<String, ControlAction>> + 'a>;

impl Interpreter {
    /// Evaluate `id` against `input`.
    pub(crate) fn eval<'a>(
        &'a self,
        arena: &'a ExprArena,
        id: ExprId,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        ensure_sufficient_stack(|| self.eval_inner(arena, id, env, input))
    }

    /// Evaluate `id` in value mode against a plain value.
    pub(crate) fn eval_value<'a>(
        &'a self,
        arena: &'a ExprArena,
        id: ExprId,
        env: Env<'a>,
        input: Value,
    ) -> Gen<'a> {
        self.eval(arena, id, env, Item::value(input))
    }

    fn eval_inner<'a>(
        &'a self,
        arena: &'a ExprArena,
        id: ExprId,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let path_mode = input.in_path_mode();
        match arena.kind(id) {
            ExprKind::Identity => one(input),
            ExprKind::Literal(literal) => {
                values_only(path_mode, one(Item::value(literal_value(literal))))
            }
            ExprKind::Str { format, parts } => {
                let texts = self.interpolate(arena, parts, *format, env, input.value, String::new());
                let strings = texts.map(|text| text.map(|s| Item::value(Value::string(s))));
                values_only(path_mode, Box::new(strings))
            }
            ExprKind::Format(format) => {
                let result = apply_format(*format, &input.value);
                values_only(path_mode, from_result(result))
            }
            ExprKind::Loc { line } => {
                let loc = Value::object_from([
                    ("file", Value::from("<top-level>")),
                    ("line", Value::Number(f64::from(*line))),
                ]);
                values_only(path_mode, one(Item::value(loc)))
            }
            ExprKind::Field { target, name } => {
                let key = Value::from(name.as_str());
                let targets = self.eval(arena, *target, env, input);
                Box::new(targets.map(move |out| out.and_then(|item| step(item, &key))))
            }
            ExprKind::Index { target, index } => {
                let (index, dot) = (*index, input.value.clone());
                let targets = self.eval(arena, *target, env.clone(), input);
                Box::new(targets.flat_map(move |out| -> Gen<'a> {
                    let item = match out {
                        Ok(item) => item,
                        Err(action) => return fail(action),
                    };
                    let keys = self.eval_value(arena, index, env.clone(), dot.clone());
                    Box::new(keys.map(move |key| key.and_then(|key| step(item.clone(), &key.value))))
                }))
            }
            ExprKind::Slice { target, from, to } => {
                self.eval_slice(arena, *target, *from, *to, env, input)
            }
            ExprKind::Iterate { target } => {
                let targets = self.eval(arena, *target, env, input);
                Box::new(targets.flat_map(|out| -> Gen<'a> {
                    match out {
                        Ok(item) => iterate(item),
                        Err(action) => fail(action),
                    }
                }))
            }
            ExprKind::Optional(body) => self.eval_try(arena, *body, None, env, input),
            ExprKind::Pipe(left, right) => {
                let right = *right;
                let lefts = self.eval(arena, *left, env.clone(), input);
                Box::new(lefts.flat_map(move |out| match out {
                    Ok(item) => self.eval(arena, right, env.clone(), item),
                    Err(action) => fail(action),
                }))
            }
            ExprKind::Comma(left, right) => {
                let right = *right;
                let lefts = self.eval(arena, *left, env.clone(), input.clone());
                Box::new(lefts.chain(deferred(move || self.eval(arena, right, env, input))))
            }
            ExprKind::Neg(operand) => {
                let values = self.eval_value(arena, *operand, env, input.value);
                let negated = values.map(|out| {
                    out.and_then(|item| match item.value {
                        Value::Number(n) => Ok(Item::value(Value::Number(-n))),
                        other => Err(type_error(&other, "cannot be negated").into()),
                    })
                });
                values_only(path_mode, Box::new(negated))
            }
            ExprKind::Binary { op, left, right } => {
                let (op, left) = (*op, *left);
                let dot = input.value.clone();
                let rights = self.eval_value(arena, *right, env.clone(), input.value);
                let results = rights.flat_map(move |rhs| -> Gen<'a> {
                    let rhs = match rhs {
                        Ok(item) => item.value,
                        Err(action) => return fail(action),
                    };
                    let lefts = self.eval_value(arena, left, env.clone(), dot.clone());
                    Box::new(lefts.map(move |lhs| -> Output {
                        let lhs = lhs?.value;
                        Ok(Item::value(ops::binary(op, lhs, rhs.clone())?))
                    }))
                });
                values_only(path_mode, Box::new(results))
            }
            ExprKind::And(left, right) => {
                let gen = self.eval_logic(arena, *left, *right, env, input.value, false);
                values_only(path_mode, gen)
            }
            ExprKind::Or(left, right) => {
                let gen = self.eval_logic(arena, *left, *right, env, input.value, true);
                values_only(path_mode, gen)
            }
            ExprKind::Alternative(left, right) => {
                self.eval_alternative(arena, *left, *right, env, input)
            }
            ExprKind::Update { op, target, value } => {
                let results = self.eval_update(arena, *op, *target, *value, env, input.value);
                values_only(path_mode, results)
            }
            ExprKind::Array(None) => {
                values_only(path_mode, one(Item::value(Value::array(Vec::new()))))
            }
            ExprKind::Array(Some(body)) => {
                let body = *body;
                let collected = deferred(move || {
                    let items = self.eval_value(arena, body, env, input.value);
                    match collect_values(items) {
                        Ok(items) => one(Item::value(Value::array(items))),
                        Err(action) => fail(action),
                    }
                });
                values_only(path_mode, collected)
            }
            ExprKind::Object(entries) => {
                let objects = self.build_object(arena, entries, env, input.value, Map::default());
                values_only(path_mode, objects)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let (then_branch, else_branch) = (*then_branch, *else_branch);
                let conds = self.eval_value(arena, *cond, env.clone(), input.value.clone());
                Box::new(conds.flat_map(move |out| -> Gen<'a> {
                    match out {
                        Ok(c) if c.value.is_truthy() => {
                            self.eval(arena, then_branch, env.clone(), input.clone())
                        }
                        Ok(_) => match else_branch {
                            Some(else_branch) => {
                                self.eval(arena, else_branch, env.clone(), input.clone())
                            }
                            None => one(input.clone()),
                        },
                        Err(action) => fail(action),
                    }
                }))
            }
            ExprKind::Try { body, handler } => self.eval_try(arena, *body, *handler, env, input),
            ExprKind::Reduce {
                source,
                pattern,
                init,
                update,
            } => self.eval_reduce(arena, *source, pattern, *init, *update, env, input),
            ExprKind::Foreach {
                source,
                pattern,
                init,
                update,
                extract,
            } => self.eval_foreach(arena, *source, pattern, *init, *update, *extract, env, input),
            ExprKind::Label { name, body } => self.eval_label(arena, *name, *body, env, input),
            ExprKind::Break(name) => match env.label(*name) {
                Some(label) => fail(ControlAction::Break(label)),
                None => fail(argument_error(format!(
                    "$*label-{} is not defined",
                    self.interner.lookup(*name)
                ))),
            },
            ExprKind::FuncDefs { defs, rest } => {
                let env = env.bind_defs(arena, defs);
                self.eval(arena, *rest, env, input)
            }
            ExprKind::Call { name, args } => self.eval_call(arena, *name, args, env, input),
            ExprKind::Var(name) => match env.var(*name) {
                Some(value) => values_only(path_mode, one(Item::value(value.clone()))),
                None => fail(argument_error(format!(
                    "${} is not defined",
                    self.interner.lookup(*name)
                ))),
            },
            ExprKind::Bind {
                source,
                pattern,
                body,
            } => {
                let body = *body;
                let sources = self.eval_value(arena, *source, env.clone(), input.value.clone());
                Box::new(sources.flat_map(move |out| -> Gen<'a> {
                    let value = match out {
                        Ok(item) => item.value,
                        Err(action) => return fail(action),
                    };
                    let input = input.clone();
                    let bindings = self.destructure(arena, pattern, value, env.clone(), &input.value);
                    Box::new(bindings.flat_map(move |bound| match bound {
                        Ok(env) => self.eval(arena, body, env, input.clone()),
                        Err(action) => fail(action),
                    }))
                }))
            }
        }
    }

    /// `a and b` / `a or b`. The left operand is the outer loop; `b` is only
    /// evaluated when `a` does not decide the result.
    fn eval_logic<'a>(
        &'a self,
        arena: &'a ExprArena,
        left: ExprId,
        right: ExprId,
        env: Env<'a>,
        input: Value,
        is_or: bool,
    ) -> Gen<'a> {
        let lefts = self.eval_value(arena, left, env.clone(), input.clone());
        Box::new(lefts.flat_map(move |out| -> Gen<'a> {
            let decided = match out {
                Ok(item) => item.value.is_truthy(),
                Err(action) => return fail(action),
            };
            if decided == is_or {
                return one(Item::value(Value::Bool(is_or)));
            }
            let rights = self.eval_value(arena, right, env.clone(), input.clone());
            Box::new(rights.map(|out| out.map(|item| Item::value(Value::Bool(item.value.is_truthy())))))
        }))
    }

    fn eval_slice<'a>(
        &'a self,
        arena: &'a ExprArena,
        target: ExprId,
        from: Option<ExprId>,
        to: Option<ExprId>,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let dot = input.value.clone();
        let targets = self.eval(arena, target, env.clone(), input);
        Box::new(targets.flat_map(move |out| -> Gen<'a> {
            let item = match out {
                Ok(item) => item,
                Err(action) => return fail(action),
            };
            let starts = self.bound(arena, from, env.clone(), dot.clone());
            let (env, dot) = (env.clone(), dot.clone());
            Box::new(starts.flat_map(move |start| -> Gen<'a> {
                let start = match start {
                    Ok(start) => start,
                    Err(action) => return fail(action),
                };
                let item = item.clone();
                let ends = self.bound(arena, to, env.clone(), dot.clone());
                Box::new(ends.map(move |end| -> Output {
                    slice_step(item.clone(), &start, &end?)
                }))
            }))
        }))
    }

    /// Outputs of an optional slice bound; `null` when omitted.
    fn bound<'a>(
        &'a self,
        arena: &'a ExprArena,
        bound: Option<ExprId>,
        env: Env<'a>,
        dot: Value,
    ) -> Box<dyn Iterator<Item = Result<Value, ControlAction>> + 'a> {
        match bound {
            Some(id) => Box::new(
                self.eval_value(arena, id, env, dot)
                    .map(|out| out.map(|item| item.value)),
            ),
            None => Box::new(std::iter::once(Ok(Value::Null))),
        }
    }

    /// Cross the outputs of the interpolated parts, first part slowest.
    fn interpolate<'a>(
        &'a self,
        arena: &'a ExprArena,
        parts: &'a [StringPart],
        format: Option<Format>,
        env: Env<'a>,
        dot: Value,
        prefix: String,
    ) -> Texts<'a> {
        let Some((first, rest)) = parts.split_first() else {
            return Box::new(std::iter::once(Ok(prefix)));
        };
        match first {
            StringPart::Literal(text) => {
                let mut prefix = prefix;
                prefix.push_str(text);
                self.interpolate(arena, rest, format, env, dot, prefix)
            }
            StringPart::Interp(id) => {
                let pieces = self.eval_value(arena, *id, env.clone(), dot.clone());
                Box::new(pieces.flat_map(move |out| -> Texts<'a> {
                    let piece = out.and_then(|item| render(format, &item.value).map_err(Into::into));
                    match piece {
                        Ok(piece) => {
                            let mut prefix = prefix.clone();
                            prefix.push_str(&piece);
                            self.interpolate(arena, rest, format, env.clone(), dot.clone(), prefix)
                        }
                        Err(action) => Box::new(std::iter::once(Err(action))),
                    }
                }))
            }
        }
    }

    /// Cross keys and values entry by entry, first entry slowest and each
    /// key outside its value.
    fn build_object<'a>(
        &'a self,
        arena: &'a ExprArena,
        entries: &'a [ObjectEntry],
        env: Env<'a>,
        dot: Value,
        partial: Map,
    ) -> Gen<'a> {
        let Some((entry, rest)) = entries.split_first() else {
            return one(Item::value(Value::object(partial)));
        };
        let value_id = entry.value;
        let keys = self.eval_value(arena, entry.key, env.clone(), dot.clone());
        Box::new(keys.flat_map(move |key| -> Gen<'a> {
            let key = match key {
                Ok(Item {
                    value: Value::String(key),
                    ..
                }) => key,
                Ok(other) => {
                    return fail(type_mismatch(format!(
                        "Object keys must be strings, not {}",
                        other.value.describe()
                    )))
                }
                Err(action) => return fail(action),
            };
            let values = self.eval_value(arena, value_id, env.clone(), dot.clone());
            let (env, dot, partial) = (env.clone(), dot.clone(), partial.clone());
            Box::new(values.flat_map(move |value| -> Gen<'a> {
                let value = match value {
                    Ok(item) => item.value.materialize(),
                    Err(action) => return fail(action),
                };
                let mut partial = partial.clone();
                partial.insert(key.to_string(), value);
                self.build_object(arena, rest, env.clone(), dot.clone(), partial)
            }))
        }))
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::from(s.as_str()),
    }
}

fn from_result<'a>(result: EvalResult) -> Gen<'a> {
    match result {
        Ok(value) => one(Item::value(value)),
        Err(err) => fail(err),
    }
}

/// An interpolated value as text: formatted when the string has a format,
/// otherwise strings verbatim and everything else as JSON.
fn render(format: Option<Format>, value: &Value) -> Result<String, jet_value::EvalError> {
    let rendered = match format {
        Some(format) => apply_format(format, value)?,
        None => apply_format(Format::Text, value)?,
    };
    Ok(rendered.as_str().unwrap_or_default().to_owned())
}

/// `.[key]` on one item. In path mode the key becomes a path segment, with
/// negative indices resolved against the array being addressed.
fn step(item: Item, key: &Value) -> Output {
    let value = access::index(&item.value, key)?;
    let Some(path) = item.path else {
        return Ok(Item::value(value));
    };
    let segment = match (key, &item.value) {
        (Value::Number(n), Value::Array(items)) if *n < 0.0 => {
            let resolved = n.floor() + items.len() as f64;
            if resolved < 0.0 {
                return Err(negative_index_out_of_bounds(*n).into());
            }
            PathSegment::Index(resolved)
        }
        _ => PathSegment::from_value(key)?,
    };
    Ok(Item {
        value,
        path: Some(path.child(segment)),
    })
}

fn slice_step(item: Item, start: &Value, end: &Value) -> Output {
    let value = access::slice(&item.value, start, end)?;
    let Some(path) = item.path else {
        return Ok(Item::value(value));
    };
    let segment = PathSegment::Slice {
        start: start.as_f64(),
        end: end.as_f64(),
    };
    Ok(Item {
        value,
        path: Some(path.child(segment)),
    })
}

/// `.[]` on one item.
fn iterate<'a>(item: Item) -> Gen<'a> {
    let mut entries = match children(&item.value) {
        Ok(entries) => entries,
        Err(err) => return fail(err),
    };
    match item.path {
        None => Box::new(entries.map(|value| Ok(Item::value(value)))),
        Some(path) => Box::new(std::iter::from_fn(move || {
            let (segment, value) = entries.next_entry()?;
            Some(Ok(Item {
                value,
                path: Some(path.child(segment)),
            }))
        })),
    }
}
