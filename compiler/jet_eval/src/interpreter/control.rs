//! `try`, `//`, `reduce`, `foreach` and `label`.

use super::bind::Bindings;
use super::Interpreter;
use crate::env::Env;
use crate::generator::{deferred, fail, nothing, one, values_only, Gen, Item, Output};
use jet_ir::{ExprArena, ExprId, Name, Pattern};
use jet_value::{ControlAction, EvalError, Value};
use std::cell::Cell;
use std::rc::Rc;

impl Interpreter {
    /// `try body catch handler`. Body outputs pass through until the first
    /// error; the handler's outputs replace the rest. Breaks are not
    /// caught.
    pub(super) fn eval_try<'a>(
        &'a self,
        arena: &'a ExprArena,
        body: ExprId,
        handler: Option<ExprId>,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let path_mode = input.in_path_mode();
        let outputs = self.eval(arena, body, env.clone(), input);
        let recover = move |err: EvalError| -> Gen<'a> {
            match handler {
                Some(handler) => {
                    values_only(path_mode, self.eval_value(arena, handler, env, err.value))
                }
                None => nothing(),
            }
        };
        Box::new(Catch {
            body: Some(outputs),
            recover: Some(recover),
            recovered: None,
        })
    }

    /// `left // right`: the truthy outputs of `left`, or `right` when there
    /// are none. Errors in `left` count as no output.
    pub(super) fn eval_alternative<'a>(
        &'a self,
        arena: &'a ExprArena,
        left: ExprId,
        right: ExprId,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let found = Rc::new(Cell::new(false));
        let seen = Rc::clone(&found);
        let lefts = self
            .eval(arena, left, env.clone(), input.clone())
            .filter_map(move |out| match out {
                Ok(item) if item.value.is_truthy() => {
                    seen.set(true);
                    Some(Ok(item))
                }
                Ok(_) | Err(ControlAction::Error(_)) => None,
                Err(action) => Some(Err(action)),
            });
        let rights = deferred(move || {
            if found.get() {
                nothing()
            } else {
                self.eval(arena, right, env, input)
            }
        });
        Box::new(lefts.chain(rights))
    }

    /// `reduce source as pattern (init; update)`.
    ///
    /// Only the first output of `init` seeds the accumulator. Each step
    /// keeps the last output of `update`; a step with no output leaves an
    /// absent accumulator.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn eval_reduce<'a>(
        &'a self,
        arena: &'a ExprArena,
        source: ExprId,
        pattern: &'a Pattern,
        init: ExprId,
        update: ExprId,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        deferred(move || {
            let mut acc = match self.eval(arena, init, env.clone(), input.clone()).next() {
                Some(Ok(item)) => item,
                Some(Err(action)) => return fail(action),
                None => return nothing(),
            };
            let dot = input.value;
            for out in self.eval_value(arena, source, env.clone(), dot.clone()) {
                let value = match out {
                    Ok(item) => item.value,
                    Err(action) => return fail(action),
                };
                for bound in self.destructure(arena, pattern, value, env.clone(), &dot) {
                    let step_env = match bound {
                        Ok(env) => env,
                        Err(action) => return fail(action),
                    };
                    let mut last = None;
                    for out in self.eval(arena, update, step_env, acc.clone()) {
                        match out {
                            Ok(item) => last = Some(item),
                            Err(action) => return fail(action),
                        }
                    }
                    acc = match last {
                        Some(item) => item,
                        None => Item {
                            value: Value::Absent,
                            path: acc.path,
                        },
                    };
                }
            }
            one(acc)
        })
    }

    /// `foreach source as pattern (init; update; extract)`. Every output of
    /// `update` is emitted, through `extract` when present, and becomes the
    /// accumulator.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn eval_foreach<'a>(
        &'a self,
        arena: &'a ExprArena,
        source: ExprId,
        pattern: &'a Pattern,
        init: ExprId,
        update: ExprId,
        extract: Option<ExprId>,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        deferred(move || {
            let acc = match self.eval(arena, init, env.clone(), input.clone()).next() {
                Some(Ok(item)) => item,
                Some(Err(action)) => return fail(action),
                None => return nothing(),
            };
            let dot = input.value;
            let sources = self.eval_value(arena, source, env.clone(), dot.clone());
            Box::new(Foreach {
                interp: self,
                arena,
                pattern,
                update,
                extract,
                env,
                dot,
                sources,
                bindings: None,
                updates: None,
                extracts: None,
                acc,
                done: false,
            })
        })
    }

    /// `label $name | body`. Each evaluation gets a fresh identity, so a
    /// `break` only ends the body it was bound in.
    pub(super) fn eval_label<'a>(
        &'a self,
        arena: &'a ExprArena,
        name: Name,
        body: ExprId,
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let id = self.fresh_label();
        let outputs = self.eval(arena, body, env.bind_label(name, id), input);
        Box::new(outputs.take_while(
            move |out| !matches!(out, Err(ControlAction::Break(label)) if *label == id),
        ))
    }
}

struct Catch<'a, F> {
    body: Option<Gen<'a>>,
    recover: Option<F>,
    recovered: Option<Gen<'a>>,
}

impl<'a, F: FnOnce(EvalError) -> Gen<'a>> Iterator for Catch<'a, F> {
    type Item = Output;

    fn next(&mut self) -> Option<Output> {
        if let Some(recovered) = &mut self.recovered {
            return recovered.next();
        }
        match self.body.as_mut()?.next() {
            Some(Err(ControlAction::Error(err))) => {
                self.body = None;
                let mut recovered = (self.recover.take()?)(*err);
                let next = recovered.next();
                self.recovered = Some(recovered);
                next
            }
            None => {
                self.body = None;
                None
            }
            other => other,
        }
    }
}

/// Stepping state of one `foreach`.
struct Foreach<'a> {
    interp: &'a Interpreter,
    arena: &'a ExprArena,
    pattern: &'a Pattern,
    update: ExprId,
    extract: Option<ExprId>,
    env: Env<'a>,
    dot: Value,
    sources: Gen<'a>,
    bindings: Option<Bindings<'a>>,
    /// Outputs of `update` for the current binding, with that binding.
    updates: Option<(Gen<'a>, Env<'a>)>,
    extracts: Option<Gen<'a>>,
    acc: Item,
    done: bool,
}

impl Foreach<'_> {
    fn stop(&mut self, action: ControlAction) -> Option<Output> {
        self.done = true;
        Some(Err(action))
    }
}

impl Iterator for Foreach<'_> {
    type Item = Output;

    fn next(&mut self) -> Option<Output> {
        loop {
            if self.done {
                return None;
            }
            if let Some(extracts) = &mut self.extracts {
                match extracts.next() {
                    Some(Err(action)) => return self.stop(action),
                    Some(out) => return Some(out),
                    None => self.extracts = None,
                }
                continue;
            }
            if let Some((updates, step_env)) = &mut self.updates {
                match updates.next() {
                    Some(Ok(item)) => {
                        self.acc = item.clone();
                        let Some(extract) = self.extract else {
                            return Some(Ok(item));
                        };
                        let step_env = step_env.clone();
                        self.extracts =
                            Some(self.interp.eval(self.arena, extract, step_env, item));
                    }
                    Some(Err(action)) => return self.stop(action),
                    None => self.updates = None,
                }
                continue;
            }
            if let Some(bindings) = &mut self.bindings {
                match bindings.next() {
                    Some(Ok(step_env)) => {
                        let updates = self.interp.eval(
                            self.arena,
                            self.update,
                            step_env.clone(),
                            self.acc.clone(),
                        );
                        self.updates = Some((updates, step_env));
                    }
                    Some(Err(action)) => return self.stop(action),
                    None => self.bindings = None,
                }
                continue;
            }
            match self.sources.next() {
                Some(Ok(item)) => {
                    let bindings = self.interp.destructure(
                        self.arena,
                        self.pattern,
                        item.value,
                        self.env.clone(),
                        &self.dot,
                    );
                    self.bindings = Some(bindings);
                }
                Some(Err(action)) => return self.stop(action),
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}
