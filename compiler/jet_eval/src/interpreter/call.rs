//! Function calls.
//!
//! Lookup goes through the lexical [`Env`] first and falls back to the
//! natives. Filter parameters are bound as closures over the caller's
//! argument and environment; value parameters are bound once per
//! combination of argument outputs, first parameter slowest.

use super::Interpreter;
use crate::env::{Callee, Env};
use crate::generator::{deferred, fail, one, values_only, Gen, Item, Output};
use crate::natives::{Native, NativeCall};
use jet_ir::{ExprArena, ExprId, FuncDef, Name, Param};
use jet_value::errors::argument_error;
use jet_value::{ControlAction, Value};
use std::rc::Rc;

/// Combinations of argument values, one `Vec` per call.
pub(crate) type ArgRows<'a> = Box<dyn Iterator<Item = Result<Vec<Value>, ControlAction>> + 'a>;

impl Interpreter {
    pub(super) fn eval_call<'a>(
        &'a self,
        arena: &'a ExprArena,
        name: Name,
        args: &'a [ExprId],
        env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let path_mode = input.in_path_mode();
        match env.function(name, args.len()) {
            Some(Callee::Def {
                arena: def_arena,
                def,
                env: def_env,
            }) => deferred(move || self.call_def(arena, args, env, def_arena, def, def_env, input)),
            Some(Callee::Closure {
                arena: body_arena,
                body,
                env: body_env,
            }) => deferred(move || self.eval(body_arena, body, body_env, input)),
            Some(Callee::Value(value)) => values_only(path_mode, one(Item::value(value))),
            None => match self.natives.get(name, args.len()) {
                Some(Native::Fn(kernel)) => {
                    let rows = self.arg_product(arena, args, env, &input.value);
                    let results = rows.map(move |row| -> Output {
                        let value = kernel(input.value.clone(), &row?)?;
                        Ok(Item::value(value))
                    });
                    values_only(path_mode, Box::new(results))
                }
                Some(Native::Gen(kernel)) => kernel(
                    self,
                    NativeCall {
                        arena,
                        env,
                        args,
                        input,
                    },
                ),
                None => fail(argument_error(format!(
                    "{}/{} is not defined",
                    self.interner.lookup(name),
                    args.len()
                ))),
            },
        }
    }

    /// Bind the parameters of `def` and run its body.
    #[allow(clippy::too_many_arguments)]
    fn call_def<'a>(
        &'a self,
        caller_arena: &'a ExprArena,
        args: &'a [ExprId],
        caller_env: Env<'a>,
        def_arena: &'a ExprArena,
        def: &'a FuncDef,
        def_env: Env<'a>,
        input: Item,
    ) -> Gen<'a> {
        let mut env = def_env;
        let mut value_params = Vec::new();
        let mut value_args = Vec::new();
        for (param, &arg) in def.params.iter().zip(args) {
            match *param {
                Param::Filter(name) => {
                    env = env.bind_closure(name, caller_arena, arg, caller_env.clone());
                }
                Param::Value(name) => {
                    value_params.push(name);
                    value_args.push(arg);
                }
            }
        }
        if value_params.is_empty() {
            return self.eval(def_arena, def.body, env, input);
        }
        let rows = self.product_from(caller_arena, value_args.into(), 0, caller_env, input.value.clone());
        Box::new(rows.flat_map(move |row| -> Gen<'a> {
            let row = match row {
                Ok(row) => row,
                Err(action) => return fail(action),
            };
            let env = value_params
                .iter()
                .zip(row)
                .fold(env.clone(), |env, (&name, value)| env.bind_value_param(name, value));
            self.eval(def_arena, def.body, env, input.clone())
        }))
    }

    /// Every combination of the arguments' outputs against `input`, first
    /// argument slowest.
    pub(crate) fn arg_product<'a>(
        &'a self,
        arena: &'a ExprArena,
        args: &[ExprId],
        env: Env<'a>,
        input: &Value,
    ) -> ArgRows<'a> {
        self.product_from(arena, args.into(), 0, env, input.clone())
    }

    fn product_from<'a>(
        &'a self,
        arena: &'a ExprArena,
        args: Rc<[ExprId]>,
        at: usize,
        env: Env<'a>,
        input: Value,
    ) -> ArgRows<'a> {
        let Some(&arg) = args.get(at) else {
            return Box::new(std::iter::once(Ok(Vec::new())));
        };
        let firsts = self.eval_value(arena, arg, env.clone(), input.clone());
        Box::new(firsts.flat_map(move |out| -> ArgRows<'a> {
            let first = match out {
                Ok(item) => item.value,
                Err(action) => return Box::new(std::iter::once(Err(action))),
            };
            let rests = self.product_from(arena, Rc::clone(&args), at + 1, env.clone(), input.clone());
            Box::new(rests.map(move |rest| {
                rest.map(|mut rest| {
                    rest.insert(0, first.clone());
                    rest
                })
            }))
        }))
    }
}
