//! Natives that drive their argument generators themselves or take part in
//! path mode.

use super::{Entry, Native, NativeCall};
use crate::generator::{fail, nothing, one, values_only, Gen, Item, Output};
use crate::Interpreter;
use jet_value::errors::{argument_error, type_mismatch};
use jet_value::path::getpath;
use jet_value::{ControlAction, Path, Value};

pub(super) const FUNCTIONS: &[Entry] = &[
    ("empty", 0, Native::Gen(empty)),
    ("path", 1, Native::Gen(path)),
    ("getpath", 1, Native::Gen(get_path)),
    ("limit", 2, Native::Gen(limit)),
    ("last", 1, Native::Gen(last)),
    ("range", 2, Native::Gen(range2)),
    ("range", 3, Native::Gen(range3)),
    ("builtins", 0, Native::Gen(builtins)),
];

fn empty<'a>(_: &'a Interpreter, _: NativeCall<'a>) -> Gen<'a> {
    nothing()
}

/// `path(f)`: the paths `f` addresses, as arrays.
fn path<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let path_mode = call.input.in_path_mode();
    let root = Item::root(call.input.value);
    let paths = interp
        .eval(call.arena, call.args[0], call.env, root)
        .map(|out| {
            out.map(|item| Item::value(item.path.unwrap_or_default().to_value()))
        });
    values_only(path_mode, Box::new(paths))
}

/// `getpath(p)`. In path mode the result sits at the input's path
/// extended by `p`.
fn get_path<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let NativeCall {
        arena,
        env,
        args,
        input,
    } = call;
    let paths = interp.eval(arena, args[0], env, Item::value(input.value.clone()));
    Box::new(paths.map(move |out| -> Output {
        let path = Path::from_value(&out?.value)?;
        let value = getpath(&input.value, path.segments())?;
        Ok(Item {
            value,
            path: input.path.as_ref().map(|base| base.join(&path)),
        })
    }))
}

/// `limit(n; f)`: the first `n` outputs of `f`, in the caller's mode.
fn limit<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let NativeCall {
        arena,
        env,
        args,
        input,
    } = call;
    let counts = interp.eval(arena, args[0], env.clone(), Item::value(input.value.clone()));
    Box::new(counts.flat_map(move |out| -> Gen<'a> {
        let n = match out {
            Ok(Item {
                value: Value::Number(n),
                ..
            }) => n,
            Ok(other) => {
                return fail(type_mismatch(format!(
                    "Invalid limit {}: must be a number",
                    other.value.describe()
                )))
            }
            Err(action) => return fail(action),
        };
        if n < 0.0 {
            return fail(argument_error("Invalid limit: must not be negative"));
        }
        if n == 0.0 {
            return nothing();
        }
        let take = if n.is_finite() { n.ceil() as usize } else { usize::MAX };
        Box::new(
            interp
                .eval(arena, args[1], env.clone(), input.clone())
                .take(take),
        )
    }))
}

/// `last(f)`: the final output of `f`, path included. An empty `f` gives
/// `null`, or nothing in path mode.
fn last<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let path_mode = call.input.in_path_mode();
    let mut outputs = Some(interp.eval(call.arena, call.args[0], call.env, call.input));
    Box::new(std::iter::from_fn(move || {
        let mut last = None;
        for out in outputs.take()? {
            match out {
                Ok(item) => last = Some(item),
                Err(action) => return Some(Err(action)),
            }
        }
        match last {
            Some(item) => Some(Ok(item)),
            None if path_mode => None,
            None => Some(Ok(Item::value(Value::Null))),
        }
    }))
}

fn number(value: &Value) -> Result<f64, ControlAction> {
    value
        .as_f64()
        .ok_or_else(|| type_mismatch("Range bounds must be numeric").into())
}

/// `range($from; $upto)`.
fn range2<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let path_mode = call.input.in_path_mode();
    let rows = interp.arg_product(call.arena, call.args, call.env, &call.input.value);
    let outputs = rows.flat_map(|row| -> Gen<'a> {
        match row.and_then(|args| Ok((number(&args[0])?, number(&args[1])?))) {
            Ok((from, upto)) => stepped(from, upto, 1.0),
            Err(action) => fail(action),
        }
    });
    values_only(path_mode, Box::new(outputs))
}

/// `range($from; $upto; $by)`. A zero step yields nothing.
fn range3<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let path_mode = call.input.in_path_mode();
    let rows = interp.arg_product(call.arena, call.args, call.env, &call.input.value);
    let outputs = rows.flat_map(|row| -> Gen<'a> {
        let bounds = row.and_then(|args| {
            Ok((number(&args[0])?, number(&args[1])?, number(&args[2])?))
        });
        match bounds {
            Ok((from, upto, by)) => stepped(from, upto, by),
            Err(action) => fail(action),
        }
    });
    values_only(path_mode, Box::new(outputs))
}

fn stepped<'a>(from: f64, upto: f64, by: f64) -> Gen<'a> {
    if by == 0.0 || by.is_nan() {
        return nothing();
    }
    let values = std::iter::successors(Some(from), move |x| Some(x + by))
        .take_while(move |x| if by > 0.0 { *x < upto } else { *x > upto })
        .map(|x| Ok(Item::value(Value::Number(x))));
    Box::new(values)
}

/// Every public `name/arity`, natives and prelude definitions alike.
fn builtins<'a>(interp: &'a Interpreter, call: NativeCall<'a>) -> Gen<'a> {
    let list: Value = interp
        .builtins()
        .iter()
        .map(|sig| Value::from(sig.as_str()))
        .collect();
    values_only(call.input.in_path_mode(), one(Item::value(list)))
}
