//! Numeric kernels.

use super::{Entry, Native};
use jet_value::errors::{type_error, EvalError, EvalResult};
use jet_value::Value;

fn number(value: &Value) -> Result<f64, EvalError> {
    value
        .as_f64()
        .ok_or_else(|| type_error(value, "number required"))
}

macro_rules! unary {
    ($($name:ident => $f:expr),* $(,)?) => {
        $(
            fn $name(input: Value, _: &[Value]) -> EvalResult {
                let f: fn(f64) -> f64 = $f;
                number(&input).map(|n| Value::Number(f(n)))
            }
        )*
    };
}

unary! {
    floor => f64::floor,
    ceil => f64::ceil,
    round => f64::round,
    trunc => f64::trunc,
    sqrt => f64::sqrt,
    fabs => f64::abs,
    log => f64::ln,
    log2 => f64::log2,
    log10 => f64::log10,
    exp => f64::exp,
    exp2 => f64::exp2,
    exp10 => |n| 10f64.powf(n),
    sin => f64::sin,
    cos => f64::cos,
    tan => f64::tan,
    asin => f64::asin,
    acos => f64::acos,
    atan => f64::atan,
    significand => significand_of,
}

pub(super) const FUNCTIONS: &[Entry] = &[
    ("floor", 0, Native::Fn(floor)),
    ("ceil", 0, Native::Fn(ceil)),
    ("round", 0, Native::Fn(round)),
    ("trunc", 0, Native::Fn(trunc)),
    ("sqrt", 0, Native::Fn(sqrt)),
    ("fabs", 0, Native::Fn(fabs)),
    ("log", 0, Native::Fn(log)),
    ("log2", 0, Native::Fn(log2)),
    ("log10", 0, Native::Fn(log10)),
    ("exp", 0, Native::Fn(exp)),
    ("exp2", 0, Native::Fn(exp2)),
    ("exp10", 0, Native::Fn(exp10)),
    ("sin", 0, Native::Fn(sin)),
    ("cos", 0, Native::Fn(cos)),
    ("tan", 0, Native::Fn(tan)),
    ("asin", 0, Native::Fn(asin)),
    ("acos", 0, Native::Fn(acos)),
    ("atan", 0, Native::Fn(atan)),
    ("significand", 0, Native::Fn(significand)),
    ("abs", 0, Native::Fn(abs)),
    ("pow", 2, Native::Fn(pow)),
    ("atan2", 2, Native::Fn(atan2)),
    ("infinite", 0, Native::Fn(infinite)),
    ("nan", 0, Native::Fn(nan)),
    ("isinfinite", 0, Native::Fn(isinfinite)),
    ("isnan", 0, Native::Fn(isnan)),
    ("isnormal", 0, Native::Fn(isnormal)),
];

/// Mantissa scaled into `[1, 2)`; zero and non-finite values unchanged.
fn significand_of(n: f64) -> f64 {
    if n == 0.0 || !n.is_finite() {
        return n;
    }
    let exponent = n.abs().log2().floor();
    let scaled = n / exponent.exp2();
    // log2 rounding can land one step off near powers of two
    if scaled.abs() >= 2.0 {
        scaled / 2.0
    } else if scaled.abs() < 1.0 {
        scaled * 2.0
    } else {
        scaled
    }
}

fn abs(input: Value, _: &[Value]) -> EvalResult {
    match input {
        Value::Number(n) if n < 0.0 => Ok(Value::Number(-n)),
        Value::Number(_) => Ok(input),
        _ => Err(type_error(&input, "has no absolute value")),
    }
}

fn pow(_: Value, args: &[Value]) -> EvalResult {
    Ok(Value::Number(number(&args[0])?.powf(number(&args[1])?)))
}

fn atan2(_: Value, args: &[Value]) -> EvalResult {
    Ok(Value::Number(number(&args[0])?.atan2(number(&args[1])?)))
}

fn infinite(_: Value, _: &[Value]) -> EvalResult {
    Ok(Value::Number(f64::INFINITY))
}

fn nan(_: Value, _: &[Value]) -> EvalResult {
    Ok(Value::Number(f64::NAN))
}

fn isinfinite(input: Value, _: &[Value]) -> EvalResult {
    number(&input).map(|n| Value::Bool(n.is_infinite()))
}

fn isnan(input: Value, _: &[Value]) -> EvalResult {
    number(&input).map(|n| Value::Bool(n.is_nan()))
}

fn isnormal(input: Value, _: &[Value]) -> EvalResult {
    number(&input).map(|n| Value::Bool(n.is_normal()))
}
