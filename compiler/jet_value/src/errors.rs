//! Runtime error taxonomy and control signals.
//!
//! Errors are built only through the `#[cold]` factory functions in this
//! module, grouped by category. Every error carries the value a `catch`
//! handler receives: the payload of `error(...)` for [`EvalErrorKind::UserError`],
//! the message string for everything else.

use crate::Value;
use jet_ir::BinaryOp;
use std::fmt;

/// Result of evaluating a primitive.
pub type EvalResult = Result<Value, EvalError>;

/// Error category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum EvalErrorKind {
    /// Operator or builtin applied to an operand of unsupported type.
    #[error("TypeMismatch")]
    TypeMismatch,
    /// `.[]` on a scalar.
    #[error("IterateOnNonIterable")]
    IterateOnNonIterable,
    /// Path mode reached something that is not a path, or a write went
    /// out of bounds on the negative side.
    #[error("InvalidPathExpression")]
    InvalidPathExpression,
    /// A path must pass through a scalar to continue.
    #[error("PathThroughScalar")]
    PathThroughScalar,
    /// NaN or otherwise unusable index in a write.
    #[error("InvalidIndex")]
    InvalidIndex,
    /// Division or remainder by zero.
    #[error("DivisionError")]
    DivisionError,
    /// Argument outside a builtin's domain.
    #[error("ArgumentError")]
    ArgumentError,
    /// Raised by `error`.
    #[error("UserError")]
    UserError,
}

impl EvalErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::TypeMismatch => "TypeMismatch",
            Self::IterateOnNonIterable => "IterateOnNonIterable",
            Self::InvalidPathExpression => "InvalidPathExpression",
            Self::PathThroughScalar => "PathThroughScalar",
            Self::InvalidIndex => "InvalidIndex",
            Self::DivisionError => "DivisionError",
            Self::ArgumentError => "ArgumentError",
            Self::UserError => "UserError",
        }
    }
}

/// A runtime error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// What `catch` sees.
    pub value: Value,
    /// The offending operand, when there is one.
    pub operand: Option<Value>,
}

impl EvalError {
    #[cold]
    fn with_message(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            value: Value::string(message),
            operand: None,
        }
    }

    #[must_use]
    fn with_operand(mut self, operand: &Value) -> Self {
        self.operand = Some(operand.clone());
        self
    }

    /// Human-readable message. For `error(x)` with a non-string `x` this is
    /// `x` rendered as JSON followed by `(not a string)`.
    pub fn message(&self) -> String {
        match (&self.value, self.kind) {
            (Value::String(s), _) => s.to_string(),
            (value, EvalErrorKind::UserError) => {
                format!("{} (not a string)", value.clone().materialize())
            }
            (value, _) => value.to_string(),
        }
    }

    /// The public marker shape `{"kind": <name>, "payload": <value>}`.
    ///
    /// The payload is the `error` argument for user errors and the operand
    /// otherwise; it is left out when there is none.
    pub fn to_marker(&self) -> Value {
        let mut map = crate::Map::default();
        map.insert("kind".to_owned(), Value::string(self.kind.name()));
        let payload = match self.kind {
            EvalErrorKind::UserError => Some(&self.value),
            _ => self.operand.as_ref(),
        };
        if let Some(payload) = payload {
            map.insert("payload".to_owned(), payload.clone().materialize());
        }
        Value::object(map)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for EvalError {}

/// Identity of one evaluation of a `label`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelId(u64);

impl LabelId {
    pub const fn new(id: u64) -> Self {
        LabelId(id)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Non-value outcome of a generator step.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// Catchable by `try`.
    Error(Box<EvalError>),
    /// Passes through `try`; stops at the matching `label`.
    Break(LabelId),
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

// Arithmetic

fn verb(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "added",
        BinaryOp::Sub => "subtracted",
        BinaryOp::Mul => "multiplied",
        BinaryOp::Div | BinaryOp::Rem => "divided",
        _ => "compared",
    }
}

/// `number (1) and string ("a") cannot be added`.
#[cold]
pub fn cannot_apply(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::TypeMismatch,
        format!("{} and {} cannot be {}", lhs.describe(), rhs.describe(), verb(op)),
    )
    .with_operand(rhs)
}

#[cold]
pub fn division_by_zero(lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::DivisionError,
        format!(
            "{} and {} cannot be divided because the divisor is zero",
            lhs.describe(),
            rhs.describe()
        ),
    )
    .with_operand(rhs)
}

// Access

/// `Cannot index number with "foo"`.
#[cold]
pub fn cannot_index(target: &Value, key: &Value) -> EvalError {
    let key_text = match key {
        Value::String(s) => format!("\"{}\"", s.as_str()),
        other => other.type_name().to_owned(),
    };
    EvalError::with_message(
        EvalErrorKind::TypeMismatch,
        format!("Cannot index {} with {key_text}", target.type_name()),
    )
    .with_operand(target)
}

/// `Cannot iterate over number (1)`.
#[cold]
pub fn cannot_iterate(target: &Value) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::IterateOnNonIterable,
        format!("Cannot iterate over {}", target.describe()),
    )
    .with_operand(target)
}

/// Builtin applied to a value of the wrong type: `{describe} {what}`,
/// e.g. `boolean (true) has no keys`.
#[cold]
pub fn type_error(value: &Value, what: &str) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::TypeMismatch,
        format!("{} {what}", value.describe()),
    )
    .with_operand(value)
}

/// Type error with a free-form message.
#[cold]
pub fn type_mismatch(message: impl Into<String>) -> EvalError {
    EvalError::with_message(EvalErrorKind::TypeMismatch, message)
}

// Paths

/// `Invalid path expression with result 1`.
#[cold]
pub fn invalid_path_expression(result: &Value) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::InvalidPathExpression,
        format!("Invalid path expression with result {}", result.describe()),
    )
    .with_operand(result)
}

#[cold]
pub fn negative_index_out_of_bounds(index: f64) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::InvalidPathExpression,
        "Out of bounds negative array index",
    )
    .with_operand(&Value::Number(index))
}

/// A path continues below a value that cannot hold `segment`.
#[cold]
pub fn path_through_scalar(container: &Value, segment: &Value) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::PathThroughScalar,
        format!(
            "Cannot index {} with {} along a path",
            container.describe(),
            segment.describe()
        ),
    )
    .with_operand(container)
}

#[cold]
pub fn invalid_index(message: impl Into<String>, index: &Value) -> EvalError {
    EvalError::with_message(EvalErrorKind::InvalidIndex, message).with_operand(index)
}

// Arguments

#[cold]
pub fn argument_error(message: impl Into<String>) -> EvalError {
    EvalError::with_message(EvalErrorKind::ArgumentError, message)
}

// User

/// `error(value)`.
#[cold]
pub fn user_error(value: Value) -> EvalError {
    EvalError {
        kind: EvalErrorKind::UserError,
        value,
        operand: None,
    }
}
