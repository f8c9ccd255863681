//! Compile-time and run-time failures of the host API.

use jet_ir::Span;
use jet_parse::ParseError;
use jet_value::EvalError;

/// A filter that cannot be run: it does not parse, or names something
/// that is not in scope.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("${name} is not defined at {span}")]
    UndefinedVariable { name: String, span: Span },
    #[error("{name}/{arity} is not defined at {span}")]
    UndefinedFunction {
        name: String,
        arity: usize,
        span: Span,
    },
    #[error("$*label-{name} is not defined at {span}")]
    UndefinedLabel { name: String, span: Span },
}

impl CompileError {
    /// Where in the filter text the problem is.
    pub fn span(&self) -> Span {
        match self {
            CompileError::Parse(err) => err.span,
            CompileError::UndefinedVariable { span, .. }
            | CompileError::UndefinedFunction { span, .. }
            | CompileError::UndefinedLabel { span, .. } => *span,
        }
    }
}

/// The final element of an output stream that did not end normally.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RunError {
    /// An error no `try` caught.
    #[error("{0}")]
    Eval(EvalError),
    /// A `break` escaped every `label`.
    #[error("break escaped its label")]
    UnmatchedBreak,
}

impl RunError {
    /// The public `{kind, payload}` marker, when this is an evaluation error.
    pub fn to_marker(&self) -> Option<jet_value::Value> {
        match self {
            RunError::Eval(err) => Some(err.to_marker()),
            RunError::UnmatchedBreak => None,
        }
    }
}
