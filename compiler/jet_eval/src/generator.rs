//! Pull-based output streams.
//!
//! Every expression evaluates to a [`Gen`]: a boxed iterator of
//! [`Output`]s, produced on demand. Consumers that stop pulling simply drop
//! the generator. Errors and `break`s travel in-band as
//! [`ControlAction`]s.

use jet_stack::ensure_sufficient_stack;
use jet_value::errors::invalid_path_expression;
use jet_value::{ControlAction, Path, Value};

/// What flows between generators: a value and, in path mode, where it sits
/// relative to the root being addressed.
#[derive(Clone, Debug)]
pub(crate) struct Item {
    pub(crate) value: Value,
    pub(crate) path: Option<Path>,
}

impl Item {
    /// A plain value, outside path mode.
    #[inline]
    pub(crate) fn value(value: Value) -> Self {
        Item { value, path: None }
    }

    /// The root of a path-mode evaluation.
    #[inline]
    pub(crate) fn root(value: Value) -> Self {
        Item {
            value,
            path: Some(Path::new()),
        }
    }

    #[inline]
    pub(crate) fn in_path_mode(&self) -> bool {
        self.path.is_some()
    }
}

pub(crate) type Output = Result<Item, ControlAction>;

/// A lazily produced stream of outputs.
pub(crate) type Gen<'a> = Box<dyn Iterator<Item = Output> + 'a>;

#[inline]
pub(crate) fn one<'a>(item: Item) -> Gen<'a> {
    Box::new(std::iter::once(Ok(item)))
}

#[inline]
pub(crate) fn fail<'a>(action: impl Into<ControlAction>) -> Gen<'a> {
    Box::new(std::iter::once(Err(action.into())))
}

#[inline]
pub(crate) fn nothing<'a>() -> Gen<'a> {
    Box::new(std::iter::empty())
}

/// Outputs of a value-producing construct. In path mode each would-be
/// output is an [`InvalidPathExpression`](jet_value::EvalErrorKind) error
/// instead.
pub(crate) fn values_only<'a>(path_mode: bool, gen: Gen<'a>) -> Gen<'a> {
    if !path_mode {
        return gen;
    }
    Box::new(gen.map(|out| {
        out.and_then(|item| Err(invalid_path_expression(&item.value).into()))
    }))
}

/// Build the generator only when it is first pulled, and resume it with
/// enough stack. Calls go through here so that recursive definitions
/// neither expand eagerly nor overflow the native stack.
pub(crate) fn deferred<'a>(build: impl FnOnce() -> Gen<'a> + 'a) -> Gen<'a> {
    Box::new(Deferred {
        build: Some(build),
        gen: None,
    })
}

struct Deferred<'a, F> {
    build: Option<F>,
    gen: Option<Gen<'a>>,
}

impl<'a, F: FnOnce() -> Gen<'a>> Iterator for Deferred<'a, F> {
    type Item = Output;

    fn next(&mut self) -> Option<Output> {
        ensure_sufficient_stack(|| {
            if let Some(build) = self.build.take() {
                self.gen = Some(build());
            }
            self.gen.as_mut()?.next()
        })
    }
}

/// The first error or break, or the collected values.
pub(crate) fn collect_values(gen: Gen<'_>) -> Result<Vec<Value>, ControlAction> {
    gen.map(|out| out.map(|item| item.value)).collect()
}
