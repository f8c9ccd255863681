//! Lexical environments.
//!
//! An [`Env`] is an immutable, reference-counted chain of frames. Binding a
//! name pushes a frame and returns a new `Env`; the old one is untouched, so
//! closures captured earlier keep seeing exactly what they saw.
//!
//! Function lookup inside a `def` block: the body of the `i`th definition
//! sees definitions `i, i-1, ..., 0` first, then `i+1, ...`, then the frames
//! outside the block. The block's continuation sees all of them, latest
//! first.

use jet_ir::{ExprArena, ExprId, FuncDef, Name};
use jet_value::{LabelId, Value};
use std::rc::Rc;

/// Persistent scope chain. Cloning is a reference-count bump.
#[derive(Clone, Default)]
pub(crate) struct Env<'a>(Option<Rc<Frame<'a>>>);

struct Frame<'a> {
    binding: Binding<'a>,
    parent: Env<'a>,
}

enum Binding<'a> {
    /// `$name`. Value parameters are also callable as `name/0`.
    Var {
        name: Name,
        value: Value,
        callable: bool,
    },
    /// One `def` block, visible up to and including `upto` first.
    Defs {
        arena: &'a ExprArena,
        defs: &'a [FuncDef],
        upto: usize,
    },
    /// Filter parameter: the caller's argument and environment.
    Closure {
        name: Name,
        arena: &'a ExprArena,
        body: ExprId,
        env: Env<'a>,
    },
    Label {
        name: Name,
        id: LabelId,
    },
}

/// Result of resolving a call.
pub(crate) enum Callee<'a> {
    /// A `def`; `env` is the scope its body runs in, before parameters.
    Def {
        arena: &'a ExprArena,
        def: &'a FuncDef,
        env: Env<'a>,
    },
    Closure {
        arena: &'a ExprArena,
        body: ExprId,
        env: Env<'a>,
    },
    /// Value parameter called as a filter.
    Value(Value),
}

impl<'a> Env<'a> {
    pub(crate) fn new() -> Self {
        Env(None)
    }

    fn push(&self, binding: Binding<'a>) -> Self {
        Env(Some(Rc::new(Frame {
            binding,
            parent: self.clone(),
        })))
    }

    #[must_use]
    pub(crate) fn bind_var(&self, name: Name, value: Value) -> Self {
        self.push(Binding::Var {
            name,
            value,
            callable: false,
        })
    }

    /// `$name` that is also callable as `name`.
    #[must_use]
    pub(crate) fn bind_value_param(&self, name: Name, value: Value) -> Self {
        self.push(Binding::Var {
            name,
            value,
            callable: true,
        })
    }

    #[must_use]
    pub(crate) fn bind_closure(
        &self,
        name: Name,
        arena: &'a ExprArena,
        body: ExprId,
        env: Env<'a>,
    ) -> Self {
        self.push(Binding::Closure {
            name,
            arena,
            body,
            env,
        })
    }

    /// Bring a whole `def` block into scope for the code that follows it.
    #[must_use]
    pub(crate) fn bind_defs(&self, arena: &'a ExprArena, defs: &'a [FuncDef]) -> Self {
        self.push(Binding::Defs {
            arena,
            defs,
            upto: defs.len().saturating_sub(1),
        })
    }

    #[must_use]
    pub(crate) fn bind_label(&self, name: Name, id: LabelId) -> Self {
        self.push(Binding::Label { name, id })
    }

    fn frames(&self) -> impl Iterator<Item = &Frame<'a>> {
        std::iter::successors(self.0.as_deref(), |frame| frame.parent.0.as_deref())
    }

    pub(crate) fn var(&self, name: Name) -> Option<&Value> {
        self.frames().find_map(|frame| match &frame.binding {
            Binding::Var { name: n, value, .. } if *n == name => Some(value),
            _ => None,
        })
    }

    pub(crate) fn label(&self, name: Name) -> Option<LabelId> {
        self.frames().find_map(|frame| match frame.binding {
            Binding::Label { name: n, id } if n == name => Some(id),
            _ => None,
        })
    }

    /// Resolve `name/arity` lexically. `None` means "try the natives".
    pub(crate) fn function(&self, name: Name, arity: usize) -> Option<Callee<'a>> {
        for frame in self.frames() {
            match &frame.binding {
                Binding::Var {
                    name: n,
                    value,
                    callable: true,
                } if arity == 0 && *n == name => return Some(Callee::Value(value.clone())),
                Binding::Closure {
                    name: n,
                    arena,
                    body,
                    env,
                } if arity == 0 && *n == name => {
                    return Some(Callee::Closure {
                        arena: *arena,
                        body: *body,
                        env: env.clone(),
                    })
                }
                Binding::Defs { arena, defs, upto } => {
                    let (arena, defs, upto): (&'a ExprArena, &'a [FuncDef], usize) =
                        (*arena, *defs, *upto);
                    let earlier = defs.iter().enumerate().take(upto + 1).rev();
                    let later = defs.iter().enumerate().skip(upto + 1);
                    let found = earlier
                        .chain(later)
                        .find(|(_, def)| def.name == name && def.arity() == arity);
                    if let Some((index, def)) = found {
                        let env = frame.parent.push(Binding::Defs {
                            arena,
                            defs,
                            upto: index,
                        });
                        return Some(Callee::Def { arena, def, env });
                    }
                }
                _ => {}
            }
        }
        None
    }
}
