//! Static name resolution.
//!
//! Every `$var`, call and `break` must refer to something in scope before
//! a program runs. Scoping mirrors [`Env`](crate::env::Env): pattern
//! variables are visible in the body they bind, a `def` block's functions
//! are visible to each other and to the rest of the block, and parameters
//! only inside the body of their `def`.

use crate::error::CompileError;
use jet_ir::{
    ExprArena, ExprId, ExprKind, Name, ObjectPatternEntry, Param, Pattern, PatternKey,
    StringInterner, StringPart,
};
use jet_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

/// Names every program can see: natives, prelude definitions and global
/// variables.
#[derive(Default)]
pub(crate) struct Globals {
    functions: FxHashSet<(Name, usize)>,
    variables: FxHashSet<Name>,
}

impl Globals {
    pub(crate) fn add_function(&mut self, name: Name, arity: usize) {
        self.functions.insert((name, arity));
    }

    pub(crate) fn add_variable(&mut self, name: Name) {
        self.variables.insert(name);
    }

    fn has_function(&self, name: Name, arity: usize) -> bool {
        self.functions.contains(&(name, arity))
    }

    fn has_variable(&self, name: Name) -> bool {
        self.variables.contains(&name)
    }
}

/// Check that every name used under `root` is defined.
pub(crate) fn check(
    arena: &ExprArena,
    root: ExprId,
    globals: &Globals,
    interner: &StringInterner,
) -> Result<(), CompileError> {
    Resolver {
        arena,
        globals,
        interner,
        vars: Vec::new(),
        functions: Vec::new(),
        labels: Vec::new(),
    }
    .walk(root)
}

/// Scope stacks. Each binding form pushes, walks its body and truncates
/// back to where it started.
struct Resolver<'a> {
    arena: &'a ExprArena,
    globals: &'a Globals,
    interner: &'a StringInterner,
    vars: Vec<Name>,
    functions: Vec<(Name, usize)>,
    labels: Vec<Name>,
}

impl Resolver<'_> {
    fn walk(&mut self, id: ExprId) -> Result<(), CompileError> {
        ensure_sufficient_stack(|| self.walk_inner(id))
    }

    fn walk_all(&mut self, ids: impl IntoIterator<Item = ExprId>) -> Result<(), CompileError> {
        ids.into_iter().try_for_each(|id| self.walk(id))
    }

    fn walk_inner(&mut self, id: ExprId) -> Result<(), CompileError> {
        let arena = self.arena;
        match arena.kind(id) {
            ExprKind::Identity
            | ExprKind::Literal(_)
            | ExprKind::Format(_)
            | ExprKind::Loc { .. }
            | ExprKind::Array(None) => Ok(()),
            ExprKind::Str { parts, .. } => self.walk_all(parts.iter().filter_map(|part| match part {
                StringPart::Interp(id) => Some(*id),
                StringPart::Literal(_) => None,
            })),
            ExprKind::Field { target, .. }
            | ExprKind::Iterate { target }
            | ExprKind::Optional(target)
            | ExprKind::Neg(target)
            | ExprKind::Array(Some(target)) => self.walk(*target),
            ExprKind::Index { target, index } => self.walk_all([*target, *index]),
            ExprKind::Slice { target, from, to } => {
                self.walk(*target)?;
                self.walk_all(from.iter().chain(to).copied())
            }
            ExprKind::Pipe(left, right)
            | ExprKind::Comma(left, right)
            | ExprKind::And(left, right)
            | ExprKind::Or(left, right)
            | ExprKind::Alternative(left, right)
            | ExprKind::Binary { left, right, .. }
            | ExprKind::Update {
                target: left,
                value: right,
                ..
            } => self.walk_all([*left, *right]),
            ExprKind::Object(entries) => {
                self.walk_all(entries.iter().flat_map(|entry| [entry.key, entry.value]))
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.walk_all([*cond, *then_branch])?;
                self.walk_all(*else_branch)
            }
            ExprKind::Try { body, handler } => {
                self.walk(*body)?;
                self.walk_all(*handler)
            }
            ExprKind::Reduce {
                source,
                pattern,
                init,
                update,
            } => {
                self.walk_all([*source, *init])?;
                self.scoped(pattern, |this| this.walk(*update))
            }
            ExprKind::Foreach {
                source,
                pattern,
                init,
                update,
                extract,
            } => {
                self.walk_all([*source, *init])?;
                self.scoped(pattern, |this| {
                    this.walk(*update)?;
                    this.walk_all(*extract)
                })
            }
            ExprKind::Bind {
                source,
                pattern,
                body,
            } => {
                self.walk(*source)?;
                self.scoped(pattern, |this| this.walk(*body))
            }
            ExprKind::Label { name, body } => {
                self.labels.push(*name);
                let result = self.walk(*body);
                self.labels.pop();
                result
            }
            ExprKind::Break(name) => {
                if self.labels.contains(name) {
                    Ok(())
                } else {
                    Err(CompileError::UndefinedLabel {
                        name: self.text(*name),
                        span: arena.span(id),
                    })
                }
            }
            ExprKind::FuncDefs { defs, rest } => {
                let mark = self.functions.len();
                self.functions
                    .extend(defs.iter().map(|def| (def.name, def.arity())));
                for def in defs {
                    let (vars, functions) = (self.vars.len(), self.functions.len());
                    for param in &def.params {
                        match *param {
                            Param::Filter(name) => self.functions.push((name, 0)),
                            Param::Value(name) => {
                                self.vars.push(name);
                                self.functions.push((name, 0));
                            }
                        }
                    }
                    let result = self.walk(def.body);
                    self.vars.truncate(vars);
                    self.functions.truncate(functions);
                    result?;
                }
                let result = self.walk(*rest);
                self.functions.truncate(mark);
                result
            }
            ExprKind::Call { name, args } => {
                let arity = args.len();
                if !self.functions.contains(&(*name, arity))
                    && !self.globals.has_function(*name, arity)
                {
                    return Err(CompileError::UndefinedFunction {
                        name: self.text(*name),
                        arity,
                        span: arena.span(id),
                    });
                }
                self.walk_all(args.iter().copied())
            }
            ExprKind::Var(name) => {
                if self.vars.contains(name) || self.globals.has_variable(*name) {
                    Ok(())
                } else {
                    Err(CompileError::UndefinedVariable {
                        name: self.text(*name),
                        span: arena.span(id),
                    })
                }
            }
        }
    }

    /// Bind `pattern`'s variables around `body`.
    fn scoped(
        &mut self,
        pattern: &Pattern,
        body: impl FnOnce(&mut Self) -> Result<(), CompileError>,
    ) -> Result<(), CompileError> {
        let mark = self.vars.len();
        let result = self.bind(pattern).and_then(|()| body(self));
        self.vars.truncate(mark);
        result
    }

    /// Push the variables of `pattern`, checking key expressions as they
    /// are reached: each sees the variables bound before it.
    fn bind(&mut self, pattern: &Pattern) -> Result<(), CompileError> {
        match pattern {
            Pattern::Var(name) => {
                self.vars.push(*name);
                Ok(())
            }
            Pattern::Array(elements) => elements.iter().try_for_each(|p| self.bind(p)),
            Pattern::Object(entries) => entries.iter().try_for_each(|entry| self.bind_entry(entry)),
        }
    }

    fn bind_entry(&mut self, entry: &ObjectPatternEntry) -> Result<(), CompileError> {
        match entry.key {
            PatternKey::Var(name) => self.vars.push(name),
            PatternKey::Expr(key) => self.walk(key)?,
        }
        match &entry.pattern {
            Some(pattern) => self.bind(pattern),
            None => Ok(()),
        }
    }

    fn text(&self, name: Name) -> String {
        self.interner.lookup(name).to_owned()
    }
}
