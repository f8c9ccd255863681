//! The generator interpreter.
//!
//! Every node evaluates to a lazy [`Gen`] of [`Item`]s. An item outside
//! path mode is just a value; in path mode it also carries the [`Path`](jet_value::Path)
//! from the root being addressed, which is how `path(f)`, `del`, `|=` and
//! friends find their targets without copying the tree.
//!
//! # Arena threading
//!
//! The prelude and each compiled [`Program`] own separate arenas. Every
//! closure and `def` binding in an [`Env`] remembers the arena its body
//! lives in, and evaluation always switches to the callee's arena at a
//! call.
//!
//! - `eval.rs`: the main dispatch and the structural forms
//! - `call.rs`: function calls, parameter binding, natives
//! - `bind.rs`: `as` destructuring
//! - `control.rs`: `try`, `//`, `reduce`, `foreach`, `label`
//! - `update.rs`: the assignment operators

mod bind;
mod call;
mod control;
mod eval;
mod update;

use crate::config::EvalConfig;
use crate::env::Env;
use crate::error::{CompileError, RunError};
use crate::generator::{Gen, Item};
use crate::natives::Natives;
use crate::resolve::{self, Globals};
use jet_ir::{ExprArena, ExprId, ExprKind, FuncDef, Name, StringInterner};
use jet_parse::Parsed;
use jet_value::{ControlAction, LabelId, Map, Value};
use std::cell::Cell;

const PRELUDE: &str = include_str!("../prelude.jet");

/// A filter that parsed and resolved against one [`Interpreter`].
///
/// Names inside are interned in that interpreter's table, so a program
/// must be run by the interpreter that compiled it.
#[derive(Clone, Debug)]
pub struct Program {
    parsed: Parsed,
}

impl Program {
    pub fn arena(&self) -> &ExprArena {
        &self.parsed.arena
    }

    pub fn root(&self) -> ExprId {
        self.parsed.root
    }
}

/// Names looked up on hot paths, interned once.
#[derive(Clone, Copy)]
pub(crate) struct WellKnownNames {
    pub(crate) env: Name,
}

impl WellKnownNames {
    fn new(interner: &StringInterner) -> Self {
        WellKnownNames {
            env: interner.intern("ENV"),
        }
    }
}

/// Evaluator state shared by every run: the interner, the prelude, the
/// native table and the configuration.
pub struct Interpreter {
    interner: StringInterner,
    prelude: Parsed,
    natives: Natives,
    config: EvalConfig,
    names: WellKnownNames,
    globals: Globals,
    builtins: Vec<String>,
    next_label: Cell<u64>,
}

impl Interpreter {
    /// Parse and check the prelude.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new(config: EvalConfig) -> Result<Self, CompileError> {
        let interner = StringInterner::new();
        let natives = Natives::new(&interner);
        let names = WellKnownNames::new(&interner);

        let mut globals = Globals::default();
        for &(name, arity) in natives.signatures() {
            globals.add_function(interner.intern(name), arity);
        }
        globals.add_variable(names.env);
        for (name, _) in config.vars() {
            globals.add_variable(interner.intern(name));
        }

        let prelude = jet_parse::parse(PRELUDE, &interner)?;
        resolve::check(&prelude.arena, prelude.root, &globals, &interner)?;

        let mut builtins: Vec<String> = natives
            .signatures()
            .iter()
            .map(|&(name, arity)| format!("{name}/{arity}"))
            .collect();
        for def in prelude_defs(&prelude) {
            globals.add_function(def.name, def.arity());
            builtins.push(format!("{}/{}", interner.lookup(def.name), def.arity()));
        }
        builtins.retain(|sig| !sig.starts_with('_'));
        builtins.sort_unstable();
        builtins.dedup();

        tracing::debug!(
            natives = natives.signatures().len(),
            builtins = builtins.len(),
            "loaded prelude"
        );
        Ok(Interpreter {
            interner,
            prelude,
            natives,
            config,
            names,
            globals,
            builtins,
            next_label: Cell::new(0),
        })
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Parse `source` and check that every name it uses is defined.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile(&self, source: &str) -> Result<Program, CompileError> {
        let parsed = jet_parse::parse(source, &self.interner)?;
        resolve::check(&parsed.arena, parsed.root, &self.globals, &self.interner)?;
        Ok(Program { parsed })
    }

    /// Run `program` on one input. Outputs are produced as they are pulled.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run<'a>(&'a self, program: &'a Program, input: Value) -> Outputs<'a> {
        let env = self.base_env();
        let gen = self.eval(program.arena(), program.root(), env, Item::value(input));
        Outputs { gen: Some(gen) }
    }

    /// The global variables, then the prelude. Prelude bodies close over
    /// the variables, so `env` can read `$ENV`.
    fn base_env(&self) -> Env<'_> {
        let mut env = Env::new().bind_var(self.names.env, self.env_object());
        for (name, value) in self.config.vars() {
            env = env.bind_var(self.interner.intern(name), value.clone());
        }
        env.bind_defs(&self.prelude.arena, prelude_defs(&self.prelude))
    }

    fn env_object(&self) -> Value {
        if !self.config.exposes_env() {
            return Value::empty_object();
        }
        let vars: Map = std::env::vars_os()
            .filter_map(|(key, value)| {
                Some((key.into_string().ok()?, Value::string(value.into_string().ok()?)))
            })
            .collect();
        Value::object(vars)
    }

    pub(crate) fn builtins(&self) -> &[String] {
        &self.builtins
    }

    pub(crate) fn fresh_label(&self) -> LabelId {
        let id = self.next_label.get();
        self.next_label.set(id + 1);
        LabelId::new(id)
    }
}

fn prelude_defs(prelude: &Parsed) -> &[FuncDef] {
    match prelude.arena.kind(prelude.root) {
        ExprKind::FuncDefs { defs, .. } => defs,
        _ => &[],
    }
}

/// The outputs of one run.
///
/// Yields values until the filter is exhausted. An uncaught error or a
/// `break` with no enclosing `label` is yielded as the final element.
pub struct Outputs<'a> {
    gen: Option<Gen<'a>>,
}

impl Iterator for Outputs<'_> {
    type Item = Result<Value, RunError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.gen.as_mut()?.next();
        match next {
            Some(Ok(item)) => Some(Ok(item.value.materialize())),
            Some(Err(action)) => {
                self.gen = None;
                Some(Err(match action {
                    ControlAction::Error(err) => RunError::Eval(*err),
                    ControlAction::Break(_) => RunError::UnmatchedBreak,
                }))
            }
            None => {
                self.gen = None;
                None
            }
        }
    }
}
