//! Evaluator for jet filters.
//!
//! A filter is compiled once by an [`Interpreter`] and then run against any
//! number of inputs. Evaluation is lazy: [`Interpreter::run`] returns an
//! iterator, and nothing past the last pulled output is computed.
//!
//! ```text
//! let interp = Interpreter::new(EvalConfig::default())?;
//! let program = interp.compile(".[] | select(. > 1)")?;
//! for out in interp.run(&program, input) {
//!     println!("{}", out?);
//! }
//! ```
//!
//! # Layout
//!
//! - `generator`: the lazy output streams everything evaluates to
//! - `env`: persistent lexical scopes and closures
//! - `interpreter`: dispatch, calls, control forms, path mode, updates
//! - `natives`: kernels written in Rust
//! - `prelude.jet`: the builtins written in jet
//! - `resolve`: undefined-name checks before a program runs

mod config;
mod env;
mod error;
mod generator;
mod interpreter;
mod natives;
mod resolve;

pub use config::EvalConfig;
pub use error::{CompileError, RunError};
pub use interpreter::{Interpreter, Outputs, Program};

#[cfg(test)]
mod tests;
