//! Runtime values for jet.
//!
//! - [`Value`]: the JSON value domain plus Absent, with a total order
//! - [`access`]: indexing, slicing and iteration
//! - [`ops`]: the arithmetic and comparison operators
//! - [`path`]: [`Path`]s and the `getpath`/`setpath`/`delpaths` kernels
//! - [`errors`]: the runtime error taxonomy and control signals
//! - [`codec`]: JSON text in and out

pub mod access;
pub mod codec;
pub mod errors;
pub mod ops;
pub mod path;
mod value;

pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult, LabelId};
pub use path::{Path, PathSegment};
pub use value::{compare, Heap, Map, Value};
