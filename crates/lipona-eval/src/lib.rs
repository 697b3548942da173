//! Lipona tree-walking evaluator.
//!
//! Executes a parsed [`Program`](lipona_types::ast::Program) directly: a
//! chain of reference-counted scopes, persistent list and map values, and a
//! standard library of builtins bound into every fresh root scope.

pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
mod interpolate;
pub mod output;
pub mod stdlib;
pub mod value;

pub use config::{EvalConfig, DEFAULT_MAX_CALL_DEPTH};
pub use env::{EnvRef, Environment};
pub use error::{EvalResult, ExecResult, Pakala};
pub use evaluator::Evaluator;
pub use output::{Output, StdoutOutput};
pub use value::{Arity, Builtin, Closure, Value};
