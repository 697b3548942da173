//! Runtime fault types for the Lipona evaluator.

use thiserror::Error;

use crate::value::Value;

/// A fatal runtime fault.
///
/// A fault halts the whole program immediately; there is no way to catch one
/// from inside the language.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Pakala {
    #[error("pakala: unbound variable '{0}'")]
    UnboundVariable(String),

    #[error("pakala: division by zero")]
    DivisionByZero,

    #[error("pakala: type mismatch - {0}")]
    TypeMismatch(String),

    #[error("pakala: wrong number of arguments for '{name}' - expected {expected}, got {got}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("pakala: index out of range - {index} is not below {len}")]
    IndexOutOfRange { index: f64, len: usize },

    #[error("pakala: invalid index {0} - indices are whole numbers")]
    InvalidIndex(f64),

    #[error("pakala: cannot read {0:?} as a number")]
    UnparsableNumber(String),

    #[error("pakala: '{name}' is {got}, not a function")]
    NotCallable { name: String, got: &'static str },

    #[error("pakala: bad embedded expression {{{code}}} - {message}")]
    Interpolation { code: String, message: String },

    #[error("pakala: maximum call depth of {0} exceeded")]
    StackOverflow(usize),

    #[error("pakala: loop exceeded {0} iterations")]
    LoopLimit(u64),
}

impl Pakala {
    /// A type mismatch where one kind of value was expected.
    pub fn expected(expected: &str, got: &Value) -> Self {
        Pakala::TypeMismatch(format!("expected {expected}, got {}", got.type_name()))
    }
}

/// How a statement or block finished.
///
/// `Returned` is control flow, not an error: it unwinds to the nearest
/// function call, or ends the program at top level.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    Completed,
    Returned(Value),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, Pakala>;
