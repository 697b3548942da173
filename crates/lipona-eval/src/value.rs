//! Runtime values.
//!
//! Lists and maps are persistent: they sit behind an [`Rc`] and every
//! operation that "changes" one builds a new value, copying on write.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use lipona_types::ast::FuncDef;

use crate::env::EnvRef;
use crate::error::EvalResult;
use crate::evaluator::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::output::Output;

/// Integers up to this magnitude display without a fractional part (2^53).
pub const F64_SAFE_INT_MAX: f64 = 9_007_199_254_740_992.0;

/// A Lipona runtime value.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(String),
    /// `lon` / `ala`
    Bool(bool),
    /// The "nothing" value: returned by `toki`, by functions that finish
    /// without `pana`, and by lookups that miss.
    Null,
    List(Rc<Vec<Value>>),
    Map(Rc<BTreeMap<String, Value>>),
    Closure(Rc<Closure>),
    Builtin(Builtin),
}

/// A user function together with the scope it was defined in.
pub struct Closure {
    pub def: Rc<FuncDef>,
    pub env: EnvRef,
}

/// Native function signature.
pub type BuiltinFn = fn(&mut dyn Output, Vec<Value>) -> EvalResult<Value>;

/// How many arguments a builtin takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

/// A standard-library function.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub func: BuiltinFn,
}

impl Value {
    /// Build a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    /// Build a map value.
    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(Rc::new(entries))
    }

    /// Build a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// The Lipona name of this value's kind, used in fault messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "nanpa",
            Value::String(_) => "sitelen",
            Value::Bool(true) => "lon",
            Value::Bool(false) | Value::Null => "ala",
            Value::List(_) => "kulupu",
            Value::Map(_) => "nasin",
            Value::Closure(_) | Value::Builtin(_) => "ilo",
        }
    }

    /// Truthiness, used only by `la` and `wile` conditions.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Closure(_) | Value::Builtin(_) => true,
        }
    }

    /// `sama`: structural equality.
    ///
    /// `ala` the literal and the nothing value are the same; lists and maps
    /// compare element-wise, so a list holding `NaN` is never `sama` to
    /// anything, itself included; functions compare by identity; any other
    /// pair of different kinds is unequal.
    pub fn sama(&self, other: &Value) -> bool {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Null, Value::Bool(false)) | (Value::Bool(false), Value::Null) => true,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.sama(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.sama(vb))
            }
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        })
    }

    /// Move the elements of a list or map this value solely owns into
    /// `pending`, leaving it empty. Shared collections are left alone.
    fn take_children(&mut self, pending: &mut Vec<Value>) {
        match self {
            Value::List(items) => {
                if let Some(items) = Rc::get_mut(items) {
                    pending.append(items);
                }
            }
            Value::Map(entries) => {
                if let Some(entries) = Rc::get_mut(entries) {
                    pending.extend(std::mem::take(entries).into_values());
                }
            }
            _ => {}
        }
    }
}

/// Nested lists and maps are torn down with an explicit work list, so
/// dropping a deeply nested value uses constant stack.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.take_children(&mut pending);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

/// Display text: what `toki` prints and what `{expr}` splices into strings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match self {
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("lon"),
            Value::Bool(false) | Value::Null => f.write_str("ala"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Closure(closure) => {
                let params: Vec<&str> =
                    closure.def.params.iter().map(|p| p.name.as_str()).collect();
                write!(f, "<ilo {}({})>", closure.def.name.name, params.join(", "))
            }
            Value::Builtin(builtin) => write!(f, "<ilo {}>", builtin.name),
        })
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() <= F64_SAFE_INT_MAX {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Representation equality & Debug
// ══════════════════════════════════════════════════════════════════════════════

/// Exact representation equality, for tests and assertions. Unlike
/// [`Value::sama`], `ala` and nothing differ here.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Null => f.write_str("Null"),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(entries) => f.debug_map().entries(entries.iter()).finish(),
            // The captured scope may contain this closure; never print it.
            Value::Closure(closure) => write!(f, "Closure({})", closure.def.name.name),
            Value::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
        }
    }
}
