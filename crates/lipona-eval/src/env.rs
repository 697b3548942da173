//! Scoped variable environment for the Lipona evaluator.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::value::Value;

/// Shared handle to a scope. Closures hold one to keep their defining scope alive.
pub type EnvRef = Rc<RefCell<Environment>>;

/// A single scope level with a link to its enclosing scope.
///
/// Variables are looked up from the innermost scope outward.
/// `define` always creates in this scope.
/// `assign` rebinds in the first scope where the variable exists.
#[derive(Default)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// Create an empty root scope.
    pub fn new_root() -> EnvRef {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// Create an empty scope whose parent is `parent`.
    pub fn new_child(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            bindings: BTreeMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Define (or overwrite) a variable in this scope.
    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Look up a variable, searching from this scope outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.bindings.get(name) {
            return Some(v.clone());
        }
        let mut scope = self.parent.clone();
        while let Some(env) = scope {
            let env = env.borrow();
            if let Some(v) = env.bindings.get(name) {
                return Some(v.clone());
            }
            scope = env.parent.clone();
        }
        None
    }

    /// Rebind `name` in the innermost scope that already has it; otherwise
    /// create it in this scope.
    pub fn assign(&mut self, name: &str, value: Value) {
        if self.bindings.contains_key(name) {
            self.bindings.insert(name.to_string(), value);
            return;
        }
        let mut scope = self.parent.clone();
        while let Some(env) = scope {
            let mut env_mut = env.borrow_mut();
            if let Some(slot) = env_mut.bindings.get_mut(name) {
                *slot = value;
                return;
            }
            scope = env_mut.parent.clone();
        }
        self.define(name, value);
    }

    /// Whether `name` is bound in this scope (not its parents).
    #[cfg(test)]
    pub(crate) fn has_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names bound in this scope, in sorted order.
    #[cfg(test)]
    pub(crate) fn local_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}
