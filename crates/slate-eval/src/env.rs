//! Lexical environments for fragment evaluation.
//!
//! An environment is a stack of scopes. The bottom scope holds top-level
//! declarations; every block and call pushes a fresh scope on top. Lookup
//! walks the stack from innermost to outermost, so inner bindings shadow
//! outer ones of the same name.

use std::collections::BTreeMap;

use crate::value::Value;

/// A single lexical scope.
#[derive(Debug, Clone, Default)]
struct Scope {
    bindings: BTreeMap<String, Value>,
}

/// Saved local scopes, detached while a call body runs.
///
/// Calls see the scopes enclosing their declaration plus their own
/// parameters, never the locals of whoever called them.
/// [`Environment::isolate_above`] hands the detached scopes back as one of
/// these so [`Environment::restore`] can reattach them where they were cut.
#[derive(Debug)]
pub struct LocalScopes {
    cut: usize,
    detached: Vec<Scope>,
}

/// A stack of scopes, bottom scope global.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    /// Creates an environment with a single empty global scope.
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    /// Pushes a new empty scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pops the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a name in the innermost scope, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Looks a name up, innermost scope first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }

    /// Number of scopes currently on the stack.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Detaches every scope above the global one and returns them.
    pub fn isolate(&mut self) -> LocalScopes {
        self.isolate_above(1)
    }

    /// Detaches every scope above the outermost `keep` scopes and returns
    /// them. At least the global scope always stays attached.
    pub fn isolate_above(&mut self, keep: usize) -> LocalScopes {
        let cut = keep.clamp(1, self.scopes.len());
        LocalScopes {
            cut,
            detached: self.scopes.split_off(cut),
        }
    }

    /// Reattaches scopes previously detached with
    /// [`Environment::isolate_above`], discarding anything pushed since.
    pub fn restore(&mut self, saved: LocalScopes) {
        self.scopes.truncate(saved.cut);
        self.scopes.extend(saved.detached);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
