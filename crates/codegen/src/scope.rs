use std::collections::HashMap;

use log::debug;

use ir::{FuncId, Value};

/// What a name is bound to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Symbol {
    Func(FuncId),

    /// The value is a pointer to the storage of the variable, the type of the
    /// variable is the pointee type of the pointer.
    Var(Value),
}

/// A stack of scopes. The scope at index 0 is the global scope that contains
/// all functions, it is never popped. Every block pushes a new scope.
#[derive(Debug)]
pub(crate) struct ScopeStack {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self {
            scopes: vec![HashMap::default()],
        }
    }

    pub(crate) fn push(&mut self) {
        self.scopes.push(HashMap::default());
        debug!("Pushed scope, depth: {}", self.depth());
    }

    /// Pops the innermost scope. The global scope is never popped.
    pub(crate) fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        debug!("Popped scope, depth: {}", self.depth());
    }

    /// Removes all scopes except the global one.
    pub(crate) fn reset_to_global(&mut self) {
        self.scopes.truncate(1);
    }

    /// Binds `name` in the innermost scope. A existing binding with the same
    /// name in the same scope is replaced.
    pub(crate) fn insert(&mut self, name: String, symbol: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, symbol);
        }
    }

    pub(crate) fn insert_global(&mut self, name: String, symbol: Symbol) {
        if let Some(scope) = self.scopes.first_mut() {
            scope.insert(name, symbol);
        }
    }

    /// Searches for `name` from the innermost scope outwards and returns the
    /// first match.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// The amount of scopes, including the global one.
    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir::{Type, ValueKind};

    fn var(n: usize) -> Symbol {
        Symbol::Var(Value::new(
            ValueKind::Tmp(n),
            Type::Pointer(Box::new(Type::I32)),
        ))
    }

    #[test]
    fn test_lookup_innermost_first() {
        let mut scopes = ScopeStack::new();
        scopes.insert_global("f".into(), Symbol::Func(FuncId(0)));
        scopes.push();
        scopes.insert("x".into(), var(0));
        scopes.push();
        scopes.insert("x".into(), var(1));

        assert_eq!(Some(&var(1)), scopes.lookup("x"));
        assert_eq!(Some(&Symbol::Func(FuncId(0))), scopes.lookup("f"));

        scopes.pop();
        assert_eq!(Some(&var(0)), scopes.lookup("x"));

        scopes.pop();
        assert_eq!(None, scopes.lookup("x"));
    }

    #[test]
    fn test_redeclare_in_same_scope() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.insert("x".into(), var(0));
        scopes.insert("x".into(), var(1));
        assert_eq!(Some(&var(1)), scopes.lookup("x"));
    }

    #[test]
    fn test_global_scope_is_kept() {
        let mut scopes = ScopeStack::new();
        scopes.insert_global("f".into(), Symbol::Func(FuncId(3)));
        scopes.push();
        scopes.push();
        scopes.insert("x".into(), var(0));
        assert_eq!(3, scopes.depth());

        scopes.reset_to_global();
        assert_eq!(1, scopes.depth());
        assert_eq!(None, scopes.lookup("x"));
        assert!(scopes.lookup("f").is_some());

        scopes.pop();
        assert_eq!(1, scopes.depth());
        assert!(scopes.lookup("f").is_some());
    }
}
