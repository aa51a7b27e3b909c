// ABOUTME: Environment frames for lexical scoping with a mutable top level

use crate::error::EvalError;
use crate::value::Form;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A stack of frames, innermost first. The frame with no parent is the global
/// environment; every environment handed to the evaluator bottoms out there.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Form>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Raw insert into THIS frame. Host seeding, imports, and call frames go
    /// through here; user-level `define` goes through [`Environment::define`].
    pub fn insert(&self, name: String, value: Form) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Binds `name` in this frame. A binding anywhere in the chain makes this
    /// a redefinition; shadowing is reserved for call frames and `let`.
    pub fn define(&self, name: &str, value: Form) -> Result<(), EvalError> {
        if self.is_bound(name) {
            return Err(EvalError::Redefinition(name.to_string()));
        }
        self.insert(name.to_string(), value);
        Ok(())
    }

    /// Looks a symbol up in this frame and parent frames, innermost first
    pub fn lookup(&self, name: &str) -> Option<Form> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.lookup(name);
        }

        None
    }

    pub fn is_bound(&self, name: &str) -> bool {
        if self.bindings.borrow().contains_key(name) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.is_bound(name),
            None => false,
        }
    }

    /// Replaces an existing binding in whichever frame holds it (`set!`)
    pub fn set(&self, name: &str, value: Form) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }

        if let Some(ref parent) = self.parent {
            return parent.set(name, value);
        }

        Err(EvalError::UnknownSymbol(name.to_string()))
    }

    /// Child frame holding the zipped bindings; every procedure call makes one
    pub fn extend(parent: Rc<Environment>, names: &[String], values: Vec<Form>) -> Rc<Self> {
        let child = Environment::with_parent(parent);
        for (name, value) in names.iter().zip(values) {
            child.insert(name.clone(), value);
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let env = Environment::new();
        env.define("x", Form::Int(42)).unwrap();

        match env.lookup("x") {
            Some(Form::Int(n)) => assert_eq!(n, 42),
            _ => panic!("Expected Int(42)"),
        }
    }

    #[test]
    fn test_unknown_symbol() {
        let env = Environment::new();
        assert!(env.lookup("undefined").is_none());
    }

    #[test]
    fn test_redefinition_in_same_frame() {
        let env = Environment::new();
        env.define("x", Form::Int(1)).unwrap();
        let result = env.define("x", Form::Int(2));
        assert!(matches!(result, Err(EvalError::Redefinition(name)) if name == "x"));
    }

    #[test]
    fn test_redefinition_of_outer_binding() {
        let parent = Environment::new();
        parent.define("x", Form::Int(1)).unwrap();

        // define never shadows; only call frames do
        let child = Environment::with_parent(parent);
        let result = child.define("x", Form::Int(2));
        assert!(matches!(result, Err(EvalError::Redefinition(_))));
    }

    #[test]
    fn test_call_frame_shadowing() {
        let parent = Environment::new();
        parent.define("x", Form::Int(42)).unwrap();

        let child = Environment::extend(parent.clone(), &["x".to_string()], vec![Form::Int(100)]);
        match child.lookup("x") {
            Some(Form::Int(n)) => assert_eq!(n, 100),
            _ => panic!("Expected Int(100)"),
        }

        // The outer binding is untouched
        match parent.lookup("x") {
            Some(Form::Int(n)) => assert_eq!(n, 42),
            _ => panic!("Expected Int(42)"),
        }
    }

    #[test]
    fn test_parent_lookup_through_levels() {
        let grandparent = Environment::new();
        grandparent.define("a", Form::Int(1)).unwrap();

        let parent = Environment::with_parent(grandparent);
        parent.define("b", Form::Int(2)).unwrap();

        let child = Environment::with_parent(parent);
        child.define("c", Form::Int(3)).unwrap();

        for (name, expected) in [("a", 1), ("b", 2), ("c", 3)] {
            match child.lookup(name) {
                Some(Form::Int(n)) => assert_eq!(n, expected),
                _ => panic!("Expected Int({})", expected),
            }
        }
    }

    #[test]
    fn test_set_walks_the_chain() {
        let parent = Environment::new();
        parent.define("x", Form::Int(1)).unwrap();

        let child = Environment::with_parent(parent.clone());
        child.set("x", Form::Int(2)).unwrap();

        match parent.lookup("x") {
            Some(Form::Int(n)) => assert_eq!(n, 2),
            _ => panic!("Expected Int(2)"),
        }
    }

    #[test]
    fn test_set_of_unbound_symbol() {
        let env = Environment::new();
        let result = env.set("ghost", Form::Int(1));
        assert!(matches!(result, Err(EvalError::UnknownSymbol(name)) if name == "ghost"));
    }

    #[test]
    fn test_extend_zips_names_and_values() {
        let global = Environment::new();
        let env = Environment::extend(
            global,
            &["x".to_string(), "y".to_string()],
            vec![Form::Int(1), Form::Int(2)],
        );
        assert_eq!(env.lookup("x"), Some(Form::Int(1)));
        assert_eq!(env.lookup("y"), Some(Form::Int(2)));
    }
}
