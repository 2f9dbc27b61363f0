use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::evaluator::Value;

/*
A scope is a name -> value map plus an optional link to the scope that encloses it; lookup
walks outward until it finds a binding or runs out of parents. Bindings live behind a
`RefCell` and the whole environment behind an `Rc` so a closure can hold a live, shared handle
to the scope it was created in - not a snapshot of it. That sharing is what lets a recursive
`let fact = function(n) { ... fact(n - 1) ... }` see its own binding: the function literal
captures this environment before the enclosing `let` inserts `fact`'s binding into it.
*/
#[derive(Debug)]
pub struct Environment {
    store: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    pub fn new_enclosed(outer: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(Rc::clone(outer)),
        })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.store.borrow_mut().insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward_through_enclosing_scopes() {
        let outer = Environment::new();
        outer.set("x", Value::Integer(1));

        let inner = Environment::new_enclosed(&outer);
        assert!(matches!(inner.get("x"), Some(Value::Integer(1))));
        assert!(inner.get("missing").is_none());
    }

    #[test]
    fn inner_binding_shadows_outer_without_mutating_it() {
        let outer = Environment::new();
        outer.set("x", Value::Integer(1));

        let inner = Environment::new_enclosed(&outer);
        inner.set("x", Value::Integer(2));

        assert!(matches!(inner.get("x"), Some(Value::Integer(2))));
        assert!(matches!(outer.get("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn rebinding_through_a_shared_environment_is_visible_to_holders_of_the_same_rc() {
        let env = Environment::new();
        env.set("x", Value::Integer(1));
        let captured = Rc::clone(&env);

        env.set("x", Value::Integer(2));

        assert!(matches!(captured.get("x"), Some(Value::Integer(2))));
    }
}
