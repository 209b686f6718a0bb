//! The runtime environment: a persistent, shared chain of bindings.
//!
//! The original interpreter represents `Environment` as a map copied by
//! value at every scope boundary (`Environment newEnv = env;`), relying on
//! `shared_ptr` so the copy is cheap and still shares the underlying value
//! cells. A singly-linked, `Rc`-shared chain gives the same cheap-extend,
//! shares-its-tail behaviour without copying a map on every `let`.

use std::rc::Rc;

use crate::value::Value;

#[derive(Clone, Default)]
pub struct Env(Option<Rc<Frame>>);

struct Frame {
    name: String,
    value: Value,
    parent: Env,
}

impl Env {
    pub fn empty() -> Self {
        Env(None)
    }

    pub fn extend(&self, name: impl Into<String>, value: Value) -> Env {
        Env(Some(Rc::new(Frame { name: name.into(), value, parent: self.clone() })))
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut cur = self;
        loop {
            let frame = cur.0.as_ref()?;
            if frame.name == name {
                return Some(frame.value.clone());
            }
            cur = &frame.parent;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All bound names, nearest scope first, for "did you mean" suggestions.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut cur = self;
        while let Some(frame) = cur.0.as_ref() {
            names.push(frame.name.as_str());
            cur = &frame.parent;
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_on_empty_env() {
        assert!(Env::empty().lookup("x").is_none());
    }

    #[test]
    fn extend_then_lookup_round_trips() {
        let env = Env::empty().extend("x", Value::Int(1));
        assert!(matches!(env.lookup("x"), Some(Value::Int(1))));
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let env = Env::empty().extend("x", Value::Int(1)).extend("x", Value::Int(2));
        assert!(matches!(env.lookup("x"), Some(Value::Int(2))));
    }

    #[test]
    fn extending_does_not_mutate_the_parent_env() {
        let outer = Env::empty().extend("x", Value::Int(1));
        let _inner = outer.extend("y", Value::Int(2));
        assert!(outer.lookup("y").is_none());
    }
}
