//! Runtime values and the thunk machinery that backs laziness and
//! forward/recursive top-level bindings.
//!
//! Grounded on `interpreter.cpp`'s `Value` variant set (`StringValue`,
//! `IntValue`, `FloatValue`, `BoolValue`, `BigIntValue`, `ListValue`,
//! `RecordValue`, `ConstructorValue`, `FunctionValue`, `ThunkValue`) and its
//! `ValuePtr = shared_ptr<Value>` sharing model. `Rc` plays the role of
//! `shared_ptr`; `Thunk` plays the role of the original's pattern of mutating
//! a placeholder `ValuePtr`'s pointee once a recursive binding's value is
//! known, made explicit here via `RefCell` since Rust won't let two owners
//! quietly share a mutable pointee the way `shared_ptr<Value>` does.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use solis_common::SourceLocation;
use solis_errors::{taxonomy, SolisError};

#[derive(Clone)]
pub enum Value {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    Str(Rc<str>),
    Bool(bool),
    List(Rc<Vec<Value>>),
    Record(Rc<BTreeMap<String, Value>>),
    Constructor { name: Rc<str>, args: Rc<Vec<Value>> },
    /// Every call site threads its own location through, so a builtin or
    /// closure can report a precise error for the call that went wrong
    /// rather than the (irrelevant) location where the function was made.
    Function(Rc<dyn Fn(Value, SourceLocation) -> Result<Value, SolisError>>),
    Thunk(Thunk),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn list(elements: Vec<Value>) -> Value {
        Value::List(Rc::new(elements))
    }

    /// A short name for diagnostics; not a type-system type, just a label.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::BigInt(_) => "BigInt",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Bool(_) => "Bool",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
            Value::Constructor { .. } => "Constructor",
            Value::Function(_) => "Function",
            Value::Thunk(_) => "Thunk",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.kind())
    }
}

enum ThunkState {
    /// Not yet evaluated; holds the computation to run exactly once.
    Suspended(Box<dyn FnOnce() -> Result<Value, SolisError>>),
    /// Bound into an environment as a placeholder, ahead of the expression
    /// it stands for being evaluated; used for recursive/forward `let`s.
    Pending,
    /// Currently being forced -- forcing it again means a value referenced
    /// itself before its own definition finished evaluating.
    InProgress,
    Forced(Value),
}

/// A lazily-produced, memoized value, shared by every reference to it.
///
/// Used for two distinct purposes, mirroring the original interpreter: zero
/// parameter declarations become thunks so forward references to them don't
/// need to evaluate the body up front (`ThunkValue`), and `let rec` bindings
/// install a [`Thunk::pending`] placeholder so the bound name resolves
/// inside its own defining expression (the original's mutated-placeholder
/// trick).
#[derive(Clone)]
pub struct Thunk(Rc<std::cell::RefCell<ThunkState>>);

impl Thunk {
    pub fn suspended(f: impl FnOnce() -> Result<Value, SolisError> + 'static) -> Self {
        Thunk(Rc::new(std::cell::RefCell::new(ThunkState::Suspended(Box::new(f)))))
    }

    pub fn pending() -> Self {
        Thunk(Rc::new(std::cell::RefCell::new(ThunkState::Pending)))
    }

    /// Supplies the value for a placeholder created via [`Thunk::pending`].
    pub fn fill(&self, value: Value) {
        *self.0.borrow_mut() = ThunkState::Forced(value);
    }

    pub fn force(&self, location: SourceLocation) -> Result<Value, SolisError> {
        let state = std::mem::replace(&mut *self.0.borrow_mut(), ThunkState::InProgress);
        match state {
            ThunkState::Forced(v) => {
                *self.0.borrow_mut() = ThunkState::Forced(v.clone());
                Ok(v)
            }
            ThunkState::Pending | ThunkState::InProgress => Err(taxonomy::refutable_binding(
                "value referenced before its own recursive definition finished evaluating",
                location,
            )),
            ThunkState::Suspended(f) => {
                let v = f()?;
                *self.0.borrow_mut() = ThunkState::Forced(v.clone());
                Ok(v)
            }
        }
    }
}

/// Resolves a value to its non-thunk form, recursively, mirroring
/// `Interpreter::force`.
pub fn force(value: Value, location: SourceLocation) -> Result<Value, SolisError> {
    match value {
        Value::Thunk(thunk) => {
            let forced = thunk.force(location)?;
            force(forced, location)
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::single(1, 1)
    }

    #[test]
    fn forcing_a_plain_value_is_a_no_op() {
        assert!(matches!(force(Value::Int(5), loc()), Ok(Value::Int(5))));
    }

    #[test]
    fn suspended_thunk_is_memoized() {
        let calls = Rc::new(std::cell::RefCell::new(0));
        let calls2 = calls.clone();
        let thunk = Thunk::suspended(move || {
            *calls2.borrow_mut() += 1;
            Ok(Value::Int(42))
        });
        thunk.force(loc()).unwrap();
        thunk.force(loc()).unwrap();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn pending_placeholder_forces_once_filled() {
        let thunk = Thunk::pending();
        thunk.fill(Value::Bool(true));
        assert!(matches!(thunk.force(loc()), Ok(Value::Bool(true))));
    }

    #[test]
    fn forcing_an_unfilled_placeholder_is_an_error() {
        let thunk = Thunk::pending();
        assert!(thunk.force(loc()).is_err());
    }
}
