//! The unifier: a deterministic, five-case algorithm with an occurs check.
//!
//! Grounded on `unify()` in the original `typer.cpp`: same-variable check,
//! var-vs-anything with occurs check, function domain/codomain recursion,
//! constructor argument-wise recursion, and failure otherwise.

use solis_common::SourceLocation;
use solis_errors::{taxonomy, SolisError};

use crate::subst::Subst;
use crate::ty::{free_vars, Ty};

pub fn occurs(var: u32, ty: &Ty) -> bool {
    free_vars(ty).contains(&var)
}

pub fn unify(t1: &Ty, t2: &Ty, location: SourceLocation) -> Result<Subst, SolisError> {
    match (t1, t2) {
        (Ty::Var { id: id1, .. }, Ty::Var { id: id2, .. }) if id1 == id2 => Ok(Subst::empty()),
        (Ty::Var { id, .. }, other) | (other, Ty::Var { id, .. }) => {
            if occurs(*id, other) {
                return Err(taxonomy::infinite_type(&format!("t{id}"), &other.to_string(), location));
            }
            Ok(Subst::singleton(*id, other.clone()))
        }
        (Ty::Fun { from: f1, to: t1_ }, Ty::Fun { from: f2, to: t2_ }) => {
            let s1 = unify(f1, f2, location)?;
            let s2 = unify(&s1.apply(t1_), &s1.apply(t2_), location)?;
            Ok(s2.compose(&s1))
        }
        (Ty::Con { name: n1, args: a1 }, Ty::Con { name: n2, args: a2 }) => {
            if n1 != n2 || a1.len() != a2.len() {
                return Err(taxonomy::type_mismatch(&t1.to_string(), &t2.to_string(), location));
            }
            let mut subst = Subst::empty();
            for (arg1, arg2) in a1.iter().zip(a2.iter()) {
                let s = unify(&subst.apply(arg1), &subst.apply(arg2), location)?;
                subst = s.compose(&subst);
            }
            Ok(subst)
        }
        (Ty::Qual { body: b1, .. }, _) => unify(b1, t2, location),
        (_, Ty::Qual { body: b2, .. }) => unify(t1, b2, location),
        _ => Err(taxonomy::type_mismatch(&t1.to_string(), &t2.to_string(), location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::single(1, 1)
    }

    #[test]
    fn unifies_identical_vars_with_empty_subst() {
        let v = Ty::Var { id: 0, hint: "a".into() };
        let s = unify(&v, &v, loc()).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn unifies_var_with_concrete_type() {
        let v = Ty::Var { id: 0, hint: "a".into() };
        let s = unify(&v, &Ty::int(), loc()).unwrap();
        assert_eq!(s.apply(&v), Ty::int());
    }

    #[test]
    fn occurs_check_rejects_infinite_type() {
        let v = Ty::Var { id: 0, hint: "a".into() };
        let rec = Ty::list(v.clone());
        assert!(unify(&v, &rec, loc()).is_err());
    }

    #[test]
    fn unifies_function_types_recursively() {
        let f1 = Ty::fun(Ty::Var { id: 0, hint: "a".into() }, Ty::int());
        let f2 = Ty::fun(Ty::bool(), Ty::Var { id: 1, hint: "b".into() });
        let s = unify(&f1, &f2, loc()).unwrap();
        assert_eq!(s.apply(&Ty::Var { id: 0, hint: "a".into() }), Ty::bool());
        assert_eq!(s.apply(&Ty::Var { id: 1, hint: "b".into() }), Ty::int());
    }

    #[test]
    fn fails_on_constructor_arity_mismatch() {
        let pair2 = Ty::con("Pair", vec![Ty::int(), Ty::int()]);
        let pair1 = Ty::con("Pair", vec![Ty::int()]);
        assert!(unify(&pair2, &pair1, loc()).is_err());
    }

    #[test]
    fn fails_on_unrelated_constructors() {
        assert!(unify(&Ty::int(), &Ty::bool(), loc()).is_err());
    }

    #[test]
    fn unifies_nested_constructor_args() {
        let a = Ty::list(Ty::Var { id: 0, hint: "a".into() });
        let b = Ty::list(Ty::int());
        let s = unify(&a, &b, loc()).unwrap();
        assert_eq!(s.apply(&Ty::Var { id: 0, hint: "a".into() }), Ty::int());
    }
}
