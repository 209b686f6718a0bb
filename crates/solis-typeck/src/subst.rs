//! Explicit substitutions, `{var id -> replacement type}`.
//!
//! Grounded on the original interpreter's `Substitution`, which stores a
//! plain map rather than a union-find structure; composition and
//! idempotence-after-application are the properties the test suite checks.

use std::collections::BTreeMap;

use crate::ty::{Constraint, Ty};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subst(BTreeMap<u32, Ty>);

impl Subst {
    pub fn empty() -> Self {
        Subst(BTreeMap::new())
    }

    pub fn singleton(var: u32, ty: Ty) -> Self {
        let mut m = BTreeMap::new();
        m.insert(var, ty);
        Subst(m)
    }

    pub(crate) fn from_map(map: BTreeMap<u32, Ty>) -> Self {
        Subst(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, var: u32) -> Option<&Ty> {
        self.0.get(&var)
    }

    /// Capture-avoiding: under `Forall`, only substitutes ids not in the
    /// quantified set.
    pub fn apply(&self, ty: &Ty) -> Ty {
        match ty {
            Ty::Var { id, hint } => self.0.get(id).cloned().unwrap_or_else(|| Ty::Var { id: *id, hint: hint.clone() }),
            Ty::Con { name, args } => Ty::Con {
                name: name.clone(),
                args: args.iter().map(|a| self.apply(a)).collect(),
            },
            Ty::Fun { from, to } => Ty::fun(self.apply(from), self.apply(to)),
            Ty::Qual { constraints, body } => Ty::qual(
                constraints
                    .iter()
                    .map(|c| Constraint { op: c.op.clone(), witness: self.apply(&c.witness) })
                    .collect(),
                self.apply(body),
            ),
            Ty::Forall { quantified, body } => {
                let restricted = Subst(self.0.iter().filter(|(k, _)| !quantified.contains(k)).map(|(k, v)| (*k, v.clone())).collect());
                Ty::Forall { quantified: quantified.clone(), body: Box::new(restricted.apply(body)) }
            }
        }
    }

    /// `self.compose(other)` = apply `self` to every type in `other`'s range,
    /// then add `self`'s own bindings for ids not already in `other`. Matches
    /// the spec's `s2 ∘ s1` written as `s2.compose(s1)`.
    pub fn compose(&self, other: &Subst) -> Subst {
        let mut result: BTreeMap<u32, Ty> = other.0.iter().map(|(k, v)| (*k, self.apply(v))).collect();
        for (k, v) in &self.0 {
            result.entry(*k).or_insert_with(|| v.clone());
        }
        Subst(result)
    }
}
