//! Type schemes: `forall <quantified>. ty`, kept separate from [`crate::ty::Ty::Forall`]
//! so that environment bindings don't need to unwrap a `Ty` variant on every
//! lookup.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::subst::Subst;
use crate::ty::{free_vars, Ty};
use crate::var::TyVarGen;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeScheme {
    pub quantified: BTreeSet<u32>,
    pub ty: Ty,
}

impl TypeScheme {
    pub fn monomorphic(ty: Ty) -> Self {
        TypeScheme { quantified: BTreeSet::new(), ty }
    }

    pub fn new(quantified: BTreeSet<u32>, ty: Ty) -> Self {
        TypeScheme { quantified, ty }
    }

    /// Renames every quantified id to a fresh one. If the result is itself a
    /// `Forall` (nested quantifiers produced by parsing an explicit
    /// annotation), unwraps and instantiates once more -- this exists only
    /// to normalize parser output, not to support rank-N polymorphism.
    pub fn instantiate(&self, gen: &mut TyVarGen) -> Ty {
        let mapping: std::collections::BTreeMap<u32, Ty> =
            self.quantified.iter().map(|&v| (v, gen.fresh_named(""))).collect();
        let subst = Subst::from_map(mapping);
        let instantiated = subst.apply(&self.ty);

        if let Ty::Forall { quantified, body } = &instantiated {
            let inner_mapping: std::collections::BTreeMap<u32, Ty> =
                quantified.iter().map(|&v| (v, gen.fresh_named(""))).collect();
            let inner_subst = Subst::from_map(inner_mapping);
            return inner_subst.apply(body);
        }
        instantiated
    }

    pub fn free_vars(&self) -> FxHashSet<u32> {
        let mut vars = free_vars(&self.ty);
        for q in &self.quantified {
            vars.remove(q);
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_renames_quantified_vars() {
        let mut gen = TyVarGen::new();
        let a = gen.fresh_named("a");
        let a_id = if let Ty::Var { id, .. } = &a { *id } else { unreachable!() };
        let scheme = TypeScheme::new(BTreeSet::from([a_id]), Ty::fun(a.clone(), a));
        let t1 = scheme.instantiate(&mut gen);
        let t2 = scheme.instantiate(&mut gen);
        assert_ne!(t1, t2, "two instantiations must produce distinct fresh variables");
    }

    #[test]
    fn instantiate_unwraps_nested_forall() {
        let mut gen = TyVarGen::new();
        let inner_var = gen.fresh_named("b");
        let inner_id = if let Ty::Var { id, .. } = &inner_var { *id } else { unreachable!() };
        let nested = Ty::Forall {
            quantified: BTreeSet::from([inner_id]),
            body: Box::new(inner_var),
        };
        let scheme = TypeScheme::new(BTreeSet::new(), nested);
        let result = scheme.instantiate(&mut gen);
        assert!(!matches!(result, Ty::Forall { .. }));
    }

    #[test]
    fn monomorphic_scheme_has_no_free_quantified_vars() {
        let scheme = TypeScheme::monomorphic(Ty::int());
        assert!(scheme.free_vars().is_empty());
    }
}
