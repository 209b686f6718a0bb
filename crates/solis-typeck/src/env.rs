//! The typing environment: a map from name to type scheme, plus the builtin
//! registry (C6) as its initial contents.

use rustc_hash::{FxHashMap, FxHashSet};

use solis_common::suggest::find_similar_names;

use crate::scheme::TypeScheme;
use crate::subst::Subst;
use crate::ty::Ty;
use crate::var::TyVarGen;

#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    bindings: FxHashMap<String, TypeScheme>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Suggests near-miss names (Levenshtein <= 2) for an undefined lookup.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let candidates: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        find_similar_names(name, candidates, 2).into_iter().map(str::to_string).collect()
    }

    pub fn extend(&mut self, name: impl Into<String>, scheme: TypeScheme) {
        self.bindings.insert(name.into(), scheme);
    }

    pub fn extend_mono(&mut self, name: impl Into<String>, ty: Ty) {
        self.extend(name, TypeScheme::monomorphic(ty));
    }

    pub fn remove(&mut self, name: &str) {
        self.bindings.remove(name);
    }

    pub fn free_vars(&self) -> FxHashSet<u32> {
        self.bindings.values().flat_map(TypeScheme::free_vars).collect()
    }

    pub fn apply(&self, subst: &Subst) -> TypeEnv {
        let bindings = self
            .bindings
            .iter()
            .map(|(name, scheme)| (name.clone(), TypeScheme::new(scheme.quantified.clone(), subst.apply(&scheme.ty))))
            .collect();
        TypeEnv { bindings }
    }

    /// Quantifies every id free in `ty` (and in `constraints`' witnesses) but
    /// not free in the environment. Constraints whose witnesses mention only
    /// quantified ids are folded into the scheme as a `Qual`; the remainder
    /// is returned as the "outer" constraint set that keeps flowing through
    /// inference (constrained generalization, spec section on `let`).
    pub fn generalize_with_constraints(
        &self,
        ty: &Ty,
        constraints: &[crate::ty::Constraint],
    ) -> (TypeScheme, Vec<crate::ty::Constraint>) {
        let env_vars = self.free_vars();
        let mut ty_vars = crate::ty::free_vars(ty);
        for c in constraints {
            ty_vars.extend(crate::ty::free_vars(&c.witness));
        }
        let quantified: std::collections::BTreeSet<u32> =
            ty_vars.into_iter().filter(|v| !env_vars.contains(v)).collect();

        let mut inner = Vec::new();
        let mut outer = Vec::new();
        for c in constraints {
            let depends_on_env = crate::ty::free_vars(&c.witness).iter().any(|v| env_vars.contains(v));
            if depends_on_env {
                outer.push(c.clone());
            } else {
                inner.push(c.clone());
            }
        }

        let scheme_ty = Ty::qual(inner, ty.clone());
        (TypeScheme::new(quantified, scheme_ty), outer)
    }

    pub fn generalize(&self, ty: &Ty) -> TypeScheme {
        self.generalize_with_constraints(ty, &[]).0
    }

    /// The initial environment: every name from the built-in registry (C6),
    /// typed per the original interpreter's `TypeEnv::builtins()`.
    pub fn builtins() -> Self {
        let mut env = TypeEnv::new();
        let mut gen = TyVarGen::new();

        let a = gen.fresh_named("a");
        env.extend("print", TypeScheme::new(quantified_of(&a), Ty::fun(a.clone(), Ty::bool())));
        let a = gen.fresh_named("a");
        env.extend("show", TypeScheme::new(quantified_of(&a), Ty::fun(a, Ty::string())));
        let a = gen.fresh_named("a");
        env.extend("neg", TypeScheme::new(quantified_of(&a), Ty::fun(a.clone(), a)));
        env.extend_mono("not", Ty::fun(Ty::bool(), Ty::bool()));

        // List primitives.
        let a = gen.fresh_named("a");
        env.extend("head", TypeScheme::new(quantified_of(&a), Ty::fun(Ty::list(a.clone()), a)));
        let a = gen.fresh_named("a");
        env.extend("tail", TypeScheme::new(quantified_of(&a), Ty::fun(Ty::list(a.clone()), Ty::list(a))));
        let a = gen.fresh_named("a");
        env.extend("length", TypeScheme::new(quantified_of(&a), Ty::fun(Ty::list(a), Ty::int())));

        // String primitives.
        env.extend_mono("words", Ty::fun(Ty::string(), Ty::list(Ty::string())));
        env.extend_mono("unwords", Ty::fun(Ty::list(Ty::string()), Ty::string()));
        env.extend_mono("lines", Ty::fun(Ty::string(), Ty::list(Ty::string())));
        env.extend_mono("unlines", Ty::fun(Ty::list(Ty::string()), Ty::string()));
        env.extend_mono("trim", Ty::fun(Ty::string(), Ty::string()));
        env.extend_mono("startsWith", Ty::fun(Ty::string(), Ty::fun(Ty::string(), Ty::bool())));
        env.extend_mono("endsWith", Ty::fun(Ty::string(), Ty::fun(Ty::string(), Ty::bool())));
        env.extend_mono("contains", Ty::fun(Ty::string(), Ty::fun(Ty::string(), Ty::bool())));
        env.extend_mono("split", Ty::fun(Ty::string(), Ty::fun(Ty::string(), Ty::list(Ty::string()))));

        // File primitives.
        env.extend_mono("readFile", Ty::fun(Ty::string(), Ty::string()));
        env.extend_mono("writeFile", Ty::fun(Ty::string(), Ty::fun(Ty::string(), Ty::bool())));
        env.extend_mono("appendFile", Ty::fun(Ty::string(), Ty::fun(Ty::string(), Ty::bool())));
        env.extend_mono("fileExists", Ty::fun(Ty::string(), Ty::bool()));
        env.extend_mono("deleteFile", Ty::fun(Ty::string(), Ty::bool()));

        // Arithmetic predicates.
        env.extend_mono("even", Ty::fun(Ty::int(), Ty::bool()));
        env.extend_mono("odd", Ty::fun(Ty::int(), Ty::bool()));
        env.extend_mono("abs", Ty::fun(Ty::int(), Ty::int()));
        env.extend_mono("max", Ty::fun(Ty::int(), Ty::fun(Ty::int(), Ty::int())));
        env.extend_mono("min", Ty::fun(Ty::int(), Ty::fun(Ty::int(), Ty::int())));
        env.extend_mono("gcd", Ty::fun(Ty::int(), Ty::fun(Ty::int(), Ty::int())));
        env.extend_mono("lcm", Ty::fun(Ty::int(), Ty::fun(Ty::int(), Ty::int())));

        env
    }
}

fn quantified_of(ty: &Ty) -> std::collections::BTreeSet<u32> {
    if let Ty::Var { id, .. } = ty {
        std::collections::BTreeSet::from([*id])
    } else {
        std::collections::BTreeSet::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_on_unknown_name() {
        let env = TypeEnv::new();
        assert!(env.lookup("x").is_none());
    }

    #[test]
    fn extend_then_lookup_round_trips() {
        let mut env = TypeEnv::new();
        env.extend_mono("x", Ty::int());
        assert_eq!(env.lookup("x").unwrap().ty, Ty::int());
    }

    #[test]
    fn suggest_finds_near_miss() {
        let mut env = TypeEnv::new();
        env.extend_mono("greet", Ty::int());
        assert_eq!(env.suggest("grete"), vec!["greet".to_string()]);
    }

    #[test]
    fn builtins_includes_print_and_show() {
        let env = TypeEnv::builtins();
        assert!(env.contains("print"));
        assert!(env.contains("show"));
        assert!(env.contains("readFile"));
    }

    #[test]
    fn generalize_quantifies_vars_free_only_in_type() {
        let env = TypeEnv::new();
        let ty = Ty::Var { id: 5, hint: "a".into() };
        let scheme = env.generalize(&ty);
        assert!(scheme.quantified.contains(&5));
    }

    #[test]
    fn generalize_does_not_quantify_vars_free_in_env() {
        let mut env = TypeEnv::new();
        env.extend_mono("x", Ty::Var { id: 5, hint: "a".into() });
        let ty = Ty::Var { id: 5, hint: "a".into() };
        let scheme = env.generalize(&ty);
        assert!(!scheme.quantified.contains(&5));
    }

    #[test]
    fn generalize_splits_env_dependent_constraints_outward() {
        let mut env = TypeEnv::new();
        env.extend_mono("x", Ty::Var { id: 1, hint: "a".into() });
        let ty = Ty::Var { id: 2, hint: "b".into() };
        let constraints = vec![
            crate::ty::Constraint { op: "+".into(), witness: Ty::Var { id: 1, hint: "a".into() } },
            crate::ty::Constraint { op: "==".into(), witness: Ty::Var { id: 2, hint: "b".into() } },
        ];
        let (scheme, outer) = env.generalize_with_constraints(&ty, &constraints);
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].op, "+");
        assert!(matches!(scheme.ty, Ty::Qual { .. }));
    }
}
