//! Bridges the as-written surface annotation (`solis_parser::ast::Type`) to
//! the inference engine's internal representation (`crate::ty::Ty`).
//!
//! Grounded on `typer.cpp`'s `astTypeToTy`/`tyToAstType` pair: a fresh
//! variable is allocated per distinct lowercase type variable name seen
//! within one annotation, and an explicit `forall` in source becomes
//! `Ty::Forall` over those same ids.

use std::collections::BTreeMap;

use solis_parser::ast::Type as AstType;

use crate::ty::Ty;
use crate::var::TyVarGen;

/// Converts a surface annotation into an internal type, allocating a fresh
/// variable the first time each named type variable is seen and reusing it
/// on every subsequent occurrence within the same annotation.
pub fn from_ast_type(ast: &AstType, gen: &mut TyVarGen, scope: &mut BTreeMap<String, Ty>) -> Ty {
    match ast {
        AstType::Var(name) => scope
            .entry(name.clone())
            .or_insert_with(|| gen.fresh_named(name))
            .clone(),
        AstType::Con(name, args) => {
            Ty::con(name.clone(), args.iter().map(|a| from_ast_type(a, gen, scope)).collect())
        }
        AstType::Fun(from, to) => Ty::fun(from_ast_type(from, gen, scope), from_ast_type(to, gen, scope)),
        AstType::Record(_, _) => {
            // Records are typed as opaque values during inference (see
            // `infer.rs`); an explicit record annotation still needs *some*
            // internal type, so it gets a type of its own whose only
            // purpose is to unify with itself.
            gen.fresh_named("record")
        }
        AstType::Forall(names, body) => {
            for name in names {
                scope.entry(name.clone()).or_insert_with(|| gen.fresh_named(name));
            }
            let body_ty = from_ast_type(body, gen, scope);
            let quantified = names
                .iter()
                .filter_map(|n| scope.get(n))
                .filter_map(|t| if let Ty::Var { id, .. } = t { Some(*id) } else { None })
                .collect();
            Ty::Forall { quantified, body: Box::new(body_ty) }
        }
    }
}

/// Converts a top-level annotation (the entry point used for function
/// signatures and constructor argument lists), starting with an empty
/// variable scope.
pub fn from_ast_type_fresh(ast: &AstType, gen: &mut TyVarGen) -> Ty {
    let mut scope = BTreeMap::new();
    from_ast_type(ast, gen, &mut scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_concrete_constructor() {
        let mut gen = TyVarGen::new();
        let ast = AstType::Con("Int".into(), vec![]);
        assert_eq!(from_ast_type_fresh(&ast, &mut gen), Ty::int());
    }

    #[test]
    fn reuses_the_same_var_for_repeated_names() {
        let mut gen = TyVarGen::new();
        let mut scope = BTreeMap::new();
        let a1 = from_ast_type(&AstType::Var("a".into()), &mut gen, &mut scope);
        let a2 = from_ast_type(&AstType::Var("a".into()), &mut gen, &mut scope);
        assert_eq!(a1, a2);
    }

    #[test]
    fn converts_arrow_type() {
        let mut gen = TyVarGen::new();
        let ast = AstType::Fun(Box::new(AstType::Con("Int".into(), vec![])), Box::new(AstType::Con("Bool".into(), vec![])));
        assert_eq!(from_ast_type_fresh(&ast, &mut gen), Ty::fun(Ty::int(), Ty::bool()));
    }

    #[test]
    fn converts_list_sugar_as_applied_constructor() {
        let mut gen = TyVarGen::new();
        let ast = AstType::Con("List".into(), vec![AstType::Con("Int".into(), vec![])]);
        assert_eq!(from_ast_type_fresh(&ast, &mut gen), Ty::list(Ty::int()));
    }

    #[test]
    fn explicit_forall_quantifies_its_named_vars() {
        let mut gen = TyVarGen::new();
        let ast = AstType::Forall(
            vec!["a".into()],
            Box::new(AstType::Fun(Box::new(AstType::Var("a".into())), Box::new(AstType::Var("a".into())))),
        );
        let ty = from_ast_type_fresh(&ast, &mut gen);
        assert!(matches!(ty, Ty::Forall { .. }));
    }
}
