//! Algorithm W, generalized to carry operator constraints through `let`
//! (constrained generalization) and to collect rather than abort on the
//! first error.
//!
//! Grounded on the per-node rules of `typer.cpp`'s `TypeInference::infer*`
//! family: each case below mirrors one of its `inferXxx` methods.

use std::collections::BTreeMap;

use solis_common::{LineIndex, SourceLocation};
use solis_errors::{category::ErrorCategory, taxonomy, ErrorCollector, SolisError};
use solis_parser::ast::{
    BlockStmt, Decl, Expr, FunctionDecl, ImplDecl, Literal, Module, Pattern, TraitDecl, Type as AstType, TypeDecl,
    TypeDeclRhs,
};

use crate::convert;
use crate::env::TypeEnv;
use crate::scheme::TypeScheme;
use crate::subst::Subst;
use crate::ty::{free_vars, Constraint, Ty};
use crate::unify::unify;
use crate::var::TyVarGen;

/// The result of inferring one expression: the substitution discovered
/// along the way, the expression's type under that substitution, and any
/// operator constraints still outstanding (to be resolved or generalized by
/// the enclosing `let`/function).
#[derive(Debug, Clone)]
pub struct InferResult {
    pub subst: Subst,
    pub ty: Ty,
    pub constraints: Vec<Constraint>,
}

impl InferResult {
    fn pure(ty: Ty) -> Self {
        InferResult { subst: Subst::empty(), ty, constraints: Vec::new() }
    }
}

/// Folds a chronological list of substitutions into one, equivalent to
/// applying each in turn: `chain([s1, s2, s3])` behaves like `s1` then `s2`
/// then `s3`.
fn chain(substs: Vec<Subst>) -> Subst {
    substs.into_iter().fold(Subst::empty(), |acc, s| s.compose(&acc))
}

fn literal_ty(lit: &Literal) -> Ty {
    match lit {
        Literal::Int(_) => Ty::int(),
        Literal::BigInt(_) => Ty::bigint(),
        Literal::Float(_) => Ty::float(),
        Literal::Str(_) => Ty::string(),
        Literal::Bool(_) => Ty::bool(),
    }
}

fn peel_fun_params(ty: &Ty, n: usize) -> (Vec<Ty>, Ty) {
    let mut params = Vec::new();
    let mut cur = ty.clone();
    for _ in 0..n {
        match cur {
            Ty::Fun { from, to } => {
                params.push(*from);
                cur = *to;
            }
            other => {
                cur = other;
                break;
            }
        }
    }
    (params, cur)
}

fn substitute_ast_vars(ty: &AstType, map: &BTreeMap<String, AstType>) -> AstType {
    match ty {
        AstType::Var(name) => map.get(name).cloned().unwrap_or_else(|| ty.clone()),
        AstType::Con(name, args) => {
            AstType::Con(name.clone(), args.iter().map(|a| substitute_ast_vars(a, map)).collect())
        }
        AstType::Fun(a, b) => {
            AstType::Fun(Box::new(substitute_ast_vars(a, map)), Box::new(substitute_ast_vars(b, map)))
        }
        AstType::Record(fields, row) => AstType::Record(
            fields.iter().map(|(n, t)| (n.clone(), substitute_ast_vars(t, map))).collect(),
            row.clone(),
        ),
        AstType::Forall(names, body) => AstType::Forall(names.clone(), Box::new(substitute_ast_vars(body, map))),
    }
}

pub struct TypeInference {
    pub gen: TyVarGen,
    pub collector: ErrorCollector,
    line_index: LineIndex,
    aliases: BTreeMap<String, (Vec<String>, AstType)>,
}

impl TypeInference {
    pub fn new(source: &str) -> Self {
        TypeInference {
            gen: TyVarGen::new(),
            collector: ErrorCollector::new(false),
            line_index: LineIndex::new(source),
            aliases: BTreeMap::new(),
        }
    }

    fn location(&self, span: solis_common::Span) -> SourceLocation {
        self.line_index.location(span)
    }

    fn unify(&mut self, t1: &Ty, t2: &Ty, span: solis_common::Span) -> Subst {
        match unify(t1, t2, self.location(span)) {
            Ok(s) => s,
            Err(e) => {
                let _ = self.collector.add_error(e);
                Subst::empty()
            }
        }
    }

    fn expand_alias_refs(&self, ast: &AstType, depth: u32) -> AstType {
        if depth > 8 {
            return ast.clone();
        }
        match ast {
            AstType::Con(name, args) => {
                let args: Vec<AstType> = args.iter().map(|a| self.expand_alias_refs(a, depth)).collect();
                if let Some((params, body)) = self.aliases.get(name) {
                    if params.len() == args.len() {
                        let map: BTreeMap<String, AstType> =
                            params.iter().cloned().zip(args.iter().cloned()).collect();
                        return self.expand_alias_refs(&substitute_ast_vars(body, &map), depth + 1);
                    }
                }
                AstType::Con(name.clone(), args)
            }
            AstType::Fun(a, b) => {
                AstType::Fun(Box::new(self.expand_alias_refs(a, depth)), Box::new(self.expand_alias_refs(b, depth)))
            }
            AstType::Record(fields, row) => AstType::Record(
                fields.iter().map(|(n, t)| (n.clone(), self.expand_alias_refs(t, depth))).collect(),
                row.clone(),
            ),
            AstType::Forall(names, body) => {
                AstType::Forall(names.clone(), Box::new(self.expand_alias_refs(body, depth)))
            }
            AstType::Var(_) => ast.clone(),
        }
    }

    fn resolve_type(&mut self, ast: &AstType) -> Ty {
        let expanded = self.expand_alias_refs(ast, 0);
        convert::from_ast_type_fresh(&expanded, &mut self.gen)
    }

    fn resolve_type_in_scope(&mut self, ast: &AstType, scope: &mut BTreeMap<String, Ty>) -> Ty {
        let expanded = self.expand_alias_refs(ast, 0);
        convert::from_ast_type(&expanded, &mut self.gen, scope)
    }

    /// Binds every name a pattern introduces (as fresh, monomorphic
    /// variables) into `env`, returning the pattern's own type. Constructor
    /// patterns look their constructor up in `env` and unify each argument
    /// position; an unknown constructor falls back to a fresh type so the
    /// rest of the pattern can still be checked.
    fn infer_pattern(&mut self, pat: &Pattern, env: &mut TypeEnv) -> Ty {
        match pat {
            Pattern::Wildcard(_) => self.gen.fresh_named("_"),
            Pattern::Var(name, _) => {
                let v = self.gen.fresh_named(name);
                env.extend_mono(name.clone(), v.clone());
                v
            }
            Pattern::Lit(lit, _) => literal_ty(lit),
            Pattern::List(elems, span) => {
                if elems.is_empty() {
                    return Ty::list(self.gen.fresh_named("a"));
                }
                let mut elem_ty = self.infer_pattern(&elems[0], env);
                for e in &elems[1..] {
                    let t = self.infer_pattern(e, env);
                    let s = self.unify(&elem_ty, &t, *span);
                    elem_ty = s.apply(&elem_ty);
                }
                Ty::list(elem_ty)
            }
            Pattern::Record(fields, _) => {
                for (_, p) in fields {
                    self.infer_pattern(p, env);
                }
                self.gen.fresh_named("record")
            }
            Pattern::Cons { ctor, args, span } => {
                if ctor == "::" && args.len() == 2 {
                    let elem = self.gen.fresh_named("a");
                    let head_ty = self.infer_pattern(&args[0], env);
                    let s1 = self.unify(&elem, &head_ty, args[0].span());
                    let elem = s1.apply(&elem);
                    let tail_ty = self.infer_pattern(&args[1], env);
                    let s2 = self.unify(&Ty::list(elem.clone()), &tail_ty, args[1].span());
                    return s2.apply(&Ty::list(elem));
                }
                match env.lookup(ctor).cloned() {
                    Some(scheme) => {
                        let ctor_ty = scheme.instantiate(&mut self.gen);
                        let (params, result_ty) = peel_fun_params(&ctor_ty, args.len());
                        if params.len() != args.len() {
                            let _ = self.collector.add_error(taxonomy::unsupported_pattern(
                                format!(
                                    "constructor `{ctor}` expects {} argument(s), found {}",
                                    params.len(),
                                    args.len()
                                ),
                                self.location(*span),
                            ));
                        }
                        for (i, arg) in args.iter().enumerate() {
                            let arg_ty = self.infer_pattern(arg, env);
                            if let Some(expected) = params.get(i) {
                                self.unify(expected, &arg_ty, arg.span());
                            }
                        }
                        result_ty
                    }
                    None => {
                        let suggestions = env.suggest(ctor);
                        let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
                        let _ =
                            self.collector.add_error(taxonomy::undefined_name(ctor, &refs, self.location(*span)));
                        for arg in args {
                            self.infer_pattern(arg, env);
                        }
                        self.gen.fresh_named("ctor")
                    }
                }
            }
        }
    }

    /// Binds one `let`/`do`-block binding, returning the accumulated
    /// substitution, the environment extended with the new name(s), and any
    /// constraints that escape generalization (because they still mention a
    /// variable free in the surrounding environment).
    fn infer_binding(
        &mut self,
        is_recursive: bool,
        pattern: &Pattern,
        value: &Expr,
        env: &TypeEnv,
    ) -> (Subst, TypeEnv, Vec<Constraint>) {
        match pattern {
            Pattern::Var(name, _) => {
                let (value_subst, value_ty, constraints) = if is_recursive {
                    let fresh = self.gen.fresh_named(name);
                    let mut rec_env = env.clone();
                    rec_env.extend_mono(name.clone(), fresh.clone());
                    let vr = self.infer_expr(value, &rec_env);
                    let s = self.unify(&fresh, &vr.ty, value.span());
                    let subst = chain(vec![vr.subst, s.clone()]);
                    let ty = s.apply(&vr.ty);
                    let constraints =
                        vr.constraints.into_iter().map(|c| Constraint { op: c.op, witness: s.apply(&c.witness) }).collect();
                    (subst, ty, constraints)
                } else {
                    let vr = self.infer_expr(value, env);
                    (vr.subst, vr.ty, vr.constraints)
                };
                let env_for_gen = env.apply(&value_subst);
                let (scheme, outer) = env_for_gen.generalize_with_constraints(&value_ty, &constraints);
                let mut result_env = env_for_gen;
                result_env.extend(name.clone(), scheme);
                (value_subst, result_env, outer)
            }
            _ => {
                let vr = self.infer_expr(value, env);
                let mut result_env = env.apply(&vr.subst);
                let pat_ty = self.infer_pattern(pattern, &mut result_env);
                let s = self.unify(&pat_ty, &vr.ty, pattern.span());
                let result_env = result_env.apply(&s);
                let subst = chain(vec![vr.subst, s]);
                (subst, result_env, vr.constraints)
            }
        }
    }

    pub fn infer_expr(&mut self, expr: &Expr, env: &TypeEnv) -> InferResult {
        match expr {
            Expr::Lit(lit, _) => InferResult::pure(literal_ty(lit)),
            Expr::Var(name, span) => match env.lookup(name).cloned() {
                Some(scheme) => InferResult::pure(scheme.instantiate(&mut self.gen)),
                None => {
                    let suggestions = env.suggest(name);
                    let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
                    let _ = self.collector.add_error(taxonomy::undefined_name(name, &refs, self.location(*span)));
                    InferResult::pure(self.gen.fresh_named(name))
                }
            },
            Expr::Lambda { params, body, .. } => {
                let mut inner = env.clone();
                let param_tys: Vec<Ty> = params.iter().map(|p| self.infer_pattern(p, &mut inner)).collect();
                let body_r = self.infer_expr(body, &inner);
                let param_tys: Vec<Ty> = param_tys.iter().map(|t| body_r.subst.apply(t)).collect();
                InferResult {
                    ty: Ty::fun_chain(param_tys, body_r.ty),
                    subst: body_r.subst,
                    constraints: body_r.constraints,
                }
            }
            Expr::App { func, arg, span } => {
                let func_r = self.infer_expr(func, env);
                let env_after_func = env.apply(&func_r.subst);
                let arg_r = self.infer_expr(arg, &env_after_func);
                let result_var = self.gen.fresh_named("r");
                let func_ty = arg_r.subst.apply(&func_r.ty);
                let expected = Ty::fun(arg_r.ty.clone(), result_var.clone());
                let s_unify = self.unify(&func_ty, &expected, *span);
                let subst = chain(vec![func_r.subst, arg_r.subst, s_unify.clone()]);
                let constraints: Vec<Constraint> = func_r
                    .constraints
                    .into_iter()
                    .chain(arg_r.constraints)
                    .map(|c| Constraint { op: c.op, witness: s_unify.apply(&c.witness) })
                    .collect();
                InferResult { ty: s_unify.apply(&result_var), subst, constraints }
            }
            Expr::BinOp { op, left, right, span } => self.infer_binop(op, left, right, *span, env),
            Expr::If { cond, then_branch, else_branch, span } => {
                let cond_r = self.infer_expr(cond, env);
                let env2 = env.apply(&cond_r.subst);
                let s_cond = self.unify(&cond_r.ty, &Ty::bool(), cond.span());
                let env3 = env2.apply(&s_cond);
                let then_r = self.infer_expr(then_branch, &env3);
                let env4 = env3.apply(&then_r.subst);
                let else_r = self.infer_expr(else_branch, &env4);
                let then_ty = else_r.subst.apply(&then_r.ty);
                let s_branches = self.unify(&then_ty, &else_r.ty, *span);
                let subst = chain(vec![cond_r.subst, s_cond, then_r.subst, else_r.subst, s_branches.clone()]);
                let constraints: Vec<Constraint> = cond_r
                    .constraints
                    .into_iter()
                    .chain(then_r.constraints)
                    .chain(else_r.constraints)
                    .map(|c| Constraint { op: c.op, witness: s_branches.apply(&c.witness) })
                    .collect();
                InferResult { ty: s_branches.apply(&then_ty), subst, constraints }
            }
            Expr::Let { is_recursive, pattern, value, body, .. } => {
                let (subst1, env2, outer) = self.infer_binding(*is_recursive, pattern, value, env);
                let body_r = self.infer_expr(body, &env2);
                let subst = chain(vec![subst1, body_r.subst]);
                let constraints: Vec<Constraint> = outer.into_iter().chain(body_r.constraints).collect();
                InferResult { ty: body_r.ty, subst, constraints }
            }
            Expr::List { elements, span } => self.infer_list(elements, *span, env),
            Expr::Match { scrutinee, arms, span } => self.infer_match(scrutinee, arms, *span, env),
            Expr::Block { stmts, .. } => self.infer_block(stmts, env),
            Expr::Record { fields, .. } => {
                let mut env_cur = env.clone();
                let mut substs = Vec::new();
                let mut constraints = Vec::new();
                for (_, e) in fields {
                    let r = self.infer_expr(e, &env_cur);
                    env_cur = env_cur.apply(&r.subst);
                    substs.push(r.subst);
                    constraints.extend(r.constraints);
                }
                InferResult { ty: self.gen.fresh_named("record"), subst: chain(substs), constraints }
            }
            Expr::RecordAccess { record, .. } => {
                let r = self.infer_expr(record, env);
                InferResult { ty: self.gen.fresh_named("field"), subst: r.subst, constraints: r.constraints }
            }
            Expr::RecordUpdate { record, updates, .. } => {
                let r = self.infer_expr(record, env);
                let mut env_cur = env.apply(&r.subst);
                let mut substs = vec![r.subst];
                let mut constraints = r.constraints;
                for (_, e) in updates {
                    let ur = self.infer_expr(e, &env_cur);
                    env_cur = env_cur.apply(&ur.subst);
                    substs.push(ur.subst);
                    constraints.extend(ur.constraints);
                }
                InferResult { ty: self.gen.fresh_named("record"), subst: chain(substs), constraints }
            }
            Expr::Strict { expr, .. } => self.infer_expr(expr, env),
        }
    }

    fn infer_binop(
        &mut self,
        op: &str,
        left: &Expr,
        right: &Expr,
        span: solis_common::Span,
        env: &TypeEnv,
    ) -> InferResult {
        let left_r = self.infer_expr(left, env);
        let env2 = env.apply(&left_r.subst);
        let right_r = self.infer_expr(right, &env2);
        let left_ty = right_r.subst.apply(&left_r.ty);
        let right_ty = right_r.ty.clone();
        let mut constraints: Vec<Constraint> = left_r.constraints.into_iter().chain(right_r.constraints).collect();

        let (s_unify, result_ty, extra) = match op {
            "+" | "-" | "*" | "/" | "%" => {
                let s = self.unify(&left_ty, &right_ty, span);
                let t = s.apply(&left_ty);
                let witness = Ty::fun(t.clone(), Ty::fun(t.clone(), t.clone()));
                (s, t, Some(Constraint { op: op.to_string(), witness }))
            }
            "==" | "!=" | "<" | ">" | "<=" | ">=" => {
                let s = self.unify(&left_ty, &right_ty, span);
                let t = s.apply(&left_ty);
                let witness = Ty::fun(t.clone(), Ty::fun(t, Ty::bool()));
                (s, Ty::bool(), Some(Constraint { op: op.to_string(), witness }))
            }
            "++" => {
                let s1 = self.unify(&left_ty, &Ty::string(), span);
                let s2 = self.unify(&s1.apply(&right_ty), &Ty::string(), span);
                (s2.compose(&s1), Ty::string(), None)
            }
            "&&" | "||" => {
                let s1 = self.unify(&left_ty, &Ty::bool(), span);
                let s2 = self.unify(&s1.apply(&right_ty), &Ty::bool(), span);
                (s2.compose(&s1), Ty::bool(), None)
            }
            "::" => {
                let elem = left_ty.clone();
                let s = self.unify(&Ty::list(elem.clone()), &right_ty, span);
                (s.clone(), s.apply(&Ty::list(elem)), None)
            }
            other => {
                let _ = self.collector.add_error(SolisError::new(
                    ErrorCategory::TypeError,
                    format!("unknown operator `{other}`"),
                    self.location(span),
                ));
                (Subst::empty(), self.gen.fresh_named("op"), None)
            }
        };

        if let Some(c) = extra {
            constraints.push(c);
        }
        let constraints: Vec<Constraint> =
            constraints.into_iter().map(|c| Constraint { op: c.op, witness: s_unify.apply(&c.witness) }).collect();
        let subst = chain(vec![left_r.subst, right_r.subst, s_unify]);
        InferResult { ty: result_ty, subst, constraints }
    }

    fn infer_list(&mut self, elements: &[Expr], span: solis_common::Span, env: &TypeEnv) -> InferResult {
        if elements.is_empty() {
            return InferResult::pure(Ty::list(self.gen.fresh_named("a")));
        }
        let mut env_cur = env.clone();
        let first = self.infer_expr(&elements[0], &env_cur);
        let mut elem_ty = first.ty;
        let mut substs = vec![first.subst.clone()];
        env_cur = env_cur.apply(&first.subst);
        let mut constraints = first.constraints;
        for e in &elements[1..] {
            let r = self.infer_expr(e, &env_cur);
            env_cur = env_cur.apply(&r.subst);
            let s = self.unify(&env_cur.apply(&elem_ty), &r.ty, span);
            elem_ty = s.apply(&r.ty);
            substs.push(r.subst);
            substs.push(s);
            constraints.extend(r.constraints);
        }
        let subst = chain(substs);
        let constraints =
            constraints.into_iter().map(|c| Constraint { op: c.op, witness: subst.apply(&c.witness) }).collect();
        InferResult { ty: Ty::list(subst.apply(&elem_ty)), subst, constraints }
    }

    fn infer_match(
        &mut self,
        scrutinee: &Expr,
        arms: &[(Pattern, Expr)],
        span: solis_common::Span,
        env: &TypeEnv,
    ) -> InferResult {
        let scrut_r = self.infer_expr(scrutinee, env);
        let mut env_cur = env.apply(&scrut_r.subst);
        let mut substs = vec![scrut_r.subst];
        let mut constraints = scrut_r.constraints;
        let mut scrut_ty = scrut_r.ty;
        let mut result_ty = self.gen.fresh_named("m");

        for (pat, body) in arms {
            let mut arm_env = env_cur.clone();
            let pat_ty = self.infer_pattern(pat, &mut arm_env);
            let s_pat = self.unify(&scrut_ty, &pat_ty, pat.span());
            scrut_ty = s_pat.apply(&scrut_ty);
            let arm_env2 = arm_env.apply(&s_pat);
            let body_r = self.infer_expr(body, &arm_env2);
            let s_body = self.unify(&body_r.subst.apply(&result_ty), &body_r.ty, body.span());
            result_ty = s_body.apply(&result_ty);
            env_cur = arm_env2.apply(&body_r.subst).apply(&s_body);
            substs.push(s_pat);
            substs.push(body_r.subst);
            substs.push(s_body);
            constraints.extend(body_r.constraints);
        }
        if arms.is_empty() {
            let _ = self.collector.add_error(taxonomy::non_exhaustive_match(&["_".to_string()], self.location(span)));
        }
        let subst = chain(substs);
        let constraints =
            constraints.into_iter().map(|c| Constraint { op: c.op, witness: subst.apply(&c.witness) }).collect();
        InferResult { ty: subst.apply(&result_ty), subst, constraints }
    }

    /// Threads bindings sequentially through a block; the type of the whole
    /// block is its last statement's type, or `Bool` for an empty block -- a
    /// pragmatic default carried over from the source system rather than a
    /// bug.
    fn infer_block(&mut self, stmts: &[BlockStmt], env: &TypeEnv) -> InferResult {
        if stmts.is_empty() {
            return InferResult::pure(Ty::bool());
        }
        let mut env_cur = env.clone();
        let mut substs = Vec::new();
        let mut constraints = Vec::new();
        let mut last_ty = Ty::bool();

        for stmt in stmts {
            match stmt {
                BlockStmt::Let { is_recursive, pattern, value } => {
                    let (s, new_env, outer) = self.infer_binding(*is_recursive, pattern, value, &env_cur);
                    env_cur = new_env;
                    substs.push(s);
                    constraints.extend(outer);
                    last_ty = Ty::bool();
                }
                BlockStmt::Bind { pattern, value } => {
                    let (s, new_env, outer) = self.infer_binding(false, pattern, value, &env_cur);
                    env_cur = new_env;
                    substs.push(s);
                    constraints.extend(outer);
                    last_ty = Ty::bool();
                }
                BlockStmt::Expr(e) => {
                    let r = self.infer_expr(e, &env_cur);
                    env_cur = env_cur.apply(&r.subst);
                    substs.push(r.subst);
                    constraints.extend(r.constraints);
                    last_ty = r.ty;
                }
            }
        }
        let subst = chain(substs);
        let constraints =
            constraints.into_iter().map(|c| Constraint { op: c.op, witness: subst.apply(&c.witness) }).collect();
        InferResult { ty: subst.apply(&last_ty), subst, constraints }
    }

    /// Infers a function's parameters and body only -- no pre-binding or
    /// generalization, so it can be reused both for a standalone `let` and
    /// for the mutual-recursion group handled by [`TypeInference::infer_module`].
    fn infer_function_body(&mut self, f: &FunctionDecl, env: &TypeEnv) -> InferResult {
        let mut inner = env.clone();
        let param_tys: Vec<Ty> = f.params.iter().map(|p| self.infer_pattern(p, &mut inner)).collect();
        let body_r = self.infer_expr(&f.body, &inner);
        let param_tys: Vec<Ty> = param_tys.iter().map(|t| body_r.subst.apply(t)).collect();
        let mut subst = body_r.subst;
        let mut fn_ty = Ty::fun_chain(param_tys, body_r.ty);
        if let Some(annotation) = &f.type_annotation {
            let declared = self.resolve_type(annotation);
            let s = self.unify(&fn_ty, &declared, f.span);
            fn_ty = s.apply(&fn_ty);
            subst = chain(vec![subst, s]);
        }
        InferResult { subst, ty: fn_ty, constraints: body_r.constraints }
    }

    fn infer_type_decl(&mut self, decl: &TypeDecl, env: &mut TypeEnv) {
        let mut scope: BTreeMap<String, Ty> =
            decl.params.iter().map(|p| (p.clone(), self.gen.fresh_named(p))).collect();
        let result_ty = Ty::con(decl.name.clone(), decl.params.iter().map(|p| scope[p].clone()).collect());
        match &decl.rhs {
            TypeDeclRhs::Adt(ctors) => {
                for (ctor_name, arg_types) in ctors {
                    let arg_tys: Vec<Ty> =
                        arg_types.iter().map(|t| self.resolve_type_in_scope(t, &mut scope)).collect();
                    let ctor_ty = Ty::fun_chain(arg_tys, result_ty.clone());
                    let quantified: std::collections::BTreeSet<u32> = free_vars(&ctor_ty).into_iter().collect();
                    env.extend(ctor_name.clone(), TypeScheme::new(quantified, ctor_ty));
                }
            }
            TypeDeclRhs::Record(_) => {
                // Opaque at the expression level (see `infer_expr`'s Record
                // handling); the declaration needs no env entry of its own.
            }
            TypeDeclRhs::Alias(aliased) => {
                self.aliases.insert(decl.name.clone(), (decl.params.clone(), aliased.clone()));
            }
        }
    }

    fn infer_trait_decl(&mut self, decl: &TraitDecl, env: &mut TypeEnv) {
        let mut scope: BTreeMap<String, Ty> =
            decl.type_params.iter().map(|p| (p.clone(), self.gen.fresh_named(p))).collect();
        for (method_name, method_ty) in &decl.methods {
            let ty = self.resolve_type_in_scope(method_ty, &mut scope);
            let quantified: std::collections::BTreeSet<u32> = free_vars(&ty).into_iter().collect();
            env.extend(method_name.clone(), TypeScheme::new(quantified, ty));
        }
    }

    /// Type-checks each method body for internal consistency. Dispatch
    /// between multiple `impl`s of the same trait method (dictionary
    /// passing) is out of scope, so an impl never rebinds the trait's
    /// generic env entry -- see the decision recorded in `DESIGN.md`.
    fn infer_impl_decl(&mut self, decl: &ImplDecl, env: &TypeEnv) {
        for method in &decl.methods {
            let _ = self.infer_function_body(method, env);
        }
    }

    /// Infers every declaration in a module, extending `env` in place.
    /// Type and trait declarations are processed first so forward
    /// references from functions resolve; functions are then inferred as
    /// one mutually-recursive group so any function may call one declared
    /// later in the same module.
    pub fn infer_module(&mut self, module: &Module, env: &mut TypeEnv) {
        for decl in &module.decls {
            if let Decl::Type(t) = decl {
                self.infer_type_decl(t, env);
            }
        }
        for decl in &module.decls {
            if let Decl::Trait(t) = decl {
                self.infer_trait_decl(t, env);
            }
        }

        let function_decls: Vec<&FunctionDecl> =
            module.decls.iter().filter_map(|d| if let Decl::Function(f) = d { Some(f) } else { None }).collect();

        let base_env = env.clone();
        let mut placeholders = Vec::new();
        for f in &function_decls {
            let v = self.gen.fresh_named(&f.name);
            env.extend_mono(f.name.clone(), v.clone());
            placeholders.push(v);
        }

        let mut all_constraints: Vec<Constraint> = Vec::new();
        for (f, placeholder) in function_decls.iter().zip(&placeholders) {
            let result = self.infer_function_body(f, env);
            let s = self.unify(placeholder, &result.ty, f.span);
            *env = env.apply(&s);
            all_constraints.extend(
                result.constraints.into_iter().map(|c| Constraint { op: c.op, witness: s.apply(&c.witness) }),
            );
        }

        for f in &function_decls {
            let ty = env.lookup(&f.name).expect("bound in the placeholder pass above").ty.clone();
            let ty_vars = free_vars(&ty);
            let relevant: Vec<Constraint> =
                all_constraints.iter().filter(|c| free_vars(&c.witness).iter().any(|v| ty_vars.contains(v))).cloned().collect();
            let (scheme, _outer) = base_env.generalize_with_constraints(&ty, &relevant);
            env.extend(f.name.clone(), scheme);
        }

        for decl in &module.decls {
            if let Decl::Impl(i) = decl {
                self.infer_impl_decl(i, env);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (TypeEnv, TypeInference) {
        let (module, parse_errors) = solis_parser::parse(source);
        assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");
        let mut env = TypeEnv::builtins();
        let mut infer = TypeInference::new(source);
        infer.infer_module(&module, &mut env);
        (env, infer)
    }

    fn main_ty(env: &TypeEnv) -> String {
        env.lookup("main").unwrap().ty.to_string()
    }

    #[test]
    fn infers_literal_types() {
        let (env, infer) = run("let main = 42");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Int");
    }

    #[test]
    fn infers_identity_function_as_polymorphic() {
        let (env, infer) = run("let id x = x\nlet main = id 42");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Int");
        let id_scheme = env.lookup("id").unwrap();
        assert!(!id_scheme.quantified.is_empty(), "id must generalize its parameter");
    }

    #[test]
    fn identity_used_at_two_types_in_one_let() {
        let (env, infer) = run("let main = let id x = x in id (id 42)");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Int");
    }

    #[test]
    fn if_branches_must_unify() {
        let (_, infer) = run("let main = if true then 1 else false");
        assert!(infer.collector.has_errors());
    }

    #[test]
    fn arithmetic_binop_infers_matching_operand_type() {
        let (env, infer) = run("let add x y = x + y\nlet main = add 1 2");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Int");
    }

    #[test]
    fn list_elements_must_share_a_type() {
        let (_, infer) = run("let main = [1, true]");
        assert!(infer.collector.has_errors());
    }

    #[test]
    fn homogeneous_list_infers_list_of_element_type() {
        let (env, infer) = run("let main = [1, 2, 3]");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "[Int]");
    }

    #[test]
    fn occurs_check_rejects_self_application() {
        let (_, infer) = run("let main = let loop x = x x in 1");
        assert!(infer.collector.has_errors());
    }

    #[test]
    fn undefined_variable_reports_name_error() {
        let (_, infer) = run("let main = undefinedThing");
        assert!(infer.collector.has_errors());
        assert_eq!(infer.collector.errors()[0].category, ErrorCategory::NameError);
    }

    #[test]
    fn match_arms_must_agree_on_result_type() {
        let (env, infer) = run("let main = match 1 with { 1 -> true ; _ -> false }");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Bool");
    }

    #[test]
    fn adt_constructor_is_typed_from_declaration() {
        let (env, infer) = run("data Box a = Box a\nlet main = Box 1");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Box Int");
    }

    #[test]
    fn record_literal_and_access_are_opaque() {
        let (_, infer) = run("let main = let r = { x = 1 } in r.x");
        assert!(!infer.collector.has_errors());
    }

    #[test]
    fn mutual_recursion_across_top_level_functions_is_supported() {
        let (env, infer) = run(
            "let isEven n = if n == 0 then true else isOdd (n - 1)\nlet isOdd n = if n == 0 then false else isEven (n - 1)\nlet main = isEven 4",
        );
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Bool");
    }

    #[test]
    fn cons_pattern_in_let_destructures_list() {
        let (env, infer) = run("let main = let x :: xs = [1, 2, 3] in x");
        assert!(!infer.collector.has_errors());
        assert_eq!(main_ty(&env), "Int");
    }
}
