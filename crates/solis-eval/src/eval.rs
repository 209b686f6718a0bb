//! The tree-walking evaluator.
//!
//! Grounded on `Interpreter::eval` and `Interpreter::evalDeclAtIndex`. The
//! original closes over its AST nodes by raw pointer into an arena that
//! outlives the whole run; Rust's ownership rules don't allow a closure to
//! borrow a short-lived `&Expr`, so closures built here clone the `Pattern`/
//! `Expr` subtrees they need into `Rc`-wrapped owned data instead.

use std::rc::Rc;

use solis_common::{LineIndex, SourceLocation, Span};
use solis_errors::{taxonomy, SolisError};
use solis_parser::ast::{BlockStmt, Decl, Expr, FunctionDecl, Literal, Module, Pattern, TypeDeclRhs};

use crate::env::Env;
use crate::pattern::match_pattern;
use crate::value::{force, Thunk, Value};
use crate::{binop, builtins};

/// A cheaply-cloneable handle bundling the line index needed to turn spans
/// into [`SourceLocation`]s. Closures built during evaluation (lambda
/// bodies, curried constructors) own a clone so they can call back into
/// [`Evaluator::eval_expr`] from a `'static` context.
#[derive(Clone)]
pub struct Evaluator {
    line_index: Rc<LineIndex>,
}

impl Evaluator {
    pub fn new(source: &str) -> Self {
        Evaluator { line_index: Rc::new(LineIndex::new(source)) }
    }

    pub fn location(&self, span: Span) -> SourceLocation {
        self.line_index.location(span)
    }

    pub fn eval_expr(&self, expr: &Expr, env: &Env) -> Result<Value, SolisError> {
        match expr {
            Expr::Var(name, span) => {
                let location = self.location(*span);
                env.lookup(name).ok_or_else(|| {
                    let candidates = env.names();
                    let matches = solis_common::suggest::find_similar_names(name, candidates, 2);
                    taxonomy::undefined_name(name, &matches, location)
                })
            }
            Expr::Lit(lit, span) => literal_value(lit, self.location(*span)),
            Expr::Lambda { params, body, span } => {
                let params: Rc<Vec<Pattern>> = Rc::new(params.clone());
                let body: Rc<Expr> = Rc::new((**body).clone());
                let _ = span;
                Ok(curry(self.clone(), params, 0, body, env.clone()))
            }
            Expr::App { func, arg, span } => {
                let location = self.location(*span);
                let func_val = force(self.eval_expr(func, env)?, location)?;
                let Value::Function(f) = func_val else {
                    return Err(taxonomy::not_callable(func_val.kind(), location));
                };
                let arg_val = self.eval_arg(arg, env)?;
                f(arg_val, location)
            }
            Expr::Let { is_recursive, pattern, value, body, span } => {
                let location = self.location(*span);
                let inner_env = if *is_recursive {
                    self.eval_recursive_let(pattern, value, env, location)?
                } else {
                    let v = self.eval_arg(value, env)?;
                    match_pattern(pattern, &v, env, location)?.ok_or_else(|| {
                        taxonomy::refutable_binding("let binding pattern did not match its value", location)
                    })?
                };
                self.eval_expr(body, &inner_env)
            }
            Expr::Match { scrutinee, arms, span } => {
                let location = self.location(*span);
                let value = self.eval_expr(scrutinee, env)?;
                for (pat, arm_body) in arms {
                    if let Some(bound) = match_pattern(pat, &value, env, location)? {
                        return self.eval_expr(arm_body, &bound);
                    }
                }
                Err(taxonomy::non_exhaustive_match(&["_".to_string()], location))
            }
            Expr::If { cond, then_branch, else_branch, span } => {
                let location = self.location(*span);
                match force(self.eval_expr(cond, env)?, location)? {
                    Value::Bool(true) => self.eval_expr(then_branch, env),
                    Value::Bool(false) => self.eval_expr(else_branch, env),
                    other => Err(taxonomy::evaluation_error(
                        format!("if condition must be a Bool, found `{}`", other.kind()),
                        location,
                    )),
                }
            }
            Expr::BinOp { op, left, right, span } => {
                let location = self.location(*span);
                let l = force(self.eval_expr(left, env)?, location)?;
                let r = force(self.eval_expr(right, env)?, location)?;
                binop::eval_binop(op, l, r, location)
            }
            Expr::List { elements, span } => {
                let _ = span;
                let mut values = Vec::with_capacity(elements.len());
                for elem in elements {
                    values.push(self.eval_expr(elem, env)?);
                }
                Ok(Value::list(values))
            }
            Expr::Record { fields, span } => {
                let _ = span;
                let mut record = std::collections::BTreeMap::new();
                for (name, value_expr) in fields {
                    record.insert(name.clone(), self.eval_expr(value_expr, env)?);
                }
                Ok(Value::Record(Rc::new(record)))
            }
            Expr::RecordAccess { record, field, span } => {
                let location = self.location(*span);
                let rec = force(self.eval_expr(record, env)?, location)?;
                match rec {
                    Value::Record(fields) => fields
                        .get(field)
                        .cloned()
                        .ok_or_else(|| taxonomy::field_not_found(field, "Record", location)),
                    other => Err(taxonomy::evaluation_error(
                        format!("`.{field}` requires a Record, found `{}`", other.kind()),
                        location,
                    )),
                }
            }
            Expr::RecordUpdate { record, updates, span } => {
                let location = self.location(*span);
                let rec = force(self.eval_expr(record, env)?, location)?;
                match rec {
                    Value::Record(fields) => {
                        let mut updated = (*fields).clone();
                        for (name, value_expr) in updates {
                            if !updated.contains_key(name) {
                                return Err(taxonomy::field_not_found(name, "Record", location));
                            }
                            updated.insert(name.clone(), self.eval_expr(value_expr, env)?);
                        }
                        Ok(Value::Record(Rc::new(updated)))
                    }
                    other => Err(taxonomy::evaluation_error(
                        format!("record update requires a Record, found `{}`", other.kind()),
                        location,
                    )),
                }
            }
            Expr::Block { stmts, span } => self.eval_block(stmts, env, self.location(*span)),
            Expr::Strict { expr, span } => force(self.eval_expr(expr, env)?, self.location(*span)),
        }
    }

    /// Arguments are passed lazily: a thunk wrapping the unevaluated
    /// expression, forced on first demand. Mirrors the original's
    /// `ThunkValue`-per-argument calling convention.
    fn eval_arg(&self, expr: &Expr, env: &Env) -> Result<Value, SolisError> {
        let ev = self.clone();
        let expr = Rc::new(expr.clone());
        let env = env.clone();
        Ok(Value::Thunk(Thunk::suspended(move || ev.eval_expr(&expr, &env))))
    }

    fn eval_recursive_let(
        &self,
        pattern: &Pattern,
        value: &Expr,
        env: &Env,
        location: SourceLocation,
    ) -> Result<Env, SolisError> {
        let Pattern::Var(name, _) = pattern else {
            return Err(taxonomy::refutable_binding(
                "recursive `let` requires a simple name binding",
                location,
            ));
        };
        let placeholder = Thunk::pending();
        let inner_env = env.extend(name.clone(), Value::Thunk(placeholder.clone()));
        let resolved = self.eval_expr(value, &inner_env)?;
        placeholder.fill(resolved);
        Ok(inner_env)
    }

    fn eval_block(&self, stmts: &[BlockStmt], env: &Env, location: SourceLocation) -> Result<Value, SolisError> {
        let mut current = env.clone();
        let mut last = Value::Bool(true);
        for stmt in stmts {
            match stmt {
                BlockStmt::Let { is_recursive, pattern, value } => {
                    current = if *is_recursive {
                        self.eval_recursive_let(pattern, value, &current, location)?
                    } else {
                        let v = self.eval_arg(value, &current)?;
                        match_pattern(pattern, &v, &current, location)?.ok_or_else(|| {
                            taxonomy::refutable_binding("let binding pattern did not match its value", location)
                        })?
                    };
                    last = Value::Bool(true);
                }
                BlockStmt::Bind { pattern, value } => {
                    let v = self.eval_expr(value, &current)?;
                    current = match_pattern(pattern, &v, &current, location)?.ok_or_else(|| {
                        taxonomy::refutable_binding("bind pattern did not match its value", location)
                    })?;
                    last = Value::Bool(true);
                }
                BlockStmt::Expr(e) => {
                    last = self.eval_expr(e, &current)?;
                }
            }
        }
        Ok(last)
    }

    /// Evaluates a whole module: registers every declaration into a fresh
    /// environment built on top of the builtin registry, then returns it.
    /// Mirrors the two-pass structure of `Interpreter::run` -- declarations
    /// are bound as placeholders first so mutually recursive top-level
    /// functions can reference each other regardless of textual order, then
    /// each placeholder is filled in a second pass.
    pub fn eval_module(&self, module: &Module) -> Result<Env, SolisError> {
        let mut env = builtins::base_env();
        let mut placeholders = Vec::new();

        for decl in &module.decls {
            if let Decl::Function(f) = decl {
                let placeholder = Thunk::pending();
                env = env.extend(f.name.clone(), Value::Thunk(placeholder.clone()));
                placeholders.push((f, placeholder));
            }
        }

        for decl in &module.decls {
            if let Decl::Type(type_decl) = decl {
                if let TypeDeclRhs::Adt(ctors) = &type_decl.rhs {
                    for (ctor_name, arg_types) in ctors {
                        env = env.extend(ctor_name.clone(), build_constructor(ctor_name, arg_types.len()));
                    }
                }
            }
        }

        for (f, placeholder) in &placeholders {
            let value = self.build_function_value(f, &env)?;
            placeholder.fill(value);
        }

        Ok(env)
    }

    fn build_function_value(&self, f: &FunctionDecl, env: &Env) -> Result<Value, SolisError> {
        if f.params.is_empty() {
            let ev = self.clone();
            let body = Rc::new(f.body.clone());
            let closure_env = env.clone();
            return Ok(Value::Thunk(Thunk::suspended(move || ev.eval_expr(&body, &closure_env))));
        }
        let params = Rc::new(f.params.clone());
        let body = Rc::new(f.body.clone());
        Ok(curry(self.clone(), params, 0, body, env.clone()))
    }
}

fn literal_value(lit: &Literal, location: SourceLocation) -> Result<Value, SolisError> {
    Ok(match lit {
        Literal::Int(i) => Value::Int(*i),
        Literal::BigInt(digits) => {
            use num_traits::Num;
            let parsed = num_bigint::BigInt::from_str_radix(digits, 10)
                .map_err(|_| taxonomy::evaluation_error(format!("invalid integer literal `{digits}`"), location))?;
            Value::BigInt(parsed)
        }
        Literal::Float(f) => Value::Float(*f),
        Literal::Str(s) => Value::str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
    })
}

/// Builds a curried function value from a parameter list, one argument at a
/// time: applying all but the last parameter yields another function: only
/// applying the final one evaluates the body. Replaces the original's
/// hand-unrolled `CurriedInvoker`/`buildLambdaCurry` chain with one small
/// recursive closure.
fn curry(ev: Evaluator, params: Rc<Vec<Pattern>>, idx: usize, body: Rc<Expr>, env: Env) -> Value {
    Value::Function(Rc::new(move |arg: Value, location: SourceLocation| -> Result<Value, SolisError> {
        let new_env = match_pattern(&params[idx], &arg, &env, location)?.ok_or_else(|| {
            taxonomy::refutable_binding("function parameter pattern did not match its argument", location)
        })?;
        if idx + 1 >= params.len() {
            ev.eval_expr(&body, &new_env)
        } else {
            Ok(curry(ev.clone(), params.clone(), idx + 1, body.clone(), new_env))
        }
    }))
}

/// A 0-arity constructor is an immediate value; an N-arity one curries
/// exactly like a user function, consuming its arguments and then producing
/// a `Constructor` runtime value. Grounded on `ConstructorBuilder`.
fn build_constructor(name: &str, arity: usize) -> Value {
    let name: Rc<str> = name.into();
    if arity == 0 {
        return Value::Constructor { name, args: Rc::new(Vec::new()) };
    }
    curry_constructor(name, arity, 0, Rc::new(Vec::new()))
}

fn curry_constructor(name: Rc<str>, arity: usize, idx: usize, collected: Rc<Vec<Value>>) -> Value {
    Value::Function(Rc::new(move |arg: Value, _location: SourceLocation| -> Result<Value, SolisError> {
        let mut args = (*collected).clone();
        args.push(arg);
        if idx + 1 >= arity {
            Ok(Value::Constructor { name: name.clone(), args: Rc::new(args) })
        } else {
            Ok(curry_constructor(name.clone(), arity, idx + 1, Rc::new(args)))
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Module {
        solis_parser::parse(source).0
    }

    fn eval_main(source: &str) -> Result<Value, SolisError> {
        let module = parse(source);
        let ev = Evaluator::new(source);
        let env = ev.eval_module(&module)?;
        force(env.lookup("main").expect("main not bound"), ev.location(Span::new(0, 0)))
    }

    #[test]
    fn evaluates_arithmetic() {
        let v = eval_main("let main = 1 + 2 * 3").unwrap();
        assert!(matches!(v, Value::Int(7)));
    }

    #[test]
    fn if_selects_the_right_branch() {
        let v = eval_main("let main = if true then 1 else 2").unwrap();
        assert!(matches!(v, Value::Int(1)));
    }

    #[test]
    fn lambda_application_substitutes_the_argument() {
        let v = eval_main("let main = (fn x -> x + 1) 4").unwrap();
        assert!(matches!(v, Value::Int(5)));
    }

    #[test]
    fn curried_two_argument_function_applies_one_at_a_time() {
        let v = eval_main("let add x y = x + y\nlet main = add 2 3").unwrap();
        assert!(matches!(v, Value::Int(5)));
    }

    #[test]
    fn mutually_recursive_top_level_functions_see_each_other() {
        let source = "let isEven n = if n == 0 then true else isOdd (n - 1)\n\
                       let isOdd n = if n == 0 then false else isEven (n - 1)\n\
                       let main = isEven 4";
        let v = eval_main(source).unwrap();
        assert!(matches!(v, Value::Bool(true)));
    }

    #[test]
    fn match_falls_through_to_the_first_matching_arm() {
        let source = "let main = match 2 with { 1 -> \"one\" ; 2 -> \"two\" ; _ -> \"other\" }";
        let module = parse(source);
        let ev = Evaluator::new(source);
        let env = match ev.eval_module(&module) {
            Ok(env) => env,
            Err(e) => panic!("module failed to evaluate: {e:?}"),
        };
        let v = force(env.lookup("main").unwrap(), ev.location(Span::new(0, 0))).unwrap();
        assert!(matches!(v, Value::Str(ref s) if &**s == "two"));
    }

    #[test]
    fn record_access_reads_a_field() {
        let v = eval_main("let main = { x = 1, y = 2 }.x").unwrap();
        assert!(matches!(v, Value::Int(1)));
    }

    #[test]
    fn record_update_replaces_a_field_without_mutating_the_original() {
        let source = "let r = { x = 1, y = 2 }\nlet updated = { r | x = 9 }\nlet main = updated.x + r.x";
        let v = eval_main(source).unwrap();
        assert!(matches!(v, Value::Int(10)));
    }

    #[test]
    fn undefined_name_reports_a_close_suggestion() {
        let module = parse("let greet x = x\nlet main = grete 1");
        let ev = Evaluator::new("let greet x = x\nlet main = grete 1");
        let env = ev.eval_module(&module).unwrap();
        let err = force(env.lookup("main").unwrap(), ev.location(Span::new(0, 0))).unwrap_err();
        assert!(!err.suggestions.is_empty());
    }
}
