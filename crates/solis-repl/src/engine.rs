//! Parse, type-check and evaluate one line of REPL input against a session.
//!
//! Mirrors the original interpreter's REPL dispatch: try the input as a
//! top-level declaration first (`let`, `data`, `import`, ...); if it isn't
//! one, treat it as an expression, wrap it in a throwaway binding, and report
//! both its value and its inferred type.

use solis_common::SourceLocation;
use solis_errors::SolisError;
use solis_parser::ast::{Decl, Module};

use crate::session::ReplSession;

/// The synthetic name an expression is bound to so it can be evaluated and
/// its type looked up through the ordinary module pipeline.
const WRAPPER_NAME: &str = "__repl_result";

pub enum EvalOutcome {
    /// A declaration was accepted; these names are now in scope.
    Defined(Vec<String>),
    /// An expression was evaluated; `rendered` is its printed form, `ty` its
    /// inferred type.
    Value { rendered: String, ty: String },
}

pub fn eval_line(session: &mut ReplSession, input: &str) -> Result<EvalOutcome, Vec<SolisError>> {
    let trimmed = input.trim();
    if is_declaration(trimmed) {
        eval_declaration(session, trimmed)
    } else {
        eval_expression(session, trimmed)
    }
}

fn is_declaration(trimmed: &str) -> bool {
    let (module, errors) = solis_parser::parse(trimmed);
    errors.is_empty() && (!module.decls.is_empty() || !module.imports.is_empty() || module.module_decl.is_some())
}

fn declared_names(module: &Module) -> Vec<String> {
    let mut names: Vec<String> = module.imports.iter().map(|i| format!("import {}", i.module_name)).collect();
    for decl in &module.decls {
        match decl {
            Decl::Function(f) => names.push(f.name.clone()),
            Decl::Type(t) => names.push(t.name.clone()),
            Decl::Trait(t) => names.push(t.name.clone()),
            Decl::Impl(_) => names.push("impl".to_string()),
            Decl::Module(m) => names.push(format!("module {}", m.name)),
            Decl::Import(i) => names.push(format!("import {}", i.module_name)),
        }
    }
    names
}

fn eval_declaration(session: &mut ReplSession, trimmed: &str) -> Result<EvalOutcome, Vec<SolisError>> {
    let (standalone, _) = solis_parser::parse(trimmed);
    let names = declared_names(&standalone);

    let full_source = extend_source(session, trimmed);
    let (module, parse_errors) = solis_parser::parse(&full_source);
    if !parse_errors.is_empty() {
        return Err(parse_errors);
    }
    let (_env, type_errors) = solis_typeck::check_module(&full_source, &module);
    if !type_errors.is_empty() {
        return Err(type_errors);
    }
    solis_eval::eval_module(&full_source, &module).map_err(|e| vec![e])?;

    session.add_definition(trimmed);
    Ok(EvalOutcome::Defined(names))
}

fn eval_expression(session: &ReplSession, trimmed: &str) -> Result<EvalOutcome, Vec<SolisError>> {
    let full_source = extend_source(session, &format!("let {WRAPPER_NAME} = {trimmed}"));
    let (module, parse_errors) = solis_parser::parse(&full_source);
    if !parse_errors.is_empty() {
        return Err(parse_errors);
    }
    let (type_env, type_errors) = solis_typeck::check_module(&full_source, &module);
    if !type_errors.is_empty() {
        return Err(type_errors);
    }

    let runtime_env = solis_eval::eval_module(&full_source, &module).map_err(|e| vec![e])?;
    let value = runtime_env.lookup(WRAPPER_NAME).expect("wrapper binding is always defined");
    let location = SourceLocation::single(1, 1);
    let forced = solis_eval::force(value, location).map_err(|e| vec![e])?;
    let rendered = solis_eval::display::render_for_print(&forced, location).map_err(|e| vec![e])?;
    let ty = type_env
        .lookup(WRAPPER_NAME)
        .map(|scheme| scheme.ty.to_string())
        .unwrap_or_else(|| "?".to_string());

    Ok(EvalOutcome::Value { rendered, ty })
}

/// Infers the type of an expression without evaluating it, for `:type`.
pub fn infer_type(session: &ReplSession, expr_source: &str) -> Result<String, Vec<SolisError>> {
    let full_source = extend_source(session, &format!("let {WRAPPER_NAME} = {expr_source}"));
    let (module, parse_errors) = solis_parser::parse(&full_source);
    if !parse_errors.is_empty() {
        return Err(parse_errors);
    }
    let (type_env, type_errors) = solis_typeck::check_module(&full_source, &module);
    if !type_errors.is_empty() {
        return Err(type_errors);
    }
    Ok(type_env
        .lookup(WRAPPER_NAME)
        .map(|scheme| scheme.ty.to_string())
        .unwrap_or_else(|| "?".to_string()))
}

fn extend_source(session: &ReplSession, addition: &str) -> String {
    let prior = session.definitions_source();
    if prior.is_empty() {
        addition.to_string()
    } else {
        format!("{prior}\n{addition}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_let_binding_is_treated_as_a_declaration() {
        let mut session = ReplSession::new();
        match eval_line(&mut session, "let x = 1").unwrap() {
            EvalOutcome::Defined(names) => assert_eq!(names, vec!["x".to_string()]),
            EvalOutcome::Value { .. } => panic!("expected a declaration"),
        }
        assert_eq!(session.definition_count(), 1);
    }

    #[test]
    fn a_bare_expression_is_evaluated_and_typed() {
        let mut session = ReplSession::new();
        match eval_line(&mut session, "1 + 2").unwrap() {
            EvalOutcome::Value { rendered, ty } => {
                assert_eq!(rendered, "3");
                assert_eq!(ty, "Int");
            }
            EvalOutcome::Defined(_) => panic!("expected an expression"),
        }
        assert_eq!(session.definition_count(), 0);
    }

    #[test]
    fn later_input_sees_earlier_definitions() {
        let mut session = ReplSession::new();
        eval_line(&mut session, "let double x = x * 2").unwrap();
        match eval_line(&mut session, "double 5").unwrap() {
            EvalOutcome::Value { rendered, .. } => assert_eq!(rendered, "10"),
            EvalOutcome::Defined(_) => panic!("expected an expression"),
        }
    }

    #[test]
    fn a_type_error_is_reported_without_being_committed() {
        let mut session = ReplSession::new();
        let result = eval_line(&mut session, "1 + true");
        assert!(result.is_err());
        assert_eq!(session.definition_count(), 0);
    }

    #[test]
    fn infer_type_reports_a_type_without_evaluating() {
        let session = ReplSession::new();
        let ty = infer_type(&session, "1 + 2").unwrap();
        assert_eq!(ty, "Int");
    }

    #[test]
    fn an_invalid_declaration_is_rejected_without_being_committed() {
        let mut session = ReplSession::new();
        let result = eval_line(&mut session, "let broken x = x + true");
        assert!(result.is_err());
        assert_eq!(session.definition_count(), 0);
    }
}
