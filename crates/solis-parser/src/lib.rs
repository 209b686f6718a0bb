//! Turns Solis source text into the AST defined in [`ast`], collecting
//! parse errors rather than aborting on the first one.

pub mod ast;
mod parser;

use solis_errors::SolisError;
use solis_lexer::Lexer;

pub use ast::Module;

/// Parses `source` into a [`Module`], returning every error encountered.
/// Parsing keeps going past most errors (see `Parser::recover_to`), so the
/// returned module may be partial when errors are non-empty.
pub fn parse(source: &str) -> (Module, Vec<SolisError>) {
    let tokens = Lexer::tokenize(source);
    let mut p = parser::Parser::new(tokens, source);
    let module = p.parse_module();
    (module, p.into_errors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, Expr};

    #[test]
    fn parses_identity_polymorphism_scenario() {
        let (_module, errors) = parse("let main = let id x = x in id 42");
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn parses_occurs_check_failure_input_without_parse_errors() {
        // `let loop x = x x` is a parse-valid program that fails later during
        // type inference (occurs check); the parser itself must accept it.
        let (module, errors) = parse("let loop x = x x");
        assert!(errors.is_empty());
        match &module.decls[0] {
            Decl::Function(f) => assert!(matches!(f.body, Expr::App { .. })),
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn recovers_after_a_malformed_declaration() {
        let (module, errors) = parse("@@@\nlet ok x = x");
        assert!(!errors.is_empty());
        assert!(module.decls.iter().any(|d| matches!(d, Decl::Function(f) if f.name == "ok")));
    }
}
