//! The tree-walking evaluator for Solis programs, run after a module has
//! already type-checked.
//!
//! Mirrors `solis-typeck`'s `check_module` shape: one entry point taking the
//! source text (for span-to-location resolution) and the parsed module,
//! returning the environment of every top-level binding.

pub mod binop;
pub mod builtins;
pub mod display;
pub mod env;
pub mod eval;
pub mod pattern;
pub mod value;

pub use env::Env;
pub use eval::Evaluator;
pub use value::{force, Thunk, Value};

use solis_errors::SolisError;
use solis_parser::ast::Module;

/// Evaluates every top-level declaration in `module`, returning the
/// resulting environment. Running `main` (or any other binding) afterwards
/// is the caller's job -- this only builds the bindings.
pub fn eval_module(source: &str, module: &Module) -> Result<Env, SolisError> {
    let evaluator = Evaluator::new(source);
    evaluator.eval_module(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_module_binds_every_top_level_function() {
        let source = "let a = 1\nlet b = 2";
        let (module, errors) = solis_parser::parse(source);
        assert!(errors.is_empty());
        let env = eval_module(source, &module).unwrap();
        assert!(env.contains("a"));
        assert!(env.contains("b"));
    }

    #[test]
    fn a_parsed_cons_expression_prepends_to_the_list() {
        let source = "let main = 1 :: [2, 3]";
        let (module, errors) = solis_parser::parse(source);
        assert!(errors.is_empty());
        let env = eval_module(source, &module).unwrap();
        let main = env.lookup("main").unwrap();
        let value = force(main, solis_common::SourceLocation::single(1, 1)).unwrap();
        let Value::List(elements) = value else { panic!("expected list") };
        assert_eq!(elements.len(), 3);
        assert!(matches!(elements[0], Value::Int(1)));
    }
}
