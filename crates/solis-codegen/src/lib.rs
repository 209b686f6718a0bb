//! Native code generation entry point.
//!
//! Compilation to machine code is explicitly out of scope (the language core
//! is specified as a type checker plus a tree-walking evaluator, not an
//! ahead-of-time compiler), so this crate exists only so `solisc compile`
//! has a stable target to dispatch to: it reports that the backend isn't
//! built rather than `solisc` itself needing a special case. The teacher's
//! equivalent crate (`snow-codegen`) lowers to a MIR and then to LLVM IR via
//! `inkwell`; neither is pulled in here since there's nothing to lower to
//! yet -- see `DESIGN.md` for the dependency-drop note.

use solis_common::SourceLocation;
use solis_errors::{taxonomy, SolisError};
use solis_parser::ast::Module;
use solis_typeck::TypeEnv;

/// Attempts to compile a type-checked module to a native binary.
///
/// Always fails today with an [`SolisError`] explaining that the backend
/// isn't implemented, rather than panicking or silently no-opping, so
/// `solisc compile` can surface a normal diagnostic.
pub fn compile(_module: &Module, _env: &TypeEnv, source_path: &str) -> Result<(), SolisError> {
    Err(taxonomy::evaluation_error(
        format!("native code generation for `{source_path}` is not implemented; run it instead with `solisc run`"),
        SourceLocation::single(1, 1),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_reports_unimplemented_rather_than_panicking() {
        let module = Module::default();
        let env = TypeEnv::builtins();
        assert!(compile(&module, &env, "main.solis").is_err());
    }
}
