//! Hindley-Milner type inference over the `solis-parser` AST.
//!
//! The pipeline is: convert surface annotations ([`convert`]) into the
//! internal representation ([`ty`]), generalize/instantiate them through
//! [`scheme`] and [`env`], and drive unification ([`unify`]) from
//! [`infer`]'s per-node rules.

pub mod convert;
pub mod env;
pub mod infer;
pub mod scheme;
pub mod subst;
pub mod ty;
pub mod unify;
pub mod var;

pub use env::TypeEnv;
pub use infer::{InferResult, TypeInference};
pub use scheme::TypeScheme;
pub use subst::Subst;
pub use ty::Ty;
pub use var::TyVarGen;

use solis_errors::SolisError;
use solis_parser::ast::Module;

/// Type-checks a whole module against the builtin environment, returning the
/// environment extended with every top-level binding and the list of errors
/// encountered (empty on success).
pub fn check_module(source: &str, module: &Module) -> (TypeEnv, Vec<SolisError>) {
    let mut env = TypeEnv::builtins();
    let mut inference = TypeInference::new(source);
    inference.infer_module(module, &mut env);
    (env, inference.collector.errors().to_vec())
}
