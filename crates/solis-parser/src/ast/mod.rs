pub mod decl;
pub mod expr;
pub mod pat;
pub mod ty;

pub use decl::{Decl, FunctionDecl, ImplDecl, ImportDecl, Module, ModuleDecl, TraitDecl, TypeDecl, TypeDeclRhs};
pub use expr::{BlockStmt, Expr, Literal};
pub use pat::Pattern;
pub use ty::Type;
