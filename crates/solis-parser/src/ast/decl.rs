use solis_common::Span;

use super::expr::Expr;
use super::pat::Pattern;
use super::ty::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub is_recursive: bool,
    pub type_annotation: Option<Type>,
    pub params: Vec<Pattern>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDeclRhs {
    /// `Just a | Nothing` -- a list of (constructor name, argument types).
    Adt(Vec<(String, Vec<Type>)>),
    /// `{ x : Int, y : Int }`.
    Record(Vec<(String, Type)>),
    Alias(Type),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub params: Vec<String>,
    pub rhs: TypeDeclRhs,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
    /// Empty means "no explicit export list" -- every top-level function is
    /// exported.
    pub exports: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub module_name: String,
    pub qualified: bool,
    pub alias: Option<String>,
    /// Empty means "no explicit include list" -- import everything exported.
    pub imports: Vec<String>,
    pub hiding: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub methods: Vec<(String, Type)>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplDecl {
    pub trait_name: Option<String>,
    pub ty: Type,
    pub methods: Vec<FunctionDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Function(FunctionDecl),
    Type(TypeDecl),
    Module(ModuleDecl),
    Import(ImportDecl),
    Trait(TraitDecl),
    Impl(ImplDecl),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub module_decl: Option<ModuleDecl>,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
}
