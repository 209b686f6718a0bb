use solis_common::Span;

use super::pat::Pattern;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    /// A literal that overflowed `i64` during lexing/parsing; kept as decimal
    /// digits and promoted to `BigInt` by the evaluator/typechecker.
    BigInt(String),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// One statement inside a [`Expr::Block`]. `Let` and `Bind` thread their
/// binding into every statement that follows within the same block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockStmt {
    Let {
        is_recursive: bool,
        pattern: Pattern,
        value: Expr,
    },
    /// Monadic `pattern <- expr`.
    Bind { pattern: Pattern, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(String, Span),
    Lit(Literal, Span),
    Lambda {
        params: Vec<Pattern>,
        body: Box<Expr>,
        span: Span,
    },
    App {
        func: Box<Expr>,
        arg: Box<Expr>,
        span: Span,
    },
    Let {
        is_recursive: bool,
        pattern: Pattern,
        value: Box<Expr>,
        body: Box<Expr>,
        span: Span,
    },
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<(Pattern, Expr)>,
        span: Span,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        span: Span,
    },
    BinOp {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    List {
        elements: Vec<Expr>,
        span: Span,
    },
    Record {
        fields: Vec<(String, Expr)>,
        span: Span,
    },
    RecordAccess {
        record: Box<Expr>,
        field: String,
        span: Span,
    },
    RecordUpdate {
        record: Box<Expr>,
        updates: Vec<(String, Expr)>,
        span: Span,
    },
    Block {
        stmts: Vec<BlockStmt>,
        span: Span,
    },
    /// Forces its inner expression's value eagerly rather than leaving it a
    /// thunk; see the evaluator's `force` contract.
    Strict {
        expr: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Var(_, s)
            | Expr::Lit(_, s)
            | Expr::Lambda { span: s, .. }
            | Expr::App { span: s, .. }
            | Expr::Let { span: s, .. }
            | Expr::Match { span: s, .. }
            | Expr::If { span: s, .. }
            | Expr::BinOp { span: s, .. }
            | Expr::List { span: s, .. }
            | Expr::Record { span: s, .. }
            | Expr::RecordAccess { span: s, .. }
            | Expr::RecordUpdate { span: s, .. }
            | Expr::Block { span: s, .. }
            | Expr::Strict { span: s, .. } => *s,
        }
    }
}
