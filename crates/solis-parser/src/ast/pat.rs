use solis_common::Span;

use super::expr::Literal;

/// A pattern, as matched against a scrutinee value during evaluation and
/// typed against an expected type during inference.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Var(String, Span),
    Lit(Literal, Span),
    /// A constructor pattern: `Just x`, `x :: xs` (ctor name `"::"`, arity 2).
    Cons {
        ctor: String,
        args: Vec<Pattern>,
        span: Span,
    },
    /// A fixed-length list pattern, `[a, b, c]`.
    List(Vec<Pattern>, Span),
    Record(Vec<(String, Pattern)>, Span),
    Wildcard(Span),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Var(_, s)
            | Pattern::Lit(_, s)
            | Pattern::Cons { span: s, .. }
            | Pattern::List(_, s)
            | Pattern::Record(_, s)
            | Pattern::Wildcard(s) => *s,
        }
    }
}
