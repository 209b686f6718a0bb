//! Type annotations as written in source (distinct from the inference
//! engine's internal `Ty` representation in `solis-typeck`).

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A lowercase type variable, e.g. `a` in `Maybe a`.
    Var(String),
    /// A named type constructor applied to zero or more arguments, e.g.
    /// `Int`, `List a`, `Maybe (List a)`.
    Con(String, Vec<Type>),
    /// A single-argument arrow; multi-argument functions are right-associated
    /// chains of this.
    Fun(Box<Type>, Box<Type>),
    /// A record type, with an optional row variable for extensible records.
    Record(Vec<(String, Type)>, Option<String>),
    /// An explicit `forall` written by the user (e.g. in a type annotation).
    Forall(Vec<String>, Box<Type>),
}

impl Type {
    pub fn fun(params: Vec<Type>, result: Type) -> Type {
        params
            .into_iter()
            .rev()
            .fold(result, |acc, param| Type::Fun(Box::new(param), Box::new(acc)))
    }
}
