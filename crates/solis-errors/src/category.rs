/// Coarse-grained classification of a [`crate::SolisError`], used to group
/// diagnostics and to pick an ariadne report kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorCategory {
    TypeError,
    SyntaxError,
    NameError,
    PatternMatchError,
    EvaluationError,
}

impl ErrorCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::TypeError => "type error",
            ErrorCategory::SyntaxError => "syntax error",
            ErrorCategory::NameError => "name error",
            ErrorCategory::PatternMatchError => "pattern match error",
            ErrorCategory::EvaluationError => "evaluation error",
        }
    }
}
