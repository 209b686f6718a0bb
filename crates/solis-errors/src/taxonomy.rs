//! Concrete diagnostic constructors, one per named error kind.
//!
//! Each corresponds to a row of the error taxonomy: lexing, parsing, typing,
//! and evaluation each produce one of these rather than inventing ad hoc
//! messages.

use solis_common::SourceLocation;

use crate::category::ErrorCategory;
use crate::error::SolisError;
use crate::suggestion::{suggestions, ErrorSuggestion, TypeMismatchDetails};

pub fn lexical_error(message: impl Into<String>, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::SyntaxError, "unrecognized character", location)
        .with_explanation(message)
}

pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::SyntaxError, "unexpected token", location).with_explanation(message)
}

pub fn type_mismatch(expected: &str, actual: &str, location: SourceLocation) -> SolisError {
    let mut err = SolisError::new(ErrorCategory::TypeError, "type mismatch", location)
        .with_type_mismatch(TypeMismatchDetails::new(expected, actual, location));
    if let Some(suggestion) = suggestions::suggest_type_conversion(expected, actual) {
        err = err.add_suggestion(suggestion);
    }
    err
}

pub fn infinite_type(var: &str, ty: &str, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::TypeError, "infinite type", location).with_explanation(format!(
        "cannot construct the infinite type `{var} = {ty}`: `{var}` occurs in `{ty}`"
    ))
}

pub fn undefined_name(name: &str, suggestions_list: &[&str], location: SourceLocation) -> SolisError {
    let mut err = SolisError::new(
        ErrorCategory::NameError,
        format!("undefined name `{name}`"),
        location,
    );
    if let Some(first) = suggestions_list.first() {
        err = err.add_suggestion(ErrorSuggestion::new(format!("did you mean `{first}`?")).with_code(first.to_string()));
    }
    err
}

pub fn ambiguous_name(name: &str, modules: &[String], location: SourceLocation) -> SolisError {
    SolisError::new(
        ErrorCategory::NameError,
        format!("ambiguous name `{name}`"),
        location,
    )
    .with_explanation(format!("`{name}` is exported by multiple modules: {}", modules.join(", ")))
}

pub fn unsupported_pattern(description: impl Into<String>, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::PatternMatchError, "unsupported pattern", location)
        .with_explanation(description)
}

pub fn non_exhaustive_match(missing: &[String], location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::PatternMatchError, "non-exhaustive match", location).with_explanation(format!(
        "the following patterns are not covered: {}",
        missing.join(", ")
    ))
}

pub fn not_callable(ty: &str, location: SourceLocation) -> SolisError {
    SolisError::new(
        ErrorCategory::EvaluationError,
        format!("value of type `{ty}` is not callable"),
        location,
    )
}

pub fn division_by_zero(location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::EvaluationError, "division by zero", location)
}

pub fn field_not_found(field: &str, record_ty: &str, location: SourceLocation) -> SolisError {
    SolisError::new(
        ErrorCategory::EvaluationError,
        format!("no field `{field}` on `{record_ty}`"),
        location,
    )
}

pub fn io_failure(message: impl Into<String>, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::EvaluationError, "I/O failure", location).with_explanation(message)
}

/// An irrefutable binding pattern (a `let`, function parameter, or `<-`
/// bind) that the runtime value didn't actually match.
pub fn refutable_binding(description: impl Into<String>, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::PatternMatchError, "pattern match failed", location)
        .with_explanation(description)
}

/// A catch-all for runtime faults that don't fit a more specific taxonomy
/// entry (wrong-shaped operand to `if`/record update/etc.), mirroring the
/// assorted `std::runtime_error` messages scattered through the original
/// interpreter's `eval`.
pub fn evaluation_error(message: impl Into<String>, location: SourceLocation) -> SolisError {
    SolisError::new(ErrorCategory::EvaluationError, message.into(), location)
}

pub fn unsupported_operator(op: &str, lhs_ty: &str, rhs_ty: &str, location: SourceLocation) -> SolisError {
    SolisError::new(
        ErrorCategory::EvaluationError,
        format!("operator `{op}` is not defined for `{lhs_ty}` and `{rhs_ty}`"),
        location,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::single(2, 2)
    }

    #[test]
    fn type_mismatch_suggests_conversion() {
        let err = type_mismatch("Float", "Int", loc());
        assert!(!err.suggestions.is_empty());
    }

    #[test]
    fn undefined_name_includes_suggestion() {
        let err = undefined_name("grete", &["greet"], loc());
        assert!(err.title.contains("grete"));
        assert_eq!(err.suggestions[0].code, "greet");
    }

    #[test]
    fn division_by_zero_is_evaluation_category() {
        let err = division_by_zero(loc());
        assert_eq!(err.category, ErrorCategory::EvaluationError);
    }
}
