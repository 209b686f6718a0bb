use solis_common::SourceLocation;

/// A suggested fix attached to a diagnostic, e.g. "wrap in `Some(...)`".
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorSuggestion {
    pub description: String,
    pub code: String,
    pub location: Option<SourceLocation>,
}

impl ErrorSuggestion {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: String::new(),
            location: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// Details of a type mismatch: the two types, where it happened, and any
/// itemized differences (e.g. differing tuple arity, mismatched field names).
#[derive(Debug, Clone, serde::Serialize)]
pub struct TypeMismatchDetails {
    pub expected_type: String,
    pub actual_type: String,
    pub location: SourceLocation,
    pub differences: Vec<String>,
}

impl TypeMismatchDetails {
    pub fn new(expected_type: impl Into<String>, actual_type: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            expected_type: expected_type.into(),
            actual_type: actual_type.into(),
            location,
            differences: Vec::new(),
        }
    }

    pub fn add_difference(mut self, diff: impl Into<String>) -> Self {
        self.differences.push(diff.into());
        self
    }

    pub fn format(&self) -> String {
        let mut out = format!("expected `{}`, found `{}`", self.expected_type, self.actual_type);
        for diff in &self.differences {
            out.push_str("\n  - ");
            out.push_str(diff);
        }
        out
    }
}

/// Suggestion builders mirroring the original interpreter's heuristic fixups:
/// coercion hints between related types, `Some(...)`/`Ok(...)` wraps, and
/// pattern-arity fixes.
pub mod suggestions {
    use super::ErrorSuggestion;

    pub fn suggest_type_conversion(expected: &str, actual: &str) -> Option<ErrorSuggestion> {
        match (expected, actual) {
            ("Float", "Int") => Some(
                ErrorSuggestion::new("convert the integer to a float").with_code("toFloat(...)"),
            ),
            ("Int", "Float") => Some(
                ErrorSuggestion::new("convert the float to an integer").with_code("toInt(...)"),
            ),
            ("String", _) => Some(
                ErrorSuggestion::new("convert the value to a string").with_code("toString(...)"),
            ),
            (expected, _) if expected.starts_with("Maybe ") => Some(
                ErrorSuggestion::new("wrap the value in `Some`").with_code("Some(...)"),
            ),
            (expected, _) if expected.starts_with("Result ") => Some(
                ErrorSuggestion::new("wrap the value in `Ok`").with_code("Ok(...)"),
            ),
            _ => None,
        }
    }

    pub fn suggest_pattern_fix(constructor: &str, expected_arity: usize, found_arity: usize) -> ErrorSuggestion {
        if found_arity < expected_arity {
            ErrorSuggestion::new(format!(
                "`{constructor}` expects {expected_arity} argument(s), but {found_arity} were given; add the missing pattern(s)"
            ))
        } else {
            ErrorSuggestion::new(format!(
                "`{constructor}` expects {expected_arity} argument(s), but {found_arity} were given; remove the extra pattern(s)"
            ))
        }
    }

    pub fn suggest_function_application(name: &str) -> ErrorSuggestion {
        ErrorSuggestion::new(format!("`{name}` is a function; did you forget to apply it to an argument?"))
    }

    pub fn suggest_import(name: &str, module: &str) -> ErrorSuggestion {
        ErrorSuggestion::new(format!("`{name}` is exported by `{module}`; add `import {module} ({name})`"))
    }
}

#[cfg(test)]
mod tests {
    use super::suggestions::*;

    #[test]
    fn suggests_float_conversion() {
        let s = suggest_type_conversion("Float", "Int").unwrap();
        assert_eq!(s.code, "toFloat(...)");
    }

    #[test]
    fn suggests_option_wrap() {
        let s = suggest_type_conversion("Maybe Int", "Int").unwrap();
        assert_eq!(s.code, "Some(...)");
    }

    #[test]
    fn no_suggestion_for_unrelated_types() {
        assert!(suggest_type_conversion("Bool", "List Int").is_none());
    }

    #[test]
    fn pattern_fix_mentions_missing() {
        let s = suggest_pattern_fix("Just", 1, 0);
        assert!(s.description.contains("missing"));
    }
}
