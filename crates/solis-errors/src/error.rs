use solis_common::SourceLocation;

use crate::category::ErrorCategory;
use crate::chain::InferenceChain;
use crate::suggestion::{ErrorSuggestion, TypeMismatchDetails};

/// The single diagnostic carrier for the whole pipeline: lexer, parser,
/// typechecker, and evaluator all produce `SolisError` values, so the CLI,
/// REPL, and LSP only ever need one renderer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SolisError {
    pub category: ErrorCategory,
    pub title: String,
    pub explanation: Option<String>,
    pub source_code: Option<String>,
    pub location: SourceLocation,
    pub suggestions: Vec<ErrorSuggestion>,
    pub related_info: Vec<String>,
    pub type_mismatch: Option<TypeMismatchDetails>,
    pub expected_chain: Option<InferenceChain>,
    pub actual_chain: Option<InferenceChain>,
}

impl SolisError {
    pub fn new(category: ErrorCategory, title: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            category,
            title: title.into(),
            explanation: None,
            source_code: None,
            location,
            suggestions: Vec::new(),
            related_info: Vec::new(),
            type_mismatch: None,
            expected_chain: None,
            actual_chain: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_source_code(mut self, source: impl Into<String>) -> Self {
        self.source_code = Some(source.into());
        self
    }

    pub fn add_suggestion(mut self, suggestion: ErrorSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn add_related_info(mut self, info: impl Into<String>) -> Self {
        self.related_info.push(info.into());
        self
    }

    pub fn with_type_mismatch(mut self, details: TypeMismatchDetails) -> Self {
        self.type_mismatch = Some(details);
        self
    }

    pub fn with_expected_chain(mut self, chain: InferenceChain) -> Self {
        self.expected_chain = Some(chain);
        self
    }

    pub fn with_actual_chain(mut self, chain: InferenceChain) -> Self {
        self.actual_chain = Some(chain);
        self
    }

    /// Plain-text rendering, no ANSI color, no source snippet -- suitable for
    /// logs and test assertions. See [`crate::render`] for the ariadne-backed
    /// terminal renderer.
    pub fn display(&self) -> String {
        let mut out = format!(
            "{}: {} (line {}, column {})",
            self.category.label(),
            self.title,
            self.location.line,
            self.location.column
        );
        if let Some(explanation) = &self.explanation {
            out.push('\n');
            out.push_str(explanation);
        }
        if let Some(mismatch) = &self.type_mismatch {
            out.push('\n');
            out.push_str(&mismatch.format());
        }
        for suggestion in &self.suggestions {
            out.push_str("\nsuggestion: ");
            out.push_str(&suggestion.description);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl std::fmt::Display for SolisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::error::Error for SolisError {}
