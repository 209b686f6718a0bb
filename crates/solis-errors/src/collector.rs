use crate::error::SolisError;

/// Accumulates errors and warnings across a compilation pass.
///
/// Mirrors the "collect vs. fail fast" policy used throughout the pipeline:
/// by default errors accumulate so a single run reports as many problems as
/// possible, but `stop_on_first_error` mode turns the first `add_error` into
/// an immediate `Err`, for contexts (like the REPL) that want to bail out
/// on the first mistake.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<SolisError>,
    warnings: Vec<SolisError>,
    stop_on_first_error: bool,
}

impl ErrorCollector {
    pub fn new(stop_on_first_error: bool) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stop_on_first_error,
        }
    }

    /// Record an error. Returns `Err` (without dropping the error -- it is
    /// still recorded) if `stop_on_first_error` is set.
    pub fn add_error(&mut self, error: SolisError) -> Result<(), SolisError> {
        self.errors.push(error.clone());
        if self.stop_on_first_error && self.errors.len() > 1 {
            return Err(error);
        }
        Ok(())
    }

    pub fn add_warning(&mut self, warning: SolisError) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn errors(&self) -> &[SolisError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[SolisError] {
        &self.warnings
    }

    pub fn display_all(&self) -> String {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .map(|e| e.display())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(SolisError::to_json).collect::<Vec<_>>(),
            "warnings": self.warnings.iter().map(SolisError::to_json).collect::<Vec<_>>(),
        })
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    /// Returns the first recorded error, if any -- the collector's
    /// all-at-once analogue of the original's `throwIfErrors`.
    pub fn first_error(&self) -> Option<&SolisError> {
        self.errors.first()
    }
}
