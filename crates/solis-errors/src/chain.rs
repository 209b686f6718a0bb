use solis_common::SourceLocation;

/// One step in the explanation of how a type was derived, e.g. "parameter
/// `x` inferred as `Int` from its use in `x + 1`".
#[derive(Debug, Clone, serde::Serialize)]
pub struct InferenceStep {
    pub reason: String,
    pub type_string: String,
    pub location: Option<SourceLocation>,
    pub context: Option<String>,
}

impl InferenceStep {
    pub fn new(reason: impl Into<String>, type_string: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            type_string: type_string.into(),
            location: None,
            context: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// An ordered trail of [`InferenceStep`]s explaining how a type was derived.
/// Attached to type-mismatch diagnostics as `expected_chain`/`actual_chain`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct InferenceChain {
    pub steps: Vec<InferenceStep>,
}

impl InferenceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(mut self, step: InferenceStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn format(&self) -> String {
        self.steps
            .iter()
            .map(|s| match &s.context {
                Some(ctx) => format!("{} -> {} ({ctx})", s.reason, s.type_string),
                None => format!("{} -> {}", s.reason, s.type_string),
            })
            .collect::<Vec<_>>()
            .join("\n  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_joins_steps() {
        let chain = InferenceChain::new()
            .add_step(InferenceStep::new("literal 1", "Int"))
            .add_step(InferenceStep::new("used in +", "Int"));
        assert_eq!(chain.format(), "literal 1 -> Int\n  used in + -> Int");
    }

    #[test]
    fn empty_chain_formats_empty() {
        assert_eq!(InferenceChain::new().format(), "");
    }
}
