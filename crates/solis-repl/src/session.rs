//! REPL session state.
//!
//! Accumulates top-level declarations (functions, data types, imports) across
//! interactions so later inputs can refer to earlier ones -- the same
//! accumulate-and-recompile strategy the teacher's session used for its JIT
//! wrapper functions, here reused directly against `solis-typeck`/`solis-eval`
//! instead of an LLVM backend.

/// Persistent state for a REPL session.
pub struct ReplSession {
    /// Accumulated source of prior top-level declarations, one per entry.
    definitions: Vec<String>,
}

impl ReplSession {
    pub fn new() -> Self {
        ReplSession { definitions: Vec::new() }
    }

    /// Records a top-level declaration (already validated) for future input.
    pub fn add_definition(&mut self, source: &str) {
        self.definitions.push(source.to_string());
    }

    /// All accumulated declarations joined into one module source.
    pub fn definitions_source(&self) -> String {
        self.definitions.join("\n")
    }

    /// Drops every accumulated declaration, returning the session to empty.
    pub fn reset(&mut self) {
        self.definitions.clear();
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = ReplSession::new();
        assert!(session.definitions_source().is_empty());
        assert_eq!(session.definition_count(), 0);
    }

    #[test]
    fn add_definition_appends_source() {
        let mut session = ReplSession::new();
        session.add_definition("let add x y = x + y");
        assert!(session.definitions_source().contains("let add"));
        assert_eq!(session.definition_count(), 1);
    }

    #[test]
    fn definitions_accumulate_in_order() {
        let mut session = ReplSession::new();
        session.add_definition("let a = 1");
        session.add_definition("let b = 2");
        assert_eq!(session.definitions_source(), "let a = 1\nlet b = 2");
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = ReplSession::new();
        session.add_definition("let a = 1");
        session.reset();
        assert!(session.definitions_source().is_empty());
        assert_eq!(session.definition_count(), 0);
    }
}
