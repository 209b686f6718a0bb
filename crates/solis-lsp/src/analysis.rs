//! Document analysis: parse, type-check, and produce LSP diagnostics.
//!
//! Bridges the Solis frontend (`solis-parser` + `solis-typeck`) with the LSP
//! protocol, converting byte-offset spans into LSP line/character positions
//! (0-based, UTF-16 code units per the LSP spec) and `SolisError`s into
//! `lsp_types::Diagnostic`s, the same shape the teacher's `mesh-lsp` produces
//! from its own parse/typeck errors.
//!
//! Unlike the teacher, `solis-typeck` doesn't keep a per-range type table
//! (there's no rowan CST backing it) -- hover and goto-definition instead
//! resolve the identifier word under the cursor against the module's
//! top-level bindings, which is the granularity `TypeEnv`/`Module` actually
//! expose.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use solis_common::{LineIndex, Span};
use solis_errors::SolisError;
use solis_parser::ast::{Decl, Module};
use solis_typeck::TypeEnv;

pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub module: Module,
    pub env: TypeEnv,
    pub line_index: LineIndex,
}

pub fn analyze_document(source: &str) -> AnalysisResult {
    let (module, parse_errors) = solis_parser::parse(source);
    let (env, type_errors) = solis_typeck::check_module(source, &module);
    let line_index = LineIndex::new(source);

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for error in parse_errors.iter().chain(type_errors.iter()) {
        diagnostics.push(error_to_diagnostic(source, error));
    }

    AnalysisResult { diagnostics, module, env, line_index }
}

fn error_to_diagnostic(source: &str, error: &SolisError) -> Diagnostic {
    let start = Position::new(error.location.line.saturating_sub(1), error.location.column.saturating_sub(1));
    let end = Position::new(error.location.end_line.saturating_sub(1), error.location.end_column.saturating_sub(1));
    let _ = source;
    Diagnostic {
        range: Range::new(start, end),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some("solis".to_string()),
        message: error.title.clone(),
        ..Default::default()
    }
}

/// Byte offset to an LSP position (0-based line, UTF-16 character offset).
pub fn offset_to_position(source: &str, offset: usize) -> Position {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character: u32 = source[line_start..offset].chars().map(|c| c.len_utf16() as u32).sum();
    Position::new(line, character)
}

/// LSP position to a byte offset, the inverse of [`offset_to_position`].
pub fn position_to_offset(source: &str, position: &Position) -> Option<usize> {
    let mut offset = 0usize;
    for (i, line) in source.split('\n').enumerate() {
        if i as u32 == position.line {
            let mut units = 0u32;
            for (byte_idx, ch) in line.char_indices() {
                if units >= position.character {
                    return Some(offset + byte_idx);
                }
                units += ch.len_utf16() as u32;
            }
            return Some(offset + line.len());
        }
        offset += line.len() + 1;
    }
    None
}

/// The identifier (and its byte-offset span) touching `offset`, if any.
pub fn word_at_offset(source: &str, offset: usize) -> Option<(String, Span)> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    let bytes_offset = offset.min(source.len());
    if !source.is_char_boundary(bytes_offset) {
        return None;
    }
    let mut start = bytes_offset;
    while start > 0 {
        let prev = source[..start].chars().next_back()?;
        if !is_ident(prev) {
            break;
        }
        start -= prev.len_utf8();
    }
    let mut end = bytes_offset;
    while end < source.len() {
        let next = source[end..].chars().next()?;
        if !is_ident(next) {
            break;
        }
        end += next.len_utf8();
    }
    if start == end {
        return None;
    }
    Some((source[start..end].to_string(), Span::new(start as u32, end as u32)))
}

/// The declaration span of the top-level function or type named `name`, for
/// goto-definition.
pub fn find_definition(module: &Module, name: &str) -> Option<Span> {
    module.decls.iter().find_map(|decl| match decl {
        Decl::Function(f) if f.name == name => Some(f.span),
        Decl::Type(t) if t.name == name => Some(t.span),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_position_counts_lines() {
        let source = "let a = 1\nlet b = 2";
        assert_eq!(offset_to_position(source, 10), Position::new(1, 0));
    }

    #[test]
    fn position_to_offset_is_the_inverse() {
        let source = "let a = 1\nlet b = 2";
        let offset = position_to_offset(source, &Position::new(1, 4)).unwrap();
        assert_eq!(&source[offset..offset + 1], "b");
    }

    #[test]
    fn word_at_offset_finds_the_enclosing_identifier() {
        let source = "let square = 1";
        let (word, _) = word_at_offset(source, 6).unwrap();
        assert_eq!(word, "square");
    }

    #[test]
    fn word_at_offset_is_none_on_punctuation() {
        let source = "let a = 1";
        assert!(word_at_offset(source, 5).is_none());
    }

    #[test]
    fn find_definition_locates_a_function_decl() {
        let source = "let greet x = x\nlet main = greet 1";
        let (module, errors) = solis_parser::parse(source);
        assert!(errors.is_empty());
        assert!(find_definition(&module, "greet").is_some());
        assert!(find_definition(&module, "missing").is_none());
    }

    #[test]
    fn analyze_document_reports_no_diagnostics_for_valid_source() {
        let result = analyze_document("let main = 1 + 2");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn analyze_document_reports_a_type_error() {
        let result = analyze_document("let main = 1 + true");
        assert!(!result.diagnostics.is_empty());
    }
}
