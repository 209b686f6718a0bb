//! Terminal rendering of [`SolisError`] via `ariadne`, mirroring the
//! color-coded source-snippet diagnostics the original CLI prints.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::category::ErrorCategory;
use crate::error::SolisError;

fn report_kind(category: ErrorCategory) -> ReportKind<'static> {
    match category {
        ErrorCategory::EvaluationError => ReportKind::Custom("runtime error", Color::Red),
        _ => ReportKind::Error,
    }
}

/// Render one error as an ariadne report string, given the file name and the
/// full source text it refers to.
pub fn render(error: &SolisError, source: &str, filename: &str) -> String {
    let start = byte_offset_of(source, error.location.line, error.location.column);
    let end = byte_offset_of(source, error.location.end_line, error.location.end_column).max(start + 1);
    let range = start..end.min(source.len());

    let mut builder = Report::build(report_kind(error.category), (filename, range.clone()))
        .with_message(&error.title)
        .with_label(
            Label::new((filename, range))
                .with_message(error.explanation.clone().unwrap_or_else(|| error.title.clone()))
                .with_color(Color::Red),
        );

    if let Some(mismatch) = &error.type_mismatch {
        builder = builder.with_note(mismatch.format());
    }

    for suggestion in &error.suggestions {
        builder = builder.with_help(suggestion.description.clone());
    }

    let report = builder.finish();
    let mut buf = Vec::new();
    let _ = report.write((filename, Source::from(source)), &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn byte_offset_of(source: &str, line: u32, column: u32) -> usize {
    let mut current_line = 1u32;
    let mut offset = 0usize;
    for ch in source.chars() {
        if current_line == line {
            break;
        }
        offset += ch.len_utf8();
        if ch == '\n' {
            current_line += 1;
        }
    }
    offset + (column.saturating_sub(1) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_common::SourceLocation;

    #[test]
    fn render_includes_title() {
        let err = SolisError::new(
            ErrorCategory::TypeError,
            "type mismatch",
            SourceLocation::single(1, 1),
        );
        let rendered = render(&err, "let x = 1", "test.solis");
        assert!(rendered.contains("type mismatch"));
    }

    #[test]
    fn byte_offset_finds_second_line() {
        assert_eq!(byte_offset_of("ab\ncd", 2, 1), 3);
    }
}
