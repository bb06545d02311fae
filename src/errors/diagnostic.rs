//! Pretty error reporting using ariadne
//!
//! Provides colorful, user-friendly error messages with source context.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use std::ops::Range;

use crate::errors::TranspileError;

fn build_report<'a>(
    filename: &'a str,
    error: &TranspileError,
    color: bool,
) -> Report<'a, (&'a str, Range<usize>)> {
    let kind = match error.stage() {
        crate::errors::Stage::Lex => "Lexer error",
        crate::errors::Stage::Parse => "Parser error",
    };
    let span: Range<usize> = error.span().into();

    let mut report = Report::build(ReportKind::Error, (filename, span.clone()))
        .with_config(
            Config::default()
                .with_color(color)
                .with_index_type(IndexType::Byte),
        )
        .with_message(kind)
        .with_label(
            Label::new((filename, span))
                .with_message(error.message())
                .with_color(Color::Red),
        );

    if !error.expected().is_empty() {
        report = report.with_note(format!("expected one of: {}", error.expected().join(", ")));
    }

    report.finish()
}

/// Print an error with source context to stderr
pub fn print_error(source: &str, filename: &str, error: &TranspileError) {
    if let Err(io) = build_report(filename, error, true).eprint((filename, Source::from(source))) {
        // Fall back to the plain message when the terminal is gone
        log::warn!("failed to render diagnostic: {io}");
        eprintln!("{error}");
    }
}

/// Format an error as a plain string (no colors)
pub fn format_error(source: &str, filename: &str, error: &TranspileError) -> String {
    let mut output = Vec::new();
    if build_report(filename, error, false)
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }
    String::from_utf8_lossy(&output).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LexError, ParseError, SourceSpan};

    #[test]
    fn test_format_parse_error() {
        let source = "okavela x > 5\n";
        let err: TranspileError = ParseError::new(
            "expected 'aite' or 'avvakapote' after condition",
            1,
            14,
            SourceSpan::new(13, 14),
        )
        .with_expected(["'aite'", "'avvakapote'"])
        .into();

        let text = format_error(source, "main.teng", &err);
        assert!(text.contains("Parser error"));
        assert!(text.contains("expected 'aite' or 'avvakapote' after condition"));
        assert!(text.contains("expected one of: 'aite', 'avvakapote'"));
    }

    #[test]
    fn test_format_lex_error() {
        let source = "x = \"abc\n";
        let err: TranspileError =
            LexError::new("unterminated string literal", 1, 5, SourceSpan::new(4, 8)).into();

        let text = format_error(source, "main.teng", &err);
        assert!(text.contains("Lexer error"));
        assert!(text.contains("unterminated string literal"));
    }
}
