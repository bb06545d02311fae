//! Error handling for Brahmic
//!
//! Every stage reports the first problem it finds, with the exact source
//! position, and the orchestrator folds them into one [`TranspileError`].

mod diagnostic;

use std::fmt;
use std::ops::Range;
use thiserror::Error;

pub use diagnostic::{format_error, print_error};

/// A span in the source code, represented as a byte range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one that covers both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// Failure while turning source text into tokens.
///
/// Raised for unrecognized characters, inconsistent indentation,
/// unterminated string literals and unclosed brackets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub span: SourceSpan,
}

impl LexError {
    pub fn new(message: impl Into<String>, line: usize, column: usize, span: SourceSpan) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            span,
        }
    }
}

/// Failure at the first token that cannot extend the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Descriptions of the tokens that would have been accepted, when known
    pub expected: Vec<String>,
    pub span: SourceSpan,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, column: usize, span: SourceSpan) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            expected: Vec::new(),
            span,
        }
    }

    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }
}

/// The pipeline stage an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lex => write!(f, "lexer"),
            Stage::Parse => write!(f, "parser"),
        }
    }
}

/// The single error channel of [`crate::transpile`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranspileError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),
}

impl TranspileError {
    pub fn stage(&self) -> Stage {
        match self {
            TranspileError::Lex(_) => Stage::Lex,
            TranspileError::Parse(_) => Stage::Parse,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TranspileError::Lex(e) => &e.message,
            TranspileError::Parse(e) => &e.message,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            TranspileError::Lex(e) => e.line,
            TranspileError::Parse(e) => e.line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            TranspileError::Lex(e) => e.column,
            TranspileError::Parse(e) => e.column,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            TranspileError::Lex(e) => e.span,
            TranspileError::Parse(e) => e.span,
        }
    }

    /// Acceptable token descriptions; empty for lexer errors
    pub fn expected(&self) -> &[String] {
        match self {
            TranspileError::Lex(_) => &[],
            TranspileError::Parse(e) => &e.expected,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = SourceSpan::new(4, 9);
        let b = SourceSpan::new(1, 6);
        assert_eq!(a.merge(b), SourceSpan::new(1, 9));
        assert_eq!(a.len(), 5);
        assert!(SourceSpan::new(3, 3).is_empty());
    }

    #[test]
    fn test_transpile_error_accessors() {
        let err: TranspileError =
            ParseError::new("expected ':'", 3, 7, SourceSpan::new(20, 21))
                .with_expected(["':'"])
                .into();
        assert_eq!(err.stage(), Stage::Parse);
        assert_eq!(err.message(), "expected ':'");
        assert_eq!((err.line(), err.column()), (3, 7));
        assert_eq!(err.expected(), ["':'".to_string()]);
        assert_eq!(
            err.to_string(),
            "Parser error: expected ':' at line 3, column 7"
        );
    }

    #[test]
    fn test_stage_display() {
        let err: TranspileError = LexError::new("bad", 1, 1, SourceSpan::default()).into();
        assert_eq!(err.stage().to_string(), "lexer");
        assert!(err.expected().is_empty());
    }
}
