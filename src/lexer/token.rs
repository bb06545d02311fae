//! Token definitions for Tenglish
//!
//! Defines all token types produced by the lexer.

use crate::errors::SourceSpan;
use crate::keywords::Keyword;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Exact source text (multi-word keywords keep their original spacing)
    pub text: String,
    /// Source location of this token
    pub span: SourceSpan,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        span: SourceSpan,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line,
            column,
        }
    }

    /// Human-readable description used in "found ..." messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Str(_) => {
                format!("{} {}", self.kind.description(), self.text)
            }
            TokenKind::Keyword(_) | TokenKind::In => format!("'{}'", self.text),
            _ => self.kind.description().to_string(),
        }
    }
}

/// The kind of a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals (text kept verbatim)
    /// Integer literal
    Int(String),
    /// Float literal
    Float(String),
    /// String literal, including quotes and any prefix
    Str(String),
    /// Identifier
    Ident(String),
    /// Keyword from the keyword table
    Keyword(Keyword),

    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `in` (membership)
    In,

    // Layout
    /// End of a logical line
    Newline,
    /// Indentation increased
    Indent,
    /// Indentation decreased by one level
    Dedent,
    /// End of input
    Eof,
}

impl TokenKind {
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    /// Get a human-readable description of this token kind
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::In => "'in'",
            TokenKind::Newline => "end of line",
            TokenKind::Indent => "indented block",
            TokenKind::Dedent => "end of block",
            TokenKind::Eof => "end of input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let span = SourceSpan::new(0, 1);
        let ident = Token::new(TokenKind::Ident("x".into()), "x", span, 1, 1);
        assert_eq!(ident.describe(), "identifier 'x'");

        let kw = Token::new(
            TokenKind::Keyword(Keyword::While),
            "unnanta varaku",
            span,
            1,
            1,
        );
        assert_eq!(kw.describe(), "'unnanta varaku'");

        let num = Token::new(TokenKind::Int("42".into()), "42", span, 1, 1);
        assert_eq!(num.describe(), "integer literal 42");

        let nl = Token::new(TokenKind::Newline, "", span, 1, 1);
        assert_eq!(nl.describe(), "end of line");
    }
}
