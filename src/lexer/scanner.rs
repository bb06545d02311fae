//! Hand-written lexer/scanner for Tenglish
//!
//! Works one physical line at a time: leading whitespace is compared against
//! an indentation stack to produce block tokens, then the rest of the line is
//! split into tokens. Keyword phrases are resolved here by greedy
//! longest-match; postfix keywords are left in place for the parser.

use log::trace;

use super::token::{Token, TokenKind};
use crate::errors::{LexError, LexResult, SourceSpan};
use crate::keywords::{Keyword, KeywordTable};

/// Width a tab advances indentation to (next multiple of this)
const TAB_WIDTH: usize = 8;

/// Most blocks that may be open at once
const MAX_INDENT_LEVELS: usize = 100;

/// Prefixes that may sit directly in front of a string literal
const STRING_PREFIXES: &[&str] = &["f", "r", "b", "u", "rb", "br", "fr", "rf"];

/// The lexer/scanner for Tenglish source code
pub struct Lexer<'src, 'kw> {
    /// The source code being lexed
    source: &'src str,
    /// Keyword surface forms to recognize
    keywords: &'kw KeywordTable,
    /// Current byte position in the source
    pos: usize,
    /// Start position of the current token
    start: usize,
    /// Current 1-based line number
    line: usize,
    /// Byte offset where the current line begins
    line_start: usize,
    /// Widths of the enclosing blocks, innermost last
    indents: Vec<usize>,
    /// Open `(` / `[` tokens; while non-empty, line breaks are insignificant
    open_brackets: Vec<Token>,
    tokens: Vec<Token>,
}

impl<'src, 'kw> Lexer<'src, 'kw> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str, keywords: &'kw KeywordTable) -> Self {
        Self {
            source,
            keywords,
            pos: 0,
            start: 0,
            line: 1,
            line_start: 0,
            indents: vec![0],
            open_brackets: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Peek at the next character (one ahead of current)
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Consume the character if it matches the expected one
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 1-based character column of a byte offset on the current line
    fn column_of(&self, offset: usize) -> usize {
        self.source[self.line_start..offset].chars().count() + 1
    }

    fn current_lexeme(&self) -> &'src str {
        &self.source[self.start..self.pos]
    }

    /// Create a token spanning from `start` to the current position
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.current_lexeme(),
            SourceSpan::new(self.start, self.pos),
            self.line,
            self.column_of(self.start),
        )
    }

    /// Zero-width token at the current position
    fn marker_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            "",
            SourceSpan::new(self.pos, self.pos),
            self.line,
            self.column_of(self.pos),
        )
    }

    fn error(&self, message: impl Into<String>, start: usize, end: usize) -> LexError {
        LexError::new(
            message,
            self.line,
            self.column_of(start),
            SourceSpan::new(start, end),
        )
    }

    fn push(&mut self, token: Token) {
        trace!(
            "{}:{} {:?} {:?}",
            token.line, token.column, token.kind, token.text
        );
        self.tokens.push(token);
    }

    /// Tokenize the whole source
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        while !self.is_at_end() {
            self.scan_line()?;
        }

        if let Some(open) = self.open_brackets.last() {
            return Err(LexError::new(
                format!("'{}' was never closed", open.text),
                open.line,
                open.column,
                open.span,
            ));
        }

        // Unwind every open block at end of input
        while self.indents.len() > 1 {
            self.indents.pop();
            let token = self.marker_token(TokenKind::Dedent);
            self.push(token);
        }
        let eof = self.marker_token(TokenKind::Eof);
        self.push(eof);

        Ok(self.tokens)
    }

    /// Scan one physical line, including its line break
    fn scan_line(&mut self) -> LexResult<()> {
        self.line_start = self.pos;
        let continuation = !self.open_brackets.is_empty();
        let width = self.measure_indent();

        // Blank and comment-only lines never touch the indentation stack
        if matches!(self.peek(), None | Some('\n' | '\r' | '#')) && !self.rest_of_line_has_code() {
            self.finish_line();
            return Ok(());
        }

        if !continuation {
            self.apply_indentation(width)?;
        }

        loop {
            self.skip_inline_whitespace();
            match self.peek() {
                None | Some('\n') => break,
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some(_) => {
                    let token = self.scan_token()?;
                    self.push(token);
                }
            }
        }

        if self.open_brackets.is_empty() {
            let newline = self.marker_token(TokenKind::Newline);
            self.push(newline);
        }
        self.finish_line();
        Ok(())
    }

    /// True when something other than whitespace or a comment follows on this line
    fn rest_of_line_has_code(&self) -> bool {
        let rest = &self.source[self.pos..];
        let line = rest.split('\n').next().unwrap_or("");
        let trimmed = line.trim_start();
        !(trimmed.is_empty() || trimmed.starts_with('#'))
    }

    /// Consume through the end of the current line
    fn finish_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
        self.line += 1;
    }

    /// Consume leading spaces and tabs, returning the indentation width
    fn measure_indent(&mut self) -> usize {
        let mut width = 0;
        loop {
            match self.peek() {
                Some(' ') => width += 1,
                Some('\t') => width += TAB_WIDTH - width % TAB_WIDTH,
                _ => break,
            }
            self.advance();
        }
        width
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Compare a line's indentation with the stack and emit block tokens
    fn apply_indentation(&mut self, width: usize) -> LexResult<()> {
        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            if self.indents.len() > MAX_INDENT_LEVELS {
                return Err(self.error(
                    "too many levels of indentation",
                    self.line_start,
                    self.pos,
                ));
            }
            self.indents.push(width);
            self.start = self.line_start;
            let token = self.make_token(TokenKind::Indent);
            self.push(token);
        } else if width < current {
            while self.indents.last().is_some_and(|&top| top > width) {
                self.indents.pop();
                let token = self.marker_token(TokenKind::Dedent);
                self.push(token);
            }
            if self.indents.last() != Some(&width) {
                return Err(self.error(
                    format!(
                        "inconsistent indentation: width {} does not match any enclosing block",
                        width
                    ),
                    self.line_start,
                    self.pos,
                ));
            }
        }

        Ok(())
    }

    /// Scan the next token starting at the current position
    fn scan_token(&mut self) -> LexResult<Token> {
        self.start = self.pos;
        let Some(c) = self.advance() else {
            return Ok(self.marker_token(TokenKind::Eof));
        };

        if c.is_alphabetic() || c == '_' {
            return self.scan_identifier();
        }

        if c.is_ascii_digit() || (c == '.' && self.peek().is_some_and(|d| d.is_ascii_digit())) {
            return self.scan_number();
        }

        if c == '"' || c == '\'' {
            return self.scan_string(c);
        }

        let token = match c {
            '(' => {
                let token = self.make_token(TokenKind::LParen);
                self.open_brackets.push(token.clone());
                token
            }
            '[' => {
                let token = self.make_token(TokenKind::LBracket);
                self.open_brackets.push(token.clone());
                token
            }
            ')' => {
                self.open_brackets.pop();
                self.make_token(TokenKind::RParen)
            }
            ']' => {
                self.open_brackets.pop();
                self.make_token(TokenKind::RBracket)
            }
            ',' => self.make_token(TokenKind::Comma),
            ':' => self.make_token(TokenKind::Colon),
            '.' => self.make_token(TokenKind::Dot),

            '+' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::PlusEq)
                } else {
                    self.make_token(TokenKind::Plus)
                }
            }
            '-' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::MinusEq)
                } else {
                    self.make_token(TokenKind::Minus)
                }
            }
            '*' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::StarEq)
                } else {
                    self.make_token(TokenKind::Star)
                }
            }
            '/' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::SlashEq)
                } else {
                    self.make_token(TokenKind::Slash)
                }
            }
            '%' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::PercentEq)
                } else {
                    self.make_token(TokenKind::Percent)
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqEq)
                } else {
                    self.make_token(TokenKind::Eq)
                }
            }
            '!' if self.match_char('=') => self.make_token(TokenKind::BangEq),
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }

            _ => {
                return Err(self.error(
                    format!("unexpected character '{}'", c),
                    self.start,
                    self.pos,
                ));
            }
        };

        Ok(token)
    }

    fn scan_word(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
    }

    /// Scan an identifier, keyword phrase, or prefixed string literal
    fn scan_identifier(&mut self) -> LexResult<Token> {
        self.scan_word();
        let word = self.current_lexeme();

        if let Some(quote @ ('"' | '\'')) = self.peek()
            && STRING_PREFIXES.contains(&word.to_ascii_lowercase().as_str())
        {
            self.advance();
            return self.scan_string(quote);
        }

        if let Some(keyword) = self.match_keyword(word) {
            return Ok(self.make_token(TokenKind::Keyword(keyword)));
        }

        if word == "in" {
            return Ok(self.make_token(TokenKind::In));
        }

        Ok(self.make_token(TokenKind::Ident(word.to_string())))
    }

    /// Longest keyword phrase starting with `first`, consuming its extra words
    fn match_keyword(&mut self, first: &str) -> Option<Keyword> {
        let keywords = self.keywords;
        for entry in keywords.candidates(first) {
            if let Some(end) = self.match_following_words(&entry.words[1..]) {
                self.pos = end;
                return Some(entry.keyword);
            }
        }
        None
    }

    /// Try to read `words` after the current position, each preceded by
    /// spaces or tabs on the same line. Returns the end offset on success.
    fn match_following_words(&self, words: &[&str]) -> Option<usize> {
        let mut pos = self.pos;
        for expected in words {
            let rest = &self.source[pos..];
            let trimmed = rest.trim_start_matches([' ', '\t']);
            if trimmed.len() == rest.len() {
                return None;
            }
            pos += rest.len() - trimmed.len();

            let len = trimmed
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(trimmed.len());
            if &trimmed[..len] != *expected {
                return None;
            }
            pos += len;
        }
        Some(pos)
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    /// Scan an integer or float literal; the text is kept verbatim
    fn scan_number(&mut self) -> LexResult<Token> {
        let mut is_float = self.current_lexeme() == ".";
        self.eat_digits();

        if !is_float
            && self.peek() == Some('.')
            && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.eat_digits();
            is_float = true;
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let mut after = self.source[self.pos + 1..].chars();
            let has_exponent = match after.next() {
                Some(d) if d.is_ascii_digit() => true,
                Some('+' | '-') => after.next().is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.eat_digits();
                is_float = true;
            }
        }

        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.scan_word();
            return Err(self.error(
                format!("invalid numeric literal '{}'", self.current_lexeme()),
                self.start,
                self.pos,
            ));
        }

        let text = self.current_lexeme().to_string();
        if is_float {
            Ok(self.make_token(TokenKind::Float(text)))
        } else {
            Ok(self.make_token(TokenKind::Int(text)))
        }
    }

    /// Scan a string literal whose opening `quote` was just consumed
    fn scan_string(&mut self, quote: char) -> LexResult<Token> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.error(
                        "unterminated string literal",
                        self.start,
                        self.pos,
                    ));
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        let text = self.current_lexeme().to_string();
        Ok(self.make_token(TokenKind::Str(text)))
    }
}
