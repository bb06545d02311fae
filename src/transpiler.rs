//! Transpiler pipeline
//!
//! Runs lexer, parser and Python generator in sequence and reports the first
//! failure through [`TranspileError`].

use log::debug;

use crate::codegen::{CodeGenerator, DEFAULT_INDENT_WIDTH, PythonGenerator};
use crate::errors::TranspileError;
use crate::keywords::KeywordTable;
use crate::lexer::{Lexer, Token};
use crate::parser::{Parser, Program};

/// Transpile Tenglish source to Python with the default configuration
pub fn transpile(source: &str) -> Result<String, TranspileError> {
    Transpiler::new().transpile(source)
}

/// Configured pipeline. Cheap to build; holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct Transpiler<'kw> {
    keywords: &'kw KeywordTable,
    indent_width: usize,
}

impl Default for Transpiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler<'static> {
    /// Pipeline over the built-in Tenglish keyword table
    pub fn new() -> Self {
        Self::with_keywords(KeywordTable::global())
    }
}

impl<'kw> Transpiler<'kw> {
    pub fn with_keywords(keywords: &'kw KeywordTable) -> Self {
        Self {
            keywords,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Spaces per indentation level in the generated Python
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn keywords(&self) -> &'kw KeywordTable {
        self.keywords
    }

    /// Run only the lexer
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, TranspileError> {
        let tokens = Lexer::new(source, self.keywords).tokenize()?;
        debug!("lexed {} tokens from {} bytes", tokens.len(), source.len());
        Ok(tokens)
    }

    /// Run the lexer and parser
    pub fn parse(&self, source: &str) -> Result<Program, TranspileError> {
        let tokens = self.tokenize(source)?;
        let program = Parser::new(tokens, self.keywords).parse()?;
        Ok(program)
    }

    /// Run the whole pipeline
    pub fn transpile(&self, source: &str) -> Result<String, TranspileError> {
        let program = self.parse(source)?;
        let mut generator =
            PythonGenerator::new(self.keywords).with_indent_width(self.indent_width);
        Ok(generator.generate(&program))
    }
}
