//! Code generation for Tenglish
//!
//! Backends turn a parsed [`Program`] into target-language source text.

mod python;

pub use python::{DEFAULT_INDENT_WIDTH, PythonGenerator};

use crate::parser::Program;

/// Trait for code generators
pub trait CodeGenerator {
    /// Generate code from the AST. Generation of a parsed program cannot fail.
    fn generate(&mut self, program: &Program) -> String;

    /// Get the file extension for the target language
    fn file_extension(&self) -> &'static str;

    /// Get the name of the target language
    fn language_name(&self) -> &'static str;
}
