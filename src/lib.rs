//! Brahmic - Tenglish to Python transpiler
//!
//! Tenglish is an indentation-sensitive language with Telugu-English
//! keywords, several of them postfix (`("hi")cheppu`, `x ivvu`,
//! `items lo item ki:`). This crate lexes it, parses it into an AST and
//! renders equivalent Python source.

pub mod codegen;
pub mod errors;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod transpiler;

// Re-export commonly used types
pub use codegen::{CodeGenerator, PythonGenerator};
pub use errors::{LexError, ParseError, SourceSpan, Stage, TranspileError};
pub use keywords::{Keyword, KeywordTable};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, Program};
pub use transpiler::{Transpiler, transpile};
