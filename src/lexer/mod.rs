//! Lexer module for Tenglish
//!
//! Hand-written lexer that turns Tenglish source into a token stream with
//! explicit line and block structure.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
