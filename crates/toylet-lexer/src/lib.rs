//! Toylet lexer - tokenization for the Toylet scripting language.
//!
//! This crate converts source text into tokens. Malformed input never stops a
//! scan; it is recorded in a [`Diagnostics`] collector supplied by the caller.
//!
//! # Example
//!
//! ```
//! use toylet_lexer::{scan, Diagnostics, Literal, TokenKind};
//!
//! let mut diagnostics = Diagnostics::new();
//! let tokens = scan("var x = 1;", &mut diagnostics);
//! assert_eq!(tokens[0].kind, TokenKind::Var);
//! assert_eq!(tokens[3].literal, Some(Literal::Number(1.0)));
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfFile);
//! assert_eq!(diagnostics.count(), 0);
//! ```

pub mod lexer;
pub mod token;

pub use lexer::{scan, tokenize, LexError, Lexer};
pub use token::{lookup_identifier, lookup_keyword, Literal, Token, TokenKind};
pub use toylet_diagnostics::{Diagnostic, Diagnostics, Position};
