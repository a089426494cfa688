//! Hand-rolled lexer and recursive descent parser for nand2tetris-style chip HDL.
//!
//! The main entry point is [`parse_chip`], which turns one chip's source text
//! into a [`ParsedChipDefinition`]. Every AST node carries a 1-based
//! [`Loc`](ast::Loc) that downstream stages use in their error messages.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): source text to tokens, skipping whitespace and
//!   `//` / `/* */` comments.
//! - **Parser** ([`parser`]): recursive descent over the token stream. Stops
//!   at the first error.
//! - **AST** ([`ast`]): plain data with serde support.

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    ChipName, ConnectionDecl, IoDecl, Loc, ParsedChipDefinition, PartDecl, PinRef, RangeDecl,
    SignalRef,
};
pub use error::SyntaxError;
pub use token::{Token, TokenKind};

/// Lexes and parses a single chip definition.
pub fn parse_chip(source: &str) -> Result<ParsedChipDefinition, SyntaxError> {
    let tokens = lexer::lex(source)?;
    parser::ChipParser::new(tokens).parse_chip_definition()
}
