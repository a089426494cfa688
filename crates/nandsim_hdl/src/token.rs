//! Token types for the chip HDL lexer.
//!
//! Defines the [`TokenKind`] enum and the [`Token`] struct pairing a kind with
//! its literal text and source [`Loc`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::Loc;

/// A chip HDL token kind.
///
/// Keywords are case-sensitive: `CHIP`, `IN`, `OUT` and `PARTS` are upper
/// case, the constants `true` and `false` are lower case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// A chip, pin or signal name.
    Identifier,
    /// A decimal number (widths and bit indices).
    Number,
    /// `=`
    Assign,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `..`
    Range,
    /// `CHIP`
    Chip,
    /// `IN`
    In,
    /// `OUT`
    Out,
    /// `PARTS`
    Parts,
    /// `true`
    True,
    /// `false`
    False,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Assign => "=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Range => "..",
            TokenKind::Chip => "CHIP",
            TokenKind::In => "IN",
            TokenKind::Out => "OUT",
            TokenKind::Parts => "PARTS",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Eof => "EOF",
        };
        f.write_str(s)
    }
}

/// A single token with its literal text and starting position.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The source text of the token (empty for [`TokenKind::Eof`]).
    pub literal: String,
    /// Position of the token's first character.
    pub loc: Loc,
}

/// Maps a word to its keyword kind, if it is one.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    match word {
        "CHIP" => Some(TokenKind::Chip),
        "IN" => Some(TokenKind::In),
        "OUT" => Some(TokenKind::Out),
        "PARTS" => Some(TokenKind::Parts),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        _ => None,
    }
}
