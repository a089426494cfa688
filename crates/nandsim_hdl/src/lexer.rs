//! Lexical analyzer for chip HDL source text.
//!
//! Converts source text into a sequence of [`Token`]s. Whitespace, `//` line
//! comments and `/* */` block comments are skipped. The first illegal
//! character stops lexing with a [`SyntaxError::Lex`].

use crate::ast::Loc;
use crate::error::SyntaxError;
use crate::token::{lookup_keyword, Token, TokenKind};

/// Lexes the given HDL source text into a vector of tokens.
///
/// The returned vector always ends with a [`TokenKind::Eof`] token.
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        text: source,
        source: source.as_bytes(),
        pos: 0,
        line: 1,
        column: 1,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    text: &'a str,
    source: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    literal: String::new(),
                    loc: self.loc(),
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn loc(&self) -> Loc {
        Loc::new(self.line, self.column)
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn bump(&mut self) -> u8 {
        let b = self.source[self.pos];
        self.pos += 1;
        match b {
            b'\n' => {
                self.line += 1;
                self.column = 1;
            }
            b'\t' => self.column += 4,
            _ => self.column += 1,
        }
        b
    }

    fn illegal(&self, what: &str, loc: Loc) -> SyntaxError {
        SyntaxError::Lex {
            message: format!("illegal token '{what}'"),
            line: loc.line,
            column: loc.column,
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            while matches!(self.peek(), b' ' | b'\t' | b'\n' | b'\r') {
                self.bump();
            }
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                while self.pos < self.source.len() && self.peek() != b'\n' {
                    self.bump();
                }
                continue;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.loc();
                self.bump();
                self.bump();
                loop {
                    if self.pos >= self.source.len() {
                        return Err(self.illegal("EOF", start));
                    }
                    if self.peek() == b'*' && self.peek_at(1) == b'/' {
                        self.bump();
                        self.bump();
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            return Ok(());
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let loc = self.loc();
        let start = self.pos;
        let c = self.peek();

        let punct = match c {
            b'=' => Some(TokenKind::Assign),
            b',' => Some(TokenKind::Comma),
            b';' => Some(TokenKind::Semicolon),
            b':' => Some(TokenKind::Colon),
            b'{' => Some(TokenKind::LBrace),
            b'}' => Some(TokenKind::RBrace),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b'[' => Some(TokenKind::LBracket),
            b']' => Some(TokenKind::RBracket),
            _ => None,
        };
        if let Some(kind) = punct {
            self.bump();
            return Ok(self.token(kind, start, loc));
        }

        if c == b'.' && self.peek_at(1) == b'.' {
            self.bump();
            self.bump();
            return Ok(self.token(TokenKind::Range, start, loc));
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
                self.bump();
            }
            let word = &self.text[start..self.pos];
            let kind = lookup_keyword(word).unwrap_or(TokenKind::Identifier);
            return Ok(self.token(kind, start, loc));
        }

        if c.is_ascii_digit() {
            while self.peek().is_ascii_digit() {
                self.bump();
            }
            return Ok(self.token(TokenKind::Number, start, loc));
        }

        let ch = self.text[start..].chars().next().unwrap_or('\0');
        Err(self.illegal(&ch.to_string(), loc))
    }

    fn token(&self, kind: TokenKind, start: usize, loc: Loc) -> Token {
        Token {
            kind,
            literal: self.text[start..self.pos].to_string(),
            loc,
        }
    }
}
