//! Recursive descent parser for chip HDL.
//!
//! Consumes the token stream produced by [`crate::lexer::lex`] and builds a
//! [`ParsedChipDefinition`]. Parsing stops at the first error; every message
//! has the form `expected <what>, got [<KIND>] => <literal>`.

use crate::ast::{
    ChipName, ConnectionDecl, IoDecl, ParsedChipDefinition, PartDecl, PinRef, RangeDecl,
    SignalRef,
};
use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

/// Parser state over a lexed token stream.
pub struct ChipParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ChipParser {
    /// Creates a parser over `tokens`.
    ///
    /// An [`TokenKind::Eof`] token is appended when the stream lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let loc = tokens.last().map(|t| t.loc).unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                literal: String::new(),
                loc,
            });
        }
        Self { tokens, pos: 0 }
    }

    /// Parses one complete chip definition followed by end of input.
    pub fn parse_chip_definition(&mut self) -> Result<ParsedChipDefinition, SyntaxError> {
        let name = self.parse_chip_name()?;
        let (inputs, outputs) = self.parse_chip_io()?;
        let parts = self.parse_parts()?;

        if !self.at(TokenKind::RBrace) {
            return Err(self.unexpected("'}'"));
        }
        self.advance();
        if !self.at(TokenKind::Eof) {
            return Err(self.unexpected("EOF after '}'"));
        }

        Ok(ParsedChipDefinition {
            name,
            inputs,
            outputs,
            parts,
        })
    }

    fn current(&self) -> &Token {
        // The stream always ends in Eof and `advance` never moves past it.
        &self.tokens[self.pos]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let tok = self.current();
        SyntaxError::Parse {
            message: format!("expected {expected}, got [{}] => {}", tok.kind, tok.literal),
            line: tok.loc.line,
            column: tok.loc.column,
        }
    }

    fn invalid_number(&self, what: &str) -> SyntaxError {
        let tok = self.current();
        SyntaxError::Parse {
            message: format!("invalid number for {what}: {}", tok.literal),
            line: tok.loc.line,
            column: tok.loc.column,
        }
    }

    fn parse_chip_name(&mut self) -> Result<ChipName, SyntaxError> {
        if !self.at(TokenKind::Chip) {
            return Err(self.unexpected("CHIP keyword"));
        }
        self.advance();
        if !self.at(TokenKind::Identifier) {
            return Err(self.unexpected("chip name"));
        }
        let name = ChipName {
            name: self.current().literal.clone(),
            loc: self.current().loc,
        };
        self.advance();
        if !self.at(TokenKind::LBrace) {
            return Err(self.unexpected("'{'"));
        }
        self.advance();
        Ok(name)
    }

    /// Parses the `IN` and `OUT` sections, which may come in either order.
    fn parse_chip_io(&mut self) -> Result<(Vec<IoDecl>, Vec<IoDecl>), SyntaxError> {
        if self.at(TokenKind::In) {
            self.advance();
            let inputs = self.parse_io_list()?;
            if !self.at(TokenKind::Out) {
                return Err(self.unexpected("OUT"));
            }
            self.advance();
            let outputs = self.parse_io_list()?;
            Ok((inputs, outputs))
        } else if self.at(TokenKind::Out) {
            self.advance();
            let outputs = self.parse_io_list()?;
            if !self.at(TokenKind::In) {
                return Err(self.unexpected("IN"));
            }
            self.advance();
            let inputs = self.parse_io_list()?;
            Ok((inputs, outputs))
        } else {
            Err(self.unexpected("IN or OUT"))
        }
    }

    fn parse_io_list(&mut self) -> Result<Vec<IoDecl>, SyntaxError> {
        let mut list = Vec::new();
        loop {
            if !self.at(TokenKind::Identifier) {
                return Err(self.unexpected("identifier"));
            }
            let mut io = IoDecl {
                name: self.current().literal.clone(),
                width: 1,
                loc: self.current().loc,
            };
            self.advance();

            if self.at(TokenKind::LBracket) {
                self.advance();
                if !self.at(TokenKind::Number) {
                    return Err(self.unexpected("number for width"));
                }
                io.width = self
                    .current()
                    .literal
                    .parse()
                    .map_err(|_| self.invalid_number("width"))?;
                self.advance();
                if !self.at(TokenKind::RBracket) {
                    return Err(self.unexpected("']'"));
                }
                self.advance();
            }
            list.push(io);

            if self.at(TokenKind::Comma) {
                self.advance();
                continue;
            }
            if self.at(TokenKind::Semicolon) {
                self.advance();
                return Ok(list);
            }
            return Err(self.unexpected("',' or ';'"));
        }
    }

    fn parse_parts(&mut self) -> Result<Vec<PartDecl>, SyntaxError> {
        if !self.at(TokenKind::Parts) {
            return Err(self.unexpected("PARTS keyword"));
        }
        self.advance();
        if !self.at(TokenKind::Colon) {
            return Err(self.unexpected("':'"));
        }
        self.advance();

        let mut parts = Vec::new();
        loop {
            if !self.at(TokenKind::Identifier) {
                return Err(self.unexpected("part name"));
            }
            let name = self.current().literal.clone();
            let loc = self.current().loc;
            self.advance();
            if !self.at(TokenKind::LParen) {
                return Err(self.unexpected("'('"));
            }
            self.advance();
            let connections = self.parse_connections()?;
            if !self.at(TokenKind::RParen) {
                return Err(self.unexpected("')'"));
            }
            self.advance();
            if !self.at(TokenKind::Semicolon) {
                return Err(self.unexpected("';'"));
            }
            self.advance();
            parts.push(PartDecl {
                name,
                loc,
                connections,
            });

            if self.at(TokenKind::RBrace) {
                return Ok(parts);
            }
            if !self.at(TokenKind::Identifier) {
                return Err(self.unexpected("part name or '}'"));
            }
        }
    }

    fn parse_connections(&mut self) -> Result<Vec<ConnectionDecl>, SyntaxError> {
        let mut connections = Vec::new();
        loop {
            if !self.at(TokenKind::Identifier) {
                return Err(self.unexpected("connection name"));
            }
            let loc = self.current().loc;
            let mut pin = PinRef {
                name: self.current().literal.clone(),
                range: None,
                loc,
            };
            self.advance();
            if self.at(TokenKind::LBracket) {
                pin.range = Some(self.parse_bracketed_range()?);
            }

            if !self.at(TokenKind::Assign) {
                return Err(self.unexpected("'='"));
            }
            self.advance();

            if !matches!(
                self.current().kind,
                TokenKind::Identifier | TokenKind::True | TokenKind::False
            ) {
                return Err(self.unexpected("signal name"));
            }
            let mut signal = SignalRef {
                name: self.current().literal.clone(),
                range: None,
                loc: self.current().loc,
            };
            self.advance();
            if self.at(TokenKind::LBracket) {
                signal.range = Some(self.parse_bracketed_range()?);
            }

            connections.push(ConnectionDecl { pin, signal, loc });

            if self.at(TokenKind::RParen) {
                break;
            }
            if self.at(TokenKind::Comma) {
                self.advance();
                continue;
            }
            return Err(self.unexpected("')', ',' or '['"));
        }

        if connections.len() < 2 {
            return Err(self.unexpected("connection name"));
        }
        Ok(connections)
    }

    /// Parses `[n]` or `[n..m]`, starting at the `[` token.
    fn parse_bracketed_range(&mut self) -> Result<RangeDecl, SyntaxError> {
        self.advance();
        if !self.at(TokenKind::Number) {
            return Err(self.unexpected("number for range"));
        }
        let loc = self.current().loc;
        let start: u32 = self
            .current()
            .literal
            .parse()
            .map_err(|_| self.invalid_number("range"))?;
        self.advance();

        let mut end = start;
        if self.at(TokenKind::Range) {
            self.advance();
            if !self.at(TokenKind::Number) {
                return Err(self.unexpected("number for range end"));
            }
            end = self
                .current()
                .literal
                .parse()
                .map_err(|_| self.invalid_number("range end"))?;
            self.advance();
        }

        if !self.at(TokenKind::RBracket) {
            return Err(self.unexpected("']' or '..'"));
        }
        self.advance();
        Ok(RangeDecl { start, end, loc })
    }
}
