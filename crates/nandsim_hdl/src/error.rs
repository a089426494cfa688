//! Error types for lexing and parsing HDL source text.

/// A lexing or parsing failure, carrying the 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// The lexer met a character (or end of input) it cannot tokenize.
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lex {
        /// Description of the illegal input.
        message: String,
        /// Line of the offending character.
        line: u32,
        /// Column of the offending character.
        column: u32,
    },

    /// The token stream does not match the chip grammar.
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parse {
        /// What was expected and what was found instead.
        message: String,
        /// Line of the unexpected token.
        line: u32,
        /// Column of the unexpected token.
        column: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_display() {
        let err = SyntaxError::Lex {
            message: "illegal token '$'".into(),
            line: 3,
            column: 7,
        };
        assert_eq!(
            err.to_string(),
            "Lexer error at line 3, column 7: illegal token '$'"
        );
    }

    #[test]
    fn parse_display() {
        let err = SyntaxError::Parse {
            message: "expected '{', got [IDENTIFIER] => foo".into(),
            line: 1,
            column: 10,
        };
        assert_eq!(
            err.to_string(),
            "Parser error at line 1, column 10: expected '{', got [IDENTIFIER] => foo"
        );
    }
}
