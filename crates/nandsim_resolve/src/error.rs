//! Error types for chip resolution.

use nandsim_hdl::{Loc, SyntaxError};

/// A semantic error found while resolving one chip definition.
///
/// `line` and `column` are 1-based. Whole-program checks (unknown chip,
/// circular dependency) have no single source position and use line 0.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.message, .line, .column))]
pub struct ResolutionError {
    /// Human-readable description.
    pub message: String,
    /// Name of the chip (source file key) being resolved.
    pub file: String,
    /// Line of the offending token, or 0.
    pub line: u32,
    /// Column of the offending token, or 0.
    pub column: u32,
}

fn render(message: &str, line: &u32, column: &u32) -> String {
    if *line == 0 {
        format!("Resolution error: {message}")
    } else {
        format!("Resolution error at line {line}, column {column}: {message}")
    }
}

impl ResolutionError {
    /// Creates an error located at `loc` in `file`.
    pub fn at(file: &str, loc: Loc, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: file.to_string(),
            line: loc.line,
            column: loc.column,
        }
    }

    /// Creates an error with no source position.
    pub fn unlocated(file: &str, message: impl Into<String>) -> Self {
        Self::at(file, Loc::default(), message)
    }
}

/// Any failure while resolving a chip and its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A validation rule was violated.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A dependency's source text failed to lex or parse.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// No source text exists for the named chip.
    #[error("Chip '{0}' not found")]
    ChipNotFound(String),
}
