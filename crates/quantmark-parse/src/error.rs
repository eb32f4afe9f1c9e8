//! Error types for the text front-end.

use quantmark_ir::{IrError, MoleculeError};
use thiserror::Error;

/// Errors that can occur while reading circuit or molecule text.
///
/// Every variant tied to a position carries the 1-based line number.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid character sequence).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// The line ended before the construct was complete.
    #[error("Unexpected end of line {line}: expected {expected}")]
    UnexpectedEol { line: usize, expected: String },

    /// Unknown gate name.
    #[error("Unknown gate '{name}' at line {line}")]
    UnknownGate { line: usize, name: String },

    /// Unknown keyword argument.
    #[error("Unknown argument '{name}' at line {line}")]
    UnknownArgument { line: usize, name: String },

    /// Keyword argument given twice.
    #[error("Argument '{name}' given twice at line {line}")]
    DuplicateArgument { line: usize, name: String },

    /// Gate without a `target` argument.
    #[error("Gate at line {line} has no target")]
    MissingTarget { line: usize },

    /// Qubit indices are non-negative.
    #[error("Negative qubit index -{index} at line {line}")]
    NegativeIndex { line: usize, index: u64 },

    /// Qubit index does not fit the address space.
    #[error("Qubit index {index} out of range at line {line}")]
    IndexOutOfRange { line: usize, index: u64 },

    /// The gate is well-formed text but violates gate rules.
    #[error("Invalid gate at line {line}: {source}")]
    InvalidGate {
        line: usize,
        #[source]
        source: IrError,
    },

    /// Malformed geometry line.
    #[error("Invalid geometry at line {line}: {message}")]
    InvalidGeometry { line: usize, message: String },

    /// Malformed active-orbital line.
    #[error("Invalid active orbitals at line {line}: {message}")]
    InvalidActiveOrbitals { line: usize, message: String },

    /// Blank or malformed transformation name.
    #[error("Invalid transformation '{0}'")]
    InvalidTransformation(String),

    /// The assembled molecule failed validation.
    #[error("Molecule error: {0}")]
    Molecule(#[from] MoleculeError),
}

impl ParseError {
    /// Line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::LexerError { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnexpectedEol { line, .. }
            | ParseError::UnknownGate { line, .. }
            | ParseError::UnknownArgument { line, .. }
            | ParseError::DuplicateArgument { line, .. }
            | ParseError::MissingTarget { line }
            | ParseError::NegativeIndex { line, .. }
            | ParseError::IndexOutOfRange { line, .. }
            | ParseError::InvalidGate { line, .. }
            | ParseError::InvalidGeometry { line, .. }
            | ParseError::InvalidActiveOrbitals { line, .. } => Some(*line),
            ParseError::InvalidTransformation(_) | ParseError::Molecule(_) => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
