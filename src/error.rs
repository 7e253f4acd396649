//! Error types for DyadGraph.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific failure conditions and keeps error messages
//! consistent across the load, inference, and QA layers.

use thiserror::Error;

use crate::term::Iri;

/// Validation errors that occur during input validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Score {value} is out of range [0, 1]")]
    ScoreOutOfRange {
        value: rust_decimal::Decimal,
    },

    #[error("Score literal '{lexical}' is not a valid decimal")]
    MalformedScore {
        lexical: String,
    },

    #[error("Unknown emotion label: '{name}'")]
    UnknownEmotion {
        name: String,
    },

    #[error("Invalid IRI '{value}': {reason}")]
    InvalidIri {
        value: String,
        reason: String,
    },

    #[error("Threshold list is empty")]
    EmptyThresholdList,
}

/// Parse errors raised while reading the triple text format.
///
/// Every variant carries the 1-based line number of the offending input.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: malformed triple: {reason}")]
    MalformedTriple {
        line: usize,
        reason: String,
    },

    #[error("line {line}: malformed decimal literal '{lexical}'")]
    MalformedDecimal {
        line: usize,
        lexical: String,
    },

    #[error("line {line}: unknown namespace prefix '{prefix}'")]
    UnknownPrefix {
        line: usize,
        prefix: String,
    },

    #[error("line {line}: unsupported literal datatype '{datatype}'")]
    UnsupportedDatatype {
        line: usize,
        datatype: String,
    },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString {
        line: usize,
    },
}

/// Execution errors that occur during inference or QA passes.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Evidence {evidence} carries a non-decimal score term")]
    ScoreNotDecimal {
        evidence: Iri,
    },

    #[error("Competency query '{name}' failed: {message}")]
    QueryFailed {
        name: String,
        message: String,
    },

    #[error("Inference run was cancelled")]
    Cancelled,

    #[error("Worker channel disconnected before all results arrived")]
    WorkerLost,
}

/// Top-level error type for DyadGraph.
#[derive(Debug, Error)]
pub enum DyadError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl DyadError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a parse error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

/// Result type alias for DyadGraph operations.
pub type DyadResult<T> = Result<T, DyadError>;

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_validation_error_score_range() {
        let err = ValidationError::ScoreOutOfRange { value: dec!(1.5) };
        let msg = format!("{err}");
        assert!(msg.contains("1.5"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = ParseError::MalformedDecimal {
            line: 42,
            lexical: "0.4x".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("line 42"));
        assert!(msg.contains("0.4x"));
    }

    #[test]
    fn test_dyad_error_from_validation() {
        let err: DyadError = ValidationError::UnknownEmotion {
            name: "Ennui".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(format!("{err}").contains("Ennui"));
    }

    #[test]
    fn test_dyad_error_from_parse() {
        let err: DyadError = ParseError::UnterminatedString { line: 3 }.into();
        assert!(err.is_parse());
    }

    #[test]
    fn test_dyad_error_internal() {
        let err = DyadError::internal("unexpected state");
        assert!(!err.is_validation());
        assert!(format!("{err}").contains("unexpected state"));
    }
}
