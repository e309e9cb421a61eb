//! FILENAME: matrix-engine/src/error.rs

use thiserror::Error;

/// Failure reported by an external expression evaluator or data source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),

    #[error("Unsupported expression: {0}")]
    Unsupported(String),

    #[error("Evaluation failed for '{expression}': {message}")]
    Failed { expression: String, message: String },
}

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Matrix '{name}' is not configured: it needs at least one header level and one cell")]
    NotConfigured { name: String },

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error("Expected {expected} {axis} values, got {actual}")]
    PathLength {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot {operation} while the matrix is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
