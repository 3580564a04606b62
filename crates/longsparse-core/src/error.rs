//! Error types for sparse matrix operations
//!
//! Provides a unified error type for all longsparse crates.

use thiserror::Error;

/// Core error type for sparse matrix operations
#[derive(Error, Debug)]
pub enum Error {
    /// Row/column counts of the operands of a binary operation disagree
    #[error("Incompatible shapes: {0}")]
    ShapeMismatch(String),

    /// Operands of a product have sizes that cannot be combined
    #[error("Incompatible args: {0}")]
    IncompatibleArguments(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Checked 1-d access outside of the vector
    #[error("Index {index} out of bounds for size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Checked 2-d access outside of the matrix
    #[error("Cell ({row}, {column}) out of bounds for {rows} x {columns} matrix")]
    CellOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// Operation not offered by this matrix type
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Elementwise division met a zero divisor
    #[error("Division by zero at ({row}, {column})")]
    DivisionByZero { row: usize, column: usize },

    /// A storage invariant does not hold
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration could not be read
    #[error("Config error: {0}")]
    Config(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error naming two operands whose shapes disagree
    pub fn shape_mismatch(lhs: &str, rhs: &str) -> Self {
        Self::ShapeMismatch(format!("{lhs}, {rhs}"))
    }

    /// Create an error naming the operands of a product
    pub fn incompatible_args(operands: &[&str]) -> Self {
        Self::IncompatibleArguments(operands.join(", "))
    }

    /// Create an error for a length that differs from the expected one
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidParameter(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
