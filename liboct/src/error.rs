//! Error types for the OCT pipeline
//!
//! Every failure in the pipeline is structural (bad configuration or a
//! malformed ensemble); nothing here is transient, so nothing is retried.
//!
//! License: MIT

use thiserror::Error;

/// Result type for pipeline operations
pub type OctResult<T> = Result<T, OctError>;

/// Errors that can occur while synthesizing, reconstructing or compressing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctError {
    /// A numeric parameter is out of its valid domain
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ensemble rows do not all share the same length
    #[error("Shape error: row {row} has {actual} samples, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A row of a log profile holds no finite value to normalize against
    #[error("Degenerate input: row {row} contains no finite values")]
    DegenerateInput { row: usize },
}

impl OctError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        OctError::Configuration(msg.into())
    }
}
