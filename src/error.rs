//! Error types for ground-truth generation.
//!
//! Every failure is represented by [`GroundTruthError`]. None of them are
//! retried: a failed cell aborts the whole sweep so that no partial or
//! malformed fixture is ever reported as complete.
//!
//! # Examples
//!
//! ```
//! use groundtruth::error::{GroundTruthError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(GroundTruthError::invalid_argument("dimension must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::vector::core::vector::VectorKind;

/// The main error type for ground-truth operations.
#[derive(Error, Debug)]
pub enum GroundTruthError {
    /// Vectors of inconsistent shape inside one dataset.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A vector of the wrong kind for its metric, corpus or dataset.
    #[error("{context} requires {expected} vectors, got {actual}")]
    VectorKindMismatch {
        context: String,
        expected: VectorKind,
        actual: VectorKind,
    },

    /// Unknown metric identifier.
    #[error("Unsupported metric: {0}")]
    UnsupportedMetric(String),

    /// The corpus cannot supply `k` neighbors.
    #[error("Insufficient corpus: {corpus_size} vectors cannot supply {k} neighbors")]
    InsufficientCorpus { corpus_size: usize, k: usize },

    /// I/O errors while writing or reading fixtures.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A decoded fixture violates a dataset invariant.
    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    /// Invalid argument or configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with GroundTruthError.
pub type Result<T> = std::result::Result<T, GroundTruthError>;

impl GroundTruthError {
    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        GroundTruthError::DimensionMismatch { expected, actual }
    }

    /// Create a new vector kind mismatch error; `context` names what
    /// imposed the expected kind, e.g. `"metric l2"` or `"corpus"`.
    pub fn kind_mismatch<S: Into<String>>(
        context: S,
        expected: VectorKind,
        actual: VectorKind,
    ) -> Self {
        GroundTruthError::VectorKindMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create a new unsupported metric error.
    pub fn unsupported_metric<S: Into<String>>(name: S) -> Self {
        GroundTruthError::UnsupportedMetric(name.into())
    }

    /// Create a new insufficient corpus error.
    pub fn insufficient_corpus(corpus_size: usize, k: usize) -> Self {
        GroundTruthError::InsufficientCorpus { corpus_size, k }
    }

    /// Create a new invalid fixture error.
    pub fn invalid_fixture<S: Into<String>>(msg: S) -> Self {
        GroundTruthError::InvalidFixture(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GroundTruthError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        GroundTruthError::InvalidArgument(format!("configuration: {}", msg.into()))
    }
}
