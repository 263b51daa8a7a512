//! Error types for the immune population analysis library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ImmunoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sample '{sample}' has zero total counts, cannot compute frequencies")]
    ZeroTotalCount { sample: String },

    #[error("Missing value for '{field}' at CSV row {row}")]
    MissingField { row: usize, field: String },

    #[error("Duplicate sample label '{0}'")]
    DuplicateSample(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ImmunoError>;
