//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading metric data.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The CSV header has no ticker column
    #[error("Missing ticker column (expected 'ticker' or 'symbol')")]
    MissingTickerColumn,

    /// The same ticker appears twice in one source
    #[error("Duplicate ticker: {0}")]
    DuplicateTicker(String),

    /// File extension not recognised
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),
}
