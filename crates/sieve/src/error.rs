//! Error types for configuration and screening.

use sieve_data::DataError;
use sieve_scoring::ScoringError;
use thiserror::Error;

/// Errors that can occur while loading weight configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The weights themselves are invalid
    #[error("Invalid weights: {0}")]
    Scoring(#[from] ScoringError),

    /// File extension not recognised
    #[error("Unsupported weight file format: {0}")]
    UnsupportedFormat(String),

    /// Business model name not recognised
    #[error("Unknown business model: {0}")]
    UnknownBusinessModel(String),
}

/// Errors that can occur during a screen.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The data source failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// The weight configuration failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The scoring configuration was rejected
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),
}
