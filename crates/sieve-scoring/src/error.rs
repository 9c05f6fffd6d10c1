//! Error types for scoring configuration.

use thiserror::Error;

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors raised while validating a weight map.
///
/// Only configuration problems are errors. Missing metric values, companies
/// without any data and zero-variance metrics are ordinary outcomes of a run
/// and show up in the [`ScoringResult`](crate::ScoringResult) instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Weight map has no entries
    #[error("Weight map is empty")]
    EmptyWeights,

    /// A metric carries a negative weight
    #[error("Negative weight for metric {metric}: {weight}")]
    NegativeWeight {
        /// Metric name
        metric: String,
        /// Offending weight
        weight: f64,
    },

    /// A metric carries a NaN or infinite weight
    #[error("Non-finite weight for metric {metric}: {weight}")]
    NonFiniteWeight {
        /// Metric name
        metric: String,
        /// Offending weight
        weight: f64,
    },

    /// No metric has a strictly positive weight
    #[error("All weights are zero; at least one metric needs a positive weight")]
    AllWeightsZero,

    /// Weights are individually finite but their sum overflows
    #[error("Weights sum to a non-finite total; rescale them")]
    NonFiniteTotal,

    /// Tie tolerance is negative or not a number
    #[error("Invalid tie epsilon {0}: expected a finite, non-negative number")]
    InvalidTieEpsilon(f64),

    /// A company's weight map does not fit the run's metrics
    #[error("Weights for {ticker} use metric {metric}, which the run does not score with that polarity")]
    IncompatibleWeights {
        /// Company the weights were given for
        ticker: String,
        /// Metric missing from the run or with a different polarity
        metric: String,
    },

    /// Two different company weight maps share a name
    #[error("Different weight maps named {0} in one run")]
    DuplicateWeightName(String),

    /// Polarity string is not one of the recognized values
    #[error("Invalid polarity for metric {metric}: {value:?} (expected higher_is_better or lower_is_better)")]
    InvalidPolarity {
        /// Metric name
        metric: String,
        /// Unrecognized polarity string
        value: String,
    },

    /// Metric has no declared polarity and is not in the registry
    #[error("Unknown metric {0}: declare its polarity explicitly")]
    UnknownMetric(String),

    /// Metric name is empty or whitespace
    #[error("Metric name must not be empty")]
    EmptyMetricName,

    /// Metric listed more than once
    #[error("Duplicate metric in weight map: {0}")]
    DuplicateMetric(String),
}
