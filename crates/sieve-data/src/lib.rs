#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fundamentals;
pub mod provider;

pub use error::{DataError, Result};
pub use fundamentals::{Fundamentals, derive_metrics};
pub use provider::{
    CsvMetricProvider, FundamentalsProvider, JsonMetricProvider, MetricProvider, StaticProvider,
    provider_for_path,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
