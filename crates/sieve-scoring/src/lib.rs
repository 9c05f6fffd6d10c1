#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod rank;
pub mod registry;
pub mod result;
pub mod table;
pub mod weights;

pub use aggregate::{CompanyComposite, ScoreMatrix, WeightedAggregator};
pub use engine::{ScoringConfig, ScoringEngine, score};
pub use error::{Result, ScoringError};
pub use normalize::{MetricSummary, MinMaxNormalizer, NormalizedMetric, Normalizer};
pub use rank::{DEFAULT_TIE_EPSILON, RankResolver, RankedCompany};
pub use result::ScoringResult;
pub use table::{MetricRow, MetricTable};
pub use weights::{MetricWeight, ParsePolarityError, Polarity, WeightSpec, WeightSpecBuilder};

// Re-export registry types for convenience
pub use registry::{
    MetricCategory, MetricInfo, available_metrics, default_polarity, get_metric_info,
    metrics_by_category,
};
