//! Weighted Aggregator
//!
//! Combines a company's normalized metric scores into one composite:
//!
//! ```text
//! composite(C) = Σ_{m ∈ P} w(m) · n(C, m) / Σ_{m ∈ P} w(m)
//! ```
//!
//! where `P` is the set of weighted metrics the company actually reports. The
//! weight of a missing metric is redistributed over the present ones instead of
//! counting the metric as zero. A company whose present metrics carry no weight
//! has no composite and is left for the rank resolver to report as unranked.

use crate::weights::WeightSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized scores keyed by metric, then by ticker.
pub type ScoreMatrix = BTreeMap<String, BTreeMap<String, f64>>;

/// Composite score of one company with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyComposite {
    /// Weight-redistributed composite, `None` when the company could not be evaluated
    pub composite: Option<f64>,
    /// Normalized score per present metric (zero-weight metrics included)
    pub normalized: BTreeMap<String, f64>,
    /// Metrics of the weight map the company does not report
    pub missing: Vec<String>,
    /// Share of the total declared weight backed by present metrics
    pub weight_coverage: f64,
}

impl CompanyComposite {
    /// Whether the company received a composite score.
    pub const fn is_evaluable(&self) -> bool {
        self.composite.is_some()
    }
}

/// Weight-redistributing aggregator.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAggregator;

impl WeightedAggregator {
    /// Create an aggregator.
    pub const fn new() -> Self {
        Self
    }

    /// Composite score for one company.
    ///
    /// # Arguments
    /// * `ticker` - Company identifier
    /// * `scores` - Normalized scores of every metric in the run
    /// * `spec` - weight map of the run
    pub fn aggregate(&self, ticker: &str, scores: &ScoreMatrix, spec: &WeightSpec) -> CompanyComposite {
        let mut weighted_sum = 0.0;
        let mut present_weight = 0.0;
        let mut normalized = BTreeMap::new();
        let mut missing = Vec::new();

        for (metric, metric_weight) in spec.metrics() {
            match scores.get(metric).and_then(|by_ticker| by_ticker.get(ticker)) {
                Some(&score) => {
                    normalized.insert(metric.to_string(), score);
                    weighted_sum += metric_weight.weight * score;
                    present_weight += metric_weight.weight;
                }
                None => missing.push(metric.to_string()),
            }
        }

        let composite = (present_weight > 0.0).then(|| (weighted_sum / present_weight).clamp(0.0, 1.0));

        CompanyComposite {
            composite,
            normalized,
            missing,
            weight_coverage: present_weight / spec.total_weight(),
        }
    }
}
