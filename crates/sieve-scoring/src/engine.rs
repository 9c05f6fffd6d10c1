//! Scoring Engine
//!
//! Runs the Metric Table through the normalizer, the weighted aggregator and the
//! rank resolver. Per-metric normalization and per-company aggregation are
//! independent, so both fan out over rayon; every worker writes its own key and
//! results are merged into ordered maps, so the output does not depend on
//! scheduling.
//!
//! Normalization always runs over the whole universe with the run's weight
//! map. Individual companies may be aggregated with their own weights (for
//! example semiconductor sub-sector weights) as long as those weights only use
//! the run's metrics with the same polarity.

use crate::aggregate::{CompanyComposite, ScoreMatrix, WeightedAggregator};
use crate::error::{Result, ScoringError};
use crate::normalize::{MetricSummary, MinMaxNormalizer, NormalizedMetric, Normalizer};
use crate::rank::{DEFAULT_TIE_EPSILON, RankResolver};
use crate::result::ScoringResult;
use crate::table::MetricTable;
use crate::weights::{MetricWeight, WeightSpec};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Configuration for a scoring run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Composites closer than this are tied and ordered by ticker (default: 1e-9)
    pub tie_epsilon: f64,
    /// Normalize metrics and aggregate companies on the rayon pool (default: true)
    pub parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: DEFAULT_TIE_EPSILON,
            parallel: true,
        }
    }
}

/// Normalization and weighted scoring engine.
///
/// Holds no state between runs: scoring the same table twice yields identical
/// results.
#[derive(Debug, Clone)]
pub struct ScoringEngine<N = MinMaxNormalizer> {
    spec: WeightSpec,
    company_weights: BTreeMap<String, WeightSpec>,
    config: ScoringConfig,
    resolver: RankResolver,
    normalizer: N,
    aggregator: WeightedAggregator,
}

impl ScoringEngine<MinMaxNormalizer> {
    /// Engine with min-max normalization and the default configuration.
    pub fn new(spec: WeightSpec) -> Self {
        Self::with_normalizer(spec, MinMaxNormalizer)
    }
}

impl<N: Normalizer> ScoringEngine<N> {
    /// Engine with a custom normalizer.
    pub fn with_normalizer(spec: WeightSpec, normalizer: N) -> Self {
        Self {
            spec,
            company_weights: BTreeMap::new(),
            config: ScoringConfig::default(),
            resolver: RankResolver::default(),
            normalizer,
            aggregator: WeightedAggregator,
        }
    }

    /// Replace the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidTieEpsilon`] if the tie tolerance is
    /// negative or non-finite.
    pub fn with_config(mut self, config: ScoringConfig) -> Result<Self> {
        self.resolver = RankResolver::new(config.tie_epsilon)?;
        self.config = config;
        Ok(self)
    }

    /// Aggregate one company with its own weights instead of the run's.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::IncompatibleWeights`] if the weights use a
    /// metric the run does not score, or score it with the other polarity, and
    /// [`ScoringError::DuplicateWeightName`] if another company already uses
    /// different weights under the same name.
    pub fn with_company_weights(mut self, ticker: impl Into<String>, weights: WeightSpec) -> Result<Self> {
        let ticker = ticker.into();
        for (metric, weight) in weights.metrics() {
            let compatible = self
                .spec
                .get(metric)
                .is_some_and(|run| run.polarity == weight.polarity);
            if !compatible {
                return Err(ScoringError::IncompatibleWeights {
                    ticker,
                    metric: metric.to_string(),
                });
            }
        }
        let clashes = (weights.name() == self.spec.name() && weights != self.spec)
            || self
                .company_weights
                .values()
                .any(|other| other.name() == weights.name() && *other != weights);
        if clashes {
            return Err(ScoringError::DuplicateWeightName(weights.name().to_string()));
        }
        self.company_weights.insert(ticker, weights);
        Ok(self)
    }

    /// Weights a company is aggregated with.
    pub fn weights_for(&self, ticker: &str) -> &WeightSpec {
        self.company_weights.get(ticker).unwrap_or(&self.spec)
    }

    /// Weight map of the engine.
    pub const fn spec(&self) -> &WeightSpec {
        &self.spec
    }

    /// Configuration of the engine.
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every company of the table.
    ///
    /// Only the metrics named by the weight map are considered;
    /// anything else in the table is ignored.
    pub fn score(&self, table: &MetricTable) -> ScoringResult {
        info!(
            spec = self.spec.name(),
            companies = table.len(),
            metrics = self.spec.len(),
            normalizer = self.normalizer.name(),
            "Scoring universe"
        );
        if !self.spec.is_normalized() {
            debug!(
                total_weight = self.spec.total_weight(),
                "Weights do not sum to 1.0; rescaling"
            );
        }

        let (scores, summaries) = self.normalize_all(table);
        let composites = self.aggregate_all(table, &scores);

        let (ranked, unranked) =
            self.resolver.resolve(composites.iter().map(|(t, c)| (t.as_str(), c.composite)));

        for ticker in &unranked {
            info!(ticker = ticker.as_str(), "No usable metric; company left unranked");
        }
        info!(
            ranked = ranked.len(),
            unranked = unranked.len(),
            "Scoring complete"
        );

        let mut company_weights = BTreeMap::new();
        let mut weight_sets = BTreeMap::new();
        for (ticker, weights) in &self.company_weights {
            if composites.contains_key(ticker) {
                company_weights.insert(ticker.clone(), weights.name().to_string());
                weight_sets
                    .entry(weights.name().to_string())
                    .or_insert_with(|| weights.normalized_weights());
            }
        }

        ScoringResult {
            spec_name: self.spec.name().to_string(),
            normalizer: self.normalizer.name().to_string(),
            ranked,
            unranked,
            companies: composites,
            metrics: summaries,
            weights: self.spec.normalized_weights(),
            company_weights,
            weight_sets,
        }
    }

    fn normalize_metric(&self, table: &MetricTable, metric: &str, weight: &MetricWeight) -> NormalizedMetric {
        let values = table.present_values(metric);
        let normalized = self.normalizer.normalize(&values, weight.polarity);

        if normalized.summary.present == 0 {
            debug!(metric, "No company reports this metric");
        } else if normalized.summary.degenerate {
            debug!(
                metric,
                present = normalized.summary.present,
                "Zero-variance metric; all reporting companies tied at best"
            );
        }
        normalized
    }

    fn normalize_all(&self, table: &MetricTable) -> (ScoreMatrix, BTreeMap<String, MetricSummary>) {
        let metrics: Vec<(&str, &MetricWeight)> = self.spec.metrics().collect();

        let normalized: Vec<(String, NormalizedMetric)> = if self.config.parallel {
            metrics
                .par_iter()
                .map(|&(metric, weight)| (metric.to_string(), self.normalize_metric(table, metric, weight)))
                .collect()
        } else {
            metrics
                .iter()
                .map(|&(metric, weight)| (metric.to_string(), self.normalize_metric(table, metric, weight)))
                .collect()
        };

        let mut scores = ScoreMatrix::new();
        let mut summaries = BTreeMap::new();
        for (metric, result) in normalized {
            summaries.insert(metric.clone(), result.summary);
            scores.insert(metric, result.scores);
        }
        (scores, summaries)
    }

    fn aggregate_all(&self, table: &MetricTable, scores: &ScoreMatrix) -> BTreeMap<String, CompanyComposite> {
        let tickers: Vec<&str> = table.tickers().collect();
        let aggregate = |ticker: &str| {
            (
                ticker.to_string(),
                self.aggregator.aggregate(ticker, scores, self.weights_for(ticker)),
            )
        };

        if self.config.parallel {
            tickers.par_iter().map(|&t| aggregate(t)).collect()
        } else {
            tickers.iter().map(|&t| aggregate(t)).collect()
        }
    }
}

/// Score a table with min-max normalization and the default configuration.
pub fn score(table: &MetricTable, spec: &WeightSpec) -> ScoringResult {
    ScoringEngine::new(spec.clone()).score(table)
}
