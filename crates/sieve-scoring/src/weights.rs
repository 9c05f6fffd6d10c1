//! Weight maps
//!
//! Maps each metric of a scoring run to a polarity and a non-negative weight.
//! A weight map is validated when it is built, so the engine never sees an
//! empty, negative, non-finite or all-zero weight map.

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Whether a higher or lower raw value is economically better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Larger raw values score higher (margins, growth, coverage)
    HigherIsBetter,
    /// Smaller raw values score higher (valuation multiples, leverage, intensity)
    LowerIsBetter,
}

impl Polarity {
    /// Canonical configuration name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higher_is_better",
            Self::LowerIsBetter => "lower_is_better",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a polarity string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized polarity: {0:?}")]
pub struct ParsePolarityError(pub String);

impl FromStr for Polarity {
    type Err = ParsePolarityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "higher_is_better" | "higher" => Ok(Self::HigherIsBetter),
            "lower_is_better" | "lower" => Ok(Self::LowerIsBetter),
            _ => Err(ParsePolarityError(s.to_string())),
        }
    }
}

/// Polarity and weight of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeight {
    /// Direction in which the metric improves
    pub polarity: Polarity,
    /// Non-negative weight (not necessarily normalized)
    pub weight: f64,
}

impl MetricWeight {
    /// Create a metric weight.
    pub const fn new(polarity: Polarity, weight: f64) -> Self {
        Self { polarity, weight }
    }

    /// Higher-is-better metric with the given weight.
    pub const fn higher(weight: f64) -> Self {
        Self::new(Polarity::HigherIsBetter, weight)
    }

    /// Lower-is-better metric with the given weight.
    pub const fn lower(weight: f64) -> Self {
        Self::new(Polarity::LowerIsBetter, weight)
    }
}

/// Validated weight map for one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSpec {
    name: String,
    metrics: BTreeMap<String, MetricWeight>,
    total_weight: f64,
}

impl WeightSpec {
    /// Build and validate a weight map.
    ///
    /// # Errors
    ///
    /// Returns an error if the map is empty, a metric name is blank or repeated,
    /// a weight is negative or non-finite, the weights sum to a non-finite
    /// total, or no weight is strictly positive.
    pub fn new<I, S>(name: impl Into<String>, metrics: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, MetricWeight)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (metric, weight) in metrics {
            let metric: String = metric.into();
            if metric.trim().is_empty() {
                return Err(ScoringError::EmptyMetricName);
            }
            if !weight.weight.is_finite() {
                return Err(ScoringError::NonFiniteWeight {
                    metric,
                    weight: weight.weight,
                });
            }
            if weight.weight < 0.0 {
                return Err(ScoringError::NegativeWeight {
                    metric,
                    weight: weight.weight,
                });
            }
            if map.contains_key(&metric) {
                return Err(ScoringError::DuplicateMetric(metric));
            }
            map.insert(metric, weight);
        }

        if map.is_empty() {
            return Err(ScoringError::EmptyWeights);
        }

        let total_weight: f64 = map.values().map(|w| w.weight).sum();
        if !total_weight.is_finite() {
            return Err(ScoringError::NonFiniteTotal);
        }
        if total_weight <= 0.0 {
            return Err(ScoringError::AllWeightsZero);
        }

        Ok(Self {
            name: name.into(),
            metrics: map,
            total_weight,
        })
    }

    /// Start building a weight map.
    pub fn builder(name: impl Into<String>) -> WeightSpecBuilder {
        WeightSpecBuilder::new(name)
    }

    /// Name of the configuration (usually the business model).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metrics in name order.
    pub fn metrics(&self) -> impl Iterator<Item = (&str, &MetricWeight)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Polarity and weight of a metric.
    pub fn get(&self, metric: &str) -> Option<&MetricWeight> {
        self.metrics.get(metric)
    }

    /// Metric names in name order.
    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.keys().map(String::as_str).collect()
    }

    /// Number of metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Always false for a validated weight map.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Sum of the declared weights.
    pub const fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Weight of a metric as a share of the total.
    pub fn normalized_weight(&self, metric: &str) -> Option<f64> {
        self.metrics
            .get(metric)
            .map(|w| w.weight / self.total_weight)
    }

    /// All weights rescaled to sum to 1.0.
    pub fn normalized_weights(&self) -> BTreeMap<String, f64> {
        self.metrics
            .iter()
            .map(|(k, w)| (k.clone(), w.weight / self.total_weight))
            .collect()
    }

    /// Whether the declared weights already sum to 1.0 (within 1%).
    pub fn is_normalized(&self) -> bool {
        (self.total_weight - 1.0).abs() <= 0.01
    }
}

/// Builder for [`WeightSpec`].
#[derive(Debug, Default)]
pub struct WeightSpecBuilder {
    name: String,
    metrics: Vec<(String, MetricWeight)>,
}

impl WeightSpecBuilder {
    /// Create a builder for a named weight map.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: Vec::new(),
        }
    }

    /// Add a metric.
    pub fn metric(mut self, metric: impl Into<String>, weight: MetricWeight) -> Self {
        self.metrics.push((metric.into(), weight));
        self
    }

    /// Add a higher-is-better metric.
    pub fn higher(self, metric: impl Into<String>, weight: f64) -> Self {
        self.metric(metric, MetricWeight::higher(weight))
    }

    /// Add a lower-is-better metric.
    pub fn lower(self, metric: impl Into<String>, weight: f64) -> Self {
        self.metric(metric, MetricWeight::lower(weight))
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// See [`WeightSpec::new`].
    pub fn build(self) -> Result<WeightSpec> {
        WeightSpec::new(self.name, self.metrics)
    }
}
