//! Normalizer
//!
//! Maps one metric's raw values onto [0, 1] so that 1.0 is the best value
//! observed in the universe and 0.0 the worst, whatever the metric's polarity.
//! Only companies with a present value take part; absent companies receive no
//! score at all, which is what lets the aggregator redistribute their weight.

use crate::weights::Polarity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cross-sectional statistics of one metric in a scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Declared polarity
    pub polarity: Polarity,
    /// Number of companies with a present value
    pub present: usize,
    /// Smallest present raw value
    pub min: Option<f64>,
    /// Largest present raw value
    pub max: Option<f64>,
    /// All present values identical (or a single present value)
    pub degenerate: bool,
}

/// Normalized scores of one metric plus its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMetric {
    /// Score in [0, 1] per company with a present value
    pub scores: BTreeMap<String, f64>,
    /// Statistics of the raw values
    pub summary: MetricSummary,
}

/// Converts raw metric values into polarity-free scores in [0, 1].
///
/// Implementations must be pure: the same values always yield the same scores.
pub trait Normalizer: Send + Sync {
    /// Name of the normalization method.
    fn name(&self) -> &str;

    /// Normalize the present values of one metric.
    ///
    /// # Arguments
    /// * `values` - `(ticker, raw value)` for every company with a present value
    /// * `polarity` - direction in which the metric improves
    fn normalize(&self, values: &[(&str, f64)], polarity: Polarity) -> NormalizedMetric;
}

/// Min-max scaling over the companies that report the metric.
///
/// A zero-variance metric (including a single reporting company) gives every
/// reporting company 1.0: there is nothing to discriminate on, so all are tied
/// for best.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxNormalizer;

impl MinMaxNormalizer {
    /// Create a min-max normalizer.
    pub const fn new() -> Self {
        Self
    }

    fn scale(value: f64, min: f64, max: f64, polarity: Polarity) -> f64 {
        let (numerator, range) = match polarity {
            Polarity::HigherIsBetter => (value - min, max - min),
            Polarity::LowerIsBetter => (max - value, max - min),
        };

        // Spreads near f64::MAX overflow the subtraction; halving first keeps
        // both terms finite.
        let score = if range.is_finite() {
            numerator / range
        } else {
            let (num, rng) = match polarity {
                Polarity::HigherIsBetter => (value / 2.0 - min / 2.0, max / 2.0 - min / 2.0),
                Polarity::LowerIsBetter => (max / 2.0 - value / 2.0, max / 2.0 - min / 2.0),
            };
            num / rng
        };

        score.clamp(0.0, 1.0)
    }
}

impl Normalizer for MinMaxNormalizer {
    fn name(&self) -> &str {
        "min_max"
    }

    fn normalize(&self, values: &[(&str, f64)], polarity: Polarity) -> NormalizedMetric {
        let present: Vec<(&str, f64)> = values
            .iter()
            .copied()
            .filter(|(_, v)| v.is_finite())
            .collect();

        let bounds = present.iter().fold(None, |acc: Option<(f64, f64)>, &(_, v)| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        });

        let Some((min, max)) = bounds else {
            return NormalizedMetric {
                scores: BTreeMap::new(),
                summary: MetricSummary {
                    polarity,
                    present: 0,
                    min: None,
                    max: None,
                    degenerate: false,
                },
            };
        };

        let degenerate = max == min;
        let scores = present
            .iter()
            .map(|&(ticker, v)| {
                let score = if degenerate {
                    1.0
                } else {
                    Self::scale(v, min, max, polarity)
                };
                (ticker.to_string(), score)
            })
            .collect();

        NormalizedMetric {
            scores,
            summary: MetricSummary {
                polarity,
                present: present.len(),
                min: Some(min),
                max: Some(max),
                degenerate,
            },
        }
    }
}
