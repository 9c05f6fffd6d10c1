//! Rank Resolver
//!
//! Orders companies by composite score, highest first. Scores that differ by
//! no more than the tie epsilon are treated as equal and ordered by ticker, so
//! the ranking never depends on input or hash order.

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};

/// Default tolerance under which two composites are considered tied.
pub const DEFAULT_TIE_EPSILON: f64 = 1e-9;

/// One entry of the ranked sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCompany {
    /// Ordinal position, starting at 1
    pub rank: usize,
    /// Company identifier
    pub ticker: String,
    /// Composite score in [0, 1]
    pub composite: f64,
    /// Shares its score (within epsilon) with at least one other company
    pub tied: bool,
}

/// Sorts composites and assigns ordinal ranks.
#[derive(Debug, Clone, Copy)]
pub struct RankResolver {
    epsilon: f64,
}

impl Default for RankResolver {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_TIE_EPSILON,
        }
    }
}

impl RankResolver {
    /// Create a resolver with the given tie tolerance.
    ///
    /// Zero means exact comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidTieEpsilon`] for a negative or non-finite
    /// tolerance.
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon >= 0.0) {
            return Err(ScoringError::InvalidTieEpsilon(epsilon));
        }
        Ok(Self { epsilon })
    }

    /// Tie tolerance in use.
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Rank the evaluable companies and collect the rest.
    ///
    /// Returns the ranked sequence and the unranked tickers, both sorted
    /// deterministically.
    pub fn resolve<'a, I>(&self, composites: I) -> (Vec<RankedCompany>, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, Option<f64>)>,
    {
        let mut scored: Vec<(&str, f64)> = Vec::new();
        let mut unranked: Vec<String> = Vec::new();

        for (ticker, composite) in composites {
            match composite.filter(|c| c.is_finite()) {
                Some(c) => scored.push((ticker, c)),
                None => unranked.push(ticker.to_string()),
            }
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        unranked.sort();
        unranked.dedup();

        let mut ranked = Vec::with_capacity(scored.len());
        let mut start = 0;
        while start < scored.len() {
            let leader = scored[start].1;
            let end = scored[start..]
                .iter()
                .position(|&(_, c)| leader - c > self.epsilon)
                .map_or(scored.len(), |offset| start + offset);

            let group = &mut scored[start..end];
            group.sort_by(|a, b| a.0.cmp(b.0));
            let tied = group.len() > 1;

            for &(ticker, composite) in group.iter() {
                ranked.push(RankedCompany {
                    rank: ranked.len() + 1,
                    ticker: ticker.to_string(),
                    composite,
                    tied,
                });
            }
            start = end;
        }

        (ranked, unranked)
    }
}
