//! Scoring Result
//!
//! Outbound record of a scoring run: the ranked sequence, the companies that
//! could not be evaluated, and every normalized score behind each composite so
//! that a ranking can be explained after the fact.

use crate::aggregate::CompanyComposite;
use crate::normalize::MetricSummary;
use crate::rank::RankedCompany;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Name of the weight map used
    pub spec_name: String,
    /// Normalization method used
    pub normalizer: String,
    /// Evaluable companies, best first
    pub ranked: Vec<RankedCompany>,
    /// Companies without any usable weighted metric, by ticker
    pub unranked: Vec<String>,
    /// Per-company composite and normalized scores, for every company in the run
    pub companies: BTreeMap<String, CompanyComposite>,
    /// Per-metric statistics of the raw values
    pub metrics: BTreeMap<String, MetricSummary>,
    /// Weights rescaled to sum to 1.0
    pub weights: BTreeMap<String, f64>,
    /// Companies aggregated with their own weights: ticker to weight map name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub company_weights: BTreeMap<String, String>,
    /// Rescaled weights of every weight map named in `company_weights`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub weight_sets: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ScoringResult {
    /// Number of companies that took part in the run.
    pub fn universe_size(&self) -> usize {
        self.companies.len()
    }

    /// Ranked entry for a company.
    pub fn entry(&self, ticker: &str) -> Option<&RankedCompany> {
        self.ranked.iter().find(|r| r.ticker == ticker)
    }

    /// Rank of a company, `None` if unranked or unknown.
    pub fn rank_of(&self, ticker: &str) -> Option<usize> {
        self.entry(ticker).map(|r| r.rank)
    }

    /// Composite score of a company.
    pub fn composite(&self, ticker: &str) -> Option<f64> {
        self.companies.get(ticker).and_then(|c| c.composite)
    }

    /// Whether a company was excluded from the ranking.
    pub fn is_unranked(&self, ticker: &str) -> bool {
        self.unranked.iter().any(|t| t == ticker)
    }

    /// Full breakdown for a company.
    pub fn breakdown(&self, ticker: &str) -> Option<&CompanyComposite> {
        self.companies.get(ticker)
    }

    /// Normalized score of one metric for one company.
    pub fn normalized(&self, ticker: &str, metric: &str) -> Option<f64> {
        self.companies
            .get(ticker)
            .and_then(|c| c.normalized.get(metric).copied())
    }

    /// Rescaled weights a company was aggregated with.
    pub fn weights_for(&self, ticker: &str) -> &BTreeMap<String, f64> {
        self.company_weights
            .get(ticker)
            .and_then(|name| self.weight_sets.get(name))
            .unwrap_or(&self.weights)
    }

    /// Portion of a company's composite contributed by one metric.
    ///
    /// Contributions of a company's present metrics add up to its composite.
    pub fn contribution(&self, ticker: &str, metric: &str) -> Option<f64> {
        let company = self.companies.get(ticker)?;
        company.composite?;
        let score = company.normalized.get(metric)?;
        let weights = self.weights_for(ticker);
        let weight = weights.get(metric)?;
        let present_weight: f64 = company
            .normalized
            .keys()
            .filter_map(|m| weights.get(m))
            .sum();
        (present_weight > 0.0).then(|| weight * score / present_weight)
    }
}
