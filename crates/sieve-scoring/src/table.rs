//! Metric Table
//!
//! The engine's input: one row per company, one optional value per metric.
//! Absence is a first-class state. A value that failed upstream (division by
//! zero, negative denominator, overflow) must arrive as absent rather than zero,
//! so non-finite inputs are stored as absent.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Metric values for one company, keyed by metric name.
pub type MetricRow = BTreeMap<String, Option<f64>>;

/// Cross-section of metric values for a universe of companies.
///
/// Rows are kept in ticker order and metrics in name order, so iteration is
/// independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricTable {
    rows: BTreeMap<String, MetricRow>,
}

impl MetricTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with an empty row for every ticker in the universe.
    ///
    /// Companies without any data still take part in the run and end up unranked.
    pub fn with_universe<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = tickers
            .into_iter()
            .map(|t| (t.into(), MetricRow::new()))
            .collect();
        Self { rows }
    }

    /// Add a company with no metrics. Existing rows are left untouched.
    pub fn add_company(&mut self, ticker: impl Into<String>) {
        self.rows.entry(ticker.into()).or_default();
    }

    /// Record a metric value for a company, creating the row if needed.
    ///
    /// `None` and non-finite values are both stored as absent.
    pub fn insert(&mut self, ticker: impl Into<String>, metric: impl Into<String>, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        self.rows
            .entry(ticker.into())
            .or_default()
            .insert(metric.into(), value);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_value(
        mut self,
        ticker: impl Into<String>,
        metric: impl Into<String>,
        value: Option<f64>,
    ) -> Self {
        self.insert(ticker, metric, value);
        self
    }

    /// Present value of a metric for a company.
    ///
    /// Returns `None` when the company is unknown, the metric is missing, or the
    /// stored value is absent.
    pub fn value(&self, ticker: &str, metric: &str) -> Option<f64> {
        self.rows
            .get(ticker)
            .and_then(|row| row.get(metric).copied().flatten())
            .filter(|v| v.is_finite())
    }

    /// Whether a company has a present value for a metric.
    pub fn is_present(&self, ticker: &str, metric: &str) -> bool {
        self.value(ticker, metric).is_some()
    }

    /// Row for a company.
    pub fn row(&self, ticker: &str) -> Option<&MetricRow> {
        self.rows.get(ticker)
    }

    /// Whether the company is part of the table.
    pub fn contains(&self, ticker: &str) -> bool {
        self.rows.contains_key(ticker)
    }

    /// Tickers in ascending order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of companies.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no companies.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of metric names recorded for any company.
    pub fn metric_names(&self) -> BTreeSet<&str> {
        self.rows
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    /// Present values of a metric, in ticker order.
    pub fn present_values(&self, metric: &str) -> Vec<(&str, f64)> {
        self.rows
            .iter()
            .filter_map(|(ticker, row)| {
                row.get(metric)
                    .copied()
                    .flatten()
                    .filter(|v| v.is_finite())
                    .map(|v| (ticker.as_str(), v))
            })
            .collect()
    }

    /// Number of companies with a present value for a metric.
    pub fn coverage(&self, metric: &str) -> usize {
        self.present_values(metric).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_values_are_absent() {
        let mut table = MetricTable::new();
        table.insert("AAPL", "net_debt_to_ebitda", Some(f64::NAN));
        table.insert("MSFT", "net_debt_to_ebitda", Some(f64::INFINITY));
        table.insert("GOOGL", "net_debt_to_ebitda", Some(f64::NEG_INFINITY));

        assert_eq!(table.value("AAPL", "net_debt_to_ebitda"), None);
        assert_eq!(table.value("MSFT", "net_debt_to_ebitda"), None);
        assert_eq!(table.value("GOOGL", "net_debt_to_ebitda"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_zero_and_negative_are_present() {
        let table = MetricTable::new()
            .with_value("AAPL", "fcf_margin", Some(0.0))
            .with_value("INTC", "fcf_margin", Some(-12.5));

        assert_eq!(table.value("AAPL", "fcf_margin"), Some(0.0));
        assert_eq!(table.value("INTC", "fcf_margin"), Some(-12.5));
        assert_eq!(table.coverage("fcf_margin"), 2);
    }

    #[test]
    fn test_universe_rows_exist_without_data() {
        let table = MetricTable::with_universe(["NVDA", "AMD"]).with_value("NVDA", "roic", Some(40.0));

        assert!(table.contains("AMD"));
        assert!(table.row("AMD").is_some_and(|r| r.is_empty()));
        assert!(!table.is_present("AMD", "roic"));
        assert_eq!(table.tickers().collect::<Vec<_>>(), vec!["AMD", "NVDA"]);
    }

    #[test]
    fn test_present_values_in_ticker_order() {
        let table = MetricTable::new()
            .with_value("MU", "gross_margin", Some(20.0))
            .with_value("AMD", "gross_margin", Some(50.0))
            .with_value("INTC", "gross_margin", None);

        assert_eq!(
            table.present_values("gross_margin"),
            vec![("AMD", 50.0), ("MU", 20.0)]
        );
        assert_eq!(table.metric_names().into_iter().collect::<Vec<_>>(), vec!["gross_margin"]);
    }

    #[test]
    fn test_add_company_keeps_existing_row() {
        let mut table = MetricTable::new().with_value("ORCL", "roic", Some(12.0));
        table.add_company("ORCL");
        assert_eq!(table.value("ORCL", "roic"), Some(12.0));
    }

    #[test]
    fn test_serde_round_trip_preserves_absence() {
        let table = MetricTable::new()
            .with_value("AMZN", "ev_to_fcf", Some(45.0))
            .with_value("AMZN", "interest_coverage", None);

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("null"));
        let back: MetricTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
