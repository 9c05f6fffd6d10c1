//! Metric providers.
//!
//! A provider is asked once per run for the metrics of a universe and answers
//! with a [`MetricTable`]. Every requested ticker gets a row, even when the
//! source knows nothing about it; such companies end up unranked. Tickers are
//! matched case-insensitively and returned upper-cased.

mod csv_file;
mod fundamentals_file;
mod json_file;

pub use csv_file::CsvMetricProvider;
pub use fundamentals_file::FundamentalsProvider;
pub use json_file::JsonMetricProvider;

use crate::error::{DataError, Result};
use sieve_scoring::MetricTable;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Source of raw metric values.
pub trait MetricProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the given metrics for a universe.
    ///
    /// An empty universe means every company the source knows; an empty metric
    /// list means every metric it has.
    fn fetch(&self, universe: &[String], metrics: &[&str]) -> Result<MetricTable>;
}

/// Provider over an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    table: MetricTable,
}

impl StaticProvider {
    /// Wrap a table.
    pub const fn new(table: MetricTable) -> Self {
        Self { table }
    }

    /// Underlying table.
    pub const fn table(&self) -> &MetricTable {
        &self.table
    }
}

impl MetricProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, universe: &[String], metrics: &[&str]) -> Result<MetricTable> {
        Ok(select(&self.table, universe, metrics))
    }
}

/// Open a metric file, picking the reader by extension (`.csv` or `.json`).
pub fn provider_for_path(path: impl AsRef<Path>) -> Result<Box<dyn MetricProvider>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => Ok(Box::new(CsvMetricProvider::new(path))),
        Some("json") => Ok(Box::new(JsonMetricProvider::new(path))),
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Whether a raw cell denotes an absent value.
pub(crate) fn is_absent_marker(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "nan" | "n/a" | "na" | "null" | "none" | "-"
    )
}

/// Canonical form of a ticker: trimmed and upper-cased.
pub(crate) fn canonical_ticker(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Parse one raw cell.
///
/// A cell that is neither a number nor an absence marker only costs that
/// company the metric: it is logged and stored as absent.
pub(crate) fn parse_cell(ticker: &str, metric: &str, raw: &str) -> Option<f64> {
    if is_absent_marker(raw) {
        return None;
    }
    match raw.trim().parse::<f64>() {
        Ok(value) => value.is_finite().then_some(value),
        Err(_) => {
            warn!(ticker, metric, value = raw, "Unreadable metric value; treating as absent");
            None
        }
    }
}

/// Restrict a source table to a universe and a set of metrics.
pub(crate) fn select(source: &MetricTable, universe: &[String], metrics: &[&str]) -> MetricTable {
    // canonical ticker -> ticker as spelled in the source
    let mut known: BTreeMap<String, &str> = BTreeMap::new();
    for ticker in source.tickers() {
        let canonical = canonical_ticker(ticker);
        if let Some(kept) = known.get(&canonical) {
            warn!(ticker, kept = *kept, "Ticker differs only in case; ignoring row");
            continue;
        }
        known.insert(canonical, ticker);
    }

    let tickers: Vec<String> = if universe.is_empty() {
        known.keys().cloned().collect()
    } else {
        universe.iter().map(|t| canonical_ticker(t)).collect()
    };
    let all_metrics;
    let metrics: Vec<&str> = if metrics.is_empty() {
        all_metrics = source.metric_names();
        all_metrics.iter().copied().collect()
    } else {
        metrics.to_vec()
    };

    let mut table = MetricTable::new();
    for ticker in tickers {
        table.add_company(ticker.as_str());
        let Some(&spelled) = known.get(&ticker) else {
            debug!(ticker = ticker.as_str(), "No data for ticker");
            continue;
        };
        for metric in &metrics {
            table.insert(ticker.as_str(), *metric, source.value(spelled, metric));
        }
    }
    table
}
