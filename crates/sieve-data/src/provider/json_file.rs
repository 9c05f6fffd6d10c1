use crate::error::{DataError, Result};
use crate::provider::{MetricProvider, canonical_ticker, parse_cell, select};
use serde_json::Value;
use sieve_scoring::MetricTable;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Curated metric file in JSON form: `{ "TICKER": { "metric": number | null } }`.
///
/// Numeric strings are accepted; any other value is logged and treated as
/// absent. Tickers are upper-cased.
#[derive(Debug, Clone)]
pub struct JsonMetricProvider {
    path: PathBuf,
}

impl JsonMetricProvider {
    /// Provider reading the given file on every fetch.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a whole JSON document into a table.
    pub fn read_table<R: Read>(reader: R) -> Result<MetricTable> {
        let rows: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_reader(reader)?;

        let mut table = MetricTable::new();
        for (raw_ticker, metrics) in rows {
            let ticker = canonical_ticker(&raw_ticker);
            if table.contains(&ticker) {
                return Err(DataError::DuplicateTicker(ticker));
            }
            table.add_company(ticker.as_str());
            for (metric, value) in metrics {
                let value = match &value {
                    Value::Null => None,
                    Value::Number(n) => n.as_f64(),
                    Value::String(raw) => parse_cell(&ticker, &metric, raw),
                    other => {
                        warn!(
                            ticker = ticker.as_str(),
                            metric = metric.as_str(),
                            value = %other,
                            "Unreadable metric value; treating as absent"
                        );
                        None
                    }
                };
                table.insert(ticker.as_str(), metric, value);
            }
        }
        Ok(table)
    }
}

impl MetricProvider for JsonMetricProvider {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch(&self, universe: &[String], metrics: &[&str]) -> Result<MetricTable> {
        let source = Self::read_table(BufReader::new(File::open(&self.path)?))?;
        debug!(
            path = %self.path.display(),
            companies = source.len(),
            "Loaded JSON metrics"
        );
        Ok(select(&source, universe, metrics))
    }
}
