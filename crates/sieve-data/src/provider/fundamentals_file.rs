use crate::error::Result;
use crate::fundamentals::{Fundamentals, derive_metrics};
use crate::provider::{MetricProvider, canonical_ticker, select};
use sieve_scoring::MetricTable;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Provider deriving metrics from raw fundamentals.
///
/// Input documents map tickers to [`Fundamentals`] records:
/// `{ "TICKER": { "revenue": 1.0e9, "annual_revenue": [..], .. } }`.
#[derive(Debug, Clone, Default)]
pub struct FundamentalsProvider {
    records: BTreeMap<String, Fundamentals>,
}

impl FundamentalsProvider {
    /// Provider over in-memory records; tickers are upper-cased.
    pub fn new(records: BTreeMap<String, Fundamentals>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|(ticker, record)| (canonical_ticker(&ticker), record))
                .collect(),
        }
    }

    /// Load records from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load records from a JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(serde_json::from_reader(reader)?))
    }

    /// Raw record of a company.
    pub fn record(&self, ticker: &str) -> Option<&Fundamentals> {
        self.records.get(&canonical_ticker(ticker))
    }

    /// Table of every derived metric for every company.
    pub fn derived_table(&self) -> MetricTable {
        let mut table = MetricTable::new();
        for (ticker, record) in &self.records {
            table.add_company(ticker.as_str());
            for (metric, value) in derive_metrics(record) {
                table.insert(ticker.as_str(), metric, value);
            }
        }
        table
    }
}

impl MetricProvider for FundamentalsProvider {
    fn name(&self) -> &str {
        "fundamentals"
    }

    fn fetch(&self, universe: &[String], metrics: &[&str]) -> Result<MetricTable> {
        let source = self.derived_table();
        debug!(companies = source.len(), "Derived metrics from fundamentals");
        Ok(select(&source, universe, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fetch_derives_requested_metrics() {
        let doc = r#"{
            "MSFT": { "revenue": 245.0, "operating_income": 109.0, "free_cash_flow": 74.0, "enterprise_value": 3100.0 },
            "IBM": { "revenue": 62.0, "operating_income": 9.0, "free_cash_flow": -1.0, "enterprise_value": 230.0 }
        }"#;
        let provider = FundamentalsProvider::from_reader(doc.as_bytes()).unwrap();
        let universe = vec!["MSFT".to_string(), "IBM".to_string(), "ORCL".to_string()];
        let table = provider
            .fetch(&universe, &["ev_to_fcf", "operating_margin"])
            .unwrap();

        assert_relative_eq!(table.value("MSFT", "ev_to_fcf").unwrap(), 3100.0 / 74.0);
        assert_eq!(table.value("IBM", "ev_to_fcf"), Some(100.0));
        assert_relative_eq!(table.value("IBM", "operating_margin").unwrap(), 9.0 / 62.0 * 100.0);
        assert!(table.row("ORCL").unwrap().is_empty());
        assert_eq!(table.metric_names().len(), 2);
    }

    #[test]
    fn test_lower_case_tickers_match_universe() {
        let doc = r#"{ "orcl": { "revenue": 53.0, "gross_profit": 38.0 } }"#;
        let provider = FundamentalsProvider::from_reader(doc.as_bytes()).unwrap();
        let table = provider
            .fetch(&["ORCL".to_string()], &["gross_margin"])
            .unwrap();

        assert!(provider.record("Orcl").is_some());
        assert!(table.is_present("ORCL", "gross_margin"));
    }
}
