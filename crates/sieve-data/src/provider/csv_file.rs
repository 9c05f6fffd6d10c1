use crate::error::{DataError, Result};
use crate::provider::{MetricProvider, canonical_ticker, parse_cell, select};
use csv::{ReaderBuilder, Trim};
use sieve_scoring::MetricTable;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Curated metric file in CSV form.
///
/// One row per company: a `ticker` (or `symbol`) column plus one column per
/// metric. Empty cells, `NaN`, `N/A`, `null` and `-` are absent values; any
/// other unreadable cell is logged and treated as absent. Tickers are
/// upper-cased.
#[derive(Debug, Clone)]
pub struct CsvMetricProvider {
    path: PathBuf,
}

impl CsvMetricProvider {
    /// Provider reading the given file on every fetch.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a whole CSV document into a table.
    pub fn read_table<R: Read>(reader: R) -> Result<MetricTable> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let ticker_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("ticker") || h.eq_ignore_ascii_case("symbol"))
            .ok_or(DataError::MissingTickerColumn)?;

        let mut table = MetricTable::new();
        for record in rdr.records() {
            let record = record?;
            let ticker = canonical_ticker(record.get(ticker_col).unwrap_or_default());
            if ticker.is_empty() {
                warn!(
                    line = record.position().map(|p| p.line()),
                    "Skipping row without ticker"
                );
                continue;
            }
            if table.contains(&ticker) {
                return Err(DataError::DuplicateTicker(ticker));
            }

            table.add_company(ticker.as_str());
            for (col, (metric, raw)) in headers.iter().zip(record.iter()).enumerate() {
                if col == ticker_col || metric.is_empty() {
                    continue;
                }
                table.insert(ticker.as_str(), metric, parse_cell(&ticker, metric, raw));
            }
        }
        Ok(table)
    }
}

impl MetricProvider for CsvMetricProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, universe: &[String], metrics: &[&str]) -> Result<MetricTable> {
        let source = Self::read_table(File::open(&self.path)?)?;
        debug!(
            path = %self.path.display(),
            companies = source.len(),
            "Loaded CSV metrics"
        );
        Ok(select(&source, universe, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
ticker,ev_to_fcf,gross_margin,roic
NVDA,55.2,75.0,N/A
AMD, 80.1 ,,4.5
INTC,-,41.0,NaN
";

    #[test]
    fn test_read_table() {
        let table = CsvMetricProvider::read_table(DOC.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.value("NVDA", "ev_to_fcf"), Some(55.2));
        assert_eq!(table.value("NVDA", "roic"), None);
        assert_eq!(table.value("AMD", "ev_to_fcf"), Some(80.1));
        assert_eq!(table.value("AMD", "gross_margin"), None);
        assert_eq!(table.value("INTC", "ev_to_fcf"), None);
        assert_eq!(table.coverage("roic"), 1);
    }

    #[test]
    fn test_symbol_column_accepted() {
        let table = CsvMetricProvider::read_table("Symbol,roic\nMU,12\n".as_bytes()).unwrap();
        assert_eq!(table.value("MU", "roic"), Some(12.0));
    }

    #[test]
    fn test_missing_ticker_column() {
        let err = CsvMetricProvider::read_table("name,roic\nMU,12\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingTickerColumn));
    }

    #[test]
    fn test_duplicate_ticker() {
        let err = CsvMetricProvider::read_table("ticker,roic\nMU,12\nMU,13\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateTicker(t) if t == "MU"));
    }

    #[test]
    fn test_unreadable_cell_only_loses_that_metric() {
        let table =
            CsvMetricProvider::read_table("ticker,roic,gross_margin\nMU,twelve,22\nWDC,8,30\n".as_bytes())
                .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value("MU", "roic"), None);
        assert_eq!(table.value("MU", "gross_margin"), Some(22.0));
        assert_eq!(table.value("WDC", "roic"), Some(8.0));
    }

    #[test]
    fn test_tickers_upper_cased() {
        let table = CsvMetricProvider::read_table("ticker,roic\n mu ,12\n".as_bytes()).unwrap();
        assert_eq!(table.value("MU", "roic"), Some(12.0));
    }

    #[test]
    fn test_duplicate_ticker_ignores_case() {
        let err = CsvMetricProvider::read_table("ticker,roic\nMU,12\nmu,13\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateTicker(t) if t == "MU"));
    }

    #[test]
    fn test_blank_ticker_skipped() {
        let table = CsvMetricProvider::read_table("ticker,roic\n,12\nMU,13\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
