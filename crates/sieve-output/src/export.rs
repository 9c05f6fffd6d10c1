//! Export functionality for screening results.
//!
//! CSV export writes one row per company: ranked companies first, best first,
//! then unranked companies with empty rank and composite. Every weighted
//! metric gets a column holding the company's normalized score. JSON export
//! serializes the full result.

use crate::report::ScreeningReport;
use serde::Serialize;
use sieve_scoring::ScoringResult;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer produced invalid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::InvalidFormat(path.display().to_string()))?
            .parse()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, ExportError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn result_to_csv(result: &ScoringResult) -> Result<String, ExportError> {
    let metrics: Vec<&str> = result.weights.keys().map(String::as_str).collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    let mut header = vec!["rank", "ticker", "composite", "coverage"];
    header.extend(&metrics);
    wtr.write_record(&header)?;

    let row = |rank: Option<usize>, ticker: &str, composite: Option<f64>| -> Vec<String> {
        let coverage = result.breakdown(ticker).map(|c| c.weight_coverage);
        let mut record = vec![
            rank.map(|r| r.to_string()).unwrap_or_default(),
            ticker.to_string(),
            optional(composite),
            optional(coverage),
        ];
        record.extend(metrics.iter().map(|m| optional(result.normalized(ticker, m))));
        record
    };

    for entry in &result.ranked {
        wtr.write_record(row(Some(entry.rank), &entry.ticker, Some(entry.composite)))?;
    }
    for ticker in &result.unranked {
        wtr.write_record(row(None, ticker, None))?;
    }

    let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?;
    Ok(data)
}

impl Exporter for ScoringResult {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => result_to_csv(self),
            ExportFormat::Json => to_json(self, false),
            ExportFormat::PrettyJson => to_json(self, true),
        }
    }
}

impl Exporter for ScreeningReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();

                // Write header information as comments
                output.push_str(&format!("# Report: {}\n", self.title));
                output.push_str(&format!("# Weights: {}\n", self.result.spec_name));
                output.push_str(&format!("# Generated: {}\n", self.timestamp.to_rfc3339()));
                output.push_str(&result_to_csv(&self.result)?);
                Ok(output)
            }
            ExportFormat::Json => to_json(self, false),
            ExportFormat::PrettyJson => to_json(self, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sieve_scoring::{MetricTable, WeightSpec, score};

    fn result() -> ScoringResult {
        let table = MetricTable::new()
            .with_value("CRWD", "gross_margin", Some(75.0))
            .with_value("CRWD", "rnd_intensity", Some(25.0))
            .with_value("FTNT", "gross_margin", Some(80.0))
            .with_value("FTNT", "rnd_intensity", Some(15.0))
            .with_value("S", "gross_margin", None);
        let spec = WeightSpec::builder("cybersecurity")
            .higher("gross_margin", 0.5)
            .higher("rnd_intensity", 0.5)
            .build()
            .unwrap();
        score(&table, &spec)
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_parse(#[case] raw: &str, #[case] expected: ExportFormat) {
        assert_eq!(raw.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_format_parse_rejects_unknown() {
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/ranking.csv")).unwrap(),
            ExportFormat::Csv
        );
        assert!(ExportFormat::from_path(Path::new("ranking")).is_err());
    }

    #[test]
    fn test_result_csv() {
        let csv = result().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "rank,ticker,composite,coverage,gross_margin,rnd_intensity");
        assert_eq!(lines[1], "1,CRWD,0.5,1,0,1");
        assert_eq!(lines[2], "2,FTNT,0.5,1,1,0");
        assert_eq!(lines[3], ",S,,0,,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_result_json() {
        let json = result().export_to_string(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["spec_name"], "cybersecurity");
        assert_eq!(value["unranked"][0], "S");
        assert_eq!(value["ranked"][0]["ticker"], "CRWD");
    }

    #[test]
    fn test_result_pretty_json() {
        let json = result().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("  ")); // Indentation indicates pretty format
    }
}
