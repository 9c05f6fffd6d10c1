//! Screening reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sieve_scoring::{ScoringResult, get_metric_info};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The builder was never given a scoring result.
    #[error("Report has no scoring result")]
    MissingResult,
}

/// Scores are shown on a 0 to 100 scale.
fn display_score(score: f64) -> f64 {
    score * 100.0
}

fn metric_label(key: &str) -> &str {
    get_metric_info(key).map_or(key, |m| m.name)
}

/// A screening run ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Report title, usually the business model.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// The scoring result being reported.
    pub result: ScoringResult,
}

impl ScreeningReport {
    /// Create a new report stamped with the current time.
    pub fn new(title: impl Into<String>, result: ScoringResult) -> Self {
        Self {
            title: title.into(),
            timestamp: Utc::now(),
            result,
        }
    }

    /// Start building a report.
    pub fn builder() -> ScreeningReportBuilder {
        ScreeningReportBuilder::new()
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let result = &self.result;
        let mut output = String::new();

        output.push_str(&format!("\nScreening Report: {}\n", self.title));
        output.push_str(&format!(
            "Weights: {} | Generated: {}\n",
            result.spec_name,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:>4}  {:<10} {:>8} {:>10} {:>10}\n",
            "Rank", "Ticker", "Score", "Coverage", "Missing"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for entry in &result.ranked {
            let (coverage, missing) = result
                .breakdown(&entry.ticker)
                .map_or((0.0, 0), |c| (c.weight_coverage, c.missing.len()));
            output.push_str(&format!(
                "{:>4}  {:<10} {:>8.1} {:>9.0}% {:>10}{}\n",
                entry.rank,
                entry.ticker,
                display_score(entry.composite),
                coverage * 100.0,
                missing,
                if entry.tied { "  (tie)" } else { "" }
            ));
        }

        if result.ranked.is_empty() {
            output.push_str("  No company could be ranked.\n");
        }

        if !result.unranked.is_empty() {
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "Unranked (no usable metrics): {}\n",
                result.unranked.join(", ")
            ));
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let result = &self.result;
        let mut output = String::new();

        output.push_str(&format!("# Screening Report: {}\n\n", self.title));
        output.push_str(&format!(
            "**Weights:** {} | **Generated:** {}\n\n",
            result.spec_name,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str("## Ranking\n\n");
        output.push_str("| Rank | Ticker | Score | Coverage |\n");
        output.push_str("|------|--------|-------|----------|\n");
        for entry in &result.ranked {
            let coverage = result
                .breakdown(&entry.ticker)
                .map_or(0.0, |c| c.weight_coverage);
            output.push_str(&format!(
                "| {} | {} | {:.1} | {:.0}% |\n",
                entry.rank,
                entry.ticker,
                display_score(entry.composite),
                coverage * 100.0
            ));
        }
        output.push('\n');

        let metrics: Vec<&str> = result.weights.keys().map(String::as_str).collect();
        if !metrics.is_empty() && !result.ranked.is_empty() {
            output.push_str("## Metric Breakdown\n\n");
            output.push_str("| Ticker |");
            for metric in &metrics {
                output.push_str(&format!(" {} |", metric_label(metric)));
            }
            output.push_str("\n|--------|");
            output.push_str(&"------|".repeat(metrics.len()));
            output.push('\n');

            for entry in &result.ranked {
                output.push_str(&format!("| {} |", entry.ticker));
                for metric in &metrics {
                    match result.normalized(&entry.ticker, metric) {
                        Some(score) => output.push_str(&format!(" {:.1} |", display_score(score))),
                        None => output.push_str(" n/a |"),
                    }
                }
                output.push('\n');
            }
            output.push('\n');
        }

        output.push_str("## Weights\n\n");
        for (metric, weight) in &result.weights {
            let polarity = result
                .metrics
                .get(metric)
                .map_or("", |s| s.polarity.as_str());
            output.push_str(&format!(
                "- **{}:** {:.1}% ({})\n",
                metric_label(metric),
                weight * 100.0,
                polarity
            ));
        }

        for (name, weights) in &result.weight_sets {
            let companies: Vec<&str> = result
                .company_weights
                .iter()
                .filter(|(_, set)| *set == name)
                .map(|(ticker, _)| ticker.as_str())
                .collect();
            output.push_str(&format!("\n### {} ({})\n\n", name, companies.join(", ")));
            for (metric, weight) in weights {
                output.push_str(&format!("- **{}:** {:.1}%\n", metric_label(metric), weight * 100.0));
            }
        }

        if !result.unranked.is_empty() {
            output.push_str("\n## Unranked\n\n");
            for ticker in &result.unranked {
                output.push_str(&format!("- {ticker}\n"));
            }
        }

        output
    }
}

impl fmt::Display for ScreeningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Screening Report: {}", self.title)?;
        writeln!(
            f,
            "  Ranked: {}  Unranked: {}",
            self.result.ranked.len(),
            self.result.unranked.len()
        )?;
        if let Some(leader) = self.result.ranked.first() {
            writeln!(
                f,
                "  Leader: {} ({:.1})",
                leader.ticker,
                display_score(leader.composite)
            )?;
        }
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ScreeningReportBuilder {
    title: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    result: Option<ScoringResult>,
}

impl ScreeningReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the timestamp (defaults to now).
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the scoring result.
    pub fn result(mut self, result: ScoringResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Build the report.
    ///
    /// The title defaults to the name of the weight map.
    pub fn build(self) -> Result<ScreeningReport, ReportError> {
        let result = self.result.ok_or(ReportError::MissingResult)?;
        Ok(ScreeningReport {
            title: self.title.unwrap_or_else(|| result.spec_name.clone()),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sieve_scoring::{MetricTable, ScoringEngine, WeightSpec, score};

    fn result() -> ScoringResult {
        let table = MetricTable::with_universe(["SNAP"])
            .with_value("META", "ev_to_fcf", Some(24.0))
            .with_value("META", "operating_margin", Some(41.0))
            .with_value("GOOGL", "ev_to_fcf", Some(22.0))
            .with_value("GOOGL", "operating_margin", Some(32.0))
            .with_value("PINS", "ev_to_fcf", Some(30.0));
        let spec = WeightSpec::builder("ad_platform")
            .lower("ev_to_fcf", 0.6)
            .higher("operating_margin", 0.4)
            .build()
            .unwrap();
        score(&table, &spec)
    }

    fn report() -> ScreeningReport {
        ScreeningReport::builder()
            .title("Ad Platforms")
            .timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
            .result(result())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults_title_to_spec_name() {
        let report = ScreeningReport::builder().result(result()).build().unwrap();
        assert_eq!(report.title, "ad_platform");
    }

    #[test]
    fn test_builder_requires_result() {
        let err = ScreeningReport::builder().title("x").build().unwrap_err();
        assert!(matches!(err, ReportError::MissingResult));
    }

    #[test]
    fn test_ascii_table() {
        let ascii = report().to_ascii_table();

        assert!(ascii.contains("Screening Report: Ad Platforms"));
        assert!(ascii.contains("2024-03-01 12:00:00 UTC"));
        assert!(ascii.contains("GOOGL"));
        assert!(ascii.contains("Unranked (no usable metrics): SNAP"));
        // GOOGL: ev 1.0 * 0.6 + op 0.0 * 0.4 = 60.0
        assert!(ascii.contains("60.0"));
    }

    #[test]
    fn test_markdown() {
        let markdown = report().to_markdown();

        assert!(markdown.contains("# Screening Report: Ad Platforms"));
        assert!(markdown.contains("| Rank | Ticker | Score | Coverage |"));
        assert!(markdown.contains("| EV/FCF | Operating Margin |"));
        assert!(markdown.contains("- **EV/FCF:** 60.0% (lower_is_better)"));
        assert!(markdown.contains("## Unranked"));
        // PINS has no operating margin
        assert!(markdown.contains("| PINS | 0.0 | n/a |"));
    }

    #[test]
    fn test_markdown_lists_company_weights() {
        let table = MetricTable::new()
            .with_value("NVDA", "roic", Some(60.0))
            .with_value("NVDA", "capex_intensity", Some(5.0))
            .with_value("TSM", "roic", Some(25.0))
            .with_value("TSM", "capex_intensity", Some(35.0));
        let base = WeightSpec::builder("semiconductors")
            .higher("roic", 0.5)
            .lower("capex_intensity", 0.5)
            .build()
            .unwrap();
        let foundry = WeightSpec::builder("semiconductors:foundry")
            .higher("roic", 0.25)
            .lower("capex_intensity", 0.75)
            .build()
            .unwrap();
        let result = ScoringEngine::new(base)
            .with_company_weights("TSM", foundry)
            .unwrap()
            .score(&table);
        let markdown = ScreeningReport::new("Semiconductors", result).to_markdown();

        assert!(markdown.contains("### semiconductors:foundry (TSM)"));
        assert!(markdown.contains("- **CapEx Intensity:** 75.0%"));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", report());
        assert!(display.contains("Ranked: 3  Unranked: 1"));
    }

    #[test]
    fn test_to_json() {
        let json = report().to_json().unwrap();
        assert!(json.contains("\"title\": \"Ad Platforms\""));
        assert!(json.contains("\"unranked\""));
    }
}
