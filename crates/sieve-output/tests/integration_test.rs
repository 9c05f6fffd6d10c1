//! Integration tests for reports and exports.

use sieve_output::{ExportFormat, Exporter, ScreeningReport};
use sieve_scoring::{MetricTable, ScoringResult, WeightSpec, score};
use std::fs;

fn streaming_result() -> ScoringResult {
    let table = MetricTable::with_universe(["PARA"])
        .with_value("NFLX", "ev_to_fcf", Some(48.0))
        .with_value("NFLX", "arpu_cagr", Some(6.0))
        .with_value("NFLX", "content_spend_intensity", Some(45.0))
        .with_value("DIS", "ev_to_fcf", Some(26.0))
        .with_value("DIS", "arpu_cagr", Some(3.0))
        .with_value("DIS", "content_spend_intensity", Some(38.0))
        .with_value("ROKU", "ev_to_fcf", Some(100.0))
        .with_value("ROKU", "arpu_cagr", None);
    let spec = WeightSpec::builder("streaming")
        .lower("ev_to_fcf", 0.18)
        .higher("arpu_cagr", 0.16)
        .lower("content_spend_intensity", 0.16)
        .build()
        .unwrap();
    score(&table, &spec)
}

#[test]
fn test_full_report_workflow() {
    let report = ScreeningReport::new("Streaming", streaming_result());

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("Streaming"));
    assert!(ascii.contains("NFLX"));
    assert!(ascii.contains("DIS"));
    assert!(ascii.contains("PARA"));

    let markdown = report.to_markdown();
    assert!(markdown.contains("# Screening Report: Streaming"));
    assert!(markdown.contains("| Ticker |"));
    assert!(markdown.contains("- PARA"));
}

#[test]
fn test_ranking_order_survives_export() {
    let result = streaming_result();
    let csv = result.export_to_string(ExportFormat::Csv).unwrap();

    let tickers: Vec<&str> = csv
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').nth(1))
        .collect();
    let mut expected: Vec<&str> = result.ranked.iter().map(|r| r.ticker.as_str()).collect();
    expected.extend(result.unranked.iter().map(String::as_str));

    assert_eq!(tickers, expected);
    assert_eq!(tickers.last(), Some(&"PARA"));
}

#[test]
fn test_json_round_trip_of_result() {
    let result = streaming_result();
    let json = result.export_to_string(ExportFormat::PrettyJson).unwrap();
    let back: ScoringResult = serde_json::from_str(&json).unwrap();

    assert_eq!(back.ranked, result.ranked);
    assert_eq!(back.unranked, result.unranked);
}

#[test]
fn test_report_export_to_file() {
    let dir = std::env::temp_dir().join(format!("sieve-output-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("streaming.csv");

    let report = ScreeningReport::new("Streaming", streaming_result());
    report.export_to_file(&path, ExportFormat::Csv).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# Report: Streaming\n"));
    assert!(written.contains("rank,ticker,composite,coverage"));
}
