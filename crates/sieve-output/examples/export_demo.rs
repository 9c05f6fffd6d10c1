//! Demonstration of Sieve report rendering and export
//!
//! Run with: cargo run --example export_demo -p sieve-output

use sieve_output::{ExportFormat, Exporter, ScreeningReport};
use sieve_scoring::{MetricTable, WeightSpec, score};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table = MetricTable::new()
        .with_value("AAPL", "services_revenue_mix", Some(22.0))
        .with_value("AAPL", "gross_margin", Some(45.6))
        .with_value("AAPL", "ev_to_fcf", Some(31.0))
        .with_value("SONY", "services_revenue_mix", Some(30.0))
        .with_value("SONY", "gross_margin", Some(27.0))
        .with_value("SONY", "ev_to_fcf", None)
        .with_value("GRMN", "gross_margin", Some(58.0))
        .with_value("GRMN", "ev_to_fcf", Some(40.0));
    let spec = WeightSpec::builder("hardware_ecosystem")
        .lower("ev_to_fcf", 0.20)
        .higher("services_revenue_mix", 0.18)
        .higher("gross_margin", 0.16)
        .build()?;

    let report = ScreeningReport::new("Hardware Ecosystem", score(&table, &spec));

    println!("{}", report.to_ascii_table());
    println!("{}", report.to_markdown());

    println!("CSV Export:");
    println!("{}", report.result.export_to_string(ExportFormat::Csv)?);

    println!("JSON Export:");
    println!("{}", report.export_to_string(ExportFormat::PrettyJson)?);

    Ok(())
}
