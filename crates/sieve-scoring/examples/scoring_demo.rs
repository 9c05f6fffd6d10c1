//! Demonstration of the Sieve scoring engine
//!
//! This example shows how to:
//! - Build a metric table with missing values
//! - Define a weight map
//! - Score, rank and explain the result
//!
//! Run with: cargo run --example scoring_demo -p sieve-scoring

use sieve_scoring::{MetricTable, ScoringEngine, WeightSpec, get_metric_info};

fn main() -> sieve_scoring::Result<()> {
    println!("Sieve Scoring Demo");
    println!("==================\n");

    let spec = WeightSpec::builder("cloud_infrastructure")
        .lower("ev_to_fcf", 0.15)
        .higher("revenue_cagr", 0.15)
        .higher("operating_margin", 0.10)
        .lower("net_debt_to_ebitda", 0.075)
        .higher("roic", 0.10)
        .build()?;

    let table = MetricTable::with_universe(["AMZN", "MSFT", "GOOGL", "IBM", "ORCL"])
        .with_value("AMZN", "ev_to_fcf", Some(62.0))
        .with_value("AMZN", "revenue_cagr", Some(11.8))
        .with_value("AMZN", "operating_margin", Some(10.7))
        .with_value("AMZN", "net_debt_to_ebitda", Some(0.4))
        .with_value("AMZN", "roic", Some(13.5))
        .with_value("MSFT", "ev_to_fcf", Some(43.0))
        .with_value("MSFT", "revenue_cagr", Some(14.2))
        .with_value("MSFT", "operating_margin", Some(44.6))
        .with_value("MSFT", "net_debt_to_ebitda", Some(-0.3))
        .with_value("MSFT", "roic", Some(28.9))
        .with_value("GOOGL", "ev_to_fcf", Some(29.5))
        .with_value("GOOGL", "revenue_cagr", Some(15.1))
        .with_value("GOOGL", "operating_margin", Some(32.1))
        .with_value("IBM", "ev_to_fcf", Some(21.0))
        .with_value("IBM", "revenue_cagr", Some(1.2))
        .with_value("IBM", "operating_margin", Some(14.8))
        .with_value("IBM", "net_debt_to_ebitda", Some(3.1))
        .with_value("IBM", "roic", Some(9.7))
        // no usable filings
        .with_value("ORCL", "ev_to_fcf", None);

    let result = ScoringEngine::new(spec).score(&table);

    println!("Ranking ({}):", result.spec_name);
    println!("--------------------------");
    for entry in &result.ranked {
        let breakdown = &result.companies[&entry.ticker];
        println!(
            "  {:>2}. {:6} {:6.1}  (weight coverage {:.0}%)",
            entry.rank,
            entry.ticker,
            entry.composite * 100.0,
            breakdown.weight_coverage * 100.0
        );
    }

    if !result.unranked.is_empty() {
        println!("\nUnranked: {}", result.unranked.join(", "));
    }

    println!("\nContributions for the leader:");
    println!("-----------------------------");
    if let Some(leader) = result.ranked.first() {
        for metric in result.weights.keys() {
            let name = get_metric_info(metric).map_or(metric.as_str(), |m| m.name);
            match result.contribution(&leader.ticker, metric) {
                Some(c) => println!("  {name:25} {:6.1}", c * 100.0),
                None => println!("  {name:25}    N/A"),
            }
        }
    }

    println!("\nDemo complete!");
    Ok(())
}
