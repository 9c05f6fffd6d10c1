//! Screening: fetch once, score, rank.

use crate::business_model::{
    BusinessModel, SemiconductorSubsector, semiconductor_base_weights, subsector_for,
};
use crate::error::ScreenError;
use crate::universe::Universe;
use sieve_data::MetricProvider;
use sieve_scoring::{ScoringConfig, ScoringEngine, ScoringResult, WeightSpec};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Score a universe against a weight map.
///
/// The provider is asked once for exactly the metrics the weight map
/// weighs. An empty universe screens every company the provider knows.
pub fn screen<P, U>(
    provider: &P,
    universe: &U,
    spec: &WeightSpec,
    config: ScoringConfig,
) -> Result<ScoringResult, ScreenError>
where
    P: MetricProvider + ?Sized,
    U: Universe + ?Sized,
{
    let tickers = universe.symbols();
    let metrics = spec.metric_names();
    info!(
        provider = provider.name(),
        spec = spec.name(),
        universe = tickers.len(),
        "Fetching metrics"
    );

    let table = provider.fetch(&tickers, &metrics)?;
    Ok(ScoringEngine::new(spec.clone())
        .with_config(config)?
        .score(&table))
}

/// Screen semiconductors with each company's own sub-sector weights.
///
/// Every ticker is aggregated with the base semiconductor weights scaled by
/// its sub-sector's multipliers, while normalization still spans the whole
/// universe so composites stay comparable across sub-sectors.
pub fn screen_semiconductors<P, U>(
    provider: &P,
    universe: &U,
    config: ScoringConfig,
) -> Result<ScoringResult, ScreenError>
where
    P: MetricProvider + ?Sized,
    U: Universe + ?Sized,
{
    let base = semiconductor_base_weights()?;
    let tickers = universe.symbols();
    info!(
        provider = provider.name(),
        universe = tickers.len(),
        "Fetching semiconductor metrics"
    );
    let table = provider.fetch(&tickers, &base.metric_names())?;

    let mut engine = ScoringEngine::new(base).with_config(config)?;
    let mut specs: BTreeMap<SemiconductorSubsector, WeightSpec> = BTreeMap::new();
    let mut counts: BTreeMap<SemiconductorSubsector, usize> = BTreeMap::new();
    for ticker in table.tickers() {
        let sub = subsector_for(ticker);
        let spec = match specs.get(&sub) {
            Some(spec) => spec.clone(),
            None => {
                let spec = BusinessModel::Semiconductors(sub).weight_spec()?;
                specs.insert(sub, spec.clone());
                spec
            }
        };
        debug!(ticker, subsector = %sub, "Assigned sub-sector weights");
        *counts.entry(sub).or_default() += 1;
        engine = engine.with_company_weights(ticker, spec)?;
    }
    for (sub, companies) in &counts {
        info!(subsector = %sub, companies, "Sub-sector");
    }

    Ok(engine.score(&table))
}

/// Screen a business model's default universe with its built-in weights.
pub fn screen_business_model<P>(
    provider: &P,
    model: BusinessModel,
    config: ScoringConfig,
) -> Result<ScoringResult, ScreenError>
where
    P: MetricProvider + ?Sized,
{
    let spec = model.weight_spec()?;
    screen(provider, &model.default_universe(), &spec, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::BusinessModelUniverse;
    use approx::assert_relative_eq;
    use sieve_data::StaticProvider;
    use sieve_scoring::{MetricTable, ScoringError};

    #[test]
    fn test_screen_restricts_to_universe() {
        let provider = StaticProvider::new(
            MetricTable::new()
                .with_value("META", "ev_to_fcf", Some(24.0))
                .with_value("GOOGL", "ev_to_fcf", Some(22.0))
                .with_value("NFLX", "ev_to_fcf", Some(48.0)),
        );
        let result = screen_business_model(
            &provider,
            BusinessModel::AdPlatform,
            ScoringConfig::default(),
        )
        .unwrap();

        assert_eq!(result.spec_name, "ad_platform");
        assert_eq!(result.universe_size(), 4);
        assert_eq!(result.rank_of("GOOGL"), Some(1));
        assert_eq!(result.rank_of("META"), Some(2));
        assert_eq!(result.unranked, vec!["PINS".to_string(), "SNAP".to_string()]);
        assert!(result.breakdown("NFLX").is_none());
    }

    #[test]
    fn test_lower_case_data_matches_universe() {
        let provider = StaticProvider::new(
            MetricTable::new()
                .with_value("aapl", "fcf_margin", Some(25.0))
                .with_value("msft", "fcf_margin", Some(30.0)),
        );
        let spec = WeightSpec::builder("cash")
            .higher("fcf_margin", 1.0)
            .build()
            .unwrap();
        let universe = BusinessModelUniverse::custom(["aapl", "msft"]);
        let result = screen(&provider, &universe, &spec, ScoringConfig::default()).unwrap();

        assert_eq!(result.ranked.len(), 2);
        assert_eq!(result.rank_of("MSFT"), Some(1));
        assert_eq!(result.rank_of("AAPL"), Some(2));
        assert!(result.unranked.is_empty());
    }

    #[test]
    fn test_invalid_tie_epsilon_is_an_error() {
        let provider = StaticProvider::new(MetricTable::new().with_value("META", "ev_to_fcf", Some(24.0)));
        let err = screen_business_model(
            &provider,
            BusinessModel::AdPlatform,
            ScoringConfig {
                tie_epsilon: -1.0,
                ..ScoringConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScreenError::Scoring(ScoringError::InvalidTieEpsilon(e)) if e == -1.0
        ));
    }

    #[test]
    fn test_semiconductors_scored_with_subsector_weights() {
        let provider = StaticProvider::new(
            MetricTable::new()
                .with_value("NVDA", "roic", Some(60.0))
                .with_value("NVDA", "gross_margin", Some(40.0))
                .with_value("TSM", "roic", Some(20.0))
                .with_value("TSM", "gross_margin", Some(60.0))
                .with_value("MU", "roic", Some(40.0))
                .with_value("MU", "gross_margin", Some(50.0)),
        );
        let universe = BusinessModelUniverse::custom(["NVDA", "TSM", "MU", "INTC"]);
        let result = screen_semiconductors(&provider, &universe, ScoringConfig::default()).unwrap();

        assert_eq!(result.spec_name, "semiconductors");
        assert_eq!(result.company_weights["NVDA"], "semiconductors:fabless");
        assert_eq!(result.company_weights["TSM"], "semiconductors:foundry");
        assert_eq!(result.company_weights["MU"], "semiconductors:memory");
        // Tickers outside the curated lists fall back to the IDM weights
        assert_eq!(result.company_weights["INTC"], "semiconductors:idm");
        assert!(result.is_unranked("INTC"));

        // Normalization spans all three sub-sectors
        assert_eq!(result.breakdown("NVDA").unwrap().normalized["roic"], 1.0);
        assert_eq!(result.breakdown("TSM").unwrap().normalized["roic"], 0.0);
        assert_eq!(result.breakdown("MU").unwrap().normalized["roic"], 0.5);

        for ticker in ["NVDA", "TSM", "MU"] {
            let weights = result.weights_for(ticker);
            let normalized = &result.breakdown(ticker).unwrap().normalized;
            let present = weights["roic"] + weights["gross_margin"];
            let expected = (weights["roic"] * normalized["roic"]
                + weights["gross_margin"] * normalized["gross_margin"])
                / present;
            assert_relative_eq!(result.composite(ticker).unwrap(), expected, epsilon = 1e-12);
        }
        assert!(result.weights_for("NVDA")["roic"] > result.weights_for("TSM")["roic"]);
    }
}
