//! Weight file loading.
//!
//! Weight files are TOML or JSON documents with an optional name and a
//! `metrics` table:
//!
//! ```toml
//! name = "custom"
//!
//! [metrics]
//! ev_to_fcf = { weight = 0.5 }
//! dau_growth = { weight = 0.3, polarity = "higher_is_better" }
//! fcf_margin = 0.2
//! ```
//!
//! Metrics in the registry may omit their polarity.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use sieve_scoring::{MetricWeight, Polarity, ScoringError, WeightSpec, default_polarity};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Raw weight file, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightFile {
    /// Name of the weight map (defaults to the file stem)
    #[serde(default)]
    pub name: Option<String>,
    /// One-line thesis behind the weights
    #[serde(default)]
    pub description: Option<String>,
    /// Metric entries
    pub metrics: BTreeMap<String, MetricEntry>,
}

/// One metric of a weight file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricEntry {
    /// Bare weight; polarity comes from the registry
    Weight(f64),
    /// Weight with an optional explicit polarity
    Detailed {
        /// Relative importance
        weight: f64,
        /// `higher_is_better` / `higher` or `lower_is_better` / `lower`
        #[serde(default)]
        polarity: Option<String>,
    },
}

impl MetricEntry {
    /// Declared weight.
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Weight(weight) | Self::Detailed { weight, .. } => *weight,
        }
    }

    /// Declared polarity string, if any.
    pub fn polarity(&self) -> Option<&str> {
        match self {
            Self::Weight(_) => None,
            Self::Detailed { polarity, .. } => polarity.as_deref(),
        }
    }
}

impl WeightFile {
    /// Parse a TOML document.
    pub fn from_toml(doc: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(doc)?)
    }

    /// Parse a JSON document.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(doc)?)
    }
}

fn resolve_polarity(metric: &str, entry: &MetricEntry) -> Result<Polarity, ScoringError> {
    match entry.polarity() {
        Some(raw) => raw.parse().map_err(|_| ScoringError::InvalidPolarity {
            metric: metric.to_string(),
            value: raw.to_string(),
        }),
        None => default_polarity(metric).ok_or_else(|| ScoringError::UnknownMetric(metric.to_string())),
    }
}

/// Validate a weight file into a weight map.
///
/// `fallback_name` is used when the file does not name itself.
pub fn parse_weight_spec(file: &WeightFile, fallback_name: &str) -> Result<WeightSpec, ConfigError> {
    let name = file.name.as_deref().unwrap_or(fallback_name);
    let metrics = file
        .metrics
        .iter()
        .map(|(metric, entry)| {
            let polarity = resolve_polarity(metric, entry)?;
            Ok((metric.as_str(), MetricWeight::new(polarity, entry.weight())))
        })
        .collect::<Result<Vec<_>, ScoringError>>()?;
    Ok(WeightSpec::new(name, metrics)?)
}

/// Load and validate a `.toml` or `.json` weight file.
pub fn load_weight_spec(path: impl AsRef<Path>) -> Result<WeightSpec, ConfigError> {
    let path = path.as_ref();
    let doc = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let file = match extension.as_deref() {
        Some("toml") => WeightFile::from_toml(&doc)?,
        Some("json") => WeightFile::from_json(&doc)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("custom");
    let spec = parse_weight_spec(&file, stem)?;
    debug!(
        path = %path.display(),
        name = spec.name(),
        metrics = spec.len(),
        "Loaded weight file"
    );
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_toml_with_registry_polarity() {
        let doc = r#"
            name = "custom"

            [metrics]
            ev_to_fcf = { weight = 0.5 }
            dau_growth = { weight = 0.3, polarity = "higher_is_better" }
            fcf_margin = 0.2
        "#;
        let spec = parse_weight_spec(&WeightFile::from_toml(doc).unwrap(), "fallback").unwrap();

        assert_eq!(spec.name(), "custom");
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.get("ev_to_fcf").unwrap().polarity, Polarity::LowerIsBetter);
        assert_eq!(spec.get("dau_growth").unwrap().polarity, Polarity::HigherIsBetter);
        assert_relative_eq!(spec.get("fcf_margin").unwrap().weight, 0.2);
    }

    #[test]
    fn test_json_with_fallback_name() {
        let doc = r#"{"metrics": {"roic": {"weight": 1}, "capex_intensity": {"weight": 1, "polarity": "lower"}}}"#;
        let spec = parse_weight_spec(&WeightFile::from_json(doc).unwrap(), "semis_custom").unwrap();

        assert_eq!(spec.name(), "semis_custom");
        assert_relative_eq!(spec.normalized_weight("roic").unwrap(), 0.5);
    }

    #[rstest]
    #[case("better")]
    #[case("up")]
    #[case("")]
    fn test_invalid_polarity(#[case] polarity: &str) {
        let doc = format!("[metrics]\nroic = {{ weight = 1.0, polarity = \"{polarity}\" }}\n");
        let err = parse_weight_spec(&WeightFile::from_toml(&doc).unwrap(), "x").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Scoring(ScoringError::InvalidPolarity { ref metric, .. }) if metric == "roic"
        ));
    }

    #[test]
    fn test_unknown_metric_without_polarity() {
        let doc = "[metrics]\ndau_growth = 1.0\n";
        let err = parse_weight_spec(&WeightFile::from_toml(doc).unwrap(), "x").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Scoring(ScoringError::UnknownMetric(ref m)) if m == "dau_growth"
        ));
    }

    #[rstest]
    #[case("[metrics]\nroic = -0.5\n")]
    #[case("[metrics]\nroic = 0.0\nev_to_fcf = 0.0\n")]
    #[case("[metrics]\n")]
    fn test_invalid_weights_rejected(#[case] doc: &str) {
        let err = parse_weight_spec(&WeightFile::from_toml(doc).unwrap(), "x").unwrap_err();
        assert!(matches!(err, ConfigError::Scoring(_)));
    }

    #[test]
    fn test_missing_metrics_table() {
        assert!(matches!(
            WeightFile::from_toml("name = \"empty\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let path = std::env::temp_dir().join(format!("sieve-weights-{}.yaml", std::process::id()));
        fs::write(&path, "metrics: {}").unwrap();
        assert!(matches!(
            load_weight_spec(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
