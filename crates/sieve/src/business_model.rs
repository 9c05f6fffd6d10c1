//! Business models and their weight maps.
//!
//! The weight maps ship as TOML documents embedded at compile time. Semiconductor
//! sub-sectors share one base map and scale it with per-sub-sector multipliers.

use crate::config::{WeightFile, parse_weight_spec};
use crate::error::ConfigError;
use crate::universe::BusinessModelUniverse;
use serde::{Deserialize, Serialize};
use sieve_scoring::{MetricWeight, ScoringError, WeightSpec};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const AD_PLATFORM: &str = include_str!("../models/ad_platform.toml");
const CLOUD_INFRASTRUCTURE: &str = include_str!("../models/cloud_infrastructure.toml");
const CYBERSECURITY: &str = include_str!("../models/cybersecurity.toml");
const ENTERPRISE_AI: &str = include_str!("../models/enterprise_ai.toml");
const ENTERPRISE_SAAS: &str = include_str!("../models/enterprise_saas.toml");
const HARDWARE_ECOSYSTEM: &str = include_str!("../models/hardware_ecosystem.toml");
const LEGACY_ENTERPRISE: &str = include_str!("../models/legacy_enterprise.toml");
const STREAMING: &str = include_str!("../models/streaming.toml");
const SEMICONDUCTORS: &str = include_str!("../models/semiconductors.toml");
const SEMICONDUCTOR_MODIFIERS: &str = include_str!("../models/semiconductor_modifiers.toml");

/// Semiconductor sub-sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemiconductorSubsector {
    /// Chip designers without fabs
    Fabless,
    /// Contract manufacturers
    Foundry,
    /// Wafer fab equipment makers
    Equipment,
    /// Analog and mixed-signal
    Analog,
    /// Memory and storage
    Memory,
    /// Integrated device manufacturers
    Idm,
}

impl SemiconductorSubsector {
    /// All sub-sectors.
    pub const fn all() -> [Self; 6] {
        [
            Self::Fabless,
            Self::Foundry,
            Self::Equipment,
            Self::Analog,
            Self::Memory,
            Self::Idm,
        ]
    }

    /// Configuration name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fabless => "fabless",
            Self::Foundry => "foundry",
            Self::Equipment => "equipment",
            Self::Analog => "analog",
            Self::Memory => "memory",
            Self::Idm => "idm",
        }
    }

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fabless => "Fabless",
            Self::Foundry => "Foundry",
            Self::Equipment => "Equipment",
            Self::Analog => "Analog",
            Self::Memory => "Memory",
            Self::Idm => "IDM",
        }
    }

    /// Multipliers applied to the semiconductor base weights.
    ///
    /// Empty for IDMs, which use the base weights as they are.
    pub fn modifiers(&self) -> Result<BTreeMap<String, f64>, ConfigError> {
        let mut tables: BTreeMap<String, BTreeMap<String, f64>> =
            toml::from_str(SEMICONDUCTOR_MODIFIERS)?;
        Ok(tables.remove(self.as_str()).unwrap_or_default())
    }
}

impl fmt::Display for SemiconductorSubsector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemiconductorSubsector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|sub| sub.as_str() == key)
            .ok_or_else(|| ConfigError::UnknownBusinessModel(format!("semiconductors:{s}")))
    }
}

/// Semiconductor base weights, before any sub-sector multiplier.
pub fn semiconductor_base_weights() -> Result<WeightSpec, ConfigError> {
    parse_weight_spec(&WeightFile::from_toml(SEMICONDUCTORS)?, "semiconductors")
}

/// Sub-sector of a semiconductor ticker; unknown tickers are treated as IDMs.
pub fn subsector_for(ticker: &str) -> SemiconductorSubsector {
    use SemiconductorSubsector::*;

    match ticker.trim().to_ascii_uppercase().as_str() {
        "NVDA" | "AMD" | "QCOM" | "AVGO" | "MRVL" | "MPWR" | "MCHP" | "QRVO" | "SWKS"
        | "XLNX" | "ARM" | "ARMH" | "SLAB" | "ALGM" | "MTSI" => Fabless,
        "TSM" | "UMC" => Foundry,
        "ASML" | "LRCX" | "KLAC" | "AMAT" | "ENTG" | "MKSI" | "ACLS" | "UCTT" | "ICHR"
        | "COHU" | "FORM" | "ONTO" | "NVMI" | "CAMT" => Equipment,
        "TXN" | "NXPI" | "ADI" | "CRUS" => Analog,
        "MU" | "WDC" | "STX" => Memory,
        _ => Idm,
    }
}

/// Scale base weights by sub-sector multipliers and rescale them to sum to 1.0.
///
/// Metrics without a multiplier keep a factor of 1.0.
pub fn apply_modifier(
    base: &WeightSpec,
    name: &str,
    modifiers: &BTreeMap<String, f64>,
) -> Result<WeightSpec, ScoringError> {
    let scaled: Vec<(&str, MetricWeight)> = base
        .metrics()
        .map(|(metric, w)| {
            let factor = modifiers.get(metric).copied().unwrap_or(1.0);
            (metric, MetricWeight::new(w.polarity, w.weight * factor))
        })
        .collect();
    let total: f64 = scaled.iter().map(|(_, w)| w.weight).sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(ScoringError::AllWeightsZero);
    }
    WeightSpec::new(
        name,
        scaled
            .into_iter()
            .map(|(m, w)| (m, MetricWeight::new(w.polarity, w.weight / total))),
    )
}

/// Business model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessModel {
    /// Advertising-driven platforms
    AdPlatform,
    /// Hyperscale cloud providers
    CloudInfrastructure,
    /// Security software vendors
    Cybersecurity,
    /// Enterprise AI platforms
    EnterpriseAi,
    /// Subscription enterprise software
    EnterpriseSaas,
    /// Device makers monetizing an ecosystem
    HardwareEcosystem,
    /// Mature enterprise IT vendors
    LegacyEnterprise,
    /// Subscription video and audio
    Streaming,
    /// Semiconductor companies of one sub-sector
    Semiconductors(SemiconductorSubsector),
}

impl BusinessModel {
    /// Every selectable business model, including each semiconductor sub-sector.
    pub fn all() -> Vec<Self> {
        let mut models = vec![
            Self::AdPlatform,
            Self::CloudInfrastructure,
            Self::Cybersecurity,
            Self::EnterpriseAi,
            Self::EnterpriseSaas,
            Self::HardwareEcosystem,
            Self::LegacyEnterprise,
            Self::Streaming,
        ];
        models.extend(SemiconductorSubsector::all().map(Self::Semiconductors));
        models
    }

    /// Configuration name, e.g. `cloud_infrastructure` or `semiconductors:fabless`.
    pub fn key(&self) -> String {
        match self {
            Self::Semiconductors(sub) => format!("semiconductors:{sub}"),
            other => other.base_key().to_string(),
        }
    }

    const fn base_key(&self) -> &'static str {
        match self {
            Self::AdPlatform => "ad_platform",
            Self::CloudInfrastructure => "cloud_infrastructure",
            Self::Cybersecurity => "cybersecurity",
            Self::EnterpriseAi => "enterprise_ai",
            Self::EnterpriseSaas => "enterprise_saas",
            Self::HardwareEcosystem => "hardware_ecosystem",
            Self::LegacyEnterprise => "legacy_enterprise",
            Self::Streaming => "streaming",
            Self::Semiconductors(_) => "semiconductors",
        }
    }

    /// Display name.
    pub fn name(&self) -> String {
        match self {
            Self::AdPlatform => "Ad Platform".into(),
            Self::CloudInfrastructure => "Cloud Infrastructure".into(),
            Self::Cybersecurity => "Cybersecurity".into(),
            Self::EnterpriseAi => "Enterprise AI".into(),
            Self::EnterpriseSaas => "Enterprise SaaS".into(),
            Self::HardwareEcosystem => "Hardware Ecosystem".into(),
            Self::LegacyEnterprise => "Legacy Enterprise".into(),
            Self::Streaming => "Streaming".into(),
            Self::Semiconductors(sub) => format!("Semiconductors ({})", sub.name()),
        }
    }

    const fn document(&self) -> &'static str {
        match self {
            Self::AdPlatform => AD_PLATFORM,
            Self::CloudInfrastructure => CLOUD_INFRASTRUCTURE,
            Self::Cybersecurity => CYBERSECURITY,
            Self::EnterpriseAi => ENTERPRISE_AI,
            Self::EnterpriseSaas => ENTERPRISE_SAAS,
            Self::HardwareEcosystem => HARDWARE_ECOSYSTEM,
            Self::LegacyEnterprise => LEGACY_ENTERPRISE,
            Self::Streaming => STREAMING,
            Self::Semiconductors(_) => SEMICONDUCTORS,
        }
    }

    /// Parsed weight file behind this model.
    pub fn weight_file(&self) -> Result<WeightFile, ConfigError> {
        WeightFile::from_toml(self.document())
    }

    /// One-line investment thesis.
    pub fn description(&self) -> Option<String> {
        self.weight_file().ok().and_then(|f| f.description)
    }

    /// Validated weight map.
    pub fn weight_spec(&self) -> Result<WeightSpec, ConfigError> {
        let base = parse_weight_spec(&self.weight_file()?, self.base_key())?;
        match self {
            Self::Semiconductors(sub) => Ok(apply_modifier(&base, &self.key(), &sub.modifiers()?)?),
            _ => Ok(base),
        }
    }

    /// Default universe of the model.
    pub fn default_universe(&self) -> BusinessModelUniverse {
        BusinessModelUniverse::for_model(*self)
    }
}

impl fmt::Display for BusinessModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for BusinessModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        if let Some(sub) = key.strip_prefix("semiconductors:") {
            return sub.parse().map(Self::Semiconductors);
        }
        match key.as_str() {
            "ad_platform" => Ok(Self::AdPlatform),
            "cloud_infrastructure" => Ok(Self::CloudInfrastructure),
            "cybersecurity" => Ok(Self::Cybersecurity),
            "enterprise_ai" => Ok(Self::EnterpriseAi),
            "enterprise_saas" => Ok(Self::EnterpriseSaas),
            "hardware_ecosystem" => Ok(Self::HardwareEcosystem),
            "legacy_enterprise" => Ok(Self::LegacyEnterprise),
            "streaming" => Ok(Self::Streaming),
            "semiconductors" => Ok(Self::Semiconductors(SemiconductorSubsector::Idm)),
            _ => Err(ConfigError::UnknownBusinessModel(s.to_string())),
        }
    }
}
