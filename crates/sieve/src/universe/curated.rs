//! Curated peer groups per business model.

use crate::business_model::{BusinessModel, SemiconductorSubsector};
use std::collections::BTreeSet;

const AD_PLATFORM: &[&str] = &["META", "GOOGL", "PINS", "SNAP"];

const CLOUD_INFRASTRUCTURE: &[&str] = &["AMZN", "MSFT", "GOOGL", "IBM", "ORCL"];

const FOUNDRIES: &[&str] = &["TSM", "UMC"];

const FABLESS: &[&str] = &[
    "NVDA", "AMD", "QCOM", "AVGO", "MRVL", "MPWR", "MCHP", "QRVO", "SWKS", "ARM", "SLAB", "ALGM",
    "MTSI", "CRUS", "SIMO", "MXL", "RMBS",
];

const EQUIPMENT: &[&str] = &[
    "ASML", "LRCX", "KLAC", "AMAT", "ENTG", "MKSI", "ACLS", "UCTT", "ICHR", "COHU", "FORM", "ONTO",
    "NVMI", "CAMT",
];

const ANALOG: &[&str] = &["TXN", "NXPI", "ADI", "CRUS"];

const IDMS: &[&str] = &["INTC", "TXN", "NXPI", "STM", "ADI", "ON", "MU", "WOLF"];

const MEMORY: &[&str] = &["MU", "WDC", "STX"];

/// Tickers screened for a business model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessModelUniverse {
    model: Option<BusinessModel>,
    tickers: Vec<String>,
}

impl BusinessModelUniverse {
    /// Curated default universe of a business model.
    ///
    /// Empty for models without a curated peer group.
    pub fn for_model(model: BusinessModel) -> Self {
        let tickers: &[&str] = match model {
            BusinessModel::AdPlatform => AD_PLATFORM,
            BusinessModel::CloudInfrastructure => CLOUD_INFRASTRUCTURE,
            BusinessModel::Semiconductors(sub) => match sub {
                SemiconductorSubsector::Fabless => FABLESS,
                SemiconductorSubsector::Foundry => FOUNDRIES,
                SemiconductorSubsector::Equipment => EQUIPMENT,
                SemiconductorSubsector::Analog => ANALOG,
                SemiconductorSubsector::Memory => MEMORY,
                SemiconductorSubsector::Idm => IDMS,
            },
            _ => &[],
        };
        Self {
            model: Some(model),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Universe from an explicit ticker list.
    ///
    /// Tickers are trimmed and upper-cased; blanks and repeats are dropped.
    pub fn custom<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let tickers = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();
        Self {
            model: None,
            tickers,
        }
    }

    /// Every curated semiconductor ticker, sorted and deduplicated.
    pub fn all_semiconductors() -> Self {
        let tickers: BTreeSet<&str> = [FOUNDRIES, FABLESS, EQUIPMENT, ANALOG, IDMS, MEMORY]
            .into_iter()
            .flatten()
            .copied()
            .collect();
        Self {
            model: None,
            tickers: tickers.into_iter().map(String::from).collect(),
        }
    }

    /// Business model the universe was curated for.
    pub const fn model(&self) -> Option<BusinessModel> {
        self.model
    }

    /// Tickers in curated order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Whether the universe lists no ticker, meaning "whatever the source has".
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
