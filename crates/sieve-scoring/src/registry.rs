//! Metric Registry
//!
//! Catalogue of every metric the screener knows how to weigh. Weight files may
//! omit the polarity of a registered metric; the registry supplies it.

use crate::weights::Polarity;
use std::collections::HashMap;

/// Available metric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricCategory {
    /// Valuation metrics (EV/FCF, FCF yield)
    Valuation,
    /// Growth metrics (revenue CAGR, ARPU CAGR)
    Growth,
    /// Profitability metrics (margins, rule of 40)
    Profitability,
    /// Balance sheet metrics (net debt, interest coverage)
    Leverage,
    /// Capital efficiency metrics (ROIC, CapEx intensity)
    CapitalEfficiency,
    /// Operating structure metrics (R&D and S&M intensity, revenue volatility)
    Operating,
    /// Monetization metrics (services mix, incremental margin)
    Monetization,
}

impl MetricCategory {
    /// Display name of the category.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Valuation => "Valuation",
            Self::Growth => "Growth",
            Self::Profitability => "Profitability",
            Self::Leverage => "Leverage",
            Self::CapitalEfficiency => "Capital Efficiency",
            Self::Operating => "Operating",
            Self::Monetization => "Monetization",
        }
    }

    /// All categories.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Valuation,
            Self::Growth,
            Self::Profitability,
            Self::Leverage,
            Self::CapitalEfficiency,
            Self::Operating,
            Self::Monetization,
        ]
    }

    /// Parse a category from its display or snake_case name.
    pub fn parse(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::all()
            .into_iter()
            .find(|c| c.name().to_ascii_lowercase().replace(' ', "_") == key)
    }
}

/// Metric metadata
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric key (unique identifier, as used in tables and weight maps)
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Metric category
    pub category: MetricCategory,
    /// Direction in which the metric improves
    pub polarity: Polarity,
    /// Brief description of what the metric measures
    pub description: &'static str,
}

/// Get all available metric info
pub fn available_metrics() -> Vec<MetricInfo> {
    use MetricCategory::*;
    use Polarity::{HigherIsBetter as Higher, LowerIsBetter as Lower};

    vec![
        // Core metrics
        MetricInfo {
            key: "ev_to_fcf",
            name: "EV/FCF",
            category: Valuation,
            polarity: Lower,
            description: "Enterprise value over free cash flow; cash burners get a penalty multiple",
        },
        MetricInfo {
            key: "revenue_cagr",
            name: "Revenue CAGR",
            category: Growth,
            polarity: Higher,
            description: "Compound annual revenue growth over the available history (%)",
        },
        MetricInfo {
            key: "operating_margin",
            name: "Operating Margin",
            category: Profitability,
            polarity: Higher,
            description: "Operating income over revenue (%)",
        },
        MetricInfo {
            key: "fcf_margin",
            name: "FCF Margin",
            category: Profitability,
            polarity: Higher,
            description: "Free cash flow over revenue (%)",
        },
        MetricInfo {
            key: "net_debt_to_ebitda",
            name: "Net Debt/EBITDA",
            category: Leverage,
            polarity: Lower,
            description: "Total debt less cash over EBITDA; undefined for non-positive EBITDA",
        },
        MetricInfo {
            key: "interest_coverage",
            name: "Interest Coverage",
            category: Leverage,
            polarity: Higher,
            description: "EBIT over interest expense; not applicable with negligible leverage",
        },
        // Industry metrics
        MetricInfo {
            key: "gross_margin",
            name: "Gross Margin",
            category: Profitability,
            polarity: Higher,
            description: "Gross profit over revenue (%)",
        },
        MetricInfo {
            key: "roic",
            name: "ROIC",
            category: CapitalEfficiency,
            polarity: Higher,
            description: "After-tax operating profit over invested capital (%)",
        },
        MetricInfo {
            key: "capex_intensity",
            name: "CapEx Intensity",
            category: CapitalEfficiency,
            polarity: Lower,
            description: "Capital expenditures over revenue (%)",
        },
        MetricInfo {
            key: "inventory_turnover",
            name: "Inventory Turnover",
            category: Operating,
            polarity: Higher,
            description: "Cost of revenue over inventory",
        },
        MetricInfo {
            key: "rnd_intensity",
            name: "R&D Intensity",
            category: Operating,
            polarity: Higher,
            description: "Research and development expense over revenue (%)",
        },
        MetricInfo {
            key: "net_debt_to_fcf",
            name: "Net Debt/FCF",
            category: Leverage,
            polarity: Lower,
            description: "Total debt less cash over positive free cash flow",
        },
        // Shared business-model metrics
        MetricInfo {
            key: "revenue_per_employee",
            name: "Revenue per Employee ($K)",
            category: Operating,
            polarity: Higher,
            description: "Revenue over headcount, in thousands",
        },
        MetricInfo {
            key: "rule_of_40",
            name: "Rule of 40",
            category: Profitability,
            polarity: Higher,
            description: "Revenue growth plus FCF margin (percentage points)",
        },
        MetricInfo {
            key: "incremental_margin",
            name: "Incremental Margin",
            category: Monetization,
            polarity: Higher,
            description: "Change in operating income over change in revenue",
        },
        MetricInfo {
            key: "arpu_cagr",
            name: "ARPU CAGR",
            category: Growth,
            polarity: Higher,
            description: "Compound annual growth of average revenue per user (%)",
        },
        // Business-model specific metrics
        MetricInfo {
            key: "revenue_per_capex",
            name: "Revenue/CapEx",
            category: CapitalEfficiency,
            polarity: Higher,
            description: "Revenue generated per dollar of capital expenditure",
        },
        MetricInfo {
            key: "operating_margin_trend",
            name: "Op Margin Trend",
            category: Profitability,
            polarity: Higher,
            description: "Change in operating margin over three years (percentage points)",
        },
        MetricInfo {
            key: "revenue_volatility",
            name: "Revenue Volatility (%)",
            category: Operating,
            polarity: Lower,
            description: "Standard deviation of year-over-year revenue growth",
        },
        MetricInfo {
            key: "fcf_yield",
            name: "FCF Yield (%)",
            category: Valuation,
            polarity: Higher,
            description: "Free cash flow over market capitalization (%)",
        },
        MetricInfo {
            key: "sales_marketing_intensity",
            name: "Sales & Marketing Intensity",
            category: Operating,
            polarity: Lower,
            description: "Sales and marketing expense over revenue (%)",
        },
        MetricInfo {
            key: "content_spend_intensity",
            name: "Content Spend Intensity",
            category: Operating,
            polarity: Lower,
            description: "Content spend over revenue (%)",
        },
        MetricInfo {
            key: "services_revenue_mix",
            name: "Services Revenue Mix",
            category: Monetization,
            polarity: Higher,
            description: "Services revenue over total revenue (%)",
        },
    ]
}

/// Get metrics by category
pub fn metrics_by_category(category: MetricCategory) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|m| m.category == category)
        .collect()
}

/// Get metric info by key
pub fn get_metric_info(key: &str) -> Option<MetricInfo> {
    available_metrics().into_iter().find(|m| m.key == key)
}

/// Registered polarity of a metric
pub fn default_polarity(key: &str) -> Option<Polarity> {
    get_metric_info(key).map(|m| m.polarity)
}

/// Get a map of all metrics indexed by key
pub fn metric_map() -> HashMap<&'static str, MetricInfo> {
    available_metrics()
        .into_iter()
        .map(|m| (m.key, m))
        .collect()
}

/// List all metric keys
pub fn list_metric_keys() -> Vec<&'static str> {
    available_metrics().into_iter().map(|m| m.key).collect()
}

/// Count metrics by category
pub fn count_by_category() -> HashMap<MetricCategory, usize> {
    let mut counts = HashMap::new();
    for metric in available_metrics() {
        *counts.entry(metric.category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_available_metrics_count() {
        assert_eq!(available_metrics().len(), 23);
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = list_metric_keys().into_iter().collect();
        assert_eq!(keys.len(), available_metrics().len());
    }

    #[test]
    fn test_metrics_by_category() {
        assert_eq!(metrics_by_category(MetricCategory::Valuation).len(), 2);
        assert_eq!(metrics_by_category(MetricCategory::Growth).len(), 2);
        assert_eq!(metrics_by_category(MetricCategory::Leverage).len(), 3);
        assert_eq!(metrics_by_category(MetricCategory::CapitalEfficiency).len(), 3);
    }

    #[test]
    fn test_get_metric_info() {
        let ev = get_metric_info("ev_to_fcf").unwrap();
        assert_eq!(ev.name, "EV/FCF");
        assert_eq!(ev.polarity, Polarity::LowerIsBetter);

        assert!(get_metric_info("nonexistent_metric").is_none());
    }

    #[test]
    fn test_default_polarity() {
        assert_eq!(default_polarity("revenue_cagr"), Some(Polarity::HigherIsBetter));
        assert_eq!(default_polarity("capex_intensity"), Some(Polarity::LowerIsBetter));
        assert_eq!(default_polarity("revenue_volatility"), Some(Polarity::LowerIsBetter));
        assert_eq!(default_polarity("dau"), None);
    }

    #[test]
    fn test_metric_map() {
        let map = metric_map();
        assert!(map.contains_key("roic"));
        assert!(map.contains_key("rule_of_40"));
    }

    #[test]
    fn test_count_by_category_totals() {
        let total: usize = count_by_category().values().sum();
        assert_eq!(total, available_metrics().len());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(MetricCategory::parse("capital_efficiency"), Some(MetricCategory::CapitalEfficiency));
        assert_eq!(MetricCategory::parse("Capital Efficiency"), Some(MetricCategory::CapitalEfficiency));
        assert_eq!(MetricCategory::parse("valuation"), Some(MetricCategory::Valuation));
        assert_eq!(MetricCategory::parse("momentum"), None);
    }
}
