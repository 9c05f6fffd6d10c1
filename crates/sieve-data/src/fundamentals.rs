//! Fundamentals
//!
//! Raw per-company financial statement figures and the pure functions that turn
//! them into screening metrics. Every derivation returns `None` when the result
//! is undefined (missing input, non-positive denominator, non-finite
//! arithmetic) so that the scoring engine sees an absent value instead of a
//! misleading zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// EV/FCF assigned to companies that burn cash.
///
/// Keeps cash burners in the ranking with the worst plausible valuation instead
/// of dropping the metric.
pub const CASH_BURN_EV_TO_FCF: f64 = 100.0;

/// Debt/EBITDA below which interest coverage is not meaningful.
pub const NEGLIGIBLE_LEVERAGE: f64 = 0.5;

/// Years looked back by trend metrics.
pub const TREND_YEARS: usize = 3;

/// Minimum number of year-over-year growth observations for revenue volatility.
pub const MIN_GROWTH_OBSERVATIONS: usize = 3;

/// Financial statement figures for one company.
///
/// All point-in-time figures are trailing annual values in the reporting
/// currency. Histories are annual and ordered oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fundamentals {
    /// Enterprise value
    pub enterprise_value: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Total revenue
    pub revenue: Option<f64>,
    /// Gross profit
    pub gross_profit: Option<f64>,
    /// Cost of revenue
    pub cost_of_revenue: Option<f64>,
    /// Operating income
    pub operating_income: Option<f64>,
    /// Earnings before interest and taxes
    pub ebit: Option<f64>,
    /// Earnings before interest, taxes, depreciation and amortization
    pub ebitda: Option<f64>,
    /// Interest expense, as a positive number
    pub interest_expense: Option<f64>,
    /// Free cash flow
    pub free_cash_flow: Option<f64>,
    /// Capital expenditures (sign ignored)
    pub capex: Option<f64>,
    /// Total debt
    pub total_debt: Option<f64>,
    /// Cash and equivalents
    pub cash: Option<f64>,
    /// Inventory
    pub inventory: Option<f64>,
    /// Research and development expense
    pub rnd_expense: Option<f64>,
    /// Sales and marketing expense
    pub sales_marketing_expense: Option<f64>,
    /// Content spend (amortization plus cash content payments)
    pub content_spend: Option<f64>,
    /// Revenue from services
    pub services_revenue: Option<f64>,
    /// Full-time employees
    pub employees: Option<f64>,
    /// Net operating profit after tax
    pub nopat: Option<f64>,
    /// Invested capital
    pub invested_capital: Option<f64>,
    /// Annual revenue history
    pub annual_revenue: Vec<f64>,
    /// Annual operating income history
    pub annual_operating_income: Vec<f64>,
    /// Annual active users history
    pub annual_active_users: Vec<f64>,
}

impl Fundamentals {
    /// Derive every registered metric from these figures.
    pub fn derive(&self) -> BTreeMap<&'static str, Option<f64>> {
        derive_metrics(self)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let d = denominator.filter(|d| *d > 0.0)?;
    finite(numerator? / d)
}

/// Tails of two series with equal length, so that the last elements line up.
fn aligned<'a>(a: &'a [f64], b: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    let n = a.len().min(b.len());
    a[a.len() - n..]
        .iter()
        .copied()
        .zip(b[b.len() - n..].iter().copied())
}

/// Share of positive revenue, in percent.
pub fn percent_of_revenue(amount: Option<f64>, revenue: Option<f64>) -> Option<f64> {
    ratio(amount, revenue).map(|r| r * 100.0)
}

/// Compound annual growth rate of an annual series, in percent.
///
/// Spans the whole series; needs at least two points and a positive start.
pub fn cagr(series: &[f64]) -> Option<f64> {
    let (&first, &last) = (series.first()?, series.last()?);
    let years = series.len().checked_sub(1).filter(|y| *y > 0)?;
    if first <= 0.0 || last < 0.0 {
        return None;
    }
    finite(((last / first).powf(1.0 / years as f64) - 1.0) * 100.0)
}

/// Enterprise value over free cash flow.
///
/// Non-positive FCF yields [`CASH_BURN_EV_TO_FCF`].
pub fn ev_to_fcf(enterprise_value: Option<f64>, free_cash_flow: Option<f64>) -> Option<f64> {
    let ev = enterprise_value.filter(|ev| *ev != 0.0)?;
    let fcf = free_cash_flow?;
    if fcf > 0.0 {
        finite(ev / fcf)
    } else {
        Some(CASH_BURN_EV_TO_FCF)
    }
}

/// Net debt over EBITDA; undefined for non-positive EBITDA.
pub fn net_debt_to_ebitda(
    total_debt: Option<f64>,
    cash: Option<f64>,
    ebitda: Option<f64>,
) -> Option<f64> {
    ratio(Some(total_debt? - cash?), ebitda)
}

/// Net debt over positive free cash flow.
pub fn net_debt_to_fcf(
    total_debt: Option<f64>,
    cash: Option<f64>,
    free_cash_flow: Option<f64>,
) -> Option<f64> {
    ratio(Some(total_debt? - cash?), free_cash_flow)
}

/// EBIT over interest expense.
///
/// Not applicable, and therefore absent, when debt is below
/// [`NEGLIGIBLE_LEVERAGE`] times EBITDA.
pub fn interest_coverage(
    ebit: Option<f64>,
    interest_expense: Option<f64>,
    total_debt: Option<f64>,
    ebitda: Option<f64>,
) -> Option<f64> {
    if let Some(leverage) = ratio(total_debt, ebitda)
        && leverage < NEGLIGIBLE_LEVERAGE
    {
        return None;
    }
    ratio(ebit, interest_expense)
}

/// Return on invested capital, in percent.
pub fn roic(nopat: Option<f64>, invested_capital: Option<f64>) -> Option<f64> {
    ratio(nopat, invested_capital).map(|r| r * 100.0)
}

/// Cost of revenue over inventory.
pub fn inventory_turnover(cost_of_revenue: Option<f64>, inventory: Option<f64>) -> Option<f64> {
    ratio(cost_of_revenue, inventory)
}

/// Revenue per employee, in thousands.
pub fn revenue_per_employee(revenue: Option<f64>, employees: Option<f64>) -> Option<f64> {
    let revenue = revenue.filter(|r| *r > 0.0)?;
    ratio(Some(revenue), employees).map(|r| r / 1_000.0)
}

/// Revenue per unit of capital expenditure.
pub fn revenue_per_capex(revenue: Option<f64>, capex: Option<f64>) -> Option<f64> {
    ratio(revenue, capex.map(f64::abs))
}

/// Free cash flow over market capitalization, in percent.
pub fn fcf_yield(free_cash_flow: Option<f64>, market_cap: Option<f64>) -> Option<f64> {
    ratio(free_cash_flow, market_cap).map(|r| r * 100.0)
}

/// Change in operating margin over [`TREND_YEARS`], in percentage points.
///
/// Uses the oldest available year when the history is shorter.
pub fn operating_margin_trend(revenue: &[f64], operating_income: &[f64]) -> Option<f64> {
    let margins: Vec<Option<f64>> = aligned(revenue, operating_income)
        .map(|(r, oi)| percent_of_revenue(Some(oi), Some(r)))
        .collect();
    let latest = (*margins.last()?)?;
    let back = TREND_YEARS.min(margins.len().checked_sub(1)?);
    if back == 0 {
        return None;
    }
    let past = margins[margins.len() - 1 - back]?;
    finite(latest - past)
}

/// Change in operating income over change in revenue for the latest year.
///
/// Only defined when revenue grew.
pub fn incremental_margin(revenue: &[f64], operating_income: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = aligned(revenue, operating_income).collect();
    let [.., (rev_prior, oi_prior), (rev_current, oi_current)] = pairs.as_slice() else {
        return None;
    };
    let revenue_change = rev_current - rev_prior;
    if revenue_change <= 0.0 {
        return None;
    }
    finite((oi_current - oi_prior) / revenue_change)
}

/// Population standard deviation of year-over-year revenue growth, in percent.
pub fn revenue_volatility(revenue: &[f64]) -> Option<f64> {
    let growth: Vec<f64> = revenue
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|g| g.is_finite())
        .collect();
    if growth.len() < MIN_GROWTH_OBSERVATIONS {
        return None;
    }
    let n = growth.len() as f64;
    let mean = growth.iter().sum::<f64>() / n;
    let variance = growth.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
    finite(variance.sqrt() * 100.0)
}

/// Revenue growth plus FCF margin, both in percent.
pub fn rule_of_40(revenue_cagr: Option<f64>, fcf_margin: Option<f64>) -> Option<f64> {
    finite(revenue_cagr? + fcf_margin?)
}

/// Growth of average revenue per user over the last [`TREND_YEARS`], in percent.
pub fn arpu_cagr(revenue: &[f64], active_users: &[f64]) -> Option<f64> {
    let arpu: Vec<f64> = aligned(revenue, active_users)
        .map(|(r, u)| if r > 0.0 && u > 0.0 { r / u } else { f64::NAN })
        .collect();
    let window = &arpu[arpu.len().saturating_sub(TREND_YEARS + 1)..];
    if window.iter().any(|a| !a.is_finite()) {
        return None;
    }
    cagr(window)
}

/// Derive every registered metric from raw fundamentals.
pub fn derive_metrics(f: &Fundamentals) -> BTreeMap<&'static str, Option<f64>> {
    let revenue = f.revenue.or_else(|| f.annual_revenue.last().copied());
    let revenue_cagr = cagr(&f.annual_revenue);
    let fcf_margin = percent_of_revenue(f.free_cash_flow, revenue);
    let gross_profit = f
        .gross_profit
        .or_else(|| Some(revenue? - f.cost_of_revenue?));

    BTreeMap::from([
        ("ev_to_fcf", ev_to_fcf(f.enterprise_value, f.free_cash_flow)),
        ("revenue_cagr", revenue_cagr),
        ("operating_margin", percent_of_revenue(f.operating_income, revenue)),
        ("fcf_margin", fcf_margin),
        ("net_debt_to_ebitda", net_debt_to_ebitda(f.total_debt, f.cash, f.ebitda)),
        (
            "interest_coverage",
            interest_coverage(f.ebit, f.interest_expense, f.total_debt, f.ebitda),
        ),
        ("gross_margin", percent_of_revenue(gross_profit, revenue)),
        ("roic", roic(f.nopat, f.invested_capital)),
        ("capex_intensity", percent_of_revenue(f.capex.map(f64::abs), revenue)),
        ("inventory_turnover", inventory_turnover(f.cost_of_revenue, f.inventory)),
        ("rnd_intensity", percent_of_revenue(f.rnd_expense, revenue)),
        ("net_debt_to_fcf", net_debt_to_fcf(f.total_debt, f.cash, f.free_cash_flow)),
        ("revenue_per_employee", revenue_per_employee(revenue, f.employees)),
        ("rule_of_40", rule_of_40(revenue_cagr, fcf_margin)),
        (
            "incremental_margin",
            incremental_margin(&f.annual_revenue, &f.annual_operating_income),
        ),
        ("arpu_cagr", arpu_cagr(&f.annual_revenue, &f.annual_active_users)),
        ("revenue_per_capex", revenue_per_capex(revenue, f.capex)),
        (
            "operating_margin_trend",
            operating_margin_trend(&f.annual_revenue, &f.annual_operating_income),
        ),
        ("revenue_volatility", revenue_volatility(&f.annual_revenue)),
        ("fcf_yield", fcf_yield(f.free_cash_flow, f.market_cap)),
        (
            "sales_marketing_intensity",
            percent_of_revenue(f.sales_marketing_expense, revenue),
        ),
        ("content_spend_intensity", percent_of_revenue(f.content_spend, revenue)),
        ("services_revenue_mix", percent_of_revenue(f.services_revenue, revenue)),
    ])
}
