//! The ratio panel computed from a [`Statement`].
//!
//! Every metric is a single division (or a passthrough). Which result a zero
//! denominator produces is decided by one [`DivisionPolicy`] for the whole
//! panel, growth rates included.

use super::error::DivisionFault;
use super::statement::{Comparative, CompanyIdentity, Statement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const DAYS_IN_YEAR: f64 = 365.0;

/// What a zero denominator turns into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionPolicy {
    /// The metric is reported as exactly `0`.
    #[default]
    Guarded,
    /// The computation aborts with a [`DivisionFault`] naming the metric.
    Propagate,
}

/// Names of the metrics in a [`MetricPanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    // Results, current period
    Revenue,
    CostOfRevenue,
    GrossProfit,
    OperatingIncome,
    EarningsBeforeTax,
    NetIncome,

    // Growth against the previous period, in percent
    RevenueGrowth,
    CostOfRevenueGrowth,
    GrossProfitGrowth,
    OperatingIncomeGrowth,
    EarningsBeforeTaxGrowth,
    NetIncomeGrowth,

    // Profitability, in percent
    Ros,
    Roa,
    Roe,

    // Liquidity
    CurrentRatio,
    QuickRatio,
    CashRatio,
    DefensiveIntervalRatio,

    // Solvency
    EquityToTotalAssets,
    DebtRatio,
    DebtToEquityRatio,
    ModifiedFinancialIndependenceRatio,
    InterestCoverageRatio,

    // Turnover
    AssetsTurnoverRatio,
    PpeTurnoverRatio,
}

impl Metric {
    pub const ALL: [Metric; 26] = [
        Metric::Revenue,
        Metric::CostOfRevenue,
        Metric::GrossProfit,
        Metric::OperatingIncome,
        Metric::EarningsBeforeTax,
        Metric::NetIncome,
        Metric::RevenueGrowth,
        Metric::CostOfRevenueGrowth,
        Metric::GrossProfitGrowth,
        Metric::OperatingIncomeGrowth,
        Metric::EarningsBeforeTaxGrowth,
        Metric::NetIncomeGrowth,
        Metric::Ros,
        Metric::Roa,
        Metric::Roe,
        Metric::CurrentRatio,
        Metric::QuickRatio,
        Metric::CashRatio,
        Metric::DefensiveIntervalRatio,
        Metric::EquityToTotalAssets,
        Metric::DebtRatio,
        Metric::DebtToEquityRatio,
        Metric::ModifiedFinancialIndependenceRatio,
        Metric::InterestCoverageRatio,
        Metric::AssetsTurnoverRatio,
        Metric::PpeTurnoverRatio,
    ];

    /// Key of the metric in the flat panel namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::CostOfRevenue => "cost_of_revenue",
            Metric::GrossProfit => "gross_profit",
            Metric::OperatingIncome => "operating_income",
            Metric::EarningsBeforeTax => "earnings_before_tax",
            Metric::NetIncome => "net_income",
            Metric::RevenueGrowth => "revenue_growth",
            Metric::CostOfRevenueGrowth => "cost_of_revenue_growth",
            Metric::GrossProfitGrowth => "gross_profit_growth",
            Metric::OperatingIncomeGrowth => "operating_income_growth",
            Metric::EarningsBeforeTaxGrowth => "earnings_before_tax_growth",
            Metric::NetIncomeGrowth => "net_income_growth",
            Metric::Ros => "ros",
            Metric::Roa => "roa",
            Metric::Roe => "roe",
            Metric::CurrentRatio => "current_ratio",
            Metric::QuickRatio => "quick_ratio",
            Metric::CashRatio => "cash_ratio",
            Metric::DefensiveIntervalRatio => "defensive_interval_ratio",
            Metric::EquityToTotalAssets => "equity_to_total_assets",
            Metric::DebtRatio => "debt_ratio",
            Metric::DebtToEquityRatio => "debt_to_equity_ratio",
            Metric::ModifiedFinancialIndependenceRatio => "modified_financial_independence_ratio",
            Metric::InterestCoverageRatio => "interest_coverage_ratio",
            Metric::AssetsTurnoverRatio => "assets_turnover_ratio",
            Metric::PpeTurnoverRatio => "ppe_turnover_ratio",
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The computed metrics for one statement, with the filer's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPanel {
    #[serde(flatten)]
    pub identity: CompanyIdentity,
    #[serde(flatten)]
    metrics: BTreeMap<Metric, f64>,
}

impl MetricPanel {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    /// Looks a metric up by its snake_case key, e.g. `"debt_ratio"`.
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        Metric::from_name(name).and_then(|m| self.get(m))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.metrics.iter().map(|(m, v)| (*m, *v))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.identity.company_name.as_deref()
    }

    pub fn inn(&self) -> Option<&str> {
        self.identity.inn.as_deref()
    }

    pub fn period(&self) -> Option<&str> {
        self.identity.period.as_deref()
    }
}

/// Applies the division policy to each formula and collects the results.
struct PanelBuilder {
    policy: DivisionPolicy,
    metrics: BTreeMap<Metric, f64>,
}

impl PanelBuilder {
    fn new(policy: DivisionPolicy) -> Self {
        Self {
            policy,
            metrics: BTreeMap::new(),
        }
    }

    fn value(&mut self, metric: Metric, value: f64) -> &mut Self {
        self.metrics.insert(metric, value);
        self
    }

    fn ratio(
        &mut self,
        metric: Metric,
        numerator: f64,
        denominator: f64,
    ) -> Result<&mut Self, DivisionFault> {
        let value = self.divide(metric, numerator, denominator)?;
        Ok(self.value(metric, value))
    }

    fn percent(
        &mut self,
        metric: Metric,
        numerator: f64,
        denominator: f64,
    ) -> Result<&mut Self, DivisionFault> {
        let value = self.divide(metric, numerator, denominator)? * 100.0;
        Ok(self.value(metric, value))
    }

    fn growth(&mut self, metric: Metric, line: Comparative) -> Result<&mut Self, DivisionFault> {
        let value = if line.previous == 0.0 {
            self.on_zero(metric)?
        } else {
            (line.current / line.previous - 1.0) * 100.0
        };
        Ok(self.value(metric, value))
    }

    fn divide(&self, metric: Metric, numerator: f64, denominator: f64) -> Result<f64, DivisionFault> {
        if denominator == 0.0 {
            self.on_zero(metric)
        } else {
            Ok(numerator / denominator)
        }
    }

    fn on_zero(&self, metric: Metric) -> Result<f64, DivisionFault> {
        match self.policy {
            DivisionPolicy::Guarded => Ok(0.0),
            DivisionPolicy::Propagate => Err(DivisionFault {
                metric: metric.as_str().to_string(),
            }),
        }
    }

    fn finish(self, identity: CompanyIdentity) -> MetricPanel {
        MetricPanel {
            identity,
            metrics: self.metrics,
        }
    }
}

/// Computes the full panel with [`DivisionPolicy::Guarded`]. Never fails.
pub fn compute_metrics(statement: &Statement) -> MetricPanel {
    match compute_metrics_with(statement, DivisionPolicy::Guarded) {
        Ok(panel) => panel,
        Err(_) => unreachable!("guarded division never faults"),
    }
}

/// Computes the full panel under the given division policy.
///
/// # Errors
///
/// With `DivisionPolicy::Propagate`, returns the first [`DivisionFault`] met.
/// No partial panel is returned.
pub fn compute_metrics_with(
    statement: &Statement,
    policy: DivisionPolicy,
) -> Result<MetricPanel, DivisionFault> {
    let s = statement;
    let mut panel = PanelBuilder::new(policy);

    panel
        .value(Metric::Revenue, s.revenue.current)
        .value(Metric::CostOfRevenue, s.cost_of_revenue.current)
        .value(Metric::GrossProfit, s.gross_profit.current)
        .value(Metric::OperatingIncome, s.operating_income.current)
        .value(Metric::EarningsBeforeTax, s.earnings_before_tax.current)
        .value(Metric::NetIncome, s.net_income.current);

    panel
        .growth(Metric::RevenueGrowth, s.revenue)?
        .growth(Metric::CostOfRevenueGrowth, s.cost_of_revenue)?
        .growth(Metric::GrossProfitGrowth, s.gross_profit)?
        .growth(Metric::OperatingIncomeGrowth, s.operating_income)?
        .growth(Metric::EarningsBeforeTaxGrowth, s.earnings_before_tax)?
        .growth(Metric::NetIncomeGrowth, s.net_income)?;

    let avg_assets = s.total_assets.average();
    let avg_equity = s.equity.average();
    panel
        .percent(Metric::Ros, s.operating_income.current, s.revenue.current)?
        .percent(Metric::Roa, s.net_income.current, avg_assets)?
        .percent(Metric::Roe, s.net_income.current, avg_equity)?;

    let quick_assets = s.cash + s.short_term_investments + s.receivables;
    let daily_expenses = (s.cost_of_revenue.current
        + s.selling_expenses
        + s.administrative_expenses
        + s.interest_expense
        + s.other_expenses
        + s.tax_provision)
        / DAYS_IN_YEAR;
    panel
        .ratio(Metric::CurrentRatio, s.current_assets, s.current_liabilities)?
        .ratio(Metric::QuickRatio, quick_assets, s.current_liabilities)?
        .ratio(Metric::CashRatio, s.cash, s.current_liabilities)?
        .ratio(Metric::DefensiveIntervalRatio, s.current_assets, daily_expenses)?;

    let total_debt = s.current_liabilities + s.non_current_liabilities;
    panel
        .ratio(Metric::EquityToTotalAssets, s.equity.current, s.total_assets.current)?
        .ratio(Metric::DebtRatio, total_debt, s.total_assets.current)?
        .ratio(Metric::DebtToEquityRatio, total_debt, s.equity.current)?
        .ratio(
            Metric::ModifiedFinancialIndependenceRatio,
            s.equity.current + s.non_current_liabilities,
            s.total_assets.current,
        )?
        .ratio(
            Metric::InterestCoverageRatio,
            s.operating_income.current,
            s.interest_expense,
        )?;

    panel
        .ratio(Metric::AssetsTurnoverRatio, s.revenue.current, avg_assets)?
        .ratio(Metric::PpeTurnoverRatio, s.revenue.current, s.ppe.average())?;

    let panel = panel.finish(s.identity.clone());
    tracing::debug!(
        inn = panel.inn().unwrap_or("unknown"),
        metrics = panel.len(),
        "computed metric panel"
    );
    Ok(panel)
}
