//! Typed statements and the extractor that builds them.
//!
//! [`extract`] turns the loose line-item maps of a [`RawDisclosure`] into a
//! flat [`Statement`]. Every field is read from exactly one place: the first
//! correction of the first report, in either the `financialResult` or the
//! `balance` block, under `current<code>` or `previous<code>`.
//!
//! Lines come in two classes. Required lines are the income-statement totals
//! that growth rates are computed from; if one is absent or `null` the whole
//! extraction fails. Optional lines default to zero.

use super::disclosure::{LineItems, RawDisclosure};
use super::error::ExtractError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Line codes of the Russian statutory statement forms.
pub mod codes {
    // Income statement (form 2)
    pub const REVENUE: &str = "2110";
    pub const COST_OF_REVENUE: &str = "2120";
    pub const GROSS_PROFIT: &str = "2100";
    pub const SELLING_EXPENSES: &str = "2210";
    pub const ADMINISTRATIVE_EXPENSES: &str = "2220";
    pub const OPERATING_INCOME: &str = "2200";
    pub const INTEREST_EXPENSE: &str = "2330";
    pub const OTHER_EXPENSES: &str = "2350";
    pub const EARNINGS_BEFORE_TAX: &str = "2300";
    pub const NET_INCOME: &str = "2400";
    pub const TAX_PROVISION: &str = "2411";

    // Balance sheet (form 1)
    pub const PPE: &str = "1150";
    pub const CURRENT_ASSETS: &str = "1200";
    pub const RECEIVABLES: &str = "1230";
    pub const SHORT_TERM_INVESTMENTS: &str = "1240";
    pub const CASH: &str = "1250";
    pub const EQUITY: &str = "1300";
    pub const NON_CURRENT_LIABILITIES: &str = "1400";
    pub const CURRENT_LIABILITIES: &str = "1500";
    pub const TOTAL_ASSETS: &str = "1600";
}

/// A line reported for both the current and the previous period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparative {
    pub current: f64,
    pub previous: f64,
}

impl Comparative {
    pub fn new(current: f64, previous: f64) -> Self {
        Self { current, previous }
    }

    pub fn average(&self) -> f64 {
        (self.current + self.previous) / 2.0
    }
}

/// Who filed the statements and for which period. Display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub company_name: Option<String>,
    pub inn: Option<String>,
    pub period: Option<String>,
}

/// Flat, typed view of one disclosure. Amounts are in the registry's unit
/// (thousands of rubles).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub identity: CompanyIdentity,

    // Income statement
    pub revenue: Comparative,
    pub cost_of_revenue: Comparative,
    pub gross_profit: Comparative,
    pub selling_expenses: f64,
    pub administrative_expenses: f64,
    pub operating_income: Comparative,
    pub interest_expense: f64,
    pub other_expenses: f64,
    pub earnings_before_tax: Comparative,
    pub tax_provision: f64,
    pub net_income: Comparative,

    // Balance sheet
    pub ppe: Comparative,
    pub current_assets: f64,
    pub receivables: f64,
    pub short_term_investments: f64,
    pub cash: f64,
    pub total_assets: Comparative,
    pub equity: Comparative,
    pub non_current_liabilities: f64,
    pub current_liabilities: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    FinancialResult,
    Balance,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Section::FinancialResult => "financialResult",
            Section::Balance => "balance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Current,
    Previous,
}

impl Period {
    fn prefix(self) -> &'static str {
        match self {
            Period::Current => "current",
            Period::Previous => "previous",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// What the registry had under a key, before presence policy is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LineItem {
    Value(f64),
    Null,
    Absent,
}

/// Reads lines out of one statement block.
///
/// A block the registry left out entirely reads as if every line in it were
/// absent.
struct LineItemReader<'a> {
    section: Section,
    items: Option<&'a LineItems>,
}

impl<'a> LineItemReader<'a> {
    fn new(section: Section, items: Option<&'a LineItems>) -> Self {
        Self { section, items }
    }

    fn path(&self, period: Period, code: &str) -> String {
        format!("{}.{}{}", self.section.key(), period.prefix(), code)
    }

    fn lookup(&self, period: Period, code: &str) -> Result<LineItem, ExtractError> {
        let key = format!("{}{}", period.prefix(), code);
        match self.items.and_then(|items| items.get(&key)) {
            None => Ok(LineItem::Absent),
            Some(Value::Null) => Ok(LineItem::Null),
            Some(Value::Number(n)) => n.as_f64().map(LineItem::Value).ok_or_else(|| {
                ExtractError::InvalidValue {
                    path: self.path(period, code),
                }
            }),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(LineItem::Value)
                .ok_or_else(|| ExtractError::InvalidValue {
                    path: self.path(period, code),
                }),
            Some(_) => Err(ExtractError::InvalidValue {
                path: self.path(period, code),
            }),
        }
    }

    fn read(&self, period: Period, code: &str, presence: Presence) -> Result<f64, ExtractError> {
        match (self.lookup(period, code)?, presence) {
            (LineItem::Value(v), _) => Ok(v),
            (LineItem::Null | LineItem::Absent, Presence::Optional) => Ok(0.0),
            (LineItem::Null | LineItem::Absent, Presence::Required) => {
                Err(ExtractError::MissingField {
                    path: self.path(period, code),
                })
            }
        }
    }

    fn optional(&self, code: &str) -> Result<f64, ExtractError> {
        self.read(Period::Current, code, Presence::Optional)
    }

    fn comparative(&self, code: &str, presence: Presence) -> Result<Comparative, ExtractError> {
        Ok(Comparative {
            current: self.read(Period::Current, code, presence)?,
            previous: self.read(Period::Previous, code, presence)?,
        })
    }
}

/// Builds a [`Statement`] from the first correction of the first report.
///
/// # Errors
///
/// * `ExtractError::EmptyDisclosure` - no report, or a report with no corrections
/// * `ExtractError::MissingField` - a required line is absent or `null`
/// * `ExtractError::InvalidValue` - a line holds something other than a number
pub fn extract(raw: &RawDisclosure) -> Result<Statement, ExtractError> {
    let report = raw.latest().ok_or(ExtractError::EmptyDisclosure)?;
    let correction = report
        .primary_correction()
        .ok_or(ExtractError::EmptyDisclosure)?;

    let income = LineItemReader::new(
        Section::FinancialResult,
        correction.financial_result.as_ref(),
    );
    let balance = LineItemReader::new(Section::Balance, correction.balance.as_ref());
    let info = correction.bfo_organization_info.as_ref();

    use self::Presence::{Optional, Required};

    Ok(Statement {
        identity: CompanyIdentity {
            company_name: info.and_then(|i| i.full_name.clone().or_else(|| i.short_name.clone())),
            inn: info.and_then(|i| i.inn.clone()),
            period: report.period.clone(),
        },

        revenue: income.comparative(codes::REVENUE, Required)?,
        cost_of_revenue: income.comparative(codes::COST_OF_REVENUE, Optional)?,
        gross_profit: income.comparative(codes::GROSS_PROFIT, Optional)?,
        selling_expenses: income.optional(codes::SELLING_EXPENSES)?,
        administrative_expenses: income.optional(codes::ADMINISTRATIVE_EXPENSES)?,
        operating_income: income.comparative(codes::OPERATING_INCOME, Required)?,
        interest_expense: income.optional(codes::INTEREST_EXPENSE)?,
        other_expenses: income.optional(codes::OTHER_EXPENSES)?,
        earnings_before_tax: income.comparative(codes::EARNINGS_BEFORE_TAX, Required)?,
        tax_provision: income.optional(codes::TAX_PROVISION)?,
        net_income: income.comparative(codes::NET_INCOME, Required)?,

        ppe: balance.comparative(codes::PPE, Optional)?,
        current_assets: balance.optional(codes::CURRENT_ASSETS)?,
        receivables: balance.optional(codes::RECEIVABLES)?,
        short_term_investments: balance.optional(codes::SHORT_TERM_INVESTMENTS)?,
        cash: balance.optional(codes::CASH)?,
        total_assets: balance.comparative(codes::TOTAL_ASSETS, Optional)?,
        equity: balance.comparative(codes::EQUITY, Optional)?,
        non_current_liabilities: balance.optional(codes::NON_CURRENT_LIABILITIES)?,
        current_liabilities: balance.optional(codes::CURRENT_LIABILITIES)?,
    })
}
