mod common;

use bfokit::{Comparative, ExtractError, extract};
use common::disclosure;

#[test]
fn extract_full_statement() {
    let statement = extract(&disclosure("bfo/statements.json")).unwrap();

    assert_eq!(statement.revenue, Comparative::new(1000.0, 800.0));
    assert_eq!(statement.gross_profit, Comparative::new(400.0, 300.0));
    assert_eq!(statement.operating_income.previous, 160.0);
    assert_eq!(statement.tax_provision, 30.0);
    assert_eq!(statement.short_term_investments, 0.0);
    assert_eq!(statement.equity, Comparative::new(250.0, 150.0));

    assert_eq!(
        statement.identity.company_name.as_deref(),
        Some("ОБЩЕСТВО С ОГРАНИЧЕННОЙ ОТВЕТСТВЕННОСТЬЮ \"РОМАШКА\"")
    );
    assert_eq!(statement.identity.inn.as_deref(), Some("7701234567"));
    assert_eq!(statement.identity.period.as_deref(), Some("2023"));
}

#[test]
fn extract_defaults_missing_balance_sheet() {
    let statement = extract(&disclosure("bfo/minimal_income_only.json")).unwrap();

    assert_eq!(statement.revenue, Comparative::new(1000.0, 0.0));
    assert_eq!(statement.cost_of_revenue, Comparative::default());
    assert_eq!(statement.total_assets, Comparative::default());
    assert_eq!(statement.current_liabilities, 0.0);
    assert!(statement.identity.company_name.is_none());
    assert_eq!(statement.identity.period.as_deref(), Some("2023"));
}

#[test]
fn extract_missing_operating_income() {
    let result = extract(&disclosure("bfo/missing_operating_income.json"));
    assert_eq!(
        result,
        Err(ExtractError::MissingField {
            path: "financialResult.current2200".to_string()
        })
    );
}

#[test]
fn extract_empty_corrections() {
    let result = extract(&disclosure("bfo/empty_corrections.json"));
    assert_eq!(result, Err(ExtractError::EmptyDisclosure));
}
