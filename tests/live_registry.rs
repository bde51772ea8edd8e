mod common;

use bfokit::{DivisionPolicy, Inn, Outcome, RegistryOperations};
use common::bfo;

// ПАО Сбербанк
const KNOWN_INN: &str = "7707083893";

#[tokio::test]
#[ignore]
async fn company_id() {
    let inn = Inn::parse(KNOWN_INN).unwrap();
    let id = bfo().company_id(&inn).await.unwrap();
    assert!(id > 0);
}

#[tokio::test]
#[ignore]
async fn financial_data() {
    let inn = Inn::parse(KNOWN_INN).unwrap();
    let raw = bfo().financial_data(&inn).await.unwrap().unwrap();
    assert!(!raw.is_empty());
}

#[tokio::test]
#[ignore]
async fn unknown_inn_has_no_data() {
    let inn = Inn::parse("0000000000").unwrap();
    let outcome = bfo().analyze(&inn, DivisionPolicy::Guarded).await.unwrap();
    assert_eq!(outcome, Outcome::NoData);
}

#[tokio::test]
#[ignore]
async fn analyze_known_company() {
    let inn = Inn::parse(KNOWN_INN).unwrap();
    let outcome = bfo().analyze(&inn, DivisionPolicy::Guarded).await.unwrap();
    assert!(matches!(
        outcome,
        Outcome::Panel(_) | Outcome::InsufficientData(_)
    ));
}
