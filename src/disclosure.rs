//! Raw statement payloads as published by the registry.
//!
//! The `/nbo/organizations/{id}/bfo/` endpoint returns one report per
//! reporting year. Each report holds a list of corrections (the original
//! filing and any resubmissions), and each correction carries the two
//! statements this crate reads:
//!
//! ```text
//! [ { "period": "2023",
//!     "typeCorrections": [ { "correction": {
//!         "financialResult":     { "current2110": 1000, "previous2110": 800, ... },
//!         "balance":             { "current1600": 500, "previous1600": 300, ... },
//!         "bfoOrganizationInfo": { "fullName": "...", "inn": "..." } } } ] } ]
//! ```
//!
//! Only the envelope is typed. The line-item blocks stay loose JSON maps keyed
//! `current<code>` / `previous<code>`, because the registry omits lines a
//! company did not fill in and encodes blank lines as `null`. Reading them is
//! the extractor's job (see [`extract`](crate::extract)).

use super::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Loosely typed block of statement lines.
pub type LineItems = Map<String, Value>;

/// The full statements payload for one organization, newest report first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDisclosure {
    reports: Vec<Report>,
}

/// Statements for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_opt_label")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub type_corrections: Vec<TypeCorrection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeCorrection {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub correction: Correction,
}

/// One submitted version of the statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    #[serde(default)]
    pub financial_result: Option<LineItems>,
    #[serde(default)]
    pub balance: Option<LineItems>,
    #[serde(default)]
    pub bfo_organization_info: Option<OrganizationInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_label")]
    pub inn: Option<String>,
}

impl RawDisclosure {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    /// Decodes the registry's JSON body.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// True when the registry returned no reports at all.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// The report analysis runs on. Later reports are never consulted.
    pub fn latest(&self) -> Option<&Report> {
        self.reports.first()
    }
}

impl Report {
    /// The correction analysis runs on.
    pub fn primary_correction(&self) -> Option<&Correction> {
        self.type_corrections.first().map(|tc| &tc.correction)
    }
}

/// Accepts a label the registry sometimes sends as a number (`2023`) and
/// sometimes as a string (`"2023"`).
fn deserialize_opt_label<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Reads an explicit `null` the same as a missing key.
fn deserialize_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_envelope() {
        let content = json!([{
            "id": 42,
            "period": 2023,
            "typeCorrections": [{
                "correction": {
                    "financialResult": { "current2110": 1000, "previous2110": null },
                    "balance": { "current1600": 500 },
                    "bfoOrganizationInfo": { "fullName": "ООО \"Ромашка\"", "inn": 7707083893u64 }
                }
            }]
        }])
        .to_string();

        let raw = RawDisclosure::from_json(&content).unwrap();
        let report = raw.latest().unwrap();
        assert_eq!(report.id, Some(42));
        assert_eq!(report.period.as_deref(), Some("2023"));

        let correction = report.primary_correction().unwrap();
        let financial = correction.financial_result.as_ref().unwrap();
        assert_eq!(financial["current2110"], json!(1000));
        assert!(financial["previous2110"].is_null());

        let info = correction.bfo_organization_info.as_ref().unwrap();
        assert_eq!(info.full_name.as_deref(), Some("ООО \"Ромашка\""));
        assert_eq!(info.inn.as_deref(), Some("7707083893"));
    }

    #[test]
    fn test_missing_blocks_default() {
        let raw = RawDisclosure::from_json(r#"[{"typeCorrections": [{"correction": {}}]}]"#).unwrap();
        let correction = raw.latest().unwrap().primary_correction().unwrap();
        assert!(correction.financial_result.is_none());
        assert!(correction.balance.is_none());
        assert!(correction.bfo_organization_info.is_none());
        assert!(raw.latest().unwrap().period.is_none());
    }

    #[test]
    fn test_empty_payloads() {
        let raw = RawDisclosure::from_json("[]").unwrap();
        assert!(raw.is_empty());
        assert!(raw.latest().is_none());

        let raw = RawDisclosure::from_json(r#"[{"period": "2023", "typeCorrections": []}]"#).unwrap();
        assert!(!raw.is_empty());
        assert!(raw.latest().unwrap().primary_correction().is_none());
    }

    #[test]
    fn test_null_corrections_read_as_empty() {
        let raw = RawDisclosure::from_json(
            r#"[{"period": "2023", "typeCorrections": [{"correction": null}]},
                {"period": "2019", "typeCorrections": null}]"#,
        )
        .unwrap();
        assert_eq!(raw.reports().len(), 2);
        assert_eq!(raw.latest().unwrap().primary_correction(), Some(&Correction::default()));
        assert!(raw.reports()[1].type_corrections.is_empty());
    }

    #[test]
    fn test_rejects_non_array_payload() {
        assert!(RawDisclosure::from_json(r#"{"content": []}"#).is_err());
    }
}
