//! Registry endpoints: organization lookup and statement download.
//!
//! Statements are addressed by the registry's internal organization id, not
//! by INN, so every fetch is two requests: a search by INN to resolve the id,
//! then the statements list for that id. `financial_data` does both and folds
//! "no such organization" and "nothing published" into `None`.

use super::Bfo;
use super::RegistryOperations;
use super::analysis::{Outcome, analyze};
use super::disclosure::RawDisclosure;
use super::error::{BfoError, Result};
use super::inn::Inn;
use super::metrics::DivisionPolicy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const SEARCH_PAGE_SIZE: u32 = 20;

/// One page of organization search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSearch {
    #[serde(default)]
    pub content: Vec<OrganizationSummary>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

/// An organization as listed in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub id: u64,
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub ogrn: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug)]
enum RegistryUrlType {
    OrganizationSearch,
    SearchPage,
    Statements,
    OrganizationCard,
}

impl Bfo {
    fn build_registry_url(&self, url_type: RegistryUrlType, params: &[&str]) -> Result<String> {
        match url_type {
            RegistryUrlType::OrganizationSearch => {
                let page_size = SEARCH_PAGE_SIZE.to_string();
                let query = serde_urlencoded::to_string([
                    ("query", params[0]),
                    ("page", "0"),
                    ("size", page_size.as_str()),
                ])
                .map_err(|e| BfoError::InvalidResponse(format!("Invalid search query: {}", e)))?;
                Ok(format!(
                    "{}/advanced-search/organizations/search?{}",
                    self.registry_url, query
                ))
            }
            RegistryUrlType::SearchPage => {
                let query = serde_urlencoded::to_string([("query", params[0])])
                    .map_err(|e| BfoError::InvalidResponse(format!("Invalid search query: {}", e)))?;
                Ok(format!("{}/search?{}", self.registry_url, query))
            }
            RegistryUrlType::Statements => Ok(format!(
                "{}/nbo/organizations/{}/bfo/",
                self.registry_url, params[0]
            )),
            RegistryUrlType::OrganizationCard => Ok(format!(
                "{}/organizations-card/{}",
                self.registry_url, params[0]
            )),
        }
    }
}

/// An unknown organization is not an error for callers of `financial_data`.
fn fold_company_id(result: Result<u64>) -> Result<Option<u64>> {
    match result {
        Ok(id) => Ok(Some(id)),
        Err(BfoError::OrganizationNotFound(_) | BfoError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// A 404 on the statements endpoint and an empty report list both mean
/// nothing was published.
fn fold_disclosure(result: Result<RawDisclosure>) -> Result<Option<RawDisclosure>> {
    match result {
        Ok(raw) if raw.is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw)),
        Err(BfoError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Registry access for [`Bfo`].
///
/// ```ignore
/// # use bfokit::{Bfo, DivisionPolicy, Inn, Outcome, RegistryOperations};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bfo = Bfo::new("ratio_tool/1.0 (me@example.com)")?;
/// let inn: Inn = "7707083893".parse()?;
///
/// match bfo.analyze(&inn, DivisionPolicy::Guarded).await? {
///     Outcome::Panel(panel) => println!("{:?}", panel.get_by_name("roe")),
///     Outcome::InsufficientData(reason) => println!("insufficient data: {reason}"),
///     Outcome::NoData => println!("nothing published"),
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
impl RegistryOperations for Bfo {
    /// Full-text organization search, first page only.
    async fn search_organizations(&self, query: &str) -> Result<OrganizationSearch> {
        let url = self.build_registry_url(RegistryUrlType::OrganizationSearch, &[query])?;
        let referer = self.build_registry_url(RegistryUrlType::SearchPage, &[query])?;
        self.get_json(&url, Some(&referer)).await
    }

    /// Resolves an INN to the registry's organization id.
    ///
    /// # Errors
    ///
    /// Returns `BfoError::OrganizationNotFound` when the search comes back empty.
    async fn company_id(&self, inn: &Inn) -> Result<u64> {
        let results = self.search_organizations(inn.as_str()).await?;

        let organization = results
            .content
            .first()
            .ok_or_else(|| BfoError::OrganizationNotFound(inn.to_string()))?;

        tracing::debug!(inn = %inn, company_id = organization.id, "resolved organization");
        Ok(organization.id)
    }

    /// Downloads every published report for an organization id.
    async fn disclosures(&self, company_id: u64) -> Result<RawDisclosure> {
        let id = company_id.to_string();
        let url = self.build_registry_url(RegistryUrlType::Statements, &[&id])?;
        let referer = self.build_registry_url(RegistryUrlType::OrganizationCard, &[&id])?;
        self.get_json(&url, Some(&referer)).await
    }

    /// Resolves the INN and downloads its statements.
    ///
    /// Returns `Ok(None)` when the organization is unknown, the statements
    /// endpoint answers 404, or no report was ever published.
    async fn financial_data(&self, inn: &Inn) -> Result<Option<RawDisclosure>> {
        let Some(company_id) = fold_company_id(self.company_id(inn).await)? else {
            return Ok(None);
        };
        fold_disclosure(self.disclosures(company_id).await)
    }

    /// Fetches the statements for an INN and analyses them.
    ///
    /// # Errors
    ///
    /// Transport and decoding failures are logged with the INN and returned.
    /// Missing or incomplete data is not an error; it comes back as
    /// `Outcome::NoData` or `Outcome::InsufficientData`.
    async fn analyze(&self, inn: &Inn, policy: DivisionPolicy) -> Result<Outcome> {
        match self.financial_data(inn).await {
            Ok(raw) => Ok(analyze(raw.as_ref(), policy)),
            Err(e) => {
                tracing::error!(inn = %inn, "failed to process statements: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bfo() -> Bfo {
        Bfo::new("test_agent example@example.com").unwrap()
    }

    #[test]
    fn test_build_search_urls() {
        let bfo = bfo();
        assert_eq!(
            bfo.build_registry_url(RegistryUrlType::OrganizationSearch, &["7707083893"])
                .unwrap(),
            "https://bo.nalog.gov.ru/advanced-search/organizations/search?query=7707083893&page=0&size=20"
        );
        assert_eq!(
            bfo.build_registry_url(RegistryUrlType::SearchPage, &["7707083893"])
                .unwrap(),
            "https://bo.nalog.gov.ru/search?query=7707083893"
        );
    }

    #[test]
    fn test_search_query_is_encoded() {
        let url = bfo()
            .build_registry_url(RegistryUrlType::OrganizationSearch, &["ООО Ромашка"])
            .unwrap();
        assert!(url.contains("query=%D0%9E%D0%9E%D0%9E+"));
    }

    #[test]
    fn test_build_statement_urls() {
        let bfo = bfo();
        assert_eq!(
            bfo.build_registry_url(RegistryUrlType::Statements, &["4219"])
                .unwrap(),
            "https://bo.nalog.gov.ru/nbo/organizations/4219/bfo/"
        );
        assert_eq!(
            bfo.build_registry_url(RegistryUrlType::OrganizationCard, &["4219"])
                .unwrap(),
            "https://bo.nalog.gov.ru/organizations-card/4219"
        );
    }

    #[test]
    fn test_parse_search_results() {
        let content = r#"{
            "content": [
                { "id": 4219, "inn": "7707083893", "ogrn": "1027700132195", "shortName": "ПАО СБЕРБАНК", "region": "Москва" }
            ],
            "totalElements": 1,
            "pageable": { "pageNumber": 0 }
        }"#;
        let results: OrganizationSearch = serde_json::from_str(content).unwrap();
        assert_eq!(results.total_elements, Some(1));
        assert_eq!(results.content[0].id, 4219);
        assert_eq!(results.content[0].short_name.as_deref(), Some("ПАО СБЕРБАНК"));
    }

    #[test]
    fn test_unknown_organization_folds_to_none() {
        assert_eq!(fold_company_id(Ok(4219)).unwrap(), Some(4219));
        assert_eq!(
            fold_company_id(Err(BfoError::OrganizationNotFound("7707083893".to_string()))).unwrap(),
            None
        );
        assert_eq!(fold_company_id(Err(BfoError::NotFound)).unwrap(), None);
        assert!(matches!(
            fold_company_id(Err(BfoError::RateLimitExceeded)),
            Err(BfoError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_unpublished_statements_fold_to_none() {
        assert!(fold_disclosure(Ok(RawDisclosure::default())).unwrap().is_none());
        assert!(fold_disclosure(Err(BfoError::NotFound)).unwrap().is_none());

        let raw = RawDisclosure::from_json(r#"[{"period": "2023", "typeCorrections": []}]"#).unwrap();
        assert_eq!(fold_disclosure(Ok(raw.clone())).unwrap(), Some(raw));

        assert!(matches!(
            fold_disclosure(Err(BfoError::InvalidResponse("bad gateway".to_string()))),
            Err(BfoError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_unpublished_statements_analyse_as_no_data() {
        let raw = fold_disclosure(Err(BfoError::NotFound)).unwrap();
        assert!(analyze(raw.as_ref(), DivisionPolicy::Guarded).is_no_data());
    }

    #[test]
    fn test_parse_empty_search_results() {
        let results: OrganizationSearch = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(results.content.is_empty());
        assert_eq!(results.total_elements, None);
    }
}
