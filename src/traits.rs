//! Trait definitions for the network-facing side of the crate.
//!
//! The analysis core is plain functions over owned data; only registry access
//! sits behind a trait, so callers can swap in a canned implementation when
//! testing a front-end without the network.

use super::analysis::Outcome;
use super::disclosure::RawDisclosure;
use super::error::Result;
use super::inn::Inn;
use super::metrics::DivisionPolicy;
use super::registry::OrganizationSearch;
use async_trait::async_trait;

/// Operations against the registry of accounting statements.
///
/// Every method is async and rate limited by the implementing client. The
/// pure core ([`extract`](crate::extract), [`compute_metrics`](crate::compute_metrics))
/// does not depend on this trait.
#[async_trait]
pub trait RegistryOperations {
    /// Searches organizations by INN, OGRN or name.
    async fn search_organizations(&self, query: &str) -> Result<OrganizationSearch>;
    /// Resolves an INN to the registry's internal organization id.
    async fn company_id(&self, inn: &Inn) -> Result<u64>;
    /// Retrieves all published statements for an organization id.
    async fn disclosures(&self, company_id: u64) -> Result<RawDisclosure>;
    /// Retrieves statements for an INN, `None` when nothing is published.
    async fn financial_data(&self, inn: &Inn) -> Result<Option<RawDisclosure>>;
    /// Retrieves and analyses the statements for an INN.
    async fn analyze(&self, inn: &Inn, policy: DivisionPolicy) -> Result<Outcome>;
}
