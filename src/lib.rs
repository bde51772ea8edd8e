//! # bfokit - Financial ratio analysis for Russian statutory statements
//!
//! bfokit reads the balance sheet and income statement an organization
//! publishes in the state registry of accounting reports (bo.nalog.gov.ru) and
//! derives a fixed panel of ratios and period-over-period growth rates.
//!
//! ## Features
//!
//! - **Statement extraction** - Typed [`Statement`] from the loose registry
//!   payload, with required and optional line policy
//! - **Ratio engine** - Profitability, liquidity, solvency, turnover and growth
//!   metrics under a single [`DivisionPolicy`]
//! - **Explicit outcomes** - [`Outcome`] separates "nothing published" from
//!   "published but insufficient"
//! - **Rate-limited registry client** (`registry` feature) - INN lookup and
//!   statement download with retries and backoff
//!
//! ## Basic Usage
//!
//! The core is synchronous and needs no network:
//!
//! ```ignore
//! use bfokit::{RawDisclosure, compute_metrics, extract};
//!
//! let raw = RawDisclosure::from_json(&body)?;
//! let statement = extract(&raw)?;
//! let panel = compute_metrics(&statement);
//! println!("ROE: {:?}", panel.get_by_name("roe"));
//! ```
//!
//! Fetching goes through [`Bfo`], which requires an async runtime:
//!
//! ```ignore
//! use bfokit::{Bfo, DivisionPolicy, Inn, RegistryOperations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bfo = Bfo::new("ratio_tool/1.0 (me@example.com)")?;
//!     let inn = Inn::parse("7707083893")?;
//!     let outcome = bfo.analyze(&inn, DivisionPolicy::Guarded).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod analysis;
mod config;
mod core;
mod disclosure;
mod error;
mod inn;
mod metrics;
mod statement;

#[cfg(feature = "registry")]
mod registry;
#[cfg(feature = "registry")]
mod traits;

// Analysis core (always available)
pub use analysis::{InsufficientData, Outcome, analyze};
pub use disclosure::{Correction, LineItems, OrganizationInfo, RawDisclosure, Report, TypeCorrection};
pub use error::{BfoError, DivisionFault, ExtractError, Result};
pub use inn::Inn;
pub use metrics::{DivisionPolicy, Metric, MetricPanel, compute_metrics, compute_metrics_with};
pub use statement::{Comparative, CompanyIdentity, Statement, codes, extract};

// HTTP client
pub use config::{BfoConfig, BfoUrls};
pub use crate::core::Bfo;

#[cfg(feature = "registry")]
pub use registry::{OrganizationSearch, OrganizationSummary};
#[cfg(feature = "registry")]
pub use traits::RegistryOperations;

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
