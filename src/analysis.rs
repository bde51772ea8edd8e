//! The extract-then-compute pipeline and its three outcomes.

use super::disclosure::RawDisclosure;
use super::error::{BfoError, DivisionFault, ExtractError, Result};
use super::metrics::{DivisionPolicy, MetricPanel, compute_metrics_with};
use super::statement::extract;
use thiserror::Error;

/// Why a disclosure that exists still cannot be analysed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Division(#[from] DivisionFault),
}

/// Result of analysing one disclosure, as handed to a presentation layer.
///
/// "Nothing was published" and "something was published but it is not
/// enough" are separate variants so they can be reported differently.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The registry has no statements for the company.
    NoData,
    /// Statements exist but lack what the panel needs.
    InsufficientData(InsufficientData),
    /// The full metric panel.
    Panel(MetricPanel),
}

impl Outcome {
    pub fn panel(&self) -> Option<&MetricPanel> {
        match self {
            Outcome::Panel(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn into_panel(self) -> Option<MetricPanel> {
        match self {
            Outcome::Panel(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData)
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Outcome::InsufficientData(_))
    }

    /// Collapses the outcome for callers that treat insufficient data as an
    /// error. `NoData` becomes `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `BfoError::Extract` or `BfoError::Division`, carrying the reason the
    /// disclosure could not be analysed.
    pub fn into_result(self) -> Result<Option<MetricPanel>> {
        match self {
            Outcome::NoData => Ok(None),
            Outcome::Panel(panel) => Ok(Some(panel)),
            Outcome::InsufficientData(InsufficientData::Extract(e)) => Err(BfoError::Extract(e)),
            Outcome::InsufficientData(InsufficientData::Division(e)) => Err(BfoError::Division(e)),
        }
    }
}

/// Runs extraction and the ratio engine over a fetched disclosure.
///
/// `None` and a payload without a single report both mean nothing was
/// published. A report without corrections counts as insufficient data.
pub fn analyze(raw: Option<&RawDisclosure>, policy: DivisionPolicy) -> Outcome {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Outcome::NoData;
    };

    let result = extract(raw)
        .map_err(InsufficientData::from)
        .and_then(|statement| compute_metrics_with(&statement, policy).map_err(InsufficientData::from));

    match result {
        Ok(panel) => Outcome::Panel(panel),
        Err(reason) => {
            tracing::warn!("insufficient data for analysis: {}", reason);
            Outcome::InsufficientData(reason)
        }
    }
}
