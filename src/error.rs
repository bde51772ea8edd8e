use thiserror::Error;

#[derive(Error, Debug)]
pub enum BfoError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid INN {0:?}: must be 10 or 12 digits")]
    InvalidInn(String),

    #[error("No organization registered under INN {0}")]
    OrganizationNotFound(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Computation error: {0}")]
    Division(#[from] DivisionFault),

    #[error(
        "Unexpected content type from URL {url}. Expected pattern {expected_pattern}, but got Content-Type: {got_content_type}. Content preview: {content_preview}..."
    )]
    UnexpectedContentType {
        url: String,
        expected_pattern: String,
        got_content_type: String,
        content_preview: String,
    },
}

/// Failure to turn a raw disclosure into a [`Statement`](crate::Statement).
///
/// Every variant means the disclosure cannot support analysis; none of them
/// leaves a partially populated statement behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Disclosure contains no statement corrections")]
    EmptyDisclosure,

    #[error("Required field {path} is missing")]
    MissingField { path: String },

    #[error("Field {path} does not hold a number")]
    InvalidValue { path: String },
}

/// A zero denominator met under [`DivisionPolicy::Propagate`](crate::DivisionPolicy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Division by zero while computing {metric}")]
pub struct DivisionFault {
    pub metric: String,
}

pub type Result<T> = std::result::Result<T, BfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_extraction() -> Result<()> {
        Err(ExtractError::MissingField {
            path: "financialResult.current2200".to_string(),
        })?
    }

    #[test]
    fn test_extract_error_converts() {
        let err = fails_extraction().unwrap_err();
        assert!(matches!(err, BfoError::Extract(ExtractError::MissingField { .. })));
        assert_eq!(
            err.to_string(),
            "Extraction error: Required field financialResult.current2200 is missing"
        );
    }

    #[test]
    fn test_division_fault_message() {
        let err: BfoError = DivisionFault {
            metric: "revenue_growth".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Computation error: Division by zero while computing revenue_growth"
        );
    }

    #[test]
    fn test_invalid_inn_message() {
        let err = BfoError::InvalidInn("12ab".to_string());
        assert_eq!(err.to_string(), "Invalid INN \"12ab\": must be 10 or 12 digits");
    }
}
