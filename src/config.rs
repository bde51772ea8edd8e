use std::time::Duration;

/// Configuration for the registry client
#[derive(Debug, Clone)]
pub struct BfoConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URLs for the registry services
    pub base_urls: BfoUrls,
}

/// Base URLs for the registry services
#[derive(Debug, Clone)]
pub struct BfoUrls {
    /// Base URL of the accounting statements registry
    pub registry: String,
}

impl Default for BfoConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("bfokit/{}", crate::VERSION),
            rate_limit: 3,
            timeout: Duration::from_secs(10),
            base_urls: BfoUrls::default(),
        }
    }
}

impl BfoConfig {
    /// Creates a new BfoConfig with custom settings
    ///
    /// Pass `None` for `base_urls` to talk to the public registry. Tests point
    /// it at a local server instead.
    ///
    /// ```ignore
    /// use bfokit::{Bfo, BfoConfig};
    /// use std::time::Duration;
    ///
    /// let config = BfoConfig::new("ratio_tool/1.0", 2, Duration::from_secs(15), None);
    /// let bfo = Bfo::with_config(config)?;
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
        base_urls: Option<BfoUrls>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            rate_limit,
            timeout,
            base_urls: base_urls.unwrap_or_default(),
        }
    }
}

impl Default for BfoUrls {
    fn default() -> Self {
        Self {
            registry: "https://bo.nalog.gov.ru".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BfoConfig::default();
        assert_eq!(config.rate_limit, 3);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.base_urls.registry, "https://bo.nalog.gov.ru");
        assert!(config.user_agent.starts_with("bfokit/"));
    }

    #[test]
    fn test_new_keeps_default_urls() {
        let config = BfoConfig::new("agent", 1, Duration::from_secs(1), None);
        assert_eq!(config.user_agent, "agent");
        assert_eq!(config.base_urls.registry, BfoUrls::default().registry);
    }
}
