use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT,
};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::{BfoConfig, BfoUrls};
use super::error::{BfoError, Result};

const MAX_RETRIES: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second
const ACCEPT_LANGUAGE_VALUE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";
// Without this cookie the registry answers with its disclaimer page.
const DISCLAIMER_COOKIE: &str = "disclaimed=true";

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone)]
pub struct Bfo {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter shared by every clone
    pub(crate) rate_limiter: Arc<Governor>,

    /// Base URL of the statements registry
    pub(crate) registry_url: String,
}

/// HTTP client for the registry of accounting statements (bo.nalog.gov.ru).
///
/// `Bfo` owns the whole network session: default headers, the disclaimer
/// cookie the registry insists on, a token-bucket rate limiter and the retry
/// policy. Clones share the limiter, so concurrent tasks are throttled as one
/// caller.
///
/// The analysis core (`extract`, `compute_metrics`, `analyze`) never touches
/// this type; it only consumes the [`RawDisclosure`](crate::RawDisclosure)
/// the client hands back.
///
/// # Error Handling
///
/// HTTP 429 responses and transport failures are retried with exponential
/// backoff and jitter. 404 maps to `BfoError::NotFound`; every other status
/// fails immediately with a preview of the body.
///
/// # Examples
///
/// ```rust
/// # use bfokit::Bfo;
/// let bfo = Bfo::new("ratio_tool/1.0 (me@example.com)")?;
/// # Ok::<(), bfokit::BfoError>(())
/// ```
impl Bfo {
    /// Creates a client with the default rate limit (3 requests per second),
    /// a 10-second timeout and the public registry URL.
    pub fn new(user_agent: &str) -> Result<Self> {
        let config = BfoConfig {
            user_agent: user_agent.to_string(),
            ..BfoConfig::default()
        };
        Self::with_config(config)
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `BfoError::ConfigError` if the user agent is not a valid header
    /// value, the rate limit is zero, or the HTTP client cannot be built.
    pub fn with_config(config: BfoConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| BfoError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );
        headers.insert(COOKIE, HeaderValue::from_static(DISCLAIMER_COOKIE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BfoError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(config.rate_limit).ok_or_else(|| {
                BfoError::ConfigError("Rate limit must be greater than zero".to_string())
            })?,
        )));

        let BfoUrls { registry } = config.base_urls;

        Ok(Bfo {
            client,
            rate_limiter,
            registry_url: registry.trim_end_matches('/').to_string(),
        })
    }

    /// Exponential backoff with ±20% jitter: 1s, 2s, 4s, 8s, 16s.
    fn calculate_backoff(retry: u32) -> Duration {
        let backoff_ms = INITIAL_BACKOFF_MS * (2_u64.pow(retry));
        let jitter = (backoff_ms as f64 * 0.2 * (fastrand::f64() - 0.5)) as i64;
        Duration::from_millis((backoff_ms as i64 + jitter) as u64)
    }

    /// Fetches a registry endpoint as text.
    ///
    /// Every endpoint of the registry answers with JSON. When the body comes
    /// back as an HTML page instead (the disclaimer or a maintenance screen),
    /// the call fails with `BfoError::UnexpectedContentType` rather than
    /// handing HTML to the JSON decoder.
    ///
    /// The registry checks the `Referer` header on some endpoints, so callers
    /// pass the page a browser would have come from.
    ///
    /// # Retry Behavior
    ///
    /// - **Rate limits (429)**: up to 5 retries, honoring `Retry-After` when present
    /// - **Network errors**: up to 5 retries with exponential backoff
    /// - **Other HTTP errors**: no retry
    ///
    /// # Errors
    ///
    /// * `BfoError::UnexpectedContentType` - HTML where JSON was expected
    /// * `BfoError::NotFound` - HTTP 404
    /// * `BfoError::RateLimitExceeded` - retries exhausted on 429
    /// * `BfoError::RequestError` - transport failure after retries
    /// * `BfoError::InvalidResponse` - any other status
    pub async fn get(&self, url: &str, referer: Option<&str>) -> Result<String> {
        let mut retries = 0;

        loop {
            self.rate_limiter.until_ready().await;

            let mut request = self.client.get(url);
            if let Some(referer) = referer {
                request = request.header(REFERER, referer);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let headers = response.headers().clone();

                    if status.is_success() {
                        let content_type = headers
                            .get(CONTENT_TYPE)
                            .and_then(|val| val.to_str().ok())
                            .map(str::to_lowercase);

                        if let Some(ct) = content_type.filter(|ct| ct.contains("text/html")) {
                            let body_text = response
                                .text()
                                .await
                                .unwrap_or_else(|_| "Failed to read response body".to_string());

                            if looks_like_json(&body_text) {
                                tracing::warn!(
                                    "Received text/html content-type, but content appears to be JSON: {}",
                                    url
                                );
                                return Ok(body_text);
                            }

                            return Err(BfoError::UnexpectedContentType {
                                url: url.to_string(),
                                expected_pattern: "application/json".to_string(),
                                got_content_type: ct,
                                content_preview: body_text.chars().take(200).collect(),
                            });
                        }
                    }

                    match status {
                        reqwest::StatusCode::OK => {
                            return response.text().await.map_err(BfoError::RequestError);
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(BfoError::NotFound);
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            if retries >= MAX_RETRIES {
                                return Err(BfoError::RateLimitExceeded);
                            }

                            let retry_after_duration = headers
                                .get("retry-after")
                                .and_then(|h| h.to_str().ok())
                                .and_then(|s| s.parse::<u64>().ok())
                                .map(Duration::from_secs)
                                .unwrap_or_else(|| Self::calculate_backoff(retries));

                            tracing::warn!(
                                "Rate limit hit (429) for {}. Attempt {}/{}. Waiting for {:?} before retry.",
                                url,
                                retries + 1,
                                MAX_RETRIES + 1,
                                retry_after_duration
                            );
                            sleep(retry_after_duration).await;
                            retries += 1;
                            continue;
                        }
                        other_status => {
                            let error_body = response
                                .text()
                                .await
                                .unwrap_or_else(|_| "Failed to read error body".to_string());

                            return Err(BfoError::InvalidResponse(format!(
                                "Unexpected status code: {} for URL: {}. Response preview: {}",
                                other_status,
                                url,
                                error_body.chars().take(200).collect::<String>()
                            )));
                        }
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        return Err(BfoError::RequestError(e));
                    }
                    let backoff_duration = Self::calculate_backoff(retries);
                    tracing::warn!(
                        "Request failed for {}: {:?}. Attempt {}/{}. Retrying in {:?}.",
                        url,
                        e,
                        retries + 1,
                        MAX_RETRIES + 1,
                        backoff_duration
                    );
                    sleep(backoff_duration).await;
                    retries += 1;
                    continue;
                }
            }
        }
    }

    /// Fetches an endpoint and decodes the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, referer: Option<&str>) -> Result<T> {
        let body = self.get(url, referer).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Returns the base URL of the statements registry.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }
}

fn looks_like_json(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff() {
        let backoff0 = Bfo::calculate_backoff(0);
        let backoff1 = Bfo::calculate_backoff(1);
        let backoff2 = Bfo::calculate_backoff(2);

        assert!(backoff0 < backoff1);
        assert!(backoff1 < backoff2);

        assert!(backoff0.as_millis() >= 800 && backoff0.as_millis() <= 1200); // ±20% of 1000ms
        assert!(backoff1.as_millis() >= 1600 && backoff1.as_millis() <= 2400);
        assert!(backoff2.as_millis() >= 3200 && backoff2.as_millis() <= 4800);
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let config = BfoConfig {
            rate_limit: 0,
            ..BfoConfig::default()
        };
        assert!(matches!(
            Bfo::with_config(config),
            Err(BfoError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        assert!(matches!(
            Bfo::new("bad\nagent"),
            Err(BfoError::ConfigError(msg)) if msg.starts_with("Invalid user agent")
        ));
    }

    #[test]
    fn test_registry_url_trailing_slash_is_trimmed() {
        let config = BfoConfig::new(
            "test_agent",
            1,
            Duration::from_secs(1),
            Some(BfoUrls {
                registry: "http://localhost:8080/".to_string(),
            }),
        );
        let bfo = Bfo::with_config(config).unwrap();
        assert_eq!(bfo.registry_url(), "http://localhost:8080");
    }

    #[test]
    fn test_looks_like_json() {
        assert!(looks_like_json("  [{\"id\": 1}]"));
        assert!(looks_like_json("{}"));
        assert!(!looks_like_json("<!DOCTYPE html><html></html>"));
    }
}
