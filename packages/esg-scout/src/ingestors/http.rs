//! HTTP fetcher implementation.
//!
//! One GET per call with the fixed client identifier and a caller-chosen
//! timeout. No retries, no rate limiting.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{PageFetcher, USER_AGENT};

/// Redirect hops followed before giving up on a URL.
const MAX_REDIRECTS: usize = 10;

/// reqwest-backed [`PageFetcher`].
///
/// # Example
///
/// ```rust,ignore
/// use esg_scout::ingestors::HttpFetcher;
///
/// let fetcher = HttpFetcher::new()?;
/// let html = fetcher.fetch_html("https://acme.com", Duration::from_secs(15)).await?;
/// ```
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default client settings.
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Use a custom HTTP client.
    ///
    /// The client should already carry the identifying user agent.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str, timeout: Duration) -> FetchResult<reqwest::Response> {
        reqwest::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        debug!(url = %url, timeout_secs = timeout.as_secs(), "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                FetchError::from_reqwest(url, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn body_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Body {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str, timeout: Duration) -> FetchResult<String> {
        let response = self.get(url, timeout).await?;
        let html = response.text().await.map_err(|e| body_error(url, e))?;
        debug!(url = %url, bytes = html.len(), "HTML fetched");
        Ok(html)
    }

    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> FetchResult<Vec<u8>> {
        let response = self.get(url, timeout).await?;
        let bytes = response.bytes().await.map_err(|e| body_error(url, e))?;
        debug!(url = %url, bytes = bytes.len(), "Bytes fetched");
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_rejected_before_request() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher
            .fetch_html("not a url", Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn test_fetcher_name() {
        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(fetcher.name(), "http");
    }
}
