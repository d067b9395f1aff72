//! Serper (Google search API) implementation of [`WebSearcher`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::credentials::SecretString;
use crate::error::{SearchError, SearchResult};
use crate::traits::fetcher::USER_AGENT;
use crate::traits::searcher::{SearchHit, WebSearcher};
use crate::types::config::ScoutConfig;

const SERPER_URL: &str = "https://google.serper.dev/search";

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Option<Vec<OrganicResult>>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
    title: Option<String>,
    snippet: Option<String>,
    text: Option<String>,
    description: Option<String>,
}

impl From<OrganicResult> for SearchHit {
    fn from(r: OrganicResult) -> Self {
        let snippet = [r.snippet, r.text, r.description]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty());

        SearchHit {
            link: r.link.unwrap_or_default(),
            title: r.title,
            snippet,
        }
    }
}

/// Web searcher backed by the Serper API.
///
/// # Example
///
/// ```rust,ignore
/// use esg_scout::search::SerperSearcher;
///
/// let searcher = SerperSearcher::new(std::env::var("SERPER_API_KEY")?);
/// let hits = searcher.search("Acme sustainability report pdf").await?;
/// ```
pub struct SerperSearcher {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    timeout: Duration,
    num_results: usize,
}

impl SerperSearcher {
    /// Create a searcher with the default endpoint, 20 second timeout and
    /// 10 results per query.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_key(SecretString::new(api_key))
    }

    /// Create a searcher from an already wrapped key.
    pub fn with_key(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: SERPER_URL.to_string(),
            timeout: Duration::from_secs(20),
            num_results: 10,
        }
    }

    /// Override the endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the per-query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many results to request per query.
    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    /// Take the search timeout and per-query result count from `config`.
    pub fn with_scout_config(self, config: &ScoutConfig) -> Self {
        self.with_timeout(config.timeouts.search)
            .with_num_results(config.search.results_per_query)
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl WebSearcher for SerperSearcher {
    async fn search(&self, query: &str) -> SearchResult<Vec<SearchHit>> {
        let request = SerperRequest {
            q: query,
            num: self.num_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", self.api_key.expose())
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }

        let body: SerperResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let hits: Vec<SearchHit> = body
            .organic
            .unwrap_or_default()
            .into_iter()
            .map(SearchHit::from)
            .collect();

        debug!(query = %query, hits = hits.len(), "Serper search completed");
        Ok(hits)
    }
}
