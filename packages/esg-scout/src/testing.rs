//! Testing utilities including mock implementations.
//!
//! These let applications (and this crate's own tests) run the full pipeline
//! without network access or language model calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{AiError, AiResult, FetchError, FetchResult, SearchError, SearchResult};
use crate::traits::{
    ai::{Explainer, SignalExtractor},
    fetcher::PageFetcher,
    searcher::{SearchHit, WebSearcher},
};
use crate::types::{scores::EsgScores, signals::EsgSignals};

#[derive(Debug, Clone)]
enum MockResponse {
    Html(String),
    Bytes(Vec<u8>),
    Status(u16),
    Timeout,
}

/// A mock fetcher serving canned responses by exact URL.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Default, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a fetcher with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(self, url: &str, response: MockResponse) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    /// Serve an HTML body for a URL.
    pub fn with_html(self, url: &str, html: impl Into<String>) -> Self {
        self.insert(url, MockResponse::Html(html.into()))
    }

    /// Serve raw bytes for a URL.
    pub fn with_bytes(self, url: &str, bytes: Vec<u8>) -> Self {
        self.insert(url, MockResponse::Bytes(bytes))
    }

    /// Answer a URL with a non-2xx status.
    pub fn with_failure(self, url: &str, status: u16) -> Self {
        self.insert(url, MockResponse::Status(status))
    }

    /// Make a URL time out.
    pub fn with_timeout(self, url: &str) -> Self {
        self.insert(url, MockResponse::Timeout)
    }

    /// Delay the response for a URL.
    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(url.to_string(), delay);
        self
    }

    /// URLs requested so far, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of times a URL was requested.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }

    async fn respond(&self, url: &str) -> FetchResult<MockResponse> {
        self.calls.write().unwrap().push(url.to_string());

        let delay = self.delays.read().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MockResponse::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Some(other) => Ok(other),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_html(&self, url: &str, _timeout: Duration) -> FetchResult<String> {
        match self.respond(url).await? {
            MockResponse::Html(html) => Ok(html),
            MockResponse::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            _ => unreachable!("error responses handled in respond"),
        }
    }

    async fn fetch_bytes(&self, url: &str, _timeout: Duration) -> FetchResult<Vec<u8>> {
        match self.respond(url).await? {
            MockResponse::Html(html) => Ok(html.into_bytes()),
            MockResponse::Bytes(bytes) => Ok(bytes),
            _ => unreachable!("error responses handled in respond"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock search provider with canned hits per exact query.
///
/// Unknown queries return no hits.
#[derive(Clone)]
pub struct MockSearcher {
    results: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,
    failing: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
    configured: bool,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self {
            results: Arc::default(),
            failing: Arc::default(),
            calls: Arc::default(),
            configured: true,
        }
    }
}

impl MockSearcher {
    /// Create a configured searcher with no canned results.
    pub fn new() -> Self {
        Self::default()
    }

    /// A searcher that reports itself as lacking credentials.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    /// Add hits for a query.
    pub fn with_results(self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.results
            .write()
            .unwrap()
            .insert(query.to_string(), hits);
        self
    }

    /// Make a query fail with an API error.
    pub fn with_failure(self, query: &str) -> Self {
        self.failing.write().unwrap().push(query.to_string());
        self
    }

    /// Queries issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str) -> SearchResult<Vec<SearchHit>> {
        self.calls.write().unwrap().push(query.to_string());

        if !self.configured {
            return Err(SearchError::NotConfigured);
        }
        if self.failing.read().unwrap().iter().any(|q| q == query) {
            return Err(SearchError::Api { status: 500 });
        }

        Ok(self
            .results
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[derive(Clone)]
enum ExtractorBehavior {
    Signals(EsgSignals),
    Raw(String),
    Fail,
}

/// A mock signal extractor that records the corpus it was given.
#[derive(Clone)]
pub struct MockSignalExtractor {
    behavior: ExtractorBehavior,
    corpora: Arc<RwLock<Vec<String>>>,
}

impl Default for MockSignalExtractor {
    fn default() -> Self {
        Self::new(EsgSignals::default())
    }
}

impl MockSignalExtractor {
    /// Always return these signals.
    pub fn new(signals: EsgSignals) -> Self {
        Self {
            behavior: ExtractorBehavior::Signals(signals),
            corpora: Arc::default(),
        }
    }

    /// Pretend the model answered with this raw text.
    pub fn from_raw_output(raw: impl Into<String>) -> Self {
        Self {
            behavior: ExtractorBehavior::Raw(raw.into()),
            corpora: Arc::default(),
        }
    }

    /// Always fail the call.
    pub fn failing() -> Self {
        Self {
            behavior: ExtractorBehavior::Fail,
            corpora: Arc::default(),
        }
    }

    /// Corpora received so far.
    pub fn corpora(&self) -> Vec<String> {
        self.corpora.read().unwrap().clone()
    }

    /// Number of extraction calls.
    pub fn call_count(&self) -> usize {
        self.corpora.read().unwrap().len()
    }
}

#[async_trait]
impl SignalExtractor for MockSignalExtractor {
    async fn extract_signals(&self, corpus: &str) -> AiResult<EsgSignals> {
        self.corpora.write().unwrap().push(corpus.to_string());
        match &self.behavior {
            ExtractorBehavior::Signals(signals) => Ok(signals.clone()),
            ExtractorBehavior::Raw(raw) => Ok(EsgSignals::from_model_output(raw)),
            ExtractorBehavior::Fail => Err(AiError::Network("mock extractor offline".into())),
        }
    }
}

/// Record of a call made to the mock explainer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainCall {
    pub root_url: String,
    pub signals: EsgSignals,
    pub scores: EsgScores,
}

/// A mock explainer returning fixed text.
#[derive(Clone)]
pub struct MockExplainer {
    response: Option<String>,
    calls: Arc<RwLock<Vec<ExplainCall>>>,
}

impl Default for MockExplainer {
    fn default() -> Self {
        Self::new("Mock ESG narrative.")
    }
}

impl MockExplainer {
    /// Always answer with this narrative.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            calls: Arc::default(),
        }
    }

    /// Always fail the call.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::default(),
        }
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<ExplainCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Explainer for MockExplainer {
    async fn explain(
        &self,
        root_url: &str,
        signals: &EsgSignals,
        scores: &EsgScores,
    ) -> AiResult<String> {
        self.calls.write().unwrap().push(ExplainCall {
            root_url: root_url.to_string(),
            signals: signals.clone(),
            scores: *scores,
        });
        self.response
            .clone()
            .ok_or_else(|| AiError::Api("mock explainer unavailable".into()))
    }
}
