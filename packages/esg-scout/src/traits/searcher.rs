//! Web searcher trait for off-site discovery.
//!
//! The ESG search stage issues many small queries ("<company> ESG report
//! pdf", "<company> anti-corruption policy", ...) and filters the hits
//! itself. This trait only abstracts the provider call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

/// One organic search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result URL (may be empty if the provider omitted it)
    pub link: String,

    /// Result title
    pub title: Option<String>,

    /// Result description text
    pub snippet: Option<String>,
}

impl SearchHit {
    /// Create a hit for a URL.
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// General web search provider.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Run one query and return organic results in rank order.
    async fn search(&self, query: &str) -> SearchResult<Vec<SearchHit>>;

    /// Whether this searcher can issue queries at all.
    ///
    /// Callers skip the whole search stage when this is false rather than
    /// issuing queries that are guaranteed to come back empty.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Searcher used when no search credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSearcher;

#[async_trait]
impl WebSearcher for NoopSearcher {
    async fn search(&self, _query: &str) -> SearchResult<Vec<SearchHit>> {
        tracing::warn!("NoopSearcher: search called but no search API key configured");
        Err(SearchError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}
