//! Sources found through external web search.

use serde::{Deserialize, Serialize};

/// Off-site ESG material discovered for a company name.
///
/// Empty when no company name is known or no search provider is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSources {
    /// ESG report PDFs
    pub pdf_urls: Vec<String>,

    /// ESG HTML pages
    pub html_urls: Vec<String>,

    /// Search-result text (title, snippet, link)
    pub snippets: Vec<String>,
}

impl ExternalSources {
    /// Create an empty set of sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the search found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.pdf_urls.is_empty() && self.html_urls.is_empty() && self.snippets.is_empty()
    }
}
