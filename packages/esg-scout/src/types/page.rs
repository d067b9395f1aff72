//! Page types - crawled pages and crawl snapshots.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Normalized text of one fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL the page was requested under
    pub url: String,

    /// Normalized visible text
    pub text: String,
}

impl PageRecord {
    /// Create a new page record.
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Check if this page has any text.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Result of one crawl pass.
///
/// `pages` keeps discovery order; `pdf_urls` keeps first-seen order and
/// never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// url -> normalized text
    pub pages: IndexMap<String, String>,

    /// ESG-looking PDF links found while crawling
    pub pdf_urls: IndexSet<String>,
}

impl CrawlOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the crawl produced neither pages nor PDFs.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.pdf_urls.is_empty()
    }

    /// Crawled URLs in discovery order.
    pub fn crawled_urls(&self) -> Vec<String> {
        self.pages.keys().cloned().collect()
    }

    /// PDF URLs in first-seen order.
    pub fn pdf_url_list(&self) -> Vec<String> {
        self.pdf_urls.iter().cloned().collect()
    }

    /// Pages as records, in discovery order.
    pub fn records(&self) -> Vec<PageRecord> {
        self.pages
            .iter()
            .map(|(url, text)| PageRecord::new(url, text))
            .collect()
    }
}
