//! Configuration types for crawling, searching and aggregation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ScoutError};

/// Configuration for a single crawl pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum number of pages stored (successfully fetched) per pass
    pub max_pages: usize,

    /// Maximum hop count from the root URL (0 = root only)
    pub max_depth: usize,

    /// Only follow links whose URL contains an ESG keyword
    pub esg_only: bool,

    /// Hard cap on queued-but-unvisited URLs.
    ///
    /// Dense pages can link to thousands of same-site URLs; anything beyond
    /// this cap is dropped at enqueue time.
    pub max_frontier: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 15,
            max_depth: 2,
            esg_only: true,
            max_frontier: 1_000,
        }
    }
}

impl CrawlConfig {
    /// ESG-focused pass (first attempt).
    pub fn focused() -> Self {
        Self::default()
    }

    /// Broad same-site pass (fallback).
    pub fn broad() -> Self {
        Self {
            max_pages: 10,
            max_depth: 1,
            esg_only: false,
            ..Self::default()
        }
    }

    /// Set the page budget.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Toggle the ESG relevance filter.
    pub fn with_esg_only(mut self, esg_only: bool) -> Self {
        self.esg_only = esg_only;
        self
    }

    /// Set the frontier cap.
    pub fn with_max_frontier(mut self, max_frontier: usize) -> Self {
        self.max_frontier = max_frontier;
        self
    }
}

/// When to abandon the focused crawl and run the broad one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackPolicy {
    /// First pass
    pub focused: CrawlConfig,

    /// Second pass, run only when the first is insufficient
    pub broad: CrawlConfig,

    /// The focused pass is accepted with at least this many pages
    /// (or at least one PDF).
    pub min_pages: usize,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            focused: CrawlConfig::focused(),
            broad: CrawlConfig::broad(),
            min_pages: 3,
        }
    }
}

/// Per-request timeouts, by caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// HTML page fetches (crawl and external pages)
    pub html: Duration,

    /// PDF downloads
    pub pdf: Duration,

    /// Search API calls
    pub search: Duration,

    /// Domain lookup search
    pub domain_lookup: Duration,

    /// Language model calls (signal extraction and explanation)
    pub model: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            html: Duration::from_secs(15),
            pdf: Duration::from_secs(40),
            search: Duration::from_secs(20),
            domain_lookup: Duration::from_secs(10),
            model: Duration::from_secs(120),
        }
    }
}

/// Configuration for the source aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Concurrent workers for PDF and external HTML fetches
    pub max_workers: usize,

    /// Chunk window size, in characters
    pub chunk_size: usize,

    /// Characters of trailing context repeated at the start of the next chunk
    pub overlap: usize,

    /// Character budget for the text handed to the signal extractor
    pub max_extraction_chars: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            chunk_size: 2000,
            overlap: 200,
            max_extraction_chars: 50_000,
        }
    }
}

/// Result caps for the external search stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// PDF links kept from the first productive template
    pub max_pdf_results: usize,

    /// HTML links kept from the first productive template
    pub max_html_results: usize,

    /// Global snippet cap across all snippet templates
    pub max_snippets: usize,

    /// Results requested from the search API per query
    pub results_per_query: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_pdf_results: 5,
            max_html_results: 5,
            max_snippets: 15,
            results_per_query: 10,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoutConfig {
    pub fallback: FallbackPolicy,
    pub timeouts: TimeoutConfig,
    pub aggregator: AggregatorConfig,
    pub search: SearchConfig,
}

impl ScoutConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replace the timeouts.
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Replace the aggregator settings.
    pub fn with_aggregator(mut self, aggregator: AggregatorConfig) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Replace the search caps.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let agg = &self.aggregator;
        if agg.max_workers == 0 {
            return Err(ScoutError::invalid_config("max_workers must be at least 1"));
        }
        if agg.chunk_size == 0 {
            return Err(ScoutError::invalid_config("chunk_size must be at least 1"));
        }
        if agg.overlap >= agg.chunk_size {
            return Err(ScoutError::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                agg.overlap, agg.chunk_size
            )));
        }
        Ok(())
    }
}
