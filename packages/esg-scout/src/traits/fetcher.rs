//! Fetcher trait for raw HTTP retrieval.
//!
//! Every network read in the pipeline (crawl pages, external pages, PDFs,
//! the domain lookup search page) goes through [`PageFetcher`], so tests can
//! swap in [`MockFetcher`](crate::testing::MockFetcher) and never touch the
//! network.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::FetchResult;

/// Client identifier sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; ESGScraper/1.0)";

/// Single-shot GET retrieval with a per-call timeout.
///
/// Implementations make exactly one attempt. Non-2xx responses, timeouts and
/// transport failures are all `Err`; retry policy belongs to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a URL and return the response body as text.
    async fn fetch_html(&self, url: &str, timeout: Duration) -> FetchResult<String>;

    /// Fetch a URL and return the raw response bytes.
    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> FetchResult<Vec<u8>>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
