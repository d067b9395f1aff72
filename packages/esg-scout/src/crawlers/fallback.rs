//! Focused-then-broad crawl strategy.

use tracing::info;

use super::site::SiteCrawler;
use crate::types::{config::FallbackPolicy, page::CrawlOutcome};

impl SiteCrawler {
    /// Crawl ESG-focused first, and broadly only if that found too little.
    ///
    /// The focused pass is accepted with at least `policy.min_pages` pages or
    /// any PDF. Otherwise the broad pass runs, and its pages and PDFs are each
    /// preferred when non-empty.
    pub async fn crawl_with_fallback(&self, root_url: &str, policy: &FallbackPolicy) -> CrawlOutcome {
        let focused = self.crawl(root_url, &policy.focused).await;

        if focused.page_count() >= policy.min_pages || !focused.pdf_urls.is_empty() {
            info!(
                pages = focused.page_count(),
                pdfs = focused.pdf_urls.len(),
                "ESG-focused crawl accepted"
            );
            return focused;
        }

        info!(
            pages = focused.page_count(),
            pdfs = focused.pdf_urls.len(),
            min_pages = policy.min_pages,
            "ESG-focused crawl insufficient, falling back to broad crawl"
        );

        let broad = self.crawl(root_url, &policy.broad).await;

        info!(
            pages = broad.page_count(),
            pdfs = broad.pdf_urls.len(),
            "Broad crawl completed"
        );

        CrawlOutcome {
            pages: if broad.pages.is_empty() {
                focused.pages
            } else {
                broad.pages
            },
            pdf_urls: if broad.pdf_urls.is_empty() {
                focused.pdf_urls
            } else {
                broad.pdf_urls
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use std::sync::Arc;

    fn links(hrefs: &[&str]) -> String {
        let body: String = hrefs
            .iter()
            .map(|h| format!(r#"<a href="{h}">link</a>"#))
            .collect();
        format!("<html><body><p>text</p>{body}</body></html>")
    }

    #[tokio::test]
    async fn test_focused_result_accepted_with_enough_pages() {
        let fetcher = MockFetcher::new()
            .with_html("https://acme.com", links(&["/esg", "/impact", "/careers"]))
            .with_html("https://acme.com/esg", links(&[]))
            .with_html("https://acme.com/impact", links(&[]))
            .with_html("https://acme.com/careers", links(&[]));

        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl_with_fallback("https://acme.com", &FallbackPolicy::default())
            .await;

        assert_eq!(outcome.page_count(), 3);
        assert_eq!(fetcher.call_count("https://acme.com"), 1);
        assert_eq!(fetcher.call_count("https://acme.com/careers"), 0);
    }

    #[tokio::test]
    async fn test_single_pdf_is_enough_to_accept() {
        let fetcher = MockFetcher::new().with_html("https://acme.com", links(&["/esg-report.pdf"]));

        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl_with_fallback("https://acme.com", &FallbackPolicy::default())
            .await;

        assert_eq!(outcome.page_count(), 1);
        assert_eq!(outcome.pdf_urls.len(), 1);
        assert_eq!(fetcher.call_count("https://acme.com"), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_broad_crawl() {
        let fetcher = MockFetcher::new()
            .with_html("https://acme.com", links(&["/about", "/products"]))
            .with_html("https://acme.com/about", links(&[]))
            .with_html("https://acme.com/products", links(&[]));

        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl_with_fallback("https://acme.com", &FallbackPolicy::default())
            .await;

        assert_eq!(
            outcome.crawled_urls(),
            vec![
                "https://acme.com",
                "https://acme.com/about",
                "https://acme.com/products",
            ]
        );
        assert_eq!(fetcher.call_count("https://acme.com"), 2);
    }

    #[tokio::test]
    async fn test_unreachable_site_stays_empty() {
        let fetcher = MockFetcher::new();

        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl_with_fallback("https://acme.com", &FallbackPolicy::default())
            .await;

        assert!(outcome.is_empty());
        assert_eq!(fetcher.calls().len(), 2);
    }
}
