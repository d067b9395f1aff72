//! Breadth-first crawler for one company site.
//!
//! Traversal is sequential: each fetch may discover the next links, and the
//! frontier order is the BFS order. Subdomains of the root count as the same
//! site. PDF links are collected on the side and never crawled.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::ingestors::{extract_anchors, html_to_text, Anchor};
use crate::traits::fetcher::PageFetcher;
use crate::types::{config::CrawlConfig, page::CrawlOutcome};

/// URL keywords that mark a page or PDF as ESG-related.
pub const CRAWL_KEYWORDS: [&str; 8] = [
    "sustainability",
    "esg",
    "responsibility",
    "impact",
    "environment",
    "governance",
    "social",
    "csr",
];

/// Extra anchor-text words that qualify a PDF link.
const PDF_ANCHOR_WORDS: [&str; 3] = ["report", "annual", "impact"];

/// Last two labels of the URL's host, lowercased, port ignored.
///
/// `https://about.acme.com` and `https://www.acme.com:8443` both give
/// `acme.com`. Returns an empty string when the URL has no host.
pub fn root_domain(url: &str) -> String {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
    else {
        return String::new();
    };

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        host
    }
}

/// Whether two URLs belong to the same site, subdomains included.
pub fn is_same_domain(base_url: &str, target_url: &str) -> bool {
    let base = root_domain(base_url);
    !base.is_empty() && base == root_domain(target_url)
}

/// Relevance filter for HTML links.
///
/// With `esg_only` the URL must contain one of [`CRAWL_KEYWORDS`];
/// otherwise every URL passes.
pub fn looks_relevant(url: &str, esg_only: bool) -> bool {
    if !esg_only {
        return true;
    }
    let lower = url.to_lowercase();
    CRAWL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whether a link points at a PDF (path ends in `.pdf`, any case).
pub fn is_pdf_link(url: &Url) -> bool {
    url.path().to_lowercase().ends_with(".pdf")
}

/// Whether a PDF link looks like ESG material, by URL or anchor text.
pub fn is_esg_pdf(anchor: &Anchor) -> bool {
    let url = anchor.url.as_str().to_lowercase();
    let text = anchor.text.to_lowercase();

    CRAWL_KEYWORDS.iter().any(|k| url.contains(k))
        || CRAWL_KEYWORDS
            .iter()
            .chain(PDF_ANCHOR_WORDS.iter())
            .any(|k| text.contains(k))
}

/// Crawls one site through a [`PageFetcher`].
///
/// # Example
///
/// ```rust,ignore
/// use esg_scout::crawlers::SiteCrawler;
/// use esg_scout::types::config::CrawlConfig;
///
/// let crawler = SiteCrawler::new(Arc::new(HttpFetcher::new()?));
/// let outcome = crawler.crawl("https://acme.com", &CrawlConfig::focused()).await;
/// ```
#[derive(Clone)]
pub struct SiteCrawler {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
}

impl SiteCrawler {
    /// Create a crawler with the default 15 second page timeout.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            timeout: Duration::from_secs(15),
        }
    }

    /// Set the per-page timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one bounded crawl pass from `root_url`.
    ///
    /// Never fails: unreachable pages are skipped, and an unreachable root
    /// yields an empty outcome.
    pub async fn crawl(&self, root_url: &str, config: &CrawlConfig) -> CrawlOutcome {
        info!(
            url = %root_url,
            max_pages = config.max_pages,
            max_depth = config.max_depth,
            esg_only = config.esg_only,
            "Site crawl starting"
        );

        let mut outcome = CrawlOutcome::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut enqueued: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<(String, usize)> = VecDeque::new();

        enqueued.insert(root_url.to_string());
        // "https://acme.com" and the "https://acme.com/" a link resolves to are one page
        if let Ok(normalized) = Url::parse(root_url) {
            enqueued.insert(normalized.to_string());
        }
        frontier.push_back((root_url.to_string(), 0));

        while outcome.pages.len() < config.max_pages {
            let Some((url, depth)) = frontier.pop_front() else {
                break;
            };

            if depth > config.max_depth || !visited.insert(url.clone()) {
                continue;
            }

            debug!(url = %url, depth, pages_so_far = outcome.pages.len(), "Fetching page");

            let html = match self.fetcher.fetch_html(&url, self.timeout).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to fetch page");
                    continue;
                }
            };

            outcome.pages.insert(url.clone(), html_to_text(&html));

            let Ok(page_url) = Url::parse(&url) else {
                continue;
            };

            let mut queued_here = 0usize;
            for anchor in extract_anchors(&html, &page_url) {
                if is_pdf_link(&anchor.url) {
                    if is_esg_pdf(&anchor) {
                        outcome.pdf_urls.insert(anchor.url.to_string());
                    }
                    continue;
                }

                if depth + 1 > config.max_depth {
                    continue;
                }

                let target = anchor.url.to_string();
                if !is_same_domain(root_url, &target)
                    || visited.contains(&target)
                    || enqueued.contains(&target)
                    || !looks_relevant(&target, config.esg_only)
                {
                    continue;
                }

                if frontier.len() >= config.max_frontier {
                    debug!(url = %target, max_frontier = config.max_frontier, "Frontier full, dropping link");
                    continue;
                }

                enqueued.insert(target.clone());
                frontier.push_back((target, depth + 1));
                queued_here += 1;
            }

            debug!(url = %url, queued = queued_here, frontier = frontier.len(), "Links scanned");
        }

        info!(
            url = %root_url,
            pages = outcome.pages.len(),
            pdfs = outcome.pdf_urls.len(),
            urls_visited = visited.len(),
            "Site crawl completed"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    fn anchor(url: &str, text: &str) -> Anchor {
        Anchor {
            url: Url::parse(url).unwrap(),
            text: text.to_string(),
        }
    }

    fn page(links: &[(&str, &str)]) -> String {
        let body: String = links
            .iter()
            .map(|(href, text)| format!(r#"<a href="{href}">{text}</a>"#))
            .collect();
        format!("<html><body><p>content</p>{body}</body></html>")
    }

    #[test]
    fn test_root_domain() {
        assert_eq!(root_domain("https://www.netflix.com"), "netflix.com");
        assert_eq!(root_domain("https://about.netflix.com/en"), "netflix.com");
        assert_eq!(root_domain("https://Corporate.Apple.com:8443/x"), "apple.com");
        assert_eq!(root_domain("http://localhost:3000"), "localhost");
        assert_eq!(root_domain("not a url"), "");
    }

    #[test]
    fn test_is_same_domain() {
        assert!(is_same_domain("https://about.acme.com", "https://acme.com"));
        assert!(!is_same_domain("https://acme.com", "https://other.com"));
        assert!(!is_same_domain("garbage", "also garbage"));
    }

    #[test]
    fn test_looks_relevant() {
        assert!(looks_relevant("https://acme.com/sustainability/report", true));
        assert!(!looks_relevant("https://acme.com/careers", true));
        assert!(looks_relevant("https://acme.com/sustainability/report", false));
        assert!(looks_relevant("https://acme.com/careers", false));
        assert!(looks_relevant("https://acme.com/Our-ESG-Story", true));
    }

    #[test]
    fn test_pdf_classification() {
        assert!(is_pdf_link(&Url::parse("https://acme.com/files/Report.PDF?v=2").unwrap()));
        assert!(!is_pdf_link(&Url::parse("https://acme.com/pdf-library").unwrap()));

        assert!(is_esg_pdf(&anchor("https://acme.com/csr-2023.pdf", "Download")));
        assert!(is_esg_pdf(&anchor("https://acme.com/doc123.pdf", "Annual Report 2023")));
        assert!(!is_esg_pdf(&anchor("https://acme.com/menu.pdf", "Lunch menu")));
    }

    #[tokio::test]
    async fn test_focused_crawl_follows_esg_links_only() {
        let fetcher = MockFetcher::new()
            .with_html(
                "https://www.acme.com",
                page(&[
                    ("/sustainability", "Sustainability"),
                    ("/careers", "Careers"),
                    ("https://about.acme.com/impact", "Impact"),
                    ("https://other.com/esg", "Elsewhere"),
                    ("/files/esg-2023.pdf", "Download"),
                    ("/files/menu.pdf", "Menu"),
                ]),
            )
            .with_html("https://www.acme.com/sustainability", page(&[("/", "Home")]))
            .with_html("https://about.acme.com/impact", page(&[]));

        let crawler = SiteCrawler::new(Arc::new(fetcher.clone()));
        let outcome = crawler
            .crawl("https://www.acme.com", &CrawlConfig::focused())
            .await;

        assert_eq!(
            outcome.crawled_urls(),
            vec![
                "https://www.acme.com",
                "https://www.acme.com/sustainability",
                "https://about.acme.com/impact",
            ]
        );
        assert_eq!(
            outcome.pdf_url_list(),
            vec!["https://www.acme.com/files/esg-2023.pdf"]
        );
        assert_eq!(fetcher.call_count("https://www.acme.com/careers"), 0);
        assert_eq!(fetcher.call_count("https://other.com/esg"), 0);
        // the "/" link back to the root is not refetched
        assert_eq!(fetcher.call_count("https://www.acme.com/"), 0);
    }

    #[tokio::test]
    async fn test_broad_crawl_accepts_any_same_site_link() {
        let fetcher = MockFetcher::new()
            .with_html(
                "https://acme.com",
                page(&[("/careers", "Careers"), ("/about", "About")]),
            )
            .with_html("https://acme.com/careers", page(&[]))
            .with_html("https://acme.com/about", page(&[]));

        let outcome = SiteCrawler::new(Arc::new(fetcher))
            .crawl("https://acme.com", &CrawlConfig::broad())
            .await;

        assert_eq!(outcome.page_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_pages_are_skipped_not_fatal() {
        let fetcher = MockFetcher::new()
            .with_html(
                "https://acme.com",
                page(&[("/esg", "ESG"), ("/impact", "Impact")]),
            )
            .with_failure("https://acme.com/esg", 500)
            .with_html("https://acme.com/impact", page(&[("/esg", "ESG again")]));

        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl("https://acme.com", &CrawlConfig::focused())
            .await;

        assert_eq!(
            outcome.crawled_urls(),
            vec!["https://acme.com", "https://acme.com/impact"]
        );
        assert_eq!(fetcher.call_count("https://acme.com/esg"), 1);
    }

    #[tokio::test]
    async fn test_unreachable_root_gives_empty_outcome() {
        let outcome = SiteCrawler::new(Arc::new(MockFetcher::new()))
            .crawl("https://acme.com", &CrawlConfig::focused())
            .await;
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_page_budget_is_respected() {
        let links: Vec<(String, String)> = (0..20)
            .map(|i| (format!("/esg/{i}"), format!("ESG {i}")))
            .collect();
        let link_refs: Vec<(&str, &str)> = links
            .iter()
            .map(|(h, t)| (h.as_str(), t.as_str()))
            .collect();

        let mut fetcher = MockFetcher::new().with_html("https://acme.com", page(&link_refs));
        for i in 0..20 {
            fetcher = fetcher.with_html(&format!("https://acme.com/esg/{i}"), page(&[]));
        }

        let config = CrawlConfig::focused().with_max_pages(5);
        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl("https://acme.com", &config)
            .await;

        assert_eq!(outcome.page_count(), 5);
        assert_eq!(fetcher.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_depth_bound_is_respected() {
        let fetcher = MockFetcher::new()
            .with_html("https://acme.com", page(&[("/esg", "ESG")]))
            .with_html("https://acme.com/esg", page(&[("/esg/deeper", "Deeper")]))
            .with_html(
                "https://acme.com/esg/deeper",
                page(&[("/esg/deepest", "Deepest")]),
            )
            .with_html("https://acme.com/esg/deepest", page(&[]));

        let config = CrawlConfig::focused().with_max_depth(1);
        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl("https://acme.com", &config)
            .await;

        assert_eq!(
            outcome.crawled_urls(),
            vec!["https://acme.com", "https://acme.com/esg"]
        );
        assert_eq!(fetcher.call_count("https://acme.com/esg/deeper"), 0);
    }

    #[tokio::test]
    async fn test_frontier_cap_drops_extra_links() {
        let fetcher = MockFetcher::new()
            .with_html(
                "https://acme.com",
                page(&[("/esg/a", "a"), ("/esg/b", "b"), ("/esg/c", "c")]),
            )
            .with_html("https://acme.com/esg/a", page(&[]))
            .with_html("https://acme.com/esg/b", page(&[]))
            .with_html("https://acme.com/esg/c", page(&[]));

        let config = CrawlConfig::focused().with_max_frontier(2);
        let outcome = SiteCrawler::new(Arc::new(fetcher))
            .crawl("https://acme.com", &config)
            .await;

        assert_eq!(
            outcome.crawled_urls(),
            vec![
                "https://acme.com",
                "https://acme.com/esg/a",
                "https://acme.com/esg/b",
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_links_fetched_once() {
        let fetcher = MockFetcher::new()
            .with_html(
                "https://acme.com",
                page(&[
                    ("/esg", "ESG"),
                    ("/esg#targets", "Targets"),
                    ("/esg", "ESG again"),
                    ("/report.pdf", "Annual report"),
                    ("/report.pdf", "Annual report"),
                ]),
            )
            .with_html("https://acme.com/esg", page(&[("/report.pdf", "Report")]));

        let outcome = SiteCrawler::new(Arc::new(fetcher.clone()))
            .crawl("https://acme.com", &CrawlConfig::focused())
            .await;

        assert_eq!(fetcher.call_count("https://acme.com/esg"), 1);
        assert_eq!(outcome.pdf_urls.len(), 1);
    }
}
