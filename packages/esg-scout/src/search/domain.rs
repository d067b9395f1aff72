//! Company name to official website, via DuckDuckGo's HTML results page.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::ingestors::extract_anchors;
use crate::traits::fetcher::PageFetcher;

const SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";
const SEARCH_HOST: &str = "duckduckgo.com";

/// Unwrap a DuckDuckGo redirect link to its target.
///
/// Links on other hosts are returned unchanged. A DuckDuckGo link without a
/// parseable `uddg` parameter yields `None`.
pub fn unwrap_redirect(link: &Url) -> Option<Url> {
    let host = link.host_str().unwrap_or_default();
    if !host.contains(SEARCH_HOST) {
        return Some(link.clone());
    }

    link.query_pairs()
        .find(|(key, _)| key == "uddg")
        .and_then(|(_, target)| Url::parse(&target).ok())
}

/// Guesses a company's website from its name.
#[derive(Clone)]
pub struct DomainResolver {
    fetcher: Arc<dyn PageFetcher>,
    endpoint: String,
    timeout: Duration,
}

impl DomainResolver {
    /// Create a resolver with the default 10 second timeout.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            endpoint: SEARCH_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the search endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Search URL issued for a company name.
    pub fn search_url(&self, company_name: &str) -> Option<Url> {
        let query = format!("{company_name} official site");
        Url::parse_with_params(&self.endpoint, [("q", query.as_str())]).ok()
    }

    /// Return `https://<host>` of the first external result, if any.
    ///
    /// Any fetch failure, or a results page without a usable link, gives
    /// `None`.
    pub async fn lookup_domain(&self, company_name: &str) -> Option<String> {
        let search_url = self.search_url(company_name)?;
        debug!(company = %company_name, url = %search_url, "Domain lookup");

        let html = match self
            .fetcher
            .fetch_html(search_url.as_str(), self.timeout)
            .await
        {
            Ok(html) => html,
            Err(e) => {
                warn!(company = %company_name, error = %e, "Domain lookup request failed");
                return None;
            }
        };

        let found = extract_anchors(&html, &search_url)
            .into_iter()
            .filter_map(|anchor| unwrap_redirect(&anchor.url))
            .find_map(|target| {
                let host = target.host_str()?;
                if host.contains(SEARCH_HOST) {
                    return None;
                }
                Some(match target.port() {
                    Some(port) => format!("https://{host}:{port}"),
                    None => format!("https://{host}"),
                })
            });

        match &found {
            Some(site) => info!(company = %company_name, site = %site, "Detected official site"),
            None => info!(company = %company_name, "No official site found"),
        }

        found
    }
}
