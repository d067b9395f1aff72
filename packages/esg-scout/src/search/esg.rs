//! Off-site ESG source discovery.
//!
//! Three searches run per company name, each over a fixed battery of query
//! templates:
//!
//! - PDFs and HTML pages stop at the first template that yields anything.
//! - Snippets sample every template, a few hits each, up to a global cap, so
//!   the result spreads across E, S and G topics.
//!
//! The asymmetry is deliberate. Every search degrades to an empty list when
//! the provider is unconfigured or a query fails.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::pipeline::dedupe;
use crate::traits::searcher::{SearchHit, WebSearcher};
use crate::types::{config::SearchConfig, sources::ExternalSources};

/// Query templates for ESG report PDFs.
pub const PDF_QUERY_TEMPLATES: [&str; 8] = [
    "{name} ESG report pdf",
    "{name} sustainability report pdf",
    "{name} impact report pdf",
    "{name} environmental report pdf",
    "{name} csr report pdf",
    "{name} ESG pdf",
    "{name} sustainability pdf",
    "{name} impact pdf",
];

/// Query templates for ESG HTML pages.
pub const HTML_QUERY_TEMPLATES: [&str; 5] = [
    "{name} ESG report",
    "{name} sustainability report",
    "{name} impact report",
    "{name} ESG sustainability",
    "{name} environmental social governance",
];

/// Query templates for snippets, grouped E, then S, then G.
pub const SNIPPET_QUERY_TEMPLATES: [&str; 10] = [
    "{name} impact report climate targets net zero",
    "{name} sustainability report greenhouse gas emissions scope 1 and 2",
    "{name} sustainability report renewable energy usage",
    "{name} climate targets net zero emissions",
    "{name} diversity policy female leadership percentage",
    "{name} workforce diversity equity inclusion report",
    "{name} employee wellbeing and workplace safety programs",
    "{name} corporate governance independent board ESG oversight",
    "{name} anti-corruption policy whistleblower mechanism",
    "{name} ESG governance structure board committee",
];

/// Keywords a search hit's link or title must contain.
pub const SEARCH_KEYWORDS: [&str; 7] = [
    "esg",
    "sustainability",
    "impact",
    "csr",
    "responsibility",
    "environmental",
    "report",
];

fn render(template: &str, company_name: &str) -> String {
    template.replace("{name}", company_name)
}

/// Whether a link ends in `.pdf`, any case.
pub fn is_pdf(url: &str) -> bool {
    url.to_lowercase().ends_with(".pdf")
}

/// Whether link plus title mention an ESG keyword.
pub fn looks_esg(url: &str, title: Option<&str>) -> bool {
    let text = format!("{} {}", url, title.unwrap_or_default()).to_lowercase();
    SEARCH_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Title, snippet and link of a hit as one text block.
///
/// Returns `None` when all three are blank.
pub fn snippet_text(hit: &SearchHit) -> Option<String> {
    let parts: Vec<&str> = [
        hit.title.as_deref().unwrap_or_default(),
        hit.snippet.as_deref().unwrap_or_default(),
        hit.link.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();

    (!parts.is_empty()).then(|| parts.join("\n"))
}

/// Runs the ESG query batteries against a [`WebSearcher`].
#[derive(Clone)]
pub struct EsgSourceSearch {
    searcher: Arc<dyn WebSearcher>,
    config: SearchConfig,
}

impl EsgSourceSearch {
    /// Create a search stage with default caps.
    pub fn new(searcher: Arc<dyn WebSearcher>) -> Self {
        Self {
            searcher,
            config: SearchConfig::default(),
        }
    }

    /// Replace the result caps.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Run all three searches, one after another.
    pub async fn search_all(&self, company_name: &str) -> ExternalSources {
        if !self.searcher.is_configured() {
            info!("Search provider not configured, skipping external ESG search");
            return ExternalSources::new();
        }

        info!(company = %company_name, "Searching external web for ESG sources");

        let sources = ExternalSources {
            pdf_urls: self.search_pdfs(company_name).await,
            html_urls: self.search_html_pages(company_name).await,
            snippets: self.search_snippets(company_name).await,
        };

        info!(
            pdfs = sources.pdf_urls.len(),
            html_pages = sources.html_urls.len(),
            snippets = sources.snippets.len(),
            "External ESG search completed"
        );

        sources
    }

    /// ESG report PDFs, from the first productive template.
    pub async fn search_pdfs(&self, company_name: &str) -> Vec<String> {
        self.first_productive(
            "pdf",
            &PDF_QUERY_TEMPLATES,
            company_name,
            self.config.max_pdf_results,
            |hit| is_pdf(&hit.link) && looks_esg(&hit.link, hit.title.as_deref()),
        )
        .await
    }

    /// ESG HTML pages, from the first productive template.
    pub async fn search_html_pages(&self, company_name: &str) -> Vec<String> {
        self.first_productive(
            "html",
            &HTML_QUERY_TEMPLATES,
            company_name,
            self.config.max_html_results,
            |hit| !is_pdf(&hit.link) && looks_esg(&hit.link, hit.title.as_deref()),
        )
        .await
    }

    /// Text snippets sampled across every snippet template.
    pub async fn search_snippets(&self, company_name: &str) -> Vec<String> {
        if !self.searcher.is_configured() {
            info!("Search provider not configured, skipping snippet search");
            return Vec::new();
        }

        let max_results = self.config.max_snippets;
        let per_query = (max_results / SNIPPET_QUERY_TEMPLATES.len()).max(2);
        let mut snippets: Vec<String> = Vec::new();

        for template in SNIPPET_QUERY_TEMPLATES {
            if snippets.len() >= max_results {
                break;
            }

            let query = render(template, company_name);
            debug!(query = %query, "Snippet query");

            let taken: Vec<String> = self
                .run_query(&query)
                .await
                .iter()
                .filter_map(snippet_text)
                .take(per_query.min(max_results - snippets.len()))
                .collect();
            snippets.extend(taken);
        }

        info!(count = snippets.len(), "External ESG snippets collected");
        snippets
    }

    async fn first_productive<F>(
        &self,
        kind: &str,
        templates: &[&str],
        company_name: &str,
        max_results: usize,
        keep: F,
    ) -> Vec<String>
    where
        F: Fn(&SearchHit) -> bool,
    {
        if !self.searcher.is_configured() {
            info!(kind, "Search provider not configured, skipping search");
            return Vec::new();
        }

        let mut urls: Vec<String> = Vec::new();

        for template in templates {
            let query = render(template, company_name);
            debug!(kind, query = %query, "Search query");

            urls.extend(
                self.run_query(&query)
                    .await
                    .into_iter()
                    .filter(|hit| !hit.link.is_empty() && keep(hit))
                    .map(|hit| hit.link)
                    .take(max_results),
            );

            if !urls.is_empty() {
                break;
            }
        }

        let urls = dedupe(urls);
        info!(kind, count = urls.len(), "External ESG search results");
        urls
    }

    async fn run_query(&self, query: &str) -> Vec<SearchHit> {
        match self.searcher.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query = %query, error = %e, "Search query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearcher;

    fn search(searcher: MockSearcher) -> EsgSourceSearch {
        EsgSourceSearch::new(Arc::new(searcher))
    }

    #[test]
    fn test_filters() {
        assert!(is_pdf("https://acme.com/Report.PDF"));
        assert!(!is_pdf("https://acme.com/report.pdf?x=1"));
        assert!(looks_esg("https://acme.com/doc.pdf", Some("Annual Report")));
        assert!(!looks_esg("https://acme.com/doc.pdf", Some("Menu")));
        assert!(!looks_esg("https://acme.com/doc.pdf", None));
    }

    #[test]
    fn test_snippet_text() {
        let hit = SearchHit::new(" https://acme.com/esg ")
            .with_title("Acme ESG")
            .with_snippet("  ");
        assert_eq!(
            snippet_text(&hit).as_deref(),
            Some("Acme ESG\nhttps://acme.com/esg")
        );
        assert_eq!(snippet_text(&SearchHit::default()), None);
    }

    #[tokio::test]
    async fn test_pdf_search_stops_at_first_productive_template() {
        let searcher = MockSearcher::new()
            .with_results(
                "Acme ESG report pdf",
                vec![
                    SearchHit::new("https://acme.com/careers.html").with_title("Careers"),
                    SearchHit::new("https://acme.com/menu.pdf").with_title("Menu"),
                ],
            )
            .with_results(
                "Acme sustainability report pdf",
                vec![
                    SearchHit::new("https://acme.com/sustainability-2023.pdf"),
                    SearchHit::new("https://acme.com/sustainability-2023.pdf"),
                    SearchHit::new("https://cdn.acme.com/file.pdf").with_title("Impact Report"),
                ],
            )
            .with_results(
                "Acme impact report pdf",
                vec![SearchHit::new("https://acme.com/impact.pdf")],
            );

        let s = search(searcher.clone());
        let pdfs = s.search_pdfs("Acme").await;

        assert_eq!(
            pdfs,
            vec![
                "https://acme.com/sustainability-2023.pdf",
                "https://cdn.acme.com/file.pdf",
            ]
        );
        assert_eq!(searcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_html_search_excludes_pdfs_and_caps_results() {
        let hits: Vec<SearchHit> = (0..8)
            .map(|i| SearchHit::new(format!("https://acme.com/esg/{i}")))
            .chain(std::iter::once(SearchHit::new("https://acme.com/esg.pdf")))
            .collect();
        let searcher = MockSearcher::new().with_results("Acme ESG report", hits);

        let pages = search(searcher).search_html_pages("Acme").await;

        assert_eq!(pages.len(), 5);
        assert!(pages.iter().all(|u| !u.ends_with(".pdf")));
    }

    #[tokio::test]
    async fn test_failed_queries_are_skipped() {
        let searcher = MockSearcher::new()
            .with_failure("Acme ESG report pdf")
            .with_results(
                "Acme sustainability report pdf",
                vec![SearchHit::new("https://acme.com/esg.pdf")],
            );

        let pdfs = search(searcher).search_pdfs("Acme").await;
        assert_eq!(pdfs, vec!["https://acme.com/esg.pdf"]);
    }

    #[tokio::test]
    async fn test_snippets_sample_every_template() {
        let mut searcher = MockSearcher::new();
        for template in SNIPPET_QUERY_TEMPLATES {
            let query = render(template, "Acme");
            let hits = (0..4)
                .map(|i| {
                    SearchHit::new(format!("https://news.test/{i}"))
                        .with_title(format!("{query} #{i}"))
                })
                .collect();
            searcher = searcher.with_results(&query, hits);
        }

        let s = search(searcher.clone());
        let snippets = s.search_snippets("Acme").await;

        // 2 per template until the cap of 15
        assert_eq!(snippets.len(), 15);
        assert!(snippets[0].starts_with("Acme impact report climate targets net zero #0"));
        assert!(snippets[1].contains("#1"));
        assert!(snippets[2].starts_with("Acme sustainability report greenhouse"));
        assert_eq!(searcher.calls().len(), 8);
    }

    #[tokio::test]
    async fn test_unconfigured_searcher_skips_everything() {
        let searcher = MockSearcher::unconfigured();
        let sources = search(searcher.clone()).search_all("Acme").await;

        assert!(sources.is_empty());
        assert!(searcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_all_runs_three_batteries() {
        let searcher = MockSearcher::new()
            .with_results(
                "Acme ESG report pdf",
                vec![SearchHit::new("https://acme.com/esg.pdf")],
            )
            .with_results(
                "Acme ESG report",
                vec![SearchHit::new("https://acme.com/esg").with_title("ESG")],
            )
            .with_results(
                "Acme climate targets net zero emissions",
                vec![SearchHit::new("https://news.test/acme").with_snippet("Net zero by 2040")],
            );

        let sources = search(searcher).search_all("Acme").await;

        assert_eq!(sources.pdf_urls, vec!["https://acme.com/esg.pdf"]);
        assert_eq!(sources.html_urls, vec!["https://acme.com/esg"]);
        assert_eq!(
            sources.snippets,
            vec!["Net zero by 2040\nhttps://news.test/acme"]
        );
    }
}
