//! End-to-end scoring run.
//!
//! ```text
//! normalize_input ─► crawl_with_fallback ─┐
//!                    search_all ──────────┴─► build_corpus ─► extract ─► score ─► explain
//! ```
//!
//! The crawl and the external search run concurrently. Everything after the
//! corpus is sequential.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::aggregate::SourceAggregator;
use super::input::{normalize_input, NormalizedInput};
use super::score::compute_esg_scores;
use crate::crawlers::SiteCrawler;
use crate::error::Result;
use crate::ingestors::PdfExtractor;
use crate::search::{DomainResolver, EsgSourceSearch};
use crate::traits::{
    ai::{Explainer, SignalExtractor},
    fetcher::PageFetcher,
    searcher::WebSearcher,
};
use crate::types::{
    config::ScoutConfig,
    page::CrawlOutcome,
    result::{
        RatingStatus, ScoreResult, EXPLANATION_UNAVAILABLE, LOW_CONFIDENCE_EXPLANATION,
        NO_RATING_EXPLANATION,
    },
    scores::EsgScores,
    signals::EsgSignals,
    sources::ExternalSources,
};

/// Fewest evidence points for which a narrative is requested.
pub const MIN_EVIDENCE_FOR_EXPLANATION: usize = 3;

/// External collaborators of a scoring run.
///
/// Built once at startup and shared; every run borrows the same handles.
#[derive(Clone)]
pub struct ScoutDeps {
    pub fetcher: Arc<dyn PageFetcher>,
    pub searcher: Arc<dyn WebSearcher>,
    pub extractor: Arc<dyn SignalExtractor>,
    pub explainer: Arc<dyn Explainer>,
}

impl ScoutDeps {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        searcher: Arc<dyn WebSearcher>,
        extractor: Arc<dyn SignalExtractor>,
        explainer: Arc<dyn Explainer>,
    ) -> Self {
        Self {
            fetcher,
            searcher,
            extractor,
            explainer,
        }
    }
}

/// Scores companies. Stateless between runs.
///
/// # Example
///
/// ```rust,ignore
/// use esg_scout::{Scout, ScoutConfig, ScoutDeps};
///
/// let scout = Scout::new(deps, ScoutConfig::default())?;
/// let input = scout.normalize_input("patagonia").await?;
/// let result = scout.score_website(&input.url, input.company_hint.as_deref()).await?;
/// println!("total: {}", result.esg_scores.total);
/// ```
#[derive(Clone)]
pub struct Scout {
    deps: ScoutDeps,
    config: ScoutConfig,
    crawler: SiteCrawler,
    search: EsgSourceSearch,
    resolver: DomainResolver,
    aggregator: SourceAggregator,
}

impl Scout {
    /// Wire the pipeline stages. Fails only on invalid configuration.
    pub fn new(deps: ScoutDeps, config: ScoutConfig) -> Result<Self> {
        config.validate()?;

        let timeouts = &config.timeouts;
        let crawler = SiteCrawler::new(deps.fetcher.clone()).with_timeout(timeouts.html);
        let search =
            EsgSourceSearch::new(deps.searcher.clone()).with_config(config.search.clone());
        let resolver =
            DomainResolver::new(deps.fetcher.clone()).with_timeout(timeouts.domain_lookup);
        let aggregator = SourceAggregator::new(deps.fetcher.clone())
            .with_config(config.aggregator.clone())
            .with_html_timeout(timeouts.html)
            .with_pdf_extractor(PdfExtractor::new(deps.fetcher.clone()).with_timeout(timeouts.pdf));

        Ok(Self {
            deps,
            config,
            crawler,
            search,
            resolver,
            aggregator,
        })
    }

    /// Replace the PDF extractor (custom decoders).
    pub fn with_pdf_extractor(mut self, pdf: PdfExtractor) -> Self {
        self.aggregator = self.aggregator.with_pdf_extractor(pdf);
        self
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    pub fn crawler(&self) -> &SiteCrawler {
        &self.crawler
    }

    pub fn resolver(&self) -> &DomainResolver {
        &self.resolver
    }

    /// Turn a company name or URL into a root URL (see [`normalize_input`]).
    pub async fn normalize_input(&self, raw: &str) -> Result<NormalizedInput> {
        normalize_input(raw, &self.resolver).await
    }

    /// Normalize the input, then score it.
    pub async fn score_input(&self, raw: &str) -> Result<ScoreResult> {
        let input = self.normalize_input(raw).await?;
        self.score_website(&input.url, input.company_hint.as_deref())
            .await
    }

    /// Run the full pipeline for one site.
    ///
    /// External search runs only when `company_name` is given. Unreachable
    /// pages, failed searches and collaborator errors all degrade to less
    /// data; the only error is an invalid chunking configuration.
    pub async fn score_website(
        &self,
        root_url: &str,
        company_name: Option<&str>,
    ) -> Result<ScoreResult> {
        let company_name = company_name.map(str::trim).filter(|n| !n.is_empty());
        info!(url = %root_url, company = ?company_name, "Starting ESG scoring");

        let (crawl, external) = tokio::join!(
            self.crawler
                .crawl_with_fallback(root_url, &self.config.fallback),
            async {
                match company_name {
                    Some(name) => self.search.search_all(name).await,
                    None => ExternalSources::new(),
                }
            },
        );

        let corpus = self.aggregator.build_corpus(&crawl, &external).await;

        if corpus.is_empty() {
            info!(url = %root_url, "No extractable text found, returning no rating");
            return Ok(build_result(
                root_url,
                &crawl,
                &external,
                None,
                EsgScores::zero(),
                NO_RATING_EXPLANATION.to_string(),
                RatingStatus::NoRating,
            ));
        }

        let extraction_input = self.aggregator.extraction_input(&corpus)?;

        let signals = match self.deps.extractor.extract_signals(&extraction_input).await {
            Ok(signals) => signals,
            Err(e) => {
                warn!(error = %e, "Signal extraction failed, using default signals");
                EsgSignals::default()
            }
        };

        let scores = compute_esg_scores(&signals);
        let evidence = signals.evidence_count();
        info!(
            e = scores.environment,
            s = scores.social,
            g = scores.governance,
            total = scores.total,
            evidence,
            "ESG scores computed"
        );

        let (explanation, rating) = if evidence < MIN_EVIDENCE_FOR_EXPLANATION {
            info!(evidence, "Too little evidence for a narrative");
            (
                LOW_CONFIDENCE_EXPLANATION.to_string(),
                RatingStatus::LowConfidence,
            )
        } else {
            match self.deps.explainer.explain(root_url, &signals, &scores).await {
                Ok(text) => (text, RatingStatus::Rated),
                Err(e) => {
                    warn!(error = %e, "Explanation failed");
                    (EXPLANATION_UNAVAILABLE.to_string(), RatingStatus::Rated)
                }
            }
        };

        Ok(build_result(
            root_url,
            &crawl,
            &external,
            Some(signals),
            scores,
            explanation,
            rating,
        ))
    }
}

fn build_result(
    root_url: &str,
    crawl: &CrawlOutcome,
    external: &ExternalSources,
    signals: Option<EsgSignals>,
    scores: EsgScores,
    explanation: String,
    rating: RatingStatus,
) -> ScoreResult {
    ScoreResult {
        root_url: root_url.to_string(),
        crawled_urls: crawl.crawled_urls(),
        pdf_urls_on_site: crawl.pdf_url_list(),
        external_pdf_urls: external.pdf_urls.clone(),
        external_html_urls: external.html_urls.clone(),
        external_snippets_count: external.snippets.len(),
        esg_signals: signals,
        esg_scores: scores,
        explanation,
        rating,
        scored_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::testing::{MockExplainer, MockFetcher, MockSearcher, MockSignalExtractor};
    use crate::types::config::AggregatorConfig;

    fn deps() -> ScoutDeps {
        ScoutDeps::new(
            Arc::new(MockFetcher::new()),
            Arc::new(MockSearcher::new()),
            Arc::new(MockSignalExtractor::default()),
            Arc::new(MockExplainer::default()),
        )
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = ScoutConfig::default().with_aggregator(AggregatorConfig {
            overlap: 2000,
            ..AggregatorConfig::default()
        });

        assert!(matches!(
            Scout::new(deps(), config),
            Err(ScoutError::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_company_name_skips_search() {
        let searcher = MockSearcher::new();
        let deps = ScoutDeps {
            searcher: Arc::new(searcher.clone()),
            ..deps()
        };
        let scout = Scout::new(deps, ScoutConfig::default()).unwrap();

        let result = scout
            .score_website("https://acme.com", Some("  "))
            .await
            .unwrap();

        assert!(result.is_no_rating());
        assert!(searcher.calls().is_empty());
    }
}
