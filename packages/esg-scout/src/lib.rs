//! ESG Source Discovery and Scoring Library
//!
//! Estimates an Environmental/Social/Governance score for a company from
//! public sources: its own website, ESG reports and pages found through web
//! search, and search-result snippets.
//!
//! # Pipeline
//!
//! 1. Resolve a company name to a website (DuckDuckGo) when no URL is given
//! 2. Crawl the site breadth-first, ESG-focused first, broad on fallback
//! 3. Search the web for ESG PDFs, pages and snippets (Serper)
//! 4. Extract PDF and HTML text in parallel and merge it by source priority
//! 5. Extract structured signals with a language model
//! 6. Score signals with a fixed formula and ask for a narrative
//!
//! The web is treated as unreliable: a URL that fails contributes nothing,
//! and a run always ends in a complete [`ScoreResult`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use esg_scout::{Scout, ScoutConfig, ScoutDeps};
//! use esg_scout::testing::{MockExplainer, MockFetcher, MockSearcher, MockSignalExtractor};
//!
//! let deps = ScoutDeps::new(
//!     Arc::new(MockFetcher::new()),
//!     Arc::new(MockSearcher::new()),
//!     Arc::new(MockSignalExtractor::default()),
//!     Arc::new(MockExplainer::default()),
//! );
//! let scout = Scout::new(deps, ScoutConfig::default())?;
//! let result = scout.score_input("acme.com").await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (fetcher, searcher, language models)
//! - [`types`] - Data model and configuration
//! - [`ingestors`] - HTTP fetching, HTML normalization, PDF text
//! - [`crawlers`] - Site crawler and fallback strategy
//! - [`search`] - External ESG search and domain resolver
//! - [`pipeline`] - Aggregation, scoring and orchestration
//! - [`testing`] - Mock implementations for testing

pub mod crawlers;
pub mod credentials;
pub mod error;
pub mod ingestors;
pub mod pipeline;
pub mod search;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use credentials::{ModelCredentials, SecretString};
pub use error::{AiError, FetchError, Result, ScoutError, SearchError};
pub use traits::{
    ai::{Explainer, SignalExtractor},
    fetcher::{PageFetcher, USER_AGENT},
    searcher::{NoopSearcher, SearchHit, WebSearcher},
};
pub use types::{
    config::{
        AggregatorConfig, CrawlConfig, FallbackPolicy, ScoutConfig, SearchConfig, TimeoutConfig,
    },
    page::{CrawlOutcome, PageRecord},
    result::{
        RatingStatus, ScoreResult, EXPLANATION_UNAVAILABLE, LOW_CONFIDENCE_EXPLANATION,
        NO_RATING_EXPLANATION,
    },
    scores::EsgScores,
    signals::{EnvironmentSignals, EsgSignals, GovernanceSignals, SocialSignals},
    sources::ExternalSources,
};

// Re-export pipeline components
pub use crawlers::SiteCrawler;
pub use ingestors::{HttpFetcher, PdfExtractor};
pub use pipeline::{compute_esg_scores, normalize_input, NormalizedInput, Scout, ScoutDeps};
pub use search::{DomainResolver, EsgSourceSearch, SerperSearcher};
