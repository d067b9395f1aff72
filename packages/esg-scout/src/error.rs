//! Typed errors for the scoring library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so that callers can
//! tell "this URL did not answer" apart from "the pipeline is misconfigured".
//! Fetch, search and model errors are absorbed close to where they happen,
//! so [`ScoutError`] only describes what the caller got wrong.

use thiserror::Error;

/// Top-level errors surfaced by the pipeline.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// A configuration value makes the pipeline impossible to run
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The company name or URL to score is unusable
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

}

impl ScoutError {
    /// Shorthand for an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while fetching a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection reset, TLS)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Request did not complete within its timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Response body could not be read
    #[error("failed to read body of {url}: {reason}")]
    Body { url: String, reason: String },

    /// PDF could not be parsed
    #[error("unreadable PDF {url}: {reason}")]
    Pdf { url: String, reason: String },
}

impl FetchError {
    /// Classify a reqwest error for the given URL.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Http(Box::new(err))
        }
    }
}

/// Errors that can occur while querying a search API.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No credential configured for the search provider
    #[error("search provider not configured")]
    NotConfigured,

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider returned a non-2xx status
    #[error("search API error: {status}")]
    Api { status: u16 },

    /// Response body did not match the expected shape
    #[error("search response parse error: {0}")]
    Parse(String),
}

/// Errors from language model collaborators.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing API key or invalid settings
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response, rate limit, invalid request
    #[error("API error: {0}")]
    Api(String),

    /// Unexpected response format
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for language model operations.
pub type AiResult<T> = std::result::Result<T, AiError>;
