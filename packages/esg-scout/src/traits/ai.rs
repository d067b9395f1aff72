//! Language model collaborator traits.
//!
//! Two calls in the pipeline go to a language model: turning the corpus into
//! [`EsgSignals`] and turning scores into prose. Both are injected as trait
//! objects so tests (and alternative providers) can replace them.

use async_trait::async_trait;

use crate::error::AiResult;
use crate::types::{scores::EsgScores, signals::EsgSignals};

/// Converts a text corpus into structured ESG signals.
#[async_trait]
pub trait SignalExtractor: Send + Sync {
    /// Extract signals from the (already truncated) corpus.
    ///
    /// Implementations must return a fully populated structure for any
    /// syntactically broken model output (see
    /// [`EsgSignals::from_model_output`]). `Err` is reserved for the call
    /// itself failing.
    async fn extract_signals(&self, corpus: &str) -> AiResult<EsgSignals>;
}

/// Converts scores and signals into a narrative explanation.
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Write an overview, strengths and improvement actions.
    async fn explain(
        &self,
        root_url: &str,
        signals: &EsgSignals,
        scores: &EsgScores,
    ) -> AiResult<String>;
}
