//! Scoring pipeline: aggregation, scoring, input handling, orchestration.

pub mod aggregate;
pub mod input;
pub mod prompts;
pub mod run;
pub mod score;

pub use aggregate::{
    chunk_text, combine_pages_text, combine_text_sources, dedupe, join_chunks_for_extraction,
    SourceAggregator,
};
pub use input::{normalize_input, NormalizedInput};
pub use run::{Scout, ScoutDeps, MIN_EVIDENCE_FOR_EXPLANATION};
pub use score::compute_esg_scores;
