//! Core trait abstractions.
//!
//! These traits define the seams where the pipeline meets the outside world:
//! HTTP, web search and language models.

pub mod ai;
pub mod fetcher;
pub mod searcher;
