//! Data types shared across the pipeline.

pub mod config;
pub mod page;
pub mod result;
pub mod scores;
pub mod signals;
pub mod sources;
