//! Language model collaborator implementations.
//!
//! This module provides reference implementations of [`SignalExtractor`] and
//! [`Explainer`]. Callers can use these directly or implement their own.
//!
//! [`SignalExtractor`]: crate::traits::ai::SignalExtractor
//! [`Explainer`]: crate::traits::ai::Explainer

mod openai;

pub use openai::{OpenAiExplainer, OpenAiSignalExtractor};
