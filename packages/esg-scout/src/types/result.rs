//! The record returned by one scoring run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{scores::EsgScores, signals::EsgSignals};

/// Explanation used when no text could be gathered at all.
pub const NO_RATING_EXPLANATION: &str = "The system could not extract any machine-readable \
ESG-related text from the website, external reports, or search snippets. This may happen if \
reports are image-only scans or behind complex rendering. Treat this as 'no rating', not as \
evidence of weak ESG.";

/// Explanation used when too few signals were found to justify a narrative.
pub const LOW_CONFIDENCE_EXPLANATION: &str = "The system found only limited ESG-related \
content across the website and external sources. The scores here should be treated as \
'no rating' or very low-confidence, rather than a definitive assessment of ESG performance.";

/// Explanation used when the narrative collaborator failed.
pub const EXPLANATION_UNAVAILABLE: &str = "Scores were computed, but the narrative \
explanation could not be generated. Refer to the signal breakdown for details.";

/// How much weight the scores can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingStatus {
    /// Enough evidence for a narrative explanation
    Rated,

    /// Signals extracted, but fewer data points than the evidence threshold
    LowConfidence,

    /// No text gathered; the signal extractor was never called
    NoRating,
}

/// Full output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub root_url: String,

    /// On-site pages used, in discovery order
    pub crawled_urls: Vec<String>,

    pub pdf_urls_on_site: Vec<String>,
    pub external_pdf_urls: Vec<String>,
    pub external_html_urls: Vec<String>,
    pub external_snippets_count: usize,

    /// Serialized as `{}` when no rating was produced.
    #[serde(
        serialize_with = "serialize_signals",
        deserialize_with = "deserialize_signals"
    )]
    pub esg_signals: Option<EsgSignals>,

    pub esg_scores: EsgScores,
    pub explanation: String,
    pub rating: RatingStatus,
    pub scored_at: DateTime<Utc>,
}

impl ScoreResult {
    /// Check if the run ended without a rating.
    pub fn is_no_rating(&self) -> bool {
        self.rating == RatingStatus::NoRating
    }
}

fn serialize_signals<S: Serializer>(
    signals: &Option<EsgSignals>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match signals {
        Some(signals) => signals.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

fn deserialize_signals<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<EsgSignals>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value.as_object() {
        Some(map) if map.is_empty() => Ok(None),
        _ => Ok(Some(EsgSignals::from_value(&value))),
    }
}
