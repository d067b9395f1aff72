//! Numeric ESG scores.

use serde::{Deserialize, Serialize};

/// Pillar scores and their combined total, each in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsgScores {
    #[serde(rename = "E")]
    pub environment: u8,

    #[serde(rename = "S")]
    pub social: u8,

    #[serde(rename = "G")]
    pub governance: u8,

    pub total: u8,
}

impl EsgScores {
    /// All-zero scores, used for "no rating" results.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check if every score is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}
