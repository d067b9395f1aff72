//! ESG signal schema.
//!
//! The signal extractor collaborator returns free-form JSON. This module pins
//! it to a fixed schema: three pillars, each with a fixed set of fields.
//! [`EsgSignals::from_model_output`] is the validation step between the two.
//! It never fails: unparseable output becomes [`EsgSignals::default`], and any
//! single field that is missing or of the wrong type takes its default
//! (`false` for booleans, `None` for numbers).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Environmental pillar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSignals {
    pub has_net_zero_target: bool,
    pub net_zero_year: Option<i32>,
    pub uses_renewable_energy: bool,
    pub renewable_share_pct: Option<f64>,
    pub discloses_scope_1_2: bool,
    pub discloses_scope_3: bool,
}

/// Social pillar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialSignals {
    pub has_diversity_policy: bool,
    pub female_leadership_pct: Option<f64>,
    pub employee_wellbeing_programs: bool,
    pub workplace_safety_programs: bool,
    pub community_programs: bool,
    pub mentions_diversity_or_inclusion: bool,
    pub mentions_employee_safety_or_health: bool,
    pub mentions_community_or_philanthropy: bool,
}

/// Governance pillar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceSignals {
    pub has_independent_board: bool,
    pub board_independence_pct: Option<f64>,
    pub has_anti_corruption_policy: bool,
    pub has_whistleblower_mechanism: bool,
    pub has_esg_governance_structure: bool,
    pub mentions_board_or_directors: bool,
    pub mentions_ethics_or_code_of_conduct: bool,
    pub mentions_compliance_or_risk_management: bool,
}

/// All three pillars, serialized under the keys `E`, `S` and `G`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsgSignals {
    #[serde(rename = "E")]
    pub environment: EnvironmentSignals,

    #[serde(rename = "S")]
    pub social: SocialSignals,

    #[serde(rename = "G")]
    pub governance: GovernanceSignals,
}

impl EsgSignals {
    /// Parse raw model output into the fixed schema.
    pub fn from_model_output(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "Signal output is not valid JSON, using defaults");
                Self::default()
            }
        }
    }

    /// Backfill a parsed JSON value into the fixed schema.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            tracing::warn!("Signal output is not a JSON object, using defaults");
            return Self::default();
        };

        let empty = Map::new();
        let e = pillar(root, "E").unwrap_or(&empty);
        let s = pillar(root, "S").unwrap_or(&empty);
        let g = pillar(root, "G").unwrap_or(&empty);

        Self {
            environment: EnvironmentSignals {
                has_net_zero_target: flag(e, "has_net_zero_target"),
                net_zero_year: year(e, "net_zero_year"),
                uses_renewable_energy: flag(e, "uses_renewable_energy"),
                renewable_share_pct: number(e, "renewable_share_pct"),
                discloses_scope_1_2: flag(e, "discloses_scope_1_2"),
                discloses_scope_3: flag(e, "discloses_scope_3"),
            },
            social: SocialSignals {
                has_diversity_policy: flag(s, "has_diversity_policy"),
                female_leadership_pct: number(s, "female_leadership_pct"),
                employee_wellbeing_programs: flag(s, "employee_wellbeing_programs"),
                workplace_safety_programs: flag(s, "workplace_safety_programs"),
                community_programs: flag(s, "community_programs"),
                mentions_diversity_or_inclusion: flag(s, "mentions_diversity_or_inclusion"),
                mentions_employee_safety_or_health: flag(s, "mentions_employee_safety_or_health"),
                mentions_community_or_philanthropy: flag(s, "mentions_community_or_philanthropy"),
            },
            governance: GovernanceSignals {
                has_independent_board: flag(g, "has_independent_board"),
                board_independence_pct: number(g, "board_independence_pct"),
                has_anti_corruption_policy: flag(g, "has_anti_corruption_policy"),
                has_whistleblower_mechanism: flag(g, "has_whistleblower_mechanism"),
                has_esg_governance_structure: flag(g, "has_esg_governance_structure"),
                mentions_board_or_directors: flag(g, "mentions_board_or_directors"),
                mentions_ethics_or_code_of_conduct: flag(g, "mentions_ethics_or_code_of_conduct"),
                mentions_compliance_or_risk_management: flag(
                    g,
                    "mentions_compliance_or_risk_management",
                ),
            },
        }
    }

    /// Count meaningfully populated fields across all pillars.
    ///
    /// A `true` flag or a present, non-zero number counts as one data point.
    pub fn evidence_count(&self) -> usize {
        let e = &self.environment;
        let s = &self.social;
        let g = &self.governance;

        let flags = [
            e.has_net_zero_target,
            e.uses_renewable_energy,
            e.discloses_scope_1_2,
            e.discloses_scope_3,
            s.has_diversity_policy,
            s.employee_wellbeing_programs,
            s.workplace_safety_programs,
            s.community_programs,
            s.mentions_diversity_or_inclusion,
            s.mentions_employee_safety_or_health,
            s.mentions_community_or_philanthropy,
            g.has_independent_board,
            g.has_anti_corruption_policy,
            g.has_whistleblower_mechanism,
            g.has_esg_governance_structure,
            g.mentions_board_or_directors,
            g.mentions_ethics_or_code_of_conduct,
            g.mentions_compliance_or_risk_management,
        ];

        let numbers = [
            e.net_zero_year.map(f64::from),
            e.renewable_share_pct,
            s.female_leadership_pct,
            g.board_independence_pct,
        ];

        flags.iter().filter(|f| **f).count()
            + numbers
                .iter()
                .filter(|n| matches!(n, Some(v) if *v != 0.0))
                .count()
    }
}

fn pillar<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    root.get(key).and_then(Value::as_object)
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

// Integral JSON numbers only; `2030.5` is not a year.
fn year(map: &Map<String, Value>, key: &str) -> Option<i32> {
    map.get(key)
        .and_then(Value::as_i64)
        .and_then(|y| i32::try_from(y).ok())
}
