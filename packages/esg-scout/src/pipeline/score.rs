//! Deterministic signal-to-score formula.
//!
//! Each pillar accumulates points from its signals, is clamped to `0..=100`
//! and rounded half-to-even. The total is the rounded mean of the three.

use crate::types::{
    scores::EsgScores,
    signals::{EnvironmentSignals, EsgSignals, GovernanceSignals, SocialSignals},
};

fn finish(points: f64) -> u8 {
    points.clamp(0.0, 100.0).round_ties_even() as u8
}

fn score_environment(e: &EnvironmentSignals) -> u8 {
    let mut points = 0.0;

    if e.has_net_zero_target {
        points += 35.0;
        match e.net_zero_year {
            Some(year) if year <= 2030 => points += 5.0,
            Some(year) if year <= 2050 => points += 2.0,
            _ => {}
        }
    }

    if e.uses_renewable_energy {
        points += 25.0;
        if let Some(pct) = e.renewable_share_pct {
            points += (pct * 0.1).min(5.0);
        }
    }

    if e.discloses_scope_1_2 {
        points += 10.0;
    }
    if e.discloses_scope_3 {
        points += 10.0;
    }

    finish(points)
}

fn score_social(s: &SocialSignals) -> u8 {
    let mut points = 0.0;

    if s.has_diversity_policy {
        points += 20.0;
        match s.female_leadership_pct {
            Some(pct) if pct >= 40.0 => points += 15.0,
            Some(pct) if pct >= 25.0 => points += 10.0,
            Some(pct) if pct >= 10.0 => points += 5.0,
            _ => {}
        }
    }

    for (present, weight) in [
        (s.employee_wellbeing_programs, 15.0),
        (s.workplace_safety_programs, 15.0),
        (s.community_programs, 15.0),
        (s.mentions_diversity_or_inclusion, 10.0),
        (s.mentions_employee_safety_or_health, 10.0),
        (s.mentions_community_or_philanthropy, 10.0),
    ] {
        if present {
            points += weight;
        }
    }

    finish(points)
}

fn score_governance(g: &GovernanceSignals) -> u8 {
    let mut points = 0.0;

    if g.has_independent_board {
        points += 20.0;
        match g.board_independence_pct {
            Some(pct) if pct >= 60.0 => points += 15.0,
            Some(pct) if pct >= 40.0 => points += 10.0,
            Some(pct) if pct >= 25.0 => points += 5.0,
            _ => {}
        }
    }

    for (present, weight) in [
        (g.has_anti_corruption_policy, 15.0),
        (g.has_whistleblower_mechanism, 15.0),
        (g.has_esg_governance_structure, 20.0),
        (g.mentions_board_or_directors, 10.0),
        (g.mentions_ethics_or_code_of_conduct, 10.0),
        (g.mentions_compliance_or_risk_management, 10.0),
    ] {
        if present {
            points += weight;
        }
    }

    finish(points)
}

/// Map signals to pillar scores and a total.
pub fn compute_esg_scores(signals: &EsgSignals) -> EsgScores {
    let environment = score_environment(&signals.environment);
    let social = score_social(&signals.social);
    let governance = score_governance(&signals.governance);

    let sum = u16::from(environment) + u16::from(social) + u16::from(governance);
    let total = if sum == 0 {
        0
    } else {
        finish(f64::from(sum) / 3.0)
    };

    EsgScores {
        environment,
        social,
        governance,
        total,
    }
}
