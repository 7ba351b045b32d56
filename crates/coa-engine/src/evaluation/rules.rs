use super::config::{CriteriaWeights, Criterion};
use super::ScoreBreakdown;
use crate::axis::mean;
use crate::constraints::{ConstraintCheck, ConstraintContext, ConstraintValidator};
use crate::domain::{AxisState, ConstraintKind, CourseOfAction, MettcScores};
use crate::ingest::same_key;
use crate::threat::ThreatThresholds;
use std::collections::BTreeSet;

/// Value used for a dimension with no usable signal.
pub(crate) const NEUTRAL: f64 = 0.5;
const MOBILITY_SCALE: f64 = 5.0;
const CIVILIAN_STEP: f64 = 0.3;

/// Candidate facts gathered once and shared by every dimension.
pub(crate) struct CandidateSignals {
    pub committed_power: f64,
    pub enemy_power: f64,
    pub threat_total: f64,
    pub affected_civilian_areas: usize,
    pub checks: Vec<ConstraintCheck>,
    civilian_checks: Vec<f64>,
}

pub(crate) fn gather_signals(
    coa: &CourseOfAction,
    used: &[&AxisState],
    context: &ConstraintContext,
    validator: &ConstraintValidator,
) -> CandidateSignals {
    let mut seen_units = BTreeSet::new();
    let mut friendly_total = 0.0;
    let mut participating_total = 0.0;
    let mut participating_found = false;
    for unit in used.iter().flat_map(|state| state.friendly_units.iter()) {
        if !seen_units.insert(unit.unit_id.clone()) {
            continue;
        }
        friendly_total += unit.combat_power;
        if coa
            .participating_unit_ids
            .iter()
            .any(|id| same_key(id, &unit.unit_id))
        {
            participating_total += unit.combat_power;
            participating_found = true;
        }
    }
    let committed_power = if participating_found {
        participating_total
    } else {
        friendly_total
    };

    let mut seen_enemies = BTreeSet::new();
    let enemy_power: f64 = used
        .iter()
        .flat_map(|state| state.enemy_units.iter())
        .filter(|unit| seen_enemies.insert(unit.unit_id.clone()))
        .map(|unit| unit.combat_power)
        .sum();

    let threat_total: f64 = used.iter().map(|state| state.threat_score_total).sum();

    let mut seen_constraints = BTreeSet::new();
    let mut checks = Vec::new();
    let mut civilian_checks = Vec::new();
    for constraint in used.iter().flat_map(|state| state.constraints.iter()) {
        if !seen_constraints.insert(constraint.constraint_id.clone()) {
            continue;
        }
        let check = validator.check(constraint, coa, context);
        let content = constraint.content_text().to_lowercase();
        if constraint.kind == Some(ConstraintKind::Roe)
            && (content.contains("민간") || content.contains("civilian"))
        {
            civilian_checks.push(check.compliance);
        }
        checks.push(check);
    }

    CandidateSignals {
        committed_power,
        enemy_power,
        threat_total,
        affected_civilian_areas: context.affected_civilian_areas,
        checks,
        civilian_checks,
    }
}

pub(crate) fn score_breakdown(
    mission_id: &str,
    coa: &CourseOfAction,
    used: &[&AxisState],
    all_states: &[AxisState],
    signals: &CandidateSignals,
    thresholds: &ThreatThresholds,
) -> ScoreBreakdown {
    ScoreBreakdown {
        threat: threat_score(signals, thresholds),
        resources: resources_score(used),
        assets: assets_score(signals),
        environment: environment_score(&signals.checks),
        historical: coa.historical_success_rate.map_or(NEUTRAL, unit_interval),
        chain: chain_score(coa, used),
        mission_alignment: mission_alignment_score(mission_id, coa, used, all_states),
    }
}

/// `Σ weight·score` in the fixed criterion order.
pub(crate) fn weighted_total(breakdown: &ScoreBreakdown, weights: &CriteriaWeights) -> f64 {
    let total: f64 = Criterion::ALL
        .iter()
        .map(|criterion| weights.get(*criterion) * breakdown.get(*criterion))
        .sum();
    total.clamp(0.0, 1.0)
}

fn threat_score(signals: &CandidateSignals, thresholds: &ThreatThresholds) -> f64 {
    let force_ratio = signals.committed_power / signals.enemy_power.max(1.0);
    let pressure = if thresholds.high > 0.0 {
        (signals.threat_total / thresholds.high).clamp(0.0, 1.0)
    } else if signals.threat_total > 0.0 {
        1.0
    } else {
        0.0
    };
    unit_interval(force_ratio / (1.0 + pressure))
}

fn resources_score(used: &[&AxisState]) -> f64 {
    let mobility = mean(used.iter().filter_map(|state| state.avg_mobility))
        .map(|grade| unit_interval(grade / MOBILITY_SCALE))
        .unwrap_or(NEUTRAL);

    let mut seen = BTreeSet::new();
    let resources: Vec<bool> = used
        .iter()
        .flat_map(|state| state.resources.iter())
        .filter(|resource| seen.insert(resource.resource_id.clone()))
        .map(|resource| resource.is_available())
        .collect();
    let availability = if resources.is_empty() {
        NEUTRAL
    } else {
        resources.iter().filter(|available| **available).count() as f64 / resources.len() as f64
    };

    (mobility + availability) / 2.0
}

fn assets_score(signals: &CandidateSignals) -> f64 {
    let committed = signals.committed_power.max(0.0);
    let enemy = signals.enemy_power.max(0.0);
    if committed + enemy <= 0.0 {
        return NEUTRAL;
    }
    unit_interval(committed / (committed + enemy))
}

fn environment_score(checks: &[ConstraintCheck]) -> f64 {
    let shortfall: f64 = checks.iter().map(ConstraintCheck::weighted_shortfall).sum();
    unit_interval(1.0 - shortfall)
}

fn chain_score(coa: &CourseOfAction, used: &[&AxisState]) -> f64 {
    if let Some(score) = coa.chain_score {
        return unit_interval(score);
    }
    if coa.participating_unit_ids.is_empty() {
        return NEUTRAL;
    }

    let present = coa
        .participating_unit_ids
        .iter()
        .filter(|id| {
            used.iter()
                .flat_map(|state| state.friendly_units.iter())
                .any(|unit| same_key(&unit.unit_id, id))
        })
        .count();
    present as f64 / coa.participating_unit_ids.len() as f64
}

fn mission_alignment_score(
    mission_id: &str,
    coa: &CourseOfAction,
    used: &[&AxisState],
    all_states: &[AxisState],
) -> f64 {
    let base = if used.iter().any(|state| state.is_primary_axis) {
        1.0
    } else if all_states.iter().any(|state| state.is_primary_axis) {
        0.3
    } else {
        NEUTRAL
    };

    let other_mission = coa
        .mission_id
        .as_deref()
        .map(|declared| !declared.trim().is_empty() && !same_key(declared, mission_id))
        .unwrap_or(false);
    if other_mission {
        base / 2.0
    } else {
        base
    }
}

/// Candidate values win; the rest is derived from the breakdown and the constraint checks.
pub(crate) fn derive_mett_c(
    coa: &CourseOfAction,
    breakdown: &ScoreBreakdown,
    signals: &CandidateSignals,
) -> MettcScores {
    let civilian = min_of(signals.civilian_checks.iter().copied()).or_else(|| {
        (signals.affected_civilian_areas > 0).then(|| {
            (1.0 - CIVILIAN_STEP * signals.affected_civilian_areas as f64).max(0.0)
        })
    });
    let time = min_of(
        signals
            .checks
            .iter()
            .filter(|check| check.kind == ConstraintKind::Time.label())
            .map(|check| check.compliance),
    );

    let derived = MettcScores {
        mission: Some(breakdown.mission_alignment),
        enemy: Some(breakdown.threat),
        terrain: Some(breakdown.resources),
        troops: Some(breakdown.assets),
        civilian,
        time,
    };
    coa.mett_c.unwrap_or_default().or(derived)
}

/// Clamp to `[0, 1]`; non-finite input becomes neutral.
pub(crate) fn unit_interval(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}

fn min_of<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    values.fold(None, |lowest: Option<f64>, value| {
        Some(lowest.map_or(value, |current| current.min(value)))
    })
}
