//! Multi-criteria COA scoring and the METT-C validity gate.

mod config;
mod mett_c;
mod policy;
mod rules;

pub use config::{CriteriaWeights, Criterion, WeightConfigError, WEIGHT_SUM_TOLERANCE};
pub use mett_c::{MettcFactor, MettcFloors, MettcReport, MettcValidator, ResolvedMettcScores};
pub use policy::Verdict;

pub(crate) use policy::decide_verdict;

use crate::constraints::{candidate_axes, ConstraintCheck, ConstraintContext, ConstraintValidator};
use crate::domain::{AxisState, CourseOfAction, MettcScores};
use crate::threat::ThreatThresholds;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Per-dimension scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub threat: f64,
    pub resources: f64,
    pub assets: f64,
    pub environment: f64,
    pub historical: f64,
    pub chain: f64,
    pub mission_alignment: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Threat => self.threat,
            Criterion::Resources => self.resources,
            Criterion::Assets => self.assets,
            Criterion::Environment => self.environment,
            Criterion::Historical => self.historical,
            Criterion::Chain => self.chain,
            Criterion::MissionAlignment => self.mission_alignment,
        }
    }
}

/// Scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoaEvaluationResult {
    pub coa_id: String,
    pub coa_name: Option<String>,
    /// 1-based position after ranking.
    pub rank: usize,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub weights: CriteriaWeights,
    pub combat_power_score: f64,
    pub mobility_score: f64,
    pub constraint_compliance_score: f64,
    pub threat_response_score: f64,
    pub risk_score: f64,
    /// Axes the candidate was scored on.
    pub axis_ids: Vec<String>,
    pub constraint_checks: Vec<ConstraintCheck>,
    pub mett_c: MettcScores,
    pub rationale: Vec<String>,
}

/// Weighted evaluator over axis states. Construction fails unless the weights sum to 1.0.
#[derive(Debug, Clone)]
pub struct CoaEvaluator {
    weights: CriteriaWeights,
    thresholds: ThreatThresholds,
    validator: ConstraintValidator,
}

impl CoaEvaluator {
    pub fn new(weights: CriteriaWeights) -> Result<Self, WeightConfigError> {
        weights.validate()?;
        Ok(Self {
            weights,
            thresholds: ThreatThresholds::default(),
            validator: ConstraintValidator::new(),
        })
    }

    pub fn with_threat_thresholds(mut self, thresholds: ThreatThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn weights(&self) -> &CriteriaWeights {
        &self.weights
    }

    pub fn threat_thresholds(&self) -> ThreatThresholds {
        self.thresholds
    }

    /// Score and rank every candidate that can be placed on at least one axis state.
    ///
    /// Ordering is total score descending, then candidate id ascending.
    pub fn evaluate(
        &self,
        mission_id: &str,
        axis_states: &[AxisState],
        coas: &[CourseOfAction],
    ) -> Vec<CoaEvaluationResult> {
        let mut results: Vec<CoaEvaluationResult> = coas
            .iter()
            .filter_map(|coa| self.evaluate_candidate(mission_id, axis_states, coa))
            .collect();

        results.sort_by(|left, right| {
            right
                .total_score
                .total_cmp(&left.total_score)
                .then_with(|| left.coa_id.cmp(&right.coa_id))
        });
        for (index, result) in results.iter_mut().enumerate() {
            result.rank = index + 1;
        }
        results
    }

    /// Score a single candidate; `None` when it references no known axis. Rank is left at 0.
    pub fn evaluate_candidate(
        &self,
        mission_id: &str,
        axis_states: &[AxisState],
        coa: &CourseOfAction,
    ) -> Option<CoaEvaluationResult> {
        if coa.axis_ids.is_empty() {
            warn!(coa_id = %coa.coa_id, "candidate omitted: no axis declared");
            return None;
        }
        let used = candidate_axes(coa, axis_states);
        if used.is_empty() {
            warn!(
                coa_id = %coa.coa_id,
                axes = ?coa.axis_ids,
                "candidate omitted: declared axes have no axis state"
            );
            return None;
        }

        let context = ConstraintContext::for_candidate(coa, axis_states);
        let signals = rules::gather_signals(coa, &used, &context, &self.validator);
        let breakdown = rules::score_breakdown(
            mission_id,
            coa,
            &used,
            axis_states,
            &signals,
            &self.thresholds,
        );
        let total_score = rules::weighted_total(&breakdown, &self.weights);
        let mett_c = rules::derive_mett_c(coa, &breakdown, &signals);
        let risk_score = coa
            .risk_score
            .filter(|risk| risk.is_finite())
            .map(|risk| risk.clamp(0.0, 1.0))
            .unwrap_or(1.0 - breakdown.threat);

        let rationale = rationale(&breakdown, &self.weights, &used, &signals.checks);
        debug!(coa_id = %coa.coa_id, total_score, "candidate scored");

        Some(CoaEvaluationResult {
            coa_id: coa.coa_id.clone(),
            coa_name: coa.name.clone(),
            rank: 0,
            total_score,
            breakdown,
            weights: self.weights,
            combat_power_score: breakdown.assets,
            mobility_score: breakdown.resources,
            constraint_compliance_score: breakdown.environment,
            threat_response_score: breakdown.threat,
            risk_score,
            axis_ids: used.iter().map(|state| state.axis_id.clone()).collect(),
            constraint_checks: signals.checks,
            mett_c,
            rationale,
        })
    }
}

fn rationale(
    breakdown: &ScoreBreakdown,
    weights: &CriteriaWeights,
    used: &[&AxisState],
    checks: &[ConstraintCheck],
) -> Vec<String> {
    let mut lines: Vec<String> = Criterion::ALL
        .iter()
        .map(|criterion| {
            format!(
                "{criterion}: {:.3} x weight {:.2}",
                breakdown.get(*criterion),
                weights.get(*criterion)
            )
        })
        .collect();

    lines.extend(used.iter().map(|state| state.summary()));

    let mut violations: Vec<&ConstraintCheck> =
        checks.iter().filter(|check| check.is_violated()).collect();
    violations.sort_by(|left, right| {
        right
            .weighted_shortfall()
            .partial_cmp(&left.weighted_shortfall())
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.constraint_id.cmp(&right.constraint_id))
    });
    lines.extend(violations.into_iter().map(|check| {
        format!(
            "constraint {} ({}) compliance {:.2}, penalty {:.2}",
            check.constraint_id, check.kind, check.compliance, check.penalty
        )
    }));
    lines
}
