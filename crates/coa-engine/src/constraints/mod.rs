//! Constraint compliance checks.
//!
//! Every constraint kind maps to one policy returning a compliance score in `[0, 1]`. An
//! unrecognized kind scores a neutral 0.5 instead of failing.

mod context;
mod policies;
mod text;

pub use context::{candidate_axes, ConstraintContext};

use crate::domain::{Constraint, ConstraintKind, CourseOfAction};
use serde::{Deserialize, Serialize};

/// Compliance for a constraint whose kind is missing or unrecognized.
pub const UNKNOWN_KIND_SCORE: f64 = 0.5;
/// Penalty multiplier for a constraint without an importance rating.
pub const DEFAULT_PENALTY: f64 = 0.5;

/// Multiplier applied to `(1 - compliance)` when a violation feeds a composite score.
pub fn get_penalty_by_importance(importance: Option<u8>) -> f64 {
    match importance {
        Some(5) => 1.0,
        Some(4) => 0.7,
        Some(3) => 0.5,
        Some(2) => 0.3,
        Some(1) => 0.1,
        _ => DEFAULT_PENALTY,
    }
}

/// Outcome of checking one constraint against one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintCheck {
    pub constraint_id: String,
    pub kind: String,
    pub importance: Option<u8>,
    pub compliance: f64,
    pub penalty: f64,
}

impl ConstraintCheck {
    /// Share of the environment score this check removes.
    pub fn weighted_shortfall(&self) -> f64 {
        self.penalty * (1.0 - self.compliance)
    }

    pub fn is_violated(&self) -> bool {
        self.compliance < 1.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

impl ConstraintValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_constraint(
        &self,
        constraint: &Constraint,
        coa: &CourseOfAction,
        context: &ConstraintContext,
    ) -> f64 {
        let score = match constraint.kind {
            Some(ConstraintKind::Time) => policies::time(constraint, context),
            Some(ConstraintKind::Movement) => policies::movement(constraint, context),
            Some(ConstraintKind::Firepower) => policies::firepower(constraint, coa, context),
            Some(ConstraintKind::Roe) => policies::rules_of_engagement(constraint, coa, context),
            Some(ConstraintKind::Intelligence) => policies::intelligence(),
            Some(ConstraintKind::Communication) => policies::communication(coa),
            Some(ConstraintKind::Obstacle) => policies::obstacle(constraint, coa),
            Some(ConstraintKind::Weather) => policies::weather(constraint, coa, context),
            None => UNKNOWN_KIND_SCORE,
        };

        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            UNKNOWN_KIND_SCORE
        }
    }

    pub fn check(
        &self,
        constraint: &Constraint,
        coa: &CourseOfAction,
        context: &ConstraintContext,
    ) -> ConstraintCheck {
        ConstraintCheck {
            constraint_id: constraint.constraint_id.clone(),
            kind: constraint.kind_label().to_string(),
            importance: constraint.importance,
            compliance: self.validate_constraint(constraint, coa, context),
            penalty: get_penalty_by_importance(constraint.importance),
        }
    }
}
