use super::CoaEvaluationResult;
use crate::domain::MettcScores;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One METT-C dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MettcFactor {
    Mission,
    Enemy,
    Terrain,
    Troops,
    Civilian,
    Time,
}

impl MettcFactor {
    pub const ALL: [MettcFactor; 6] = [
        MettcFactor::Mission,
        MettcFactor::Enemy,
        MettcFactor::Terrain,
        MettcFactor::Troops,
        MettcFactor::Civilian,
        MettcFactor::Time,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MettcFactor::Mission => "mission",
            MettcFactor::Enemy => "enemy",
            MettcFactor::Terrain => "terrain",
            MettcFactor::Troops => "troops",
            MettcFactor::Civilian => "civilian",
            MettcFactor::Time => "time",
        }
    }

    /// Value assumed when the candidate carries no score for this factor.
    pub const fn neutral(self) -> f64 {
        match self {
            MettcFactor::Civilian | MettcFactor::Time => 1.0,
            _ => 0.5,
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            MettcFactor::Mission => {
                "realign the course of action with the commander's intent and primary axis"
            }
            MettcFactor::Enemy => "add combat power or fires against the assessed enemy threat",
            MettcFactor::Terrain => "select a more trafficable axis or secure key terrain first",
            MettcFactor::Troops => "commit additional units or narrow the frontage",
            MettcFactor::Civilian => "reroute away from populated areas or restrict fires",
            MettcFactor::Time => "reschedule or shorten the operation to fit the time window",
        }
    }
}

impl fmt::Display for MettcFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum acceptable METT-C sub-scores. `time` is exclusive; the rest are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MettcFloors {
    pub mission: f64,
    pub enemy: f64,
    pub terrain: f64,
    pub troops: f64,
    pub civilian: f64,
    pub time: f64,
}

impl Default for MettcFloors {
    fn default() -> Self {
        Self {
            mission: 0.5,
            enemy: 0.4,
            terrain: 0.4,
            troops: 0.4,
            civilian: 0.3,
            time: 0.0,
        }
    }
}

impl MettcFloors {
    pub fn floor(&self, factor: MettcFactor) -> f64 {
        match factor {
            MettcFactor::Mission => self.mission,
            MettcFactor::Enemy => self.enemy,
            MettcFactor::Terrain => self.terrain,
            MettcFactor::Troops => self.troops,
            MettcFactor::Civilian => self.civilian,
            MettcFactor::Time => self.time,
        }
    }

    pub fn passes(&self, factor: MettcFactor, value: f64) -> bool {
        match factor {
            MettcFactor::Time => value > self.time,
            other => value >= self.floor(other),
        }
    }
}

/// Sub-scores after neutral defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMettcScores {
    pub mission: f64,
    pub enemy: f64,
    pub terrain: f64,
    pub troops: f64,
    pub civilian: f64,
    pub time: f64,
}

impl ResolvedMettcScores {
    pub fn resolve(scores: &MettcScores) -> Self {
        let pick = |value: Option<f64>, factor: MettcFactor| {
            value
                .filter(|value| value.is_finite())
                .unwrap_or_else(|| factor.neutral())
        };
        Self {
            mission: pick(scores.mission, MettcFactor::Mission),
            enemy: pick(scores.enemy, MettcFactor::Enemy),
            terrain: pick(scores.terrain, MettcFactor::Terrain),
            troops: pick(scores.troops, MettcFactor::Troops),
            civilian: pick(scores.civilian, MettcFactor::Civilian),
            time: pick(scores.time, MettcFactor::Time),
        }
    }

    pub fn get(&self, factor: MettcFactor) -> f64 {
        match factor {
            MettcFactor::Mission => self.mission,
            MettcFactor::Enemy => self.enemy,
            MettcFactor::Terrain => self.terrain,
            MettcFactor::Troops => self.troops,
            MettcFactor::Civilian => self.civilian,
            MettcFactor::Time => self.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MettcReport {
    pub coa_id: String,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub mett_c_scores: ResolvedMettcScores,
    /// Factors below their floor, in fixed factor order.
    pub breaches: Vec<MettcFactor>,
}

impl MettcReport {
    pub fn breached(&self, factor: MettcFactor) -> bool {
        self.breaches.contains(&factor)
    }
}

/// Secondary validity gate over a candidate's METT-C sub-scores. Never alters the primary
/// score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MettcValidator {
    floors: MettcFloors,
}

impl MettcValidator {
    pub fn new(floors: MettcFloors) -> Self {
        Self { floors }
    }

    pub fn floors(&self) -> &MettcFloors {
        &self.floors
    }

    pub fn validate_coa(&self, result: &CoaEvaluationResult) -> MettcReport {
        self.validate_scores(&result.coa_id, &result.mett_c)
    }

    pub fn validate_scores(&self, coa_id: &str, scores: &MettcScores) -> MettcReport {
        let resolved = ResolvedMettcScores::resolve(scores);
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();
        let mut breaches = Vec::new();

        for factor in MettcFactor::ALL {
            let value = resolved.get(factor);
            if self.floors.passes(factor, value) {
                continue;
            }
            let comparison = if factor == MettcFactor::Time {
                "must exceed"
            } else {
                "below floor"
            };
            issues.push(format!(
                "{factor} score {value:.2} {comparison} {:.2}",
                self.floors.floor(factor)
            ));
            recommendations.push(factor.recommendation().to_string());
            breaches.push(factor);
        }

        if resolved.civilian < self.floors.civilian {
            issues.push(format!(
                "escalation: civilian protection score {:.2} requires command review",
                resolved.civilian
            ));
        }
        if resolved.time == 0.0 {
            issues.push("escalation: hard time constraint violated; plan is infeasible".to_string());
        }

        MettcReport {
            coa_id: coa_id.to_string(),
            is_valid: breaches.is_empty(),
            issues,
            recommendations,
            mett_c_scores: resolved,
            breaches,
        }
    }
}
