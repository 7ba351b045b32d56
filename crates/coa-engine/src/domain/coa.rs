use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Candidate course of action as produced by the candidate generator.
///
/// Only `coa_id` is required; every other attribute is optional and falls back to a
/// neutral value when the evaluator or constraint checks look for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseOfAction {
    pub coa_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mission_id: Option<String>,
    /// Axes the plan moves along; matched against axis ids or names.
    #[serde(default)]
    pub axis_ids: Vec<String>,
    #[serde(default)]
    pub participating_unit_ids: Vec<String>,
    #[serde(default)]
    pub estimated_duration_hours: Option<f64>,
    #[serde(default)]
    pub planned_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub planned_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub fire_support: Option<FireSupportAllocation>,
    #[serde(default)]
    pub secures_terrain_first: Option<bool>,
    #[serde(default)]
    pub uses_air_support: bool,
    #[serde(default)]
    pub maintains_communication: Option<bool>,
    #[serde(default)]
    pub avoids_obstacles: Option<bool>,
    /// Terrain cells the plan occupies or fires into; defaults to every cell on its axes.
    #[serde(default)]
    pub impacted_cell_ids: Option<Vec<String>>,
    /// Civilian areas the plan affects; derived from impacted cells when absent.
    #[serde(default)]
    pub affected_civilian_area_ids: Option<Vec<String>>,
    #[serde(default)]
    pub historical_success_rate: Option<f64>,
    #[serde(default)]
    pub chain_score: Option<f64>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub mett_c: Option<MettcScores>,
}

impl CourseOfAction {
    pub fn uses_fire_support(&self) -> bool {
        self.fire_support
            .as_ref()
            .map(|allocation| allocation.allocated > 0.0)
            .unwrap_or(false)
    }
}

/// Fire support the plan draws on, out of the total available to the mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireSupportAllocation {
    pub allocated: f64,
    pub total: f64,
}

impl FireSupportAllocation {
    pub fn usage_ratio(&self) -> Option<f64> {
        if self.total > 0.0 && self.allocated.is_finite() && self.allocated >= 0.0 {
            Some(self.allocated / self.total)
        } else {
            None
        }
    }
}

/// METT-C sub-scores in [0,1]; absent values are resolved by the validator's neutrals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MettcScores {
    #[serde(default)]
    pub mission: Option<f64>,
    #[serde(default)]
    pub enemy: Option<f64>,
    #[serde(default)]
    pub terrain: Option<f64>,
    #[serde(default)]
    pub troops: Option<f64>,
    #[serde(default)]
    pub civilian: Option<f64>,
    #[serde(default)]
    pub time: Option<f64>,
}

impl MettcScores {
    /// Fill every absent sub-score from `fallback`.
    pub fn or(self, fallback: MettcScores) -> MettcScores {
        MettcScores {
            mission: self.mission.or(fallback.mission),
            enemy: self.enemy.or(fallback.enemy),
            terrain: self.terrain.or(fallback.terrain),
            troops: self.troops.or(fallback.troops),
            civilian: self.civilian.or(fallback.civilian),
            time: self.time.or(fallback.time),
        }
    }
}
