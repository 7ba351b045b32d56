use super::entities::reference_matches;
use super::{
    CivilianArea, Constraint, EnemyUnit, FriendlyUnit, Resource, TerrainCell, ThreatEvent,
    ThreatLevel, Weather,
};
use crate::ingest::same_key;
use crate::threat::ThreatScorer;
use serde::{Deserialize, Serialize};

/// Per-request snapshot of everything relevant to one axis. Rebuilt for every request and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    pub axis_id: String,
    pub axis_name: String,
    pub mission_id: Option<String>,
    /// True when the axis is the mission's declared primary axis.
    pub is_primary_axis: bool,
    pub axis_importance: Option<i64>,
    pub total_distance_km: Option<f64>,

    pub friendly_combat_power_total: f64,
    pub enemy_combat_power_total: f64,
    pub friendly_units: Vec<FriendlyUnit>,
    pub enemy_units: Vec<EnemyUnit>,

    pub terrain_cells: Vec<TerrainCell>,
    pub avg_mobility: Option<f64>,
    pub avg_defense_advantage: Option<f64>,
    pub key_point_count: usize,

    pub constraints: Vec<Constraint>,
    pub constraint_summary: String,

    pub threat_score_total: f64,
    pub threat_level: ThreatLevel,
    pub threat_events: Vec<ThreatEvent>,

    pub resources: Vec<Resource>,
    /// Distance over the slowest matched friendly unit's speed.
    pub max_traversal_time_hours: Option<f64>,

    pub civilian_areas: Vec<CivilianArea>,
    pub weather: Vec<Weather>,
}

impl AxisState {
    pub fn new(axis_id: impl Into<String>, axis_name: impl Into<String>) -> Self {
        Self {
            axis_id: axis_id.into(),
            axis_name: axis_name.into(),
            mission_id: None,
            is_primary_axis: false,
            axis_importance: None,
            total_distance_km: None,
            friendly_combat_power_total: 0.0,
            enemy_combat_power_total: 0.0,
            friendly_units: Vec::new(),
            enemy_units: Vec::new(),
            terrain_cells: Vec::new(),
            avg_mobility: None,
            avg_defense_advantage: None,
            key_point_count: 0,
            constraints: Vec::new(),
            constraint_summary: String::new(),
            threat_score_total: 0.0,
            threat_level: ThreatLevel::Low,
            threat_events: Vec::new(),
            resources: Vec::new(),
            max_traversal_time_hours: None,
            civilian_areas: Vec::new(),
            weather: Vec::new(),
        }
    }

    pub fn matches_reference(&self, reference: &str) -> bool {
        reference_matches(&self.axis_id, Some(&self.axis_name), reference)
    }

    pub fn contains_cell(&self, cell_id: &str) -> bool {
        self.terrain_cells
            .iter()
            .any(|cell| same_key(&cell.cell_id, cell_id))
    }

    pub fn has_adverse_weather(&self) -> bool {
        self.weather.iter().any(Weather::is_adverse)
    }

    /// Re-derive `threat_score_total` and `threat_level` from the current event list.
    pub fn recompute_threat(&mut self, scorer: &ThreatScorer) {
        self.threat_score_total = scorer.calculate_axis_threat_score(&self.threat_events);
        self.threat_level = scorer.determine_threat_level(self.threat_score_total);
    }

    /// Add `event` unless an event with the same id is already present, then recompute the
    /// aggregate. Returns whether the event was inserted.
    pub fn inject_threat_event(&mut self, event: ThreatEvent, scorer: &ThreatScorer) -> bool {
        let present = self
            .threat_events
            .iter()
            .any(|existing| existing.threat_id == event.threat_id);
        if !present {
            self.threat_events.push(event);
        }
        self.recompute_threat(scorer);
        !present
    }

    /// Recompute the unit totals after the member lists change.
    pub fn recompute_combat_power(&mut self) {
        self.friendly_combat_power_total =
            self.friendly_units.iter().map(|unit| unit.combat_power).sum();
        self.enemy_combat_power_total = self.enemy_units.iter().map(|unit| unit.combat_power).sum();
    }

    /// One-line description for reports.
    pub fn summary(&self) -> String {
        let traversal = self
            .max_traversal_time_hours
            .map(|hours| format!("{hours:.1}h"))
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "{} ({}): friendly {:.0} vs enemy {:.0}, threat {} ({:.1}, {} event(s)), {} key point(s), traversal {}, constraints: {}",
            self.axis_name,
            self.axis_id,
            self.friendly_combat_power_total,
            self.enemy_combat_power_total,
            self.threat_level,
            self.threat_score_total,
            self.threat_events.len(),
            self.key_point_count,
            traversal,
            self.constraint_summary
        )
    }
}

/// Human-readable rendering of an axis's constraints, most important first.
pub fn summarize_constraints(constraints: &[Constraint]) -> String {
    if constraints.is_empty() {
        return "none".to_string();
    }

    let mut ordered: Vec<&Constraint> = constraints.iter().collect();
    ordered.sort_by(|left, right| {
        right
            .importance
            .cmp(&left.importance)
            .then_with(|| left.constraint_id.cmp(&right.constraint_id))
    });

    ordered
        .into_iter()
        .map(|constraint| {
            let importance = constraint
                .importance
                .map(|value| value.to_string())
                .unwrap_or_else(|| "?".to_string());
            let content = constraint.content_text();
            if content.is_empty() {
                format!("[{}|{}] {}", constraint.kind_label(), importance, constraint.constraint_id)
            } else {
                format!("[{}|{}] {}", constraint.kind_label(), importance, content)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
