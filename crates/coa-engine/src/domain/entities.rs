use crate::ingest::aliases::{axis, civilian_area, mission, resource, terrain, unit, weather};
use crate::ingest::{normalize_key, same_key, FromRow, Row, RowReader};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Mission record; read-only for the duration of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,
    pub mission_type: Option<String>,
    #[serde(default)]
    pub intents: Vec<String>,
    pub primary_axis_id: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub priority: Option<i64>,
    pub operation_area: Option<String>,
}

impl Mission {
    pub fn is_defensive(&self) -> bool {
        self.mission_type
            .as_deref()
            .map(|kind| kind.contains("방어") || kind.to_lowercase().contains("defen"))
            .unwrap_or(false)
    }
}

impl FromRow for Mission {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            mission_id: reader.text(mission::ID).unwrap_or_default(),
            mission_type: reader.text(mission::TYPE),
            intents: reader
                .text(mission::INTENTS)
                .map(|value| {
                    value
                        .split([';', '|', '\n'])
                        .map(str::trim)
                        .filter(|intent| !intent.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            primary_axis_id: reader.text(mission::PRIMARY_AXIS),
            start_time: reader.datetime(mission::START_TIME),
            end_time: reader.datetime(mission::END_TIME),
            priority: reader.integer(mission::PRIORITY),
            operation_area: reader.text(mission::AREA),
        }
    }
}

/// Named avenue of approach composed of terrain cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub axis_id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub terrain_cell_ids: Vec<String>,
    pub total_distance_km: Option<f64>,
    pub importance: Option<i64>,
}

impl Axis {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.axis_id)
    }

    pub fn contains_cell(&self, cell_id: &str) -> bool {
        self.terrain_cell_ids
            .iter()
            .any(|member| same_key(member, cell_id))
    }

    /// Normalized fuzzy match of a free-form axis reference against this axis.
    pub fn matches_reference(&self, reference: &str) -> bool {
        reference_matches(&self.axis_id, self.name.as_deref(), reference)
    }
}

/// Both sides are trimmed and uppercased; a reference matches on exact id, exact name, or
/// substring containment in either direction on either id or name. Upstream tables mix
/// ids and display names in the same column.
pub(crate) fn reference_matches(id: &str, name: Option<&str>, reference: &str) -> bool {
    let reference = normalize_key(reference);
    if reference.is_empty() {
        return false;
    }

    let keys = [Some(normalize_key(id)), name.map(normalize_key)];
    keys.iter().flatten().filter(|key| !key.is_empty()).any(|key| {
        *key == reference || key.contains(reference.as_str()) || reference.contains(key.as_str())
    })
}

impl FromRow for Axis {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            axis_id: reader.text(axis::ID).unwrap_or_default(),
            name: reader.text(axis::NAME),
            terrain_cell_ids: reader.list(axis::CELLS),
            total_distance_km: reader.number(axis::DISTANCE),
            importance: reader.integer(axis::IMPORTANCE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub cell_id: String,
    pub terrain_type: Option<String>,
    pub mobility_grade: Option<f64>,
    pub defense_advantage: Option<f64>,
    pub observation_advantage: Option<f64>,
    pub is_key_point: bool,
    /// Raw coordinate string; geometry parsing happens downstream.
    pub coordinates: Option<String>,
}

impl FromRow for TerrainCell {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            cell_id: reader.text(terrain::ID).unwrap_or_default(),
            terrain_type: reader.text(terrain::TYPE),
            mobility_grade: reader.number(terrain::MOBILITY),
            defense_advantage: reader.number(terrain::DEFENSE),
            observation_advantage: reader.number(terrain::OBSERVATION),
            is_key_point: reader.flag(terrain::KEY_POINT).unwrap_or(false),
            coordinates: reader.text(terrain::COORDINATES),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FriendlyUnit {
    pub unit_id: String,
    pub name: Option<String>,
    pub echelon: Option<String>,
    pub branch: Option<String>,
    pub combat_power: f64,
    pub deployed_axis_id: Option<String>,
    pub deployed_cell_id: Option<String>,
    /// Units without an assignment are axis-scoped rather than mission-scoped.
    pub assigned_mission_id: Option<String>,
    pub max_speed_kmh: Option<f64>,
}

impl FromRow for FriendlyUnit {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            unit_id: reader.text(unit::ID).unwrap_or_default(),
            name: reader.text(unit::NAME),
            echelon: reader.text(unit::ECHELON),
            branch: reader.text(unit::BRANCH),
            combat_power: reader.number(unit::COMBAT_POWER).unwrap_or(0.0),
            deployed_axis_id: reader.text(unit::AXIS),
            deployed_cell_id: reader.text(unit::CELL),
            assigned_mission_id: reader.text(unit::MISSION),
            max_speed_kmh: reader.number(unit::SPEED),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyUnit {
    pub unit_id: String,
    pub name: Option<String>,
    pub echelon: Option<String>,
    pub branch: Option<String>,
    pub combat_power: f64,
    pub deployed_axis_id: Option<String>,
    pub deployed_cell_id: Option<String>,
    pub max_speed_kmh: Option<f64>,
}

impl FromRow for EnemyUnit {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            unit_id: reader.text(unit::ID).unwrap_or_default(),
            name: reader.text(unit::NAME),
            echelon: reader.text(unit::ECHELON),
            branch: reader.text(unit::BRANCH),
            combat_power: reader.number(unit::COMBAT_POWER).unwrap_or(0.0),
            deployed_axis_id: reader.text(unit::AXIS),
            deployed_cell_id: reader.text(unit::CELL),
            max_speed_kmh: reader.number(unit::SPEED),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: String,
    pub resource_type: Option<String>,
    pub quantity: Option<f64>,
    pub location_cell_id: Option<String>,
    pub status: Option<String>,
    pub combat_power_index: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub detection_range_km: Option<f64>,
}

impl Resource {
    /// Resources without a status are assumed usable.
    pub fn is_available(&self) -> bool {
        let Some(status) = self.status.as_deref() else {
            return true;
        };
        let status = normalize_key(status);
        const UNAVAILABLE: &[&str] = &["UNAVAILABLE", "MAINT", "DAMAGED", "불가", "정비", "파손", "고장"];
        !UNAVAILABLE.iter().any(|marker| status.contains(marker))
    }
}

impl FromRow for Resource {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            resource_id: reader.text(resource::ID).unwrap_or_default(),
            resource_type: reader.text(resource::TYPE),
            quantity: reader.number(resource::QUANTITY),
            location_cell_id: reader.text(resource::CELL),
            status: reader.text(resource::STATUS),
            combat_power_index: reader.number(resource::COMBAT_POWER),
            speed_kmh: reader.number(resource::SPEED),
            detection_range_km: reader.number(resource::DETECTION),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CivilianArea {
    pub area_id: String,
    pub name: Option<String>,
    pub location_cell_id: Option<String>,
    pub population: Option<f64>,
    pub protection_level: Option<String>,
}

impl FromRow for CivilianArea {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            area_id: reader.text(civilian_area::ID).unwrap_or_default(),
            name: reader.text(civilian_area::NAME),
            location_cell_id: reader.text(civilian_area::CELL),
            population: reader.number(civilian_area::POPULATION),
            protection_level: reader.text(civilian_area::PROTECTION),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub weather_id: String,
    /// `None` applies the observation to every axis.
    pub location_cell_id: Option<String>,
    pub condition: Option<String>,
    pub visibility_km: Option<f64>,
    pub adverse: Option<bool>,
}

impl Weather {
    pub fn is_adverse(&self) -> bool {
        if let Some(flag) = self.adverse {
            return flag;
        }
        let Some(condition) = self.condition.as_deref() else {
            return false;
        };
        let condition = condition.to_lowercase();
        const ADVERSE: &[&str] = &[
            "악천후", "폭우", "폭설", "안개", "태풍", "황사", "storm", "fog", "heavy", "blizzard",
            "adverse",
        ];
        ADVERSE.iter().any(|marker| condition.contains(marker))
    }
}

impl FromRow for Weather {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            weather_id: reader.text(weather::ID).unwrap_or_default(),
            location_cell_id: reader.text(weather::CELL),
            condition: reader.text(weather::CONDITION),
            visibility_km: reader.number(weather::VISIBILITY),
            adverse: reader.flag(weather::ADVERSE),
        }
    }
}
