//! Column-name alias tables for every battlefield table.
//!
//! Each constant lists the headers a field may appear under, current English name first,
//! followed by legacy schema names and the Korean headers used by the source workbooks.
//! [`super::RowReader`] resolves the first alias that carries a non-blank cell.

use super::normalizer::normalize_header;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

pub mod mission {
    pub const ID: &[&str] = &["mission_id", "id", "임무ID", "임무_ID", "임무 ID"];
    pub const TYPE: &[&str] = &["mission_type", "type", "임무유형", "임무종류"];
    pub const INTENTS: &[&str] = &["intents", "intent", "commander_intent", "지휘관의도", "임무의도"];
    pub const PRIMARY_AXIS: &[&str] = &["primary_axis_id", "main_axis_id", "axis_id", "주축선ID", "주요축선ID"];
    pub const START_TIME: &[&str] = &["start_time", "start", "시작시간", "개시시간"];
    pub const END_TIME: &[&str] = &["end_time", "end", "종료시간"];
    pub const PRIORITY: &[&str] = &["priority", "우선순위"];
    pub const AREA: &[&str] = &["operation_area", "area", "작전지역"];
}

pub mod axis {
    pub const ID: &[&str] = &["axis_id", "id", "축선ID", "축선_ID", "축선 ID"];
    pub const NAME: &[&str] = &["axis_name", "name", "축선명", "축선이름"];
    pub const CELLS: &[&str] = &["terrain_cell_ids", "cell_ids", "cells", "구성지형셀", "지형셀목록", "구성셀ID"];
    pub const DISTANCE: &[&str] = &["total_distance_km", "distance_km", "distance", "총거리", "총거리_km", "거리(km)"];
    pub const IMPORTANCE: &[&str] = &["importance", "defense_priority", "중요도", "방어우선순위"];
}

pub mod terrain {
    pub const ID: &[&str] = &["cell_id", "terrain_cell_id", "id", "지형셀ID", "셀ID"];
    pub const TYPE: &[&str] = &["terrain_type", "type", "지형유형", "지형형태"];
    pub const MOBILITY: &[&str] = &["mobility_grade", "mobility", "기동성등급", "기동성"];
    pub const DEFENSE: &[&str] = &["defense_advantage", "defense", "방어유리도", "방어이점"];
    pub const OBSERVATION: &[&str] = &["observation_advantage", "observation", "관측유리도", "관측이점"];
    pub const KEY_POINT: &[&str] = &["is_key_point", "key_point", "요충지여부", "요충지"];
    pub const COORDINATES: &[&str] = &["coordinates", "coords", "좌표", "좌표정보"];
}

/// Shared by the friendly and enemy unit tables.
pub mod unit {
    pub const ID: &[&str] = &["unit_id", "id", "부대ID", "부대_ID", "부대 ID"];
    pub const NAME: &[&str] = &["unit_name", "name", "부대명"];
    pub const ECHELON: &[&str] = &["echelon", "제대"];
    pub const BRANCH: &[&str] = &["branch", "병종", "병과"];
    pub const COMBAT_POWER: &[&str] = &["combat_power", "combat_power_index", "전투력", "전투력지수"];
    pub const AXIS: &[&str] = &["deployed_axis_id", "axis_id", "배치축선ID", "배치축선", "축선ID"];
    pub const CELL: &[&str] = &["deployed_cell_id", "location_cell_id", "배치지형셀ID", "위치셀ID", "지형셀ID"];
    pub const MISSION: &[&str] = &["assigned_mission_id", "mission_id", "임무ID", "할당임무ID"];
    pub const SPEED: &[&str] = &["max_speed_kmh", "speed_kmh", "speed", "최대속도", "이동속도"];
}

pub mod resource {
    pub const ID: &[&str] = &["resource_id", "id", "자원ID"];
    pub const TYPE: &[&str] = &["resource_type", "type", "자원유형", "자원종류"];
    pub const QUANTITY: &[&str] = &["quantity", "qty", "수량", "보유량"];
    pub const CELL: &[&str] = &["location_cell_id", "cell_id", "위치셀ID", "지형셀ID"];
    pub const STATUS: &[&str] = &["status", "상태", "가용상태"];
    pub const COMBAT_POWER: &[&str] = &["combat_power_index", "combat_power", "전투력지수"];
    pub const SPEED: &[&str] = &["speed_kmh", "speed", "속도"];
    pub const DETECTION: &[&str] = &["detection_range_km", "detection_range", "탐지거리"];
}

pub mod constraint {
    pub const ID: &[&str] = &["constraint_id", "id", "제약ID", "제약조건ID"];
    pub const TARGET_TYPE: &[&str] = &["target_type", "적용대상유형", "대상유형"];
    pub const TARGET_ID: &[&str] = &["target_id", "적용대상ID", "대상ID"];
    pub const TYPE: &[&str] = &["constraint_type", "type", "제약유형", "제약종류"];
    pub const CONTENT: &[&str] = &["content", "description", "text", "제약내용", "내용"];
    pub const IMPORTANCE: &[&str] = &["importance", "priority", "중요도", "우선순위"];
    pub const START_TIME: &[&str] = &["start_time", "시작시간"];
    pub const END_TIME: &[&str] = &["end_time", "종료시간"];
    pub const TIME_CRITICAL: &[&str] = &["time_critical", "시간민감", "시간민감여부"];
    pub const MAX_DURATION: &[&str] = &["max_duration_hours", "max_duration", "최대소요시간", "최대허용시간"];
}

pub mod threat_event {
    pub const ID: &[&str] = &["threat_id", "event_id", "id", "위협ID", "위협_ID"];
    pub const OCCURRED_AT: &[&str] = &["occurred_at", "occurrence_time", "time", "발생시각", "발생시간"];
    pub const TYPE_CODE: &[&str] = &["threat_type_code", "threat_type", "위협유형코드", "위협유형"];
    pub const AXIS: &[&str] = &["related_axis_id", "axis_id", "관련축선ID", "축선ID"];
    pub const CELL: &[&str] = &["location_cell_id", "related_cell_id", "발생위치셀ID", "위치셀ID", "관련지형셀ID"];
    pub const ENEMY_UNIT: &[&str] = &["related_enemy_unit_id", "enemy_unit_id", "관련적부대ID", "적부대ID"];
    pub const MISSION: &[&str] = &["related_mission_id", "mission_id", "관련임무ID", "임무ID"];
    pub const LEVEL: &[&str] = &["threat_level", "level", "위협수준", "위협등급"];
    pub const REPORT: &[&str] = &["raw_report_text", "report", "원문보고", "보고내용"];
    pub const CONFIDENCE: &[&str] = &["confidence", "신뢰도"];
    pub const STATUS: &[&str] = &["status", "상태", "처리상태"];
}

pub mod threat_type {
    pub const CODE: &[&str] = &["threat_type_code", "code", "위협유형코드", "코드"];
    pub const NAME: &[&str] = &["threat_type_name", "name", "위협유형명", "명칭"];
    pub const DESCRIPTION: &[&str] = &["description", "설명"];
    pub const KEYWORDS: &[&str] = &["keywords", "키워드"];
    pub const SEVERITY: &[&str] = &["severity", "심각도"];
}

pub mod civilian_area {
    pub const ID: &[&str] = &["area_id", "id", "지역ID", "민간지역ID"];
    pub const NAME: &[&str] = &["area_name", "name", "지역명"];
    pub const CELL: &[&str] = &["location_cell_id", "cell_id", "위치셀ID", "지형셀ID"];
    pub const POPULATION: &[&str] = &["population", "인구", "인구수"];
    pub const PROTECTION: &[&str] = &["protection_level", "보호등급", "보호수준"];
}

pub mod weather {
    pub const ID: &[&str] = &["weather_id", "id", "기상ID"];
    pub const CELL: &[&str] = &["location_cell_id", "cell_id", "위치셀ID", "지형셀ID"];
    pub const CONDITION: &[&str] = &["condition", "weather", "기상상태", "날씨"];
    pub const VISIBILITY: &[&str] = &["visibility_km", "visibility", "시정", "가시거리"];
    pub const ADVERSE: &[&str] = &["is_adverse", "adverse", "악기상여부"];
}

/// The eleven battlefield tables supplied by the data access collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Missions,
    Axes,
    TerrainCells,
    FriendlyUnits,
    EnemyUnits,
    Resources,
    Constraints,
    ThreatEvents,
    ThreatTypes,
    CivilianAreas,
    Weather,
}

impl TableKind {
    pub const fn all() -> [Self; 11] {
        [
            Self::Missions,
            Self::Axes,
            Self::TerrainCells,
            Self::FriendlyUnits,
            Self::EnemyUnits,
            Self::Resources,
            Self::Constraints,
            Self::ThreatEvents,
            Self::ThreatTypes,
            Self::CivilianAreas,
            Self::Weather,
        ]
    }

    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Missions => "missions",
            Self::Axes => "axes",
            Self::TerrainCells => "terrain_cells",
            Self::FriendlyUnits => "friendly_units",
            Self::EnemyUnits => "enemy_units",
            Self::Resources => "resources",
            Self::Constraints => "constraints",
            Self::ThreatEvents => "threat_events",
            Self::ThreatTypes => "threat_types",
            Self::CivilianAreas => "civilian_areas",
            Self::Weather => "weather",
        }
    }

    /// Every name the table may be stored under, canonical first.
    pub const fn names(self) -> &'static [&'static str] {
        match self {
            Self::Missions => &["missions", "mission", "임무정보"],
            Self::Axes => &["axes", "axis", "battle_axes", "전장축선", "축선정보"],
            Self::TerrainCells => &["terrain_cells", "terrain", "지형셀", "지형정보"],
            Self::FriendlyUnits => &["friendly_units", "friendly", "아군부대현황", "아군부대"],
            Self::EnemyUnits => &["enemy_units", "enemy", "적군부대현황", "적부대"],
            Self::Resources => &["resources", "assets", "가용자원", "자원현황"],
            Self::Constraints => &["constraints", "제약조건"],
            Self::ThreatEvents => &["threat_events", "threats", "위협상황", "위협이벤트"],
            Self::ThreatTypes => &["threat_types", "threat_type_master", "위협유형_마스터", "위협유형"],
            Self::CivilianAreas => &["civilian_areas", "civilians", "민간인지역", "민간지역"],
            Self::Weather => &["weather", "기상상황", "기상정보"],
        }
    }

    /// Resolve a stored table name (any alias, any case) to its kind.
    pub fn from_name(name: &str) -> Option<Self> {
        table_name_map().get(&normalize_header(name)).copied()
    }
}

static TABLE_NAME_MAP: OnceLock<HashMap<String, TableKind>> = OnceLock::new();

fn table_name_map() -> &'static HashMap<String, TableKind> {
    TABLE_NAME_MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for kind in TableKind::all() {
            for name in kind.names() {
                map.insert(normalize_header(name), kind);
            }
        }
        map
    })
}
