use std::sync::Arc;

use crate::axis::AxisStateBuilder;
use crate::domain::{AxisState, CourseOfAction, FireSupportAllocation, ThreatEvent};
use crate::evaluation::{CoaEvaluator, CriteriaWeights};
use crate::ingest::{InMemoryTables, Row, TableKind};

pub(super) fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Two-axis battlefield with mixed Korean and English headers.
///
/// AXIS01 (서부축, C01-C02) is M-01's primary axis: friendly 80 + 60, enemy 160, one High
/// 침투 and one Medium 기만징후 event. AXIS02 (동부축, C03-C04) carries adverse weather at
/// C03 and a Low 포격 event at C04.
pub(super) fn battlefield() -> InMemoryTables {
    InMemoryTables::new()
        .with_table(
            TableKind::Missions,
            vec![
                row(&[
                    ("임무ID", "M-01"),
                    ("임무유형", "방어"),
                    ("주축선ID", "AXIS01"),
                ]),
                row(&[("mission_id", "M-02"), ("mission_type", "공격")]),
            ],
        )
        .with_table(
            TableKind::Axes,
            vec![
                row(&[
                    ("축선ID", "AXIS01"),
                    ("축선명", "서부축"),
                    ("구성지형셀", "C01,C02"),
                    ("총거리", "30"),
                    ("중요도", "5"),
                ]),
                row(&[
                    ("axis_id", "AXIS02"),
                    ("axis_name", "동부축"),
                    ("terrain_cell_ids", "C03;C04"),
                    ("total_distance_km", "20"),
                ]),
            ],
        )
        .with_table(
            TableKind::TerrainCells,
            vec![
                row(&[("지형셀ID", "C01"), ("기동성등급", "4"), ("요충지여부", "Y")]),
                row(&[("지형셀ID", "C02"), ("기동성등급", "2")]),
                row(&[("cell_id", "C03"), ("mobility_grade", "3")]),
                row(&[("cell_id", "C04"), ("mobility_grade", "5")]),
            ],
        )
        .with_table(
            TableKind::FriendlyUnits,
            vec![
                row(&[
                    ("부대ID", "F-1"),
                    ("전투력", "80"),
                    ("배치축선ID", " axis01 "),
                    ("최대속도", "30"),
                ]),
                row(&[
                    ("부대ID", "F-2"),
                    ("전투력", "60"),
                    ("배치지형셀ID", "C02"),
                    ("할당임무ID", "M-01"),
                    ("최대속도", "15"),
                ]),
                row(&[
                    ("unit_id", "F-3"),
                    ("combat_power", "100"),
                    ("deployed_axis_id", "AXIS02"),
                    ("max_speed_kmh", "40"),
                ]),
            ],
        )
        .with_table(
            TableKind::EnemyUnits,
            vec![
                row(&[("부대ID", "E-1"), ("전투력", "160"), ("배치축선ID", "서부축")]),
                row(&[("unit_id", "E-2"), ("combat_power", "50"), ("deployed_axis_id", "AXIS02")]),
            ],
        )
        .with_table(
            TableKind::Resources,
            vec![
                row(&[("자원ID", "R-1"), ("위치셀ID", "C01"), ("상태", "가용")]),
                row(&[("자원ID", "R-2"), ("위치셀ID", "C02"), ("상태", "정비중")]),
                row(&[("resource_id", "R-3"), ("location_cell_id", "C03")]),
            ],
        )
        .with_table(
            TableKind::Constraints,
            vec![
                row(&[
                    ("제약ID", "K-1"),
                    ("적용대상유형", "축선"),
                    ("적용대상ID", "AXIS01"),
                    ("제약유형", "시간"),
                    ("중요도", "5"),
                    ("최대소요시간", "4"),
                ]),
                row(&[
                    ("제약ID", "K-2"),
                    ("제약유형", "교전규칙"),
                    ("제약내용", "민간인 피해 최소화"),
                    ("중요도", "4"),
                ]),
                row(&[
                    ("constraint_id", "K-3"),
                    ("target_type", "terrain_cell"),
                    ("target_id", "C03"),
                    ("constraint_type", "weather"),
                    ("content", "악천후 시 항공 지원 금지"),
                    ("importance", "3"),
                ]),
            ],
        )
        .with_table(
            TableKind::ThreatTypes,
            vec![
                row(&[
                    ("위협유형코드", "INF"),
                    ("위협유형명", "침투"),
                    ("심각도", "High"),
                ]),
                row(&[("code", "DEC"), ("name", "기만징후")]),
            ],
        )
        .with_table(
            TableKind::ThreatEvents,
            vec![
                row(&[
                    ("위협ID", "T-1"),
                    ("위협유형코드", "침투"),
                    ("관련축선ID", "AXIS01"),
                    ("위협수준", "High"),
                ]),
                row(&[
                    ("위협ID", "T-2"),
                    ("위협유형코드", "기만징후"),
                    ("발생위치셀ID", "C01"),
                    ("위협수준", "Medium"),
                ]),
                row(&[
                    ("threat_id", "T-3"),
                    ("threat_type_code", "포격"),
                    ("location_cell_id", "C04"),
                    ("threat_level", "Low"),
                ]),
            ],
        )
        .with_table(
            TableKind::CivilianAreas,
            vec![row(&[("지역ID", "CIV-1"), ("지역명", "서부 마을"), ("위치셀ID", "C02")])],
        )
        .with_table(
            TableKind::Weather,
            vec![row(&[("기상ID", "W-1"), ("위치셀ID", "C03"), ("기상상태", "폭우")])],
        )
}

pub(super) fn builder() -> AxisStateBuilder {
    AxisStateBuilder::new(Arc::new(battlefield()))
}

pub(super) fn mission_states() -> Vec<AxisState> {
    builder()
        .build_axis_states("M-01")
        .expect("fixture defines axes")
}

pub(super) fn evaluator() -> CoaEvaluator {
    CoaEvaluator::new(CriteriaWeights::default()).expect("default weights are valid")
}

pub(super) fn coa(id: &str, axes: &[&str]) -> CourseOfAction {
    CourseOfAction {
        coa_id: id.to_string(),
        axis_ids: axes.iter().map(|axis| axis.to_string()).collect(),
        ..CourseOfAction::default()
    }
}

/// Fast plan on the primary axis that keeps clear of the village.
pub(super) fn compliant_coa(id: &str) -> CourseOfAction {
    CourseOfAction {
        estimated_duration_hours: Some(3.0),
        impacted_cell_ids: Some(vec!["C01".to_string()]),
        ..coa(id, &["AXIS01"])
    }
}

/// Slow plan on the primary axis that runs through the village with fires.
pub(super) fn late_coa(id: &str) -> CourseOfAction {
    CourseOfAction {
        estimated_duration_hours: Some(10.0),
        fire_support: Some(FireSupportAllocation {
            allocated: 4.0,
            total: 8.0,
        }),
        ..coa(id, &["AXIS01"])
    }
}

pub(super) fn threat(id: &str, level: &str, kind: &str) -> ThreatEvent {
    ThreatEvent {
        threat_id: id.to_string(),
        threat_level: Some(level.to_string()),
        threat_type_code: Some(kind.to_string()),
        ..ThreatEvent::default()
    }
}
