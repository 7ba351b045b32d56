use coa_engine::config::ScoringConfig;
use coa_engine::domain::{CourseOfAction, ThreatEvent};
use coa_engine::evaluation::Verdict;
use coa_engine::ingest::{InMemoryTables, Row, TableKind};
use coa_engine::service::{CoaRecommendationService, ServiceError};
use serde_json::Value;
use std::sync::Arc;

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn tables() -> InMemoryTables {
    InMemoryTables::new()
        .with_table(
            TableKind::Missions,
            vec![row(&[("mission_id", "DEF-1"), ("mission_type", "defense"), ("primary_axis_id", "NORTH")])],
        )
        .with_table(
            TableKind::Axes,
            vec![
                row(&[("axis_id", "NORTH"), ("terrain_cell_ids", "N1|N2"), ("total_distance_km", "12")]),
                row(&[("axis_id", "SOUTH"), ("terrain_cell_ids", "S1"), ("total_distance_km", "18")]),
            ],
        )
        .with_table(
            TableKind::TerrainCells,
            vec![
                row(&[("cell_id", "N1"), ("mobility_grade", "5")]),
                row(&[("cell_id", "N2"), ("mobility_grade", "5")]),
                row(&[("cell_id", "S1"), ("mobility_grade", "1")]),
            ],
        )
        .with_table(
            TableKind::FriendlyUnits,
            vec![
                row(&[("unit_id", "BN-1"), ("combat_power", "300"), ("deployed_axis_id", "NORTH"), ("max_speed_kmh", "24")]),
                row(&[("unit_id", "BN-2"), ("combat_power", "100"), ("deployed_axis_id", "SOUTH")]),
            ],
        )
        .with_table(
            TableKind::EnemyUnits,
            vec![row(&[("unit_id", "OPFOR-1"), ("combat_power", "100"), ("deployed_axis_id", "NORTH")])],
        )
        .with_table(
            TableKind::Constraints,
            vec![row(&[
                ("constraint_id", "C-FIRE"),
                ("target_type", "axis"),
                ("target_id", "NORTH"),
                ("constraint_type", "firepower"),
                ("content", "화력 사용은 가용량의 50% 이내"),
                ("importance", "3"),
            ])],
        )
        .with_table(
            TableKind::ThreatEvents,
            vec![
                row(&[
                    ("threat_id", "TH-1"),
                    ("threat_type_code", "ARTILLERY"),
                    ("location_cell_id", "N2"),
                    ("threat_level", "0.9"),
                ]),
                row(&[
                    ("threat_id", "TH-3"),
                    ("threat_type_code", "INFILTRATION"),
                    ("related_axis_id", "NORTH"),
                    ("threat_level", "High"),
                ]),
            ],
        )
}

fn candidates() -> Vec<CourseOfAction> {
    serde_json::from_str(
        r#"[
            {"coa_id": "COA-HOLD", "name": "Hold north", "axis_ids": ["north"],
             "estimated_duration_hours": 2.0,
             "fire_support": {"allocated": 2.0, "total": 10.0}},
            {"coa_id": "COA-STRIKE", "axis_ids": ["NORTH"],
             "fire_support": {"allocated": 9.0, "total": 10.0},
             "mett_c": {"time": 0.0}},
            {"coa_id": "COA-LOST", "axis_ids": ["WEST"]}
        ]"#,
    )
    .expect("candidates deserialize")
}

fn service(scoring: ScoringConfig) -> CoaRecommendationService {
    CoaRecommendationService::new(Arc::new(tables()), scoring).expect("scoring is valid")
}

#[test]
fn mission_request_ranks_gates_and_reports() {
    let recommendation = service(ScoringConfig::default())
        .recommend("DEF-1", &candidates())
        .expect("axes exist");

    assert_eq!(recommendation.axis_states.len(), 1);
    assert_eq!(recommendation.axis_states[0].axis_id, "NORTH");
    assert_eq!(recommendation.omitted, ["COA-LOST"]);

    let ids: Vec<&str> = recommendation
        .ranked
        .iter()
        .map(|ranked| ranked.evaluation.coa_id.as_str())
        .collect();
    assert_eq!(ids, ["COA-HOLD", "COA-STRIKE"]);
    assert_eq!(recommendation.ranked[0].verdict, Verdict::Accepted);
    assert!(recommendation.ranked[1].verdict.is_rejected());

    let fire_check = &recommendation.ranked[1].evaluation.constraint_checks[0];
    assert_eq!(fire_check.constraint_id, "C-FIRE");
    assert!(fire_check.compliance < 1.0);

    let best = recommendation.best().expect("accepted candidate");
    assert_eq!(best.evaluation.coa_name.as_deref(), Some("Hold north"));
}

#[test]
fn recommendation_serializes_with_tagged_verdicts() {
    let recommendation = service(ScoringConfig::default())
        .recommend("DEF-1", &candidates())
        .expect("axes exist");
    let value: Value = serde_json::to_value(&recommendation).expect("serialize");

    assert_eq!(value["mission_id"], "DEF-1");
    assert_eq!(value["ranked"][0]["verdict"]["status"], "accepted");
    assert_eq!(value["ranked"][1]["verdict"]["status"], "rejected");
    assert!(value["ranked"][0]["evaluation"]["breakdown"]["threat"].is_number());
    assert_eq!(value["axis_states"][0]["threat_level"], "High");
}

#[test]
fn scoring_config_json_changes_the_outcome() {
    let scoring = ScoringConfig::from_json_str(
        r#"{
            "threat": {"thresholds": {"high": 20.0, "medium": 10.0}},
            "mett_c_floors": {"troops": 0.9}
        }"#,
    )
    .expect("config parses");
    let recommendation = service(scoring)
        .recommend("DEF-1", &candidates())
        .expect("axes exist");

    assert_eq!(recommendation.axis_states[0].threat_level.label(), "Low");
    match &recommendation.ranked[0].verdict {
        Verdict::Flagged { breaches } => {
            assert_eq!(breaches.len(), 1);
            assert_eq!(breaches[0].label(), "troops");
        }
        other => panic!("expected flagged verdict, got {other:?}"),
    }
    assert!(recommendation.best().is_none());
}

#[test]
fn threat_request_centres_on_the_reported_cell() {
    let event: ThreatEvent = serde_json::from_str(
        r#"{"threat_id": "TH-2", "threat_type_code": "DRONE", "location_cell_id": "S1", "threat_level": "Medium"}"#,
    )
    .expect("event deserializes");
    let south = CourseOfAction {
        coa_id: "COA-SOUTH".to_string(),
        axis_ids: vec!["SOUTH".to_string()],
        ..CourseOfAction::default()
    };

    let recommendation = service(ScoringConfig::default()).recommend_for_threat(&event, None, &[south]);
    assert_eq!(recommendation.mission_id.as_deref(), Some("DEF-1"));
    assert_eq!(recommendation.axis_states.len(), 1);
    let state = &recommendation.axis_states[0];
    assert_eq!(state.axis_id, "SOUTH");
    assert_eq!(state.threat_events.len(), 1);
    assert!((state.threat_score_total - 2.4).abs() < 1e-9);
    assert_eq!(recommendation.ranked.len(), 1);
}

#[test]
fn unknown_stored_threat_is_an_error() {
    match service(ScoringConfig::default()).recommend_for_stored_threat("TH-9", None, &candidates()) {
        Err(ServiceError::UnknownThreat(id)) => assert_eq!(id, "TH-9"),
        other => panic!("expected unknown threat, got {other:?}"),
    }
}
