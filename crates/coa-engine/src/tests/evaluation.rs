use super::common::*;
use crate::domain::CourseOfAction;
use crate::evaluation::{CoaEvaluator, CriteriaWeights, Criterion, WeightConfigError};

#[test]
fn weights_summing_to_point_nine_are_rejected() {
    let weights = CriteriaWeights {
        threat: 0.15,
        ..CriteriaWeights::default()
    };
    match CoaEvaluator::new(weights) {
        Err(WeightConfigError::InvalidSum { sum }) => assert!((sum - 0.9).abs() < 1e-9),
        other => panic!("expected invalid weight sum, got {other:?}"),
    }
}

#[test]
fn total_is_the_weighted_sum_of_the_breakdown() {
    let states = mission_states();
    let results = evaluator().evaluate("M-01", &states, &[compliant_coa("COA-1")]);
    assert_eq!(results.len(), 1);

    let result = &results[0];
    let expected: f64 = Criterion::ALL
        .iter()
        .map(|criterion| result.weights.get(*criterion) * result.breakdown.get(*criterion))
        .sum();
    assert!((result.total_score - expected).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&result.total_score));
    for criterion in Criterion::ALL {
        assert!((0.0..=1.0).contains(&result.breakdown.get(criterion)));
    }
    assert_eq!(result.rank, 1);
    assert_eq!(result.axis_ids, ["AXIS01"]);
}

#[test]
fn breakdown_follows_the_axis_state() {
    let states = mission_states();
    let result = evaluator()
        .evaluate_candidate("M-01", &states, &compliant_coa("COA-1"))
        .expect("candidate is on a known axis");
    let breakdown = result.breakdown;

    // 140 vs 160 under a threat total of 6.1 against a High threshold of 8.
    let expected_threat = (140.0 / 160.0) / (1.0 + 6.1 / 8.0);
    assert!((breakdown.threat - expected_threat).abs() < 1e-9);
    assert!((breakdown.assets - 140.0 / 300.0).abs() < 1e-9);
    // Mobility 3.0 / 5 and one of two resources available.
    assert!((breakdown.resources - 0.55).abs() < 1e-9);
    assert_eq!(breakdown.environment, 1.0);
    assert_eq!(breakdown.historical, 0.5);
    assert_eq!(breakdown.chain, 0.5);
    assert_eq!(breakdown.mission_alignment, 1.0);

    assert_eq!(result.combat_power_score, breakdown.assets);
    assert_eq!(result.mobility_score, breakdown.resources);
    assert_eq!(result.constraint_compliance_score, breakdown.environment);
    assert_eq!(result.threat_response_score, breakdown.threat);
    assert!((result.risk_score - (1.0 - breakdown.threat)).abs() < 1e-12);
    assert!(!result.rationale.is_empty());
}

#[test]
fn evaluation_is_deterministic() {
    let states = mission_states();
    let coas = [compliant_coa("COA-1"), late_coa("COA-2")];
    let first = evaluator().evaluate("M-01", &states, &coas);
    let second = evaluator().evaluate("M-01", &states, &coas);
    assert_eq!(first, second);
}

#[test]
fn equal_scores_rank_by_candidate_id() {
    let states = mission_states();
    let coas = [compliant_coa("COA-B"), compliant_coa("COA-A")];
    let results = evaluator().evaluate("M-01", &states, &coas);

    assert_eq!(results[0].total_score, results[1].total_score);
    assert_eq!(results[0].coa_id, "COA-A");
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[1].coa_id, "COA-B");
    assert_eq!(results[1].rank, 2);
}

#[test]
fn candidates_without_a_known_axis_are_omitted() {
    let states = mission_states();
    let coas = [
        coa("COA-EAST", &["AXIS02"]),
        coa("COA-NOWHERE", &[]),
        compliant_coa("COA-1"),
    ];
    let results = evaluator().evaluate("M-01", &states, &coas);
    let ids: Vec<&str> = results.iter().map(|result| result.coa_id.as_str()).collect();
    assert_eq!(ids, ["COA-1"]);
}

#[test]
fn critical_time_violation_dominates_the_environment_score() {
    let states = mission_states();
    let coas = [late_coa("COA-LATE"), compliant_coa("COA-FAST")];
    let results = evaluator().evaluate("M-01", &states, &coas);

    assert_eq!(results[0].coa_id, "COA-FAST");
    let late = &results[1];
    assert_eq!(late.coa_id, "COA-LATE");
    assert_eq!(late.breakdown.environment, 0.0);
    assert!(late.total_score < results[0].total_score);

    let time_check = late
        .constraint_checks
        .iter()
        .find(|check| check.constraint_id == "K-1")
        .expect("time constraint checked");
    assert_eq!(time_check.compliance, 0.0);
    assert_eq!(time_check.penalty, 1.0);
    assert!(time_check.is_violated());
}

#[test]
fn mett_c_is_derived_from_constraint_checks() {
    let states = mission_states();
    let results = evaluator().evaluate(
        "M-01",
        &states,
        &[compliant_coa("COA-FAST"), late_coa("COA-LATE")],
    );
    let fast = &results[0].mett_c;
    assert_eq!(fast.civilian, Some(1.0));
    assert_eq!(fast.time, Some(1.0));
    assert_eq!(fast.mission, Some(1.0));

    let late = &results[1].mett_c;
    assert!((late.civilian.expect("civilian derived") - 0.7).abs() < 1e-9);
    assert_eq!(late.time, Some(0.0));
}

#[test]
fn participating_units_narrow_committed_power() {
    let states = mission_states();
    let candidate = CourseOfAction {
        participating_unit_ids: vec!["f-1".to_string(), "F-9".to_string()],
        ..compliant_coa("COA-1")
    };
    let result = evaluator()
        .evaluate_candidate("M-01", &states, &candidate)
        .expect("candidate is on a known axis");

    assert!((result.breakdown.assets - 80.0 / 240.0).abs() < 1e-9);
    assert_eq!(result.breakdown.chain, 0.5);
}

#[test]
fn candidate_declared_for_another_mission_is_penalized() {
    let states = mission_states();
    let candidate = CourseOfAction {
        mission_id: Some("M-02".to_string()),
        ..compliant_coa("COA-1")
    };
    let result = evaluator()
        .evaluate_candidate("M-01", &states, &candidate)
        .expect("candidate is on a known axis");
    assert_eq!(result.breakdown.mission_alignment, 0.5);
}
