use crate::cli::{AxesArgs, DataArgs, EvaluateArgs, ThreatArgs};
use crate::infra::{load_candidates, load_scoring, print_json, resolve_data_dir};
use chrono::Utc;
use coa_engine::config::AppConfig;
use coa_engine::error::AppError;
use coa_engine::ingest::CsvDirectory;
use coa_engine::service::{CoaRecommendationService, Recommendation};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub(crate) fn run_axes(config: &AppConfig, args: AxesArgs) -> Result<(), AppError> {
    let service = build_service(config, &args.data)?;
    let states = service
        .builder()
        .build_axis_states(&args.mission)
        .map_err(|err| AppError::Service(err.into()))?;

    let summaries: Vec<String> = states.iter().map(|state| state.summary()).collect();
    print_json(&json!({
        "mission_id": args.mission,
        "generated_at": Utc::now().to_rfc3339(),
        "summaries": summaries,
        "axis_states": states,
    }))
}

pub(crate) fn run_evaluate(config: &AppConfig, args: EvaluateArgs) -> Result<(), AppError> {
    let service = build_service(config, &args.data)?;
    let candidates = load_candidates(&args.coas)?;
    info!(mission_id = %args.mission, candidates = candidates.len(), "evaluating candidates");

    let recommendation = service.recommend(&args.mission, &candidates)?;
    print_recommendation(&recommendation)
}

pub(crate) fn run_threat(config: &AppConfig, args: ThreatArgs) -> Result<(), AppError> {
    let service = build_service(config, &args.data)?;
    let candidates = load_candidates(&args.coas)?;
    info!(threat_id = %args.threat_id, candidates = candidates.len(), "evaluating threat response");

    let recommendation = service.recommend_for_stored_threat(
        &args.threat_id,
        args.mission.as_deref(),
        &candidates,
    )?;
    print_recommendation(&recommendation)
}

fn build_service(config: &AppConfig, data: &DataArgs) -> Result<CoaRecommendationService, AppError> {
    let data_dir = resolve_data_dir(data.data_dir.clone(), config)?;
    let scoring = load_scoring(data.scoring.as_deref(), config)?;
    info!(data_dir = %data_dir.display(), environment = ?config.environment, "loading battlefield tables");

    let source = Arc::new(CsvDirectory::new(data_dir));
    Ok(CoaRecommendationService::new(source, scoring)?)
}

fn print_recommendation(recommendation: &Recommendation) -> Result<(), AppError> {
    let best = recommendation
        .best()
        .map(|ranked| ranked.evaluation.coa_id.clone());
    print_json(&json!({
        "generated_at": Utc::now().to_rfc3339(),
        "best": best,
        "recommendation": recommendation,
    }))
}
