//! File and environment helpers shared by the commands.

use coa_engine::config::{AppConfig, ScoringConfig};
use coa_engine::domain::CourseOfAction;
use coa_engine::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateFile {
    List(Vec<CourseOfAction>),
    Wrapped { coas: Vec<CourseOfAction> },
}

/// `--data-dir` wins over `COA_DATA_DIR`; the result must be an existing directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf, AppError> {
    let Some(dir) = explicit.or_else(|| config.data_dir.clone()) else {
        return Err(AppError::Usage(
            "no data directory given; pass --data-dir or set COA_DATA_DIR".to_string(),
        ));
    };
    if !dir.is_dir() {
        return Err(AppError::Usage(format!(
            "data directory '{}' does not exist",
            dir.display()
        )));
    }
    Ok(dir)
}

/// Candidates from a JSON array or an object with a `coas` array.
pub fn parse_candidates(raw: &str) -> Result<Vec<CourseOfAction>, AppError> {
    let candidates = match serde_json::from_str::<CandidateFile>(raw)? {
        CandidateFile::List(coas) | CandidateFile::Wrapped { coas } => coas,
    };
    if let Some(blank) = candidates.iter().position(|coa| coa.coa_id.trim().is_empty()) {
        return Err(AppError::Usage(format!(
            "candidate #{} has an empty coa_id",
            blank + 1
        )));
    }
    Ok(candidates)
}

pub fn load_candidates(path: &Path) -> Result<Vec<CourseOfAction>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_candidates(&raw)
}

/// Scoring from `path` (or defaults), with the environment overrides applied on top.
pub fn load_scoring(path: Option<&Path>, config: &AppConfig) -> Result<ScoringConfig, AppError> {
    let mut scoring = match path {
        Some(path) => ScoringConfig::from_json_path(path)?,
        None => ScoringConfig::default(),
    };
    config.apply_to(&mut scoring);
    scoring
        .weights
        .validate()
        .map_err(|err| AppError::Service(err.into()))?;
    Ok(scoring)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
