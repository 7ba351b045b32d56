use crate::evaluation::{CriteriaWeights, MettcFloors, WeightConfigError};
use crate::threat::ThreatScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("failed to read scoring config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scoring config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Weights(#[from] WeightConfigError),
}

/// Every tunable of the scoring pipeline. Absent sections keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Level scores, type weights, and threat classification thresholds.
    pub threat: ThreatScoringConfig,
    /// Breakdown weights; must sum to 1.0.
    pub weights: CriteriaWeights,
    /// METT-C validity floors.
    pub mett_c_floors: MettcFloors,
}

impl ScoringConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ScoringConfigError> {
        let config: ScoringConfig = serde_json::from_str(raw)?;
        config.weights.validate()?;
        Ok(config)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoringConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScoringConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
