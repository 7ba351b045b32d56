mod scoring;

pub use scoring::{ScoringConfig, ScoringConfigError};

use crate::evaluation::{CriteriaWeights, WeightConfigError};
use crate::threat::ThresholdUpdate;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Informational only: reported in startup logs, no behavior depends on it.
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    /// Default CSV directory for battlefield tables.
    pub data_dir: Option<PathBuf>,
    /// Replaces the scoring weights when set.
    pub weights: Option<CriteriaWeights>,
    pub threat_thresholds: ThresholdUpdate,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("COA_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("COA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("COA_DATA_DIR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let weights = match env::var("COA_WEIGHTS") {
            Ok(value) if !value.trim().is_empty() => Some(parse_weights(&value)?),
            _ => None,
        };

        let high = optional_threshold("COA_THREAT_HIGH")?;
        let medium = optional_threshold("COA_THREAT_MEDIUM")?;
        if let (Some(high), Some(medium)) = (high, medium) {
            if medium > high {
                return Err(ConfigError::ThresholdOrder { high, medium });
            }
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            data_dir,
            weights,
            threat_thresholds: ThresholdUpdate { high, medium },
        })
    }

    /// Overlay the environment overrides onto a loaded scoring configuration.
    pub fn apply_to(&self, scoring: &mut ScoringConfig) {
        if let Some(weights) = self.weights {
            scoring.weights = weights;
        }
        if let Some(high) = self.threat_thresholds.high {
            scoring.threat.thresholds.high = high;
        }
        if let Some(medium) = self.threat_thresholds.medium {
            scoring.threat.thresholds.medium = medium;
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MalformedWeights { value: String },
    InvalidWeights { source: WeightConfigError },
    InvalidThreshold { name: &'static str, value: String },
    ThresholdOrder { high: f64, medium: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MalformedWeights { value } => write!(
                f,
                "COA_WEIGHTS must be comma-separated key=value pairs, found '{}'",
                value
            ),
            ConfigError::InvalidWeights { source } => write!(f, "COA_WEIGHTS rejected: {source}"),
            ConfigError::InvalidThreshold { name, value } => {
                write!(f, "{name} must be a finite number, found '{value}'")
            }
            ConfigError::ThresholdOrder { high, medium } => write!(
                f,
                "COA_THREAT_MEDIUM ({medium}) must not exceed COA_THREAT_HIGH ({high})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidWeights { source } => Some(source),
            ConfigError::MalformedWeights { .. }
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::ThresholdOrder { .. } => None,
        }
    }
}

fn parse_weights(value: &str) -> Result<CriteriaWeights, ConfigError> {
    let malformed = || ConfigError::MalformedWeights {
        value: value.to_string(),
    };

    let mut pairs = Vec::new();
    for entry in value
        .split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        let (key, weight) = entry.split_once('=').ok_or_else(malformed)?;
        let weight = weight.trim().parse::<f64>().map_err(|_| malformed())?;
        pairs.push((key.trim().to_string(), weight));
    }

    CriteriaWeights::from_pairs(pairs).map_err(|source| ConfigError::InvalidWeights { source })
}

fn optional_threshold(name: &'static str) -> Result<Option<f64>, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        _ => Err(ConfigError::InvalidThreshold { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("COA_ENV");
        env::remove_var("COA_LOG_LEVEL");
        env::remove_var("COA_DATA_DIR");
        env::remove_var("COA_WEIGHTS");
        env::remove_var("COA_THREAT_HIGH");
        env::remove_var("COA_THREAT_MEDIUM");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.data_dir.is_none());
        assert!(config.weights.is_none());
        assert_eq!(config.threat_thresholds, ThresholdUpdate::default());
    }

    #[test]
    fn weights_and_thresholds_override_scoring() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "COA_WEIGHTS",
            "threat=0.3, resources=0.1, assets=0.2, environment=0.2, historical=0.05, chain=0.05, mission_alignment=0.1",
        );
        env::set_var("COA_THREAT_HIGH", "10");
        env::set_var("COA_ENV", "production");

        let config = AppConfig::load().expect("config loads");
        let mut scoring = ScoringConfig::default();
        config.apply_to(&mut scoring);
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(scoring.weights.threat, 0.3);
        assert_eq!(scoring.threat.thresholds.high, 10.0);
        assert_eq!(scoring.threat.thresholds.medium, 4.0);
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "COA_WEIGHTS",
            "threat=0.2,resources=0.1,assets=0.2,environment=0.2,historical=0.05,chain=0.05,mission_alignment=0.1",
        );
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidWeights {
                source: WeightConfigError::InvalidSum { .. },
            }) => {}
            other => panic!("expected invalid weight sum, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_weights_and_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COA_WEIGHTS", "threat:0.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MalformedWeights { .. })
        ));

        reset_env();
        env::set_var("COA_THREAT_MEDIUM", "high");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidThreshold { name: "COA_THREAT_MEDIUM", .. })
        ));

        reset_env();
        env::set_var("COA_THREAT_HIGH", "3");
        env::set_var("COA_THREAT_MEDIUM", "5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
        reset_env();
    }
}
