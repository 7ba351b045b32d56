use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed drift of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Raised when a weight vector cannot back an evaluator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightConfigError {
    #[error("criteria weights must sum to 1.0, found {sum:.6}")]
    InvalidSum { sum: f64 },
    #[error("criteria weight '{key}' must be a non-negative number, found {value}")]
    NegativeWeight { key: &'static str, value: f64 },
    #[error("criteria weight '{0}' is missing")]
    MissingKey(&'static str),
    #[error("unknown criteria weight '{0}'")]
    UnknownKey(String),
}

/// Named breakdown dimension of a COA score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Threat,
    Resources,
    Assets,
    Environment,
    Historical,
    Chain,
    MissionAlignment,
}

impl Criterion {
    /// Fixed evaluation and summation order.
    pub const ALL: [Criterion; 7] = [
        Criterion::Threat,
        Criterion::Resources,
        Criterion::Assets,
        Criterion::Environment,
        Criterion::Historical,
        Criterion::Chain,
        Criterion::MissionAlignment,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Criterion::Threat => "threat",
            Criterion::Resources => "resources",
            Criterion::Assets => "assets",
            Criterion::Environment => "environment",
            Criterion::Historical => "historical",
            Criterion::Chain => "chain",
            Criterion::MissionAlignment => "mission_alignment",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|criterion| criterion.key() == key)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Weight per breakdown dimension; validated to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriteriaWeights {
    pub threat: f64,
    pub resources: f64,
    pub assets: f64,
    pub environment: f64,
    pub historical: f64,
    pub chain: f64,
    pub mission_alignment: f64,
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            threat: 0.25,
            resources: 0.15,
            assets: 0.20,
            environment: 0.20,
            historical: 0.05,
            chain: 0.05,
            mission_alignment: 0.10,
        }
    }
}

impl CriteriaWeights {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Threat => self.threat,
            Criterion::Resources => self.resources,
            Criterion::Assets => self.assets,
            Criterion::Environment => self.environment,
            Criterion::Historical => self.historical,
            Criterion::Chain => self.chain,
            Criterion::MissionAlignment => self.mission_alignment,
        }
    }

    fn slot(&mut self, criterion: Criterion) -> &mut f64 {
        match criterion {
            Criterion::Threat => &mut self.threat,
            Criterion::Resources => &mut self.resources,
            Criterion::Assets => &mut self.assets,
            Criterion::Environment => &mut self.environment,
            Criterion::Historical => &mut self.historical,
            Criterion::Chain => &mut self.chain,
            Criterion::MissionAlignment => &mut self.mission_alignment,
        }
    }

    pub fn sum(&self) -> f64 {
        Criterion::ALL
            .iter()
            .map(|criterion| self.get(*criterion))
            .sum()
    }

    pub fn validate(&self) -> Result<(), WeightConfigError> {
        for criterion in Criterion::ALL {
            let value = self.get(criterion);
            if !value.is_finite() || value < 0.0 {
                return Err(WeightConfigError::NegativeWeight {
                    key: criterion.key(),
                    value,
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightConfigError::InvalidSum { sum });
        }
        Ok(())
    }

    /// Build from `(key, weight)` pairs naming all seven dimensions, then validate.
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self, WeightConfigError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut weights = CriteriaWeights {
            threat: 0.0,
            resources: 0.0,
            assets: 0.0,
            environment: 0.0,
            historical: 0.0,
            chain: 0.0,
            mission_alignment: 0.0,
        };
        let mut seen = Vec::new();

        for (key, value) in pairs {
            let criterion = Criterion::parse(key.as_ref())
                .ok_or_else(|| WeightConfigError::UnknownKey(key.as_ref().to_string()))?;
            *weights.slot(criterion) = value;
            seen.push(criterion);
        }

        if let Some(missing) = Criterion::ALL
            .into_iter()
            .find(|criterion| !seen.contains(criterion))
        {
            return Err(WeightConfigError::MissingKey(missing.key()));
        }

        weights.validate()?;
        Ok(weights)
    }
}
