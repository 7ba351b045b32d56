//! Threat quantification.
//!
//! A [`ThreatScorer`] is an immutable snapshot of the level-score table, the type-weight
//! table, and the classification thresholds. Runtime updates go through `&mut self` on an
//! owned scorer or through [`SharedThreatScorer`], which swaps whole snapshots so readers
//! never observe a half-applied update.

use crate::domain::{ThreatEvent, ThreatLevel};
use crate::ingest::normalize_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// Level score used when the reported level is missing or unrecognized (Medium).
pub const DEFAULT_LEVEL_SCORE: u32 = 2;
/// Weight used when the threat type has no entry.
pub const DEFAULT_TYPE_WEIGHT: f64 = 1.0;

/// Lower-inclusive classification boundaries for an aggregate threat score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for ThreatThresholds {
    fn default() -> Self {
        Self {
            high: 8.0,
            medium: 4.0,
        }
    }
}

/// Partial threshold update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdUpdate {
    pub high: Option<f64>,
    pub medium: Option<f64>,
}

/// Lookup tables backing a [`ThreatScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatScoringConfig {
    /// Level label (any alias accepted by [`ThreatLevel::parse`], or a custom label) to score.
    pub level_scores: BTreeMap<String, u32>,
    /// Threat type code or name to multiplier.
    pub type_weights: BTreeMap<String, f64>,
    pub thresholds: ThreatThresholds,
}

impl Default for ThreatScoringConfig {
    fn default() -> Self {
        let level_scores = [("High", 3), ("Medium", 2), ("Low", 1)]
            .into_iter()
            .map(|(label, score)| (label.to_string(), score))
            .collect();

        let type_weights = [
            ("침투", 1.5),
            ("기갑돌파", 1.4),
            ("포격", 1.3),
            ("공중위협", 1.3),
            ("드론", 1.2),
            ("화생방", 1.5),
            ("특수작전", 1.4),
            ("사이버", 1.0),
            ("정찰", 0.7),
            ("기만징후", 0.8),
            ("INFILTRATION", 1.5),
            ("ARMOR_BREAKTHROUGH", 1.4),
            ("ARTILLERY", 1.3),
            ("AIR", 1.3),
            ("DRONE", 1.2),
            ("CBRN", 1.5),
            ("SOF", 1.4),
            ("CYBER", 1.0),
            ("RECON", 0.7),
            ("DECEPTION", 0.8),
        ]
        .into_iter()
        .map(|(code, weight)| (code.to_string(), weight))
        .collect();

        Self {
            level_scores,
            type_weights,
            thresholds: ThreatThresholds::default(),
        }
    }
}

/// Stateless threat scoring over an immutable table snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatScorer {
    level_scores: BTreeMap<String, u32>,
    type_weights: BTreeMap<String, f64>,
    thresholds: ThreatThresholds,
}

impl Default for ThreatScorer {
    fn default() -> Self {
        Self::new(ThreatScoringConfig::default())
    }
}

impl ThreatScorer {
    pub fn new(config: ThreatScoringConfig) -> Self {
        let mut scorer = Self {
            level_scores: BTreeMap::new(),
            type_weights: BTreeMap::new(),
            thresholds: config.thresholds,
        };
        scorer.update_threat_level_scores(config.level_scores);
        scorer.update_threat_weights(config.type_weights);
        scorer
    }

    pub fn thresholds(&self) -> ThreatThresholds {
        self.thresholds
    }

    /// Score one event: `level_score * type_weight`.
    pub fn calculate_threat_score(&self, event: &ThreatEvent) -> f64 {
        let level_score = self.level_score(event.threat_level.as_deref());
        let weight = self.type_weight(event.threat_type_code.as_deref());
        f64::from(level_score) * weight
    }

    /// Sum of per-event scores. Order-independent up to floating-point rounding; events are
    /// summed in id order so identical event sets give identical totals.
    pub fn calculate_axis_threat_score(&self, events: &[ThreatEvent]) -> f64 {
        let mut ordered: Vec<&ThreatEvent> = events.iter().collect();
        ordered.sort_by(|left, right| left.threat_id.cmp(&right.threat_id));
        ordered
            .into_iter()
            .map(|event| self.calculate_threat_score(event))
            .sum()
    }

    pub fn determine_threat_level(&self, total: f64) -> ThreatLevel {
        if total >= self.thresholds.high {
            ThreatLevel::High
        } else if total >= self.thresholds.medium {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }

    /// Merge-update type weights. Non-finite or negative weights are ignored.
    pub fn update_threat_weights<K, I>(&mut self, weights: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        for (code, weight) in weights {
            let key = normalize_key(code.as_ref());
            if key.is_empty() || !weight.is_finite() || weight < 0.0 {
                continue;
            }
            self.type_weights.insert(key, weight);
        }
    }

    /// Merge-update level scores.
    pub fn update_threat_level_scores<K, I>(&mut self, scores: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, u32)>,
    {
        for (label, score) in scores {
            let key = normalize_key(label.as_ref());
            if key.is_empty() {
                continue;
            }
            self.level_scores.insert(key, score);
        }
    }

    /// Merge-update thresholds. Non-finite values are ignored, and an update that would
    /// leave `medium` above `high` is dropped whole.
    pub fn update_threat_thresholds(&mut self, update: ThresholdUpdate) {
        let high = update
            .high
            .filter(|value| value.is_finite())
            .unwrap_or(self.thresholds.high);
        let medium = update
            .medium
            .filter(|value| value.is_finite())
            .unwrap_or(self.thresholds.medium);
        if medium > high {
            warn!(high, medium, "ignoring threat threshold update with medium above high");
            return;
        }
        self.thresholds = ThreatThresholds { high, medium };
    }

    fn level_score(&self, raw_level: Option<&str>) -> u32 {
        let Some(raw_level) = raw_level else {
            return DEFAULT_LEVEL_SCORE;
        };
        if let Some(score) = self.level_scores.get(&normalize_key(raw_level)) {
            return *score;
        }
        ThreatLevel::parse(raw_level)
            .and_then(|level| self.level_scores.get(&normalize_key(level.label())))
            .copied()
            .unwrap_or(DEFAULT_LEVEL_SCORE)
    }

    fn type_weight(&self, type_code: Option<&str>) -> f64 {
        type_code
            .and_then(|code| self.type_weights.get(&normalize_key(code)))
            .copied()
            .unwrap_or(DEFAULT_TYPE_WEIGHT)
    }
}

/// Hot-reloadable scorer: readers take an `Arc` snapshot, writers replace it wholesale.
#[derive(Debug, Clone, Default)]
pub struct SharedThreatScorer {
    current: Arc<RwLock<Arc<ThreatScorer>>>,
}

impl SharedThreatScorer {
    pub fn new(scorer: ThreatScorer) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(scorer))),
        }
    }

    pub fn snapshot(&self) -> Arc<ThreatScorer> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `change` to a copy of the current tables and publish the result atomically.
    pub fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut ThreatScorer),
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = ThreatScorer::clone(&guard);
        change(&mut next);
        *guard = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, level: &str, kind: &str) -> ThreatEvent {
        ThreatEvent {
            threat_id: id.to_string(),
            threat_level: Some(level.to_string()),
            threat_type_code: Some(kind.to_string()),
            ..ThreatEvent::default()
        }
    }

    #[test]
    fn high_level_with_weighted_type_scores_four_and_a_half() {
        let scorer = ThreatScorer::default();
        assert_eq!(scorer.calculate_threat_score(&event("T-1", "High", "침투")), 4.5);
    }

    #[test]
    fn unknown_level_and_type_fall_back_to_medium_and_unit_weight() {
        let scorer = ThreatScorer::default();
        assert_eq!(
            scorer.calculate_threat_score(&event("T-1", "catastrophic", "unlisted")),
            2.0
        );
        let bare = ThreatEvent {
            threat_id: "T-2".to_string(),
            ..ThreatEvent::default()
        };
        assert_eq!(scorer.calculate_threat_score(&bare), 2.0);
    }

    #[test]
    fn level_aliases_share_the_canonical_score() {
        let scorer = ThreatScorer::default();
        assert_eq!(scorer.calculate_threat_score(&event("T-1", "높음", "정찰")), 3.0 * 0.7);
        assert_eq!(scorer.calculate_threat_score(&event("T-2", "low", "recon")), 0.7);
    }

    #[test]
    fn axis_total_is_order_independent() {
        let scorer = ThreatScorer::default();
        let events = vec![
            event("T-1", "High", "침투"),
            event("T-2", "Medium", "기만징후"),
            event("T-3", "Low", "포격"),
        ];
        let mut reversed = events.clone();
        reversed.reverse();

        let forward = scorer.calculate_axis_threat_score(&events);
        assert_eq!(forward, scorer.calculate_axis_threat_score(&reversed));
        assert!((forward - (4.5 + 1.6 + 1.3)).abs() < 1e-9);
        assert_eq!(scorer.calculate_axis_threat_score(&[]), 0.0);
    }

    #[test]
    fn classification_boundaries_are_lower_inclusive() {
        let scorer = ThreatScorer::default();
        assert_eq!(scorer.determine_threat_level(8.0), ThreatLevel::High);
        assert_eq!(scorer.determine_threat_level(7.99), ThreatLevel::Medium);
        assert_eq!(scorer.determine_threat_level(4.0), ThreatLevel::Medium);
        assert_eq!(scorer.determine_threat_level(3.99), ThreatLevel::Low);
        assert_eq!(scorer.determine_threat_level(0.0), ThreatLevel::Low);
    }

    #[test]
    fn updates_merge_into_existing_tables() {
        let mut scorer = ThreatScorer::default();
        scorer.update_threat_weights([("침투", 2.0), ("신규유형", 1.5), ("bad", f64::NAN)]);
        scorer.update_threat_level_scores([("Critical", 5)]);
        scorer.update_threat_thresholds(ThresholdUpdate {
            high: Some(10.0),
            medium: None,
        });

        assert_eq!(scorer.calculate_threat_score(&event("T-1", "High", "침투")), 6.0);
        assert_eq!(scorer.calculate_threat_score(&event("T-2", "critical", "신규유형")), 7.5);
        assert_eq!(scorer.calculate_threat_score(&event("T-3", "Low", "기만징후")), 0.8);
        assert_eq!(scorer.calculate_threat_score(&event("T-4", "Low", "bad")), 1.0);
        assert_eq!(scorer.thresholds().high, 10.0);
        assert_eq!(scorer.thresholds().medium, 4.0);
    }

    #[test]
    fn inverted_threshold_update_is_ignored() {
        let mut scorer = ThreatScorer::default();
        scorer.update_threat_thresholds(ThresholdUpdate {
            high: None,
            medium: Some(9.0),
        });
        assert_eq!(scorer.thresholds().high, 8.0);
        assert_eq!(scorer.thresholds().medium, 4.0);

        scorer.update_threat_thresholds(ThresholdUpdate {
            high: Some(3.0),
            medium: Some(2.0),
        });
        assert_eq!(scorer.thresholds().high, 3.0);
        assert_eq!(scorer.thresholds().medium, 2.0);
    }

    #[test]
    fn shared_scorer_publishes_whole_snapshots() {
        let shared = SharedThreatScorer::new(ThreatScorer::default());
        let before = shared.snapshot();
        shared.update(|scorer| scorer.update_threat_weights([("침투", 3.0)]));
        let after = shared.snapshot();

        let probe = event("T-1", "High", "침투");
        assert_eq!(before.calculate_threat_score(&probe), 4.5);
        assert_eq!(after.calculate_threat_score(&probe), 9.0);
    }
}
