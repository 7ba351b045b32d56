use crate::ingest::aliases::constraint;
use crate::ingest::{FromRow, Row, RowReader};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Fixed taxonomy of policy constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Time,
    Movement,
    Firepower,
    Roe,
    Intelligence,
    Communication,
    Obstacle,
    Weather,
}

impl ConstraintKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Movement => "movement",
            Self::Firepower => "firepower",
            Self::Roe => "roe",
            Self::Intelligence => "intelligence",
            Self::Communication => "communication",
            Self::Obstacle => "obstacle",
            Self::Weather => "weather",
        }
    }

    /// Resolve a raw `constraint_type` cell. Unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        kind_alias_map().get(key.as_str()).copied()
    }
}

static KIND_ALIAS_MAP: OnceLock<HashMap<&'static str, ConstraintKind>> = OnceLock::new();

fn kind_alias_map() -> &'static HashMap<&'static str, ConstraintKind> {
    KIND_ALIAS_MAP.get_or_init(|| {
        const ALIASES: &[(&str, ConstraintKind)] = &[
            ("time", ConstraintKind::Time),
            ("시간", ConstraintKind::Time),
            ("시간제약", ConstraintKind::Time),
            ("movement", ConstraintKind::Movement),
            ("no-go", ConstraintKind::Movement),
            ("no_go", ConstraintKind::Movement),
            ("nogo", ConstraintKind::Movement),
            ("기동", ConstraintKind::Movement),
            ("기동제한", ConstraintKind::Movement),
            ("이동", ConstraintKind::Movement),
            ("이동금지", ConstraintKind::Movement),
            ("firepower", ConstraintKind::Firepower),
            ("fire", ConstraintKind::Firepower),
            ("화력", ConstraintKind::Firepower),
            ("화력제한", ConstraintKind::Firepower),
            ("roe", ConstraintKind::Roe),
            ("rules_of_engagement", ConstraintKind::Roe),
            ("교전규칙", ConstraintKind::Roe),
            ("intelligence", ConstraintKind::Intelligence),
            ("intel", ConstraintKind::Intelligence),
            ("정보", ConstraintKind::Intelligence),
            ("communication", ConstraintKind::Communication),
            ("comms", ConstraintKind::Communication),
            ("통신", ConstraintKind::Communication),
            ("obstacle", ConstraintKind::Obstacle),
            ("장애물", ConstraintKind::Obstacle),
            ("weather", ConstraintKind::Weather),
            ("기상", ConstraintKind::Weather),
            ("날씨", ConstraintKind::Weather),
        ];

        ALIASES.iter().copied().collect()
    })
}

/// Policy constraint attached to an axis, terrain cell, mission, or the whole theatre.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub constraint_id: String,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub kind: Option<ConstraintKind>,
    /// Original `constraint_type` text, kept for reporting when `kind` is unrecognized.
    pub raw_type: Option<String>,
    pub content: Option<String>,
    /// 1-5, 5 = critical.
    #[serde(alias = "priority")]
    pub importance: Option<u8>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub time_critical: bool,
    pub max_duration_hours: Option<f64>,
}

impl Constraint {
    /// Deprecated alias of [`Constraint::importance`].
    pub fn priority(&self) -> Option<u8> {
        self.importance
    }

    /// Deprecated alias of setting [`Constraint::importance`].
    pub fn set_priority(&mut self, priority: Option<u8>) {
        self.importance = priority;
    }

    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn kind_label(&self) -> &str {
        match self.kind {
            Some(kind) => kind.label(),
            None => self.raw_type.as_deref().unwrap_or("unspecified"),
        }
    }
}

impl FromRow for Constraint {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        let raw_type = reader.text(constraint::TYPE);
        Self {
            constraint_id: reader.text(constraint::ID).unwrap_or_default(),
            target_type: reader.text(constraint::TARGET_TYPE),
            target_id: reader.text(constraint::TARGET_ID),
            kind: raw_type.as_deref().and_then(ConstraintKind::parse),
            raw_type,
            content: reader.text(constraint::CONTENT),
            importance: reader
                .integer(constraint::IMPORTANCE)
                .filter(|value| (1..=5).contains(value))
                .map(|value| value as u8),
            start_time: reader.datetime(constraint::START_TIME),
            end_time: reader.datetime(constraint::END_TIME),
            time_critical: reader.flag(constraint::TIME_CRITICAL).unwrap_or(false),
            max_duration_hours: reader.number(constraint::MAX_DURATION),
        }
    }
}
