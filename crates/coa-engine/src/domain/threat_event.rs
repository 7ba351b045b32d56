use crate::ingest::aliases::{threat_event, threat_type};
use crate::ingest::{FromRow, Row, RowReader};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Aggregate threat classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a reported level: English or Korean words, single letters, an ordinal 1-3,
    /// or a numeric level on a 0-1 or 0-100 scale (>= 0.7 High, >= 0.4 Medium).
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        if let Some(level) = level_alias_map().get(key.as_str()) {
            return Some(*level);
        }

        let value = key.trim_end_matches('%').trim().parse::<f64>().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        if value.fract() == 0.0 && (1.0..=3.0).contains(&value) {
            return Some(match value as u8 {
                3 => Self::High,
                2 => Self::Medium,
                _ => Self::Low,
            });
        }
        let fraction = if value > 1.0 { value / 100.0 } else { value };
        Some(if fraction >= 0.7 {
            Self::High
        } else if fraction >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        })
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

static LEVEL_ALIAS_MAP: OnceLock<HashMap<&'static str, ThreatLevel>> = OnceLock::new();

fn level_alias_map() -> &'static HashMap<&'static str, ThreatLevel> {
    LEVEL_ALIAS_MAP.get_or_init(|| {
        const ALIASES: &[(&str, ThreatLevel)] = &[
            ("high", ThreatLevel::High),
            ("h", ThreatLevel::High),
            ("높음", ThreatLevel::High),
            ("상", ThreatLevel::High),
            ("medium", ThreatLevel::Medium),
            ("mid", ThreatLevel::Medium),
            ("m", ThreatLevel::Medium),
            ("중간", ThreatLevel::Medium),
            ("보통", ThreatLevel::Medium),
            ("중", ThreatLevel::Medium),
            ("low", ThreatLevel::Low),
            ("l", ThreatLevel::Low),
            ("낮음", ThreatLevel::Low),
            ("하", ThreatLevel::Low),
        ];
        ALIASES.iter().copied().collect()
    })
}

/// Reported threat. The `threat_name`..`threat_severity` fields are filled by master-data
/// hydration, never by row conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatEvent {
    pub threat_id: String,
    pub occurred_at: Option<NaiveDateTime>,
    pub threat_type_code: Option<String>,
    pub related_axis_id: Option<String>,
    pub location_cell_id: Option<String>,
    pub related_enemy_unit_id: Option<String>,
    pub related_mission_id: Option<String>,
    /// Reported level as text or number; see [`ThreatLevel::parse`].
    pub threat_level: Option<String>,
    pub raw_report_text: Option<String>,
    pub confidence: Option<f64>,
    pub status: Option<String>,
    pub threat_name: Option<String>,
    pub threat_description: Option<String>,
    #[serde(default)]
    pub threat_keywords: Vec<String>,
    pub threat_severity: Option<String>,
}

impl ThreatEvent {
    pub fn level(&self) -> Option<ThreatLevel> {
        self.threat_level.as_deref().and_then(ThreatLevel::parse)
    }

    pub fn is_hydrated(&self) -> bool {
        self.threat_name.is_some()
    }
}

impl FromRow for ThreatEvent {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            threat_id: reader.text(threat_event::ID).unwrap_or_default(),
            occurred_at: reader.datetime(threat_event::OCCURRED_AT),
            threat_type_code: reader.text(threat_event::TYPE_CODE),
            related_axis_id: reader.text(threat_event::AXIS),
            location_cell_id: reader.text(threat_event::CELL),
            related_enemy_unit_id: reader.text(threat_event::ENEMY_UNIT),
            related_mission_id: reader.text(threat_event::MISSION),
            threat_level: reader.text(threat_event::LEVEL),
            raw_report_text: reader.text(threat_event::REPORT),
            confidence: reader.number(threat_event::CONFIDENCE),
            status: reader.text(threat_event::STATUS),
            ..Self::default()
        }
    }
}

/// Master-data entry describing a threat type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatTypeMaster {
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub severity: Option<String>,
}

impl FromRow for ThreatTypeMaster {
    fn from_row(row: &Row) -> Self {
        let reader = RowReader::new(row);
        Self {
            code: reader.text(threat_type::CODE).unwrap_or_default(),
            name: reader.text(threat_type::NAME),
            description: reader.text(threat_type::DESCRIPTION),
            keywords: reader.list(threat_type::KEYWORDS),
            severity: reader.text(threat_type::SEVERITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_words_letters_and_numbers() {
        assert_eq!(ThreatLevel::parse("High"), Some(ThreatLevel::High));
        assert_eq!(ThreatLevel::parse("높음"), Some(ThreatLevel::High));
        assert_eq!(ThreatLevel::parse(" m "), Some(ThreatLevel::Medium));
        assert_eq!(ThreatLevel::parse("하"), Some(ThreatLevel::Low));
        assert_eq!(ThreatLevel::parse("0.8"), Some(ThreatLevel::High));
        assert_eq!(ThreatLevel::parse("45"), Some(ThreatLevel::Medium));
        assert_eq!(ThreatLevel::parse("10%"), Some(ThreatLevel::Low));
        assert_eq!(ThreatLevel::parse("3"), Some(ThreatLevel::High));
        assert_eq!(ThreatLevel::parse("1"), Some(ThreatLevel::Low));
        assert_eq!(ThreatLevel::parse("severe"), None);
        assert_eq!(ThreatLevel::parse("-1"), None);
    }

    #[test]
    fn row_conversion_leaves_master_fields_empty() {
        let row: Row = [
            ("위협ID", "T-1"),
            ("위협유형코드", "침투"),
            ("관련축선ID", "AXIS01"),
            ("위협수준", "High"),
        ]
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let event = ThreatEvent::from_row(&row);
        assert_eq!(event.threat_id, "T-1");
        assert_eq!(event.level(), Some(ThreatLevel::High));
        assert!(!event.is_hydrated());
        assert!(event.threat_keywords.is_empty());
    }
}
