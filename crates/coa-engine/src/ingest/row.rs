use super::normalizer::normalize_header;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

/// One table row keyed by its column header, exactly as the upstream table spelled it.
pub type Row = BTreeMap<String, String>;

/// Conversion from a raw row into a typed entity. Never fails: fields that are missing or
/// malformed resolve to their documented neutral default.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Self;
}

pub fn rows_into<T: FromRow>(rows: &[Row]) -> Vec<T> {
    rows.iter().map(T::from_row).collect()
}

/// Header-insensitive view over a [`Row`] that resolves a field through its alias list.
pub struct RowReader<'a> {
    cells: HashMap<String, &'a str>,
}

impl<'a> RowReader<'a> {
    pub fn new(row: &'a Row) -> Self {
        let mut cells = HashMap::with_capacity(row.len());
        for (header, value) in row {
            cells
                .entry(normalize_header(header))
                .or_insert(value.as_str());
        }
        Self { cells }
    }

    /// First non-blank cell among `aliases`, in alias order.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            self.cells
                .get(&normalize_header(alias))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
    }

    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        self.text(aliases).as_deref().and_then(parse_number)
    }

    pub fn integer(&self, aliases: &[&str]) -> Option<i64> {
        self.number(aliases)
            .filter(|value| value.fract() == 0.0)
            .map(|value| value as i64)
    }

    pub fn flag(&self, aliases: &[&str]) -> Option<bool> {
        self.text(aliases).as_deref().and_then(parse_flag)
    }

    pub fn datetime(&self, aliases: &[&str]) -> Option<NaiveDateTime> {
        self.text(aliases).as_deref().and_then(parse_datetime)
    }

    pub fn list(&self, aliases: &[&str]) -> Vec<String> {
        self.text(aliases)
            .map(|value| split_list(&value))
            .unwrap_or_default()
    }
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && *ch != '_')
        .collect();
    cleaned.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "o" | "예" | "t" => Some(true),
        "false" | "no" | "n" | "0" | "x" | "아니오" | "f" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(|ch: char| matches!(ch, ',' | ';' | '|') || ch.is_whitespace())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn reader_resolves_first_present_alias_and_skips_blank_cells() {
        let source = row(&[("Axis ID", "  "), ("축선ID", "AXIS01")]);
        let reader = RowReader::new(&source);
        assert_eq!(
            reader.text(&["axis_id", "axis id", "축선ID"]).as_deref(),
            Some("AXIS01")
        );
        assert!(reader.text(&["missing"]).is_none());
    }

    #[test]
    fn reader_matches_headers_case_and_whitespace_insensitively() {
        let source = row(&[("\u{feff}COMBAT  POWER", "1,200.5")]);
        let reader = RowReader::new(&source);
        assert_eq!(reader.number(&["combat power"]), Some(1200.5));
    }

    #[test]
    fn parse_datetime_supports_rfc3339_and_date_strings() {
        let rfc = parse_datetime("2025-09-24T10:00:00Z").expect("parse rfc");
        assert_eq!(
            rfc,
            NaiveDate::from_ymd_opt(2025, 9, 24)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );

        let spaced = parse_datetime("2025-09-24 06:30").expect("parse spaced");
        assert_eq!(spaced.format("%H:%M").to_string(), "06:30");

        let date = parse_datetime("2025-09-30").expect("parse date");
        assert_eq!(
            date,
            NaiveDate::from_ymd_opt(2025, 9, 30)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );

        assert!(parse_datetime("  ").is_none());
        assert!(parse_datetime("not-a-date").is_none());
    }

    #[test]
    fn flags_accept_korean_and_english_spellings() {
        assert_eq!(parse_flag("Y"), Some(true));
        assert_eq!(parse_flag("예"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn lists_split_on_mixed_separators() {
        assert_eq!(
            split_list("C01, C02;C03 | C04"),
            vec!["C01", "C02", "C03", "C04"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn malformed_numbers_resolve_to_none() {
        assert_eq!(parse_number("12km"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(" 42 "), Some(42.0));
    }
}
