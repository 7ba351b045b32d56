/// Canonical form used when comparing column headers and table names.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Canonical form used when matching identifiers and display names that upstream data
/// mixes inconsistently (`" axis01 "` and `"AXIS01"` compare equal).
pub fn normalize_key(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_uppercase()
}

/// Compare two identifiers after normalization. Blank values never match.
pub fn same_key(left: &str, right: &str) -> bool {
    let left = normalize_key(left);
    !left.is_empty() && left == normalize_key(right)
}
