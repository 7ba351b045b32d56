/// Case-insensitive containment of any marker.
pub(crate) fn mentions_any(text: &str, markers: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}

/// ASCII identifier-like tokens (`AXIS01`, `C-12`, `cell_3`), uppercased.
pub(crate) fn identifier_tokens(text: &str) -> Vec<String> {
    text.split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
        .map(|token| token.trim_matches('-'))
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

/// First `NN%` figure in the text as a fraction.
pub(crate) fn percent_value(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut index = 0;
    while index < chars.len() {
        if !chars[index].is_ascii_digit() {
            index += 1;
            continue;
        }

        let start = index;
        while index < chars.len() && (chars[index].is_ascii_digit() || chars[index] == '.') {
            index += 1;
        }
        let mut probe = index;
        while probe < chars.len() && chars[probe] == ' ' {
            probe += 1;
        }
        if probe < chars.len() && matches!(chars[probe], '%' | '％') {
            let digits: String = chars[start..index].iter().collect();
            if let Ok(value) = digits.parse::<f64>() {
                if value.is_finite() {
                    return Some(value / 100.0);
                }
            }
        }
    }
    None
}

/// Fire-support ceiling stated in the text; 1.0 when the text sets none.
pub(crate) fn allowed_fire_ratio(text: &str) -> f64 {
    if let Some(ratio) = percent_value(text) {
        return ratio.max(0.0);
    }
    if mentions_any(text, &["절반", "half"]) {
        return 0.5;
    }
    1.0
}
