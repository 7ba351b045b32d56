use super::context::ConstraintContext;
use super::text::{allowed_fire_ratio, identifier_tokens, mentions_any};
use crate::domain::{Constraint, CourseOfAction};
use crate::ingest::normalize_key;
use std::collections::BTreeSet;

/// Policy has signal but nothing it can check.
const TEXT_ONLY: f64 = 0.7;
/// Policy kinds this engine cannot verify.
const UNVERIFIED: f64 = 0.8;
/// No signal at all.
const NO_SIGNAL: f64 = 0.5;

const AXIS_MARKERS: &[&str] = &["axis", "축"];
const CIVILIAN_MARKERS: &[&str] = &["민간", "civilian"];
const SECURE_TERRAIN_MARKERS: &[&str] = &["secure terrain", "terrain first", "securing terrain"];
const BYPASS_MARKERS: &[&str] = &["우회", "회피", "bypass", "avoid"];
const ADVERSE_WEATHER_MARKERS: &[&str] = &[
    "악천후",
    "기상 불량",
    "기상불량",
    "adverse weather",
    "bad weather",
    "severe weather",
];

pub(super) fn time(constraint: &Constraint, context: &ConstraintContext) -> f64 {
    if let (Some(limit), Some(estimate)) = (
        constraint.max_duration_hours.filter(|hours| *hours > 0.0),
        context.estimated_duration_hours,
    ) {
        if estimate <= limit {
            return 1.0;
        }
        let overage_ratio = (estimate - limit) / limit;
        return (1.0 - overage_ratio).max(0.0);
    }

    if constraint.start_time.is_some() || constraint.end_time.is_some() {
        let starts_early = match (constraint.start_time, context.planned_start) {
            (Some(earliest), Some(start)) => Some(start < earliest),
            _ => None,
        };
        let ends_late = match (constraint.end_time, context.projected_end()) {
            (Some(latest), Some(end)) => Some(end > latest),
            _ => None,
        };

        // A window with nothing to compare against has no detectable violation.
        return if starts_early.unwrap_or(false) || ends_late.unwrap_or(false) {
            0.0
        } else {
            1.0
        };
    }

    if constraint.content_text().trim().is_empty() {
        NO_SIGNAL
    } else {
        TEXT_ONLY
    }
}

pub(super) fn movement(constraint: &Constraint, context: &ConstraintContext) -> f64 {
    let content = constraint.content_text();

    if mentions_any(content, AXIS_MARKERS) {
        let named = named_axes(constraint, context);
        if let [allowed] = named.as_slice() {
            let uses_allowed = context.used_axis_ids.iter().any(|axis| axis == allowed);
            return match (uses_allowed, context.used_axis_ids.len()) {
                (true, 1) => 1.0,
                (true, _) => 0.5,
                (false, _) => 0.0,
            };
        }
    }

    let forbidden = forbidden_cells(constraint, context);
    if !forbidden.is_empty() && !context.impacted_cell_ids.is_empty() {
        let overlap = forbidden.intersection(&context.impacted_cell_ids).count();
        return 1.0 - overlap as f64 / forbidden.len() as f64;
    }

    TEXT_ONLY
}

pub(super) fn firepower(
    constraint: &Constraint,
    coa: &CourseOfAction,
    _context: &ConstraintContext,
) -> f64 {
    let Some(usage) = coa
        .fire_support
        .as_ref()
        .and_then(|allocation| allocation.usage_ratio())
    else {
        return TEXT_ONLY;
    };

    let bound = allowed_fire_ratio(constraint.content_text());
    if usage <= bound {
        return 1.0;
    }
    if bound <= 0.0 {
        return 0.0;
    }
    (1.0 - (usage - bound) / bound).max(0.0)
}

pub(super) fn rules_of_engagement(
    constraint: &Constraint,
    coa: &CourseOfAction,
    context: &ConstraintContext,
) -> f64 {
    let content = constraint.content_text();

    if mentions_any(content, CIVILIAN_MARKERS) {
        let affected = context.affected_civilian_areas;
        return if affected == 0 {
            1.0
        } else {
            (1.0 - 0.3 * affected as f64).max(0.0)
        };
    }

    let terrain_first = (content.contains("지형") && content.contains("확보"))
        || mentions_any(content, SECURE_TERRAIN_MARKERS);
    if terrain_first {
        let secured = coa.secures_terrain_first.unwrap_or(false);
        return if secured || !coa.uses_fire_support() {
            1.0
        } else {
            0.0
        };
    }

    TEXT_ONLY
}

pub(super) fn intelligence() -> f64 {
    UNVERIFIED
}

pub(super) fn communication(coa: &CourseOfAction) -> f64 {
    match coa.maintains_communication {
        Some(true) => 1.0,
        Some(false) => 0.5,
        None => UNVERIFIED,
    }
}

pub(super) fn obstacle(constraint: &Constraint, coa: &CourseOfAction) -> f64 {
    if !mentions_any(constraint.content_text(), BYPASS_MARKERS) {
        return UNVERIFIED;
    }
    match coa.avoids_obstacles {
        Some(true) => 1.0,
        Some(false) => 0.3,
        None => UNVERIFIED,
    }
}

pub(super) fn weather(
    constraint: &Constraint,
    coa: &CourseOfAction,
    context: &ConstraintContext,
) -> f64 {
    if !mentions_any(constraint.content_text(), ADVERSE_WEATHER_MARKERS) {
        return UNVERIFIED;
    }
    if coa.uses_air_support && context.adverse_weather {
        0.0
    } else {
        1.0
    }
}

/// Axes named in the constraint text, or its axis target when the text names none.
fn named_axes(constraint: &Constraint, context: &ConstraintContext) -> Vec<String> {
    let mut named: Vec<String> = Vec::new();
    for token in identifier_tokens(constraint.content_text()) {
        let is_axis = token.starts_with("AXIS") || context.known_axis_ids.contains(&token);
        if is_axis && !named.contains(&token) {
            named.push(token);
        }
    }

    if named.is_empty() && targets(constraint, &["AXIS", "축"]) {
        if let Some(target) = constraint.target_id.as_deref().map(normalize_key) {
            if !target.is_empty() {
                named.push(target);
            }
        }
    }
    named
}

/// Cells the constraint closes: its cell target plus known cells named in the text.
fn forbidden_cells(constraint: &Constraint, context: &ConstraintContext) -> BTreeSet<String> {
    let mut forbidden: BTreeSet<String> = identifier_tokens(constraint.content_text())
        .into_iter()
        .filter(|token| context.known_cell_ids.contains(token))
        .collect();

    if targets(constraint, &["CELL", "TERRAIN", "지형", "셀"]) {
        if let Some(target) = constraint.target_id.as_deref().map(normalize_key) {
            if !target.is_empty() {
                forbidden.insert(target);
            }
        }
    }
    forbidden
}

fn targets(constraint: &Constraint, markers: &[&str]) -> bool {
    constraint
        .target_type
        .as_deref()
        .map(normalize_key)
        .map(|target_type| markers.iter().any(|marker| target_type.contains(marker)))
        .unwrap_or(false)
}
