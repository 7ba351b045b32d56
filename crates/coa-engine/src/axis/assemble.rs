use super::catalog::BattlefieldCatalog;
use crate::domain::{summarize_constraints, Axis, AxisState, Constraint, TerrainCell};
use crate::ingest::{normalize_key, same_key};
use crate::threat::ThreatScorer;

/// Collect everything on `axis` into a fresh [`AxisState`].
pub(crate) fn build_axis_state(
    catalog: &BattlefieldCatalog,
    axis: &Axis,
    mission_id: Option<&str>,
    is_primary_axis: bool,
    scorer: &ThreatScorer,
) -> AxisState {
    let mut state = AxisState::new(axis.axis_id.clone(), axis.display_name());
    state.mission_id = mission_id.map(str::to_string);
    state.is_primary_axis = is_primary_axis;
    state.axis_importance = axis.importance;
    state.total_distance_km = axis.total_distance_km;

    let mut terrain_cells: Vec<TerrainCell> = Vec::new();
    for cell_id in &axis.terrain_cell_ids {
        if let Some(cell) = catalog.terrain_cell(cell_id) {
            if !terrain_cells.iter().any(|known| same_key(&known.cell_id, &cell.cell_id)) {
                terrain_cells.push(cell.clone());
            }
        }
    }
    state.avg_mobility = mean(terrain_cells.iter().filter_map(|cell| cell.mobility_grade));
    state.avg_defense_advantage =
        mean(terrain_cells.iter().filter_map(|cell| cell.defense_advantage));
    state.key_point_count = terrain_cells.iter().filter(|cell| cell.is_key_point).count();
    state.terrain_cells = terrain_cells;

    state.friendly_units = catalog
        .friendly_units
        .iter()
        .filter(|unit| {
            on_axis(axis, unit.deployed_axis_id.as_deref(), unit.deployed_cell_id.as_deref())
        })
        .filter(|unit| match (unit.assigned_mission_id.as_deref(), mission_id) {
            (None, _) | (_, None) => true,
            (Some(assigned), Some(mission_id)) => same_key(assigned, mission_id),
        })
        .cloned()
        .collect();
    state.enemy_units = catalog
        .enemy_units
        .iter()
        .filter(|unit| {
            on_axis(axis, unit.deployed_axis_id.as_deref(), unit.deployed_cell_id.as_deref())
        })
        .cloned()
        .collect();
    state.recompute_combat_power();

    state.resources = catalog
        .resources
        .iter()
        .filter(|resource| in_axis(axis, resource.location_cell_id.as_deref()))
        .cloned()
        .collect();
    state.civilian_areas = catalog
        .civilian_areas
        .iter()
        .filter(|area| in_axis(axis, area.location_cell_id.as_deref()))
        .cloned()
        .collect();
    state.weather = catalog
        .weather
        .iter()
        .filter(|report| match report.location_cell_id.as_deref() {
            None => true,
            Some(cell) => axis.contains_cell(cell),
        })
        .cloned()
        .collect();

    state.constraints = catalog
        .constraints
        .iter()
        .filter(|constraint| constraint_applies(constraint, axis, mission_id))
        .cloned()
        .collect();
    state.constraint_summary = summarize_constraints(&state.constraints);

    state.max_traversal_time_hours = traversal_hours(axis, &state);

    state.threat_events = catalog
        .threat_events
        .iter()
        .filter(|event| {
            on_axis(axis, event.related_axis_id.as_deref(), event.location_cell_id.as_deref())
        })
        .cloned()
        .collect();
    state.recompute_threat(scorer);

    state
}

/// A declared axis reference decides on its own; the cell is only consulted without one.
fn on_axis(axis: &Axis, axis_reference: Option<&str>, cell_id: Option<&str>) -> bool {
    match axis_reference.map(str::trim).filter(|reference| !reference.is_empty()) {
        Some(reference) => axis.matches_reference(reference),
        None => in_axis(axis, cell_id),
    }
}

fn in_axis(axis: &Axis, cell_id: Option<&str>) -> bool {
    cell_id.map(|cell| axis.contains_cell(cell)).unwrap_or(false)
}

/// Axis, member-cell, and mission targets apply when they point here; untargeted constraints
/// apply everywhere.
pub(crate) fn constraint_applies(
    constraint: &Constraint,
    axis: &Axis,
    mission_id: Option<&str>,
) -> bool {
    let Some(target) = constraint
        .target_id
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty())
    else {
        return true;
    };
    let target_type = constraint
        .target_type
        .as_deref()
        .map(normalize_key)
        .unwrap_or_default();
    let mission_matches = mission_id
        .map(|mission_id| same_key(mission_id, target))
        .unwrap_or(false);

    let has = |markers: &[&str]| markers.iter().any(|marker| target_type.contains(marker));
    if has(&["GLOBAL", "ALL", "전체", "전역"]) {
        true
    } else if has(&["AXIS", "축"]) {
        axis.matches_reference(target)
    } else if has(&["CELL", "TERRAIN", "지형", "셀"]) {
        axis.contains_cell(target)
    } else if has(&["MISSION", "임무"]) {
        mission_matches
    } else {
        axis.matches_reference(target) || axis.contains_cell(target) || mission_matches
    }
}

/// Distance over the slowest matched friendly unit with a known positive speed.
fn traversal_hours(axis: &Axis, state: &AxisState) -> Option<f64> {
    let distance = axis
        .total_distance_km
        .filter(|distance| distance.is_finite() && *distance >= 0.0)?;
    let slowest = state
        .friendly_units
        .iter()
        .filter_map(|unit| unit.max_speed_kmh)
        .filter(|speed| speed.is_finite() && *speed > 0.0)
        .fold(None, |slowest: Option<f64>, speed| {
            Some(slowest.map_or(speed, |current| current.min(speed)))
        })?;
    Some(distance / slowest)
}

/// Mean of the finite values, `None` when there are none.
pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    let (sum, count) = values
        .filter(|value| value.is_finite())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
