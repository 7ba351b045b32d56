use crate::domain::{AxisState, CourseOfAction};
use crate::ingest::{normalize_key, same_key};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

const MAX_PROJECTION_MINUTES: f64 = 1.0e9;

/// Facts about one candidate on its axes that the constraint policies read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintContext {
    /// Candidate estimate, else its planned window, else the slowest used axis traversal.
    pub estimated_duration_hours: Option<f64>,
    pub planned_start: Option<NaiveDateTime>,
    pub planned_end: Option<NaiveDateTime>,
    /// Normalized ids of the axes the candidate moves along.
    pub used_axis_ids: Vec<String>,
    /// Normalized ids of every axis in the request.
    pub known_axis_ids: BTreeSet<String>,
    /// Normalized ids of every terrain cell on the request's axes.
    pub known_cell_ids: BTreeSet<String>,
    /// Normalized ids of the cells the candidate occupies or fires into.
    pub impacted_cell_ids: BTreeSet<String>,
    pub affected_civilian_areas: usize,
    pub adverse_weather: bool,
}

impl ConstraintContext {
    /// Derive the context for `coa` against the axis states of the current request.
    pub fn for_candidate(coa: &CourseOfAction, axis_states: &[AxisState]) -> Self {
        let used = candidate_axes(coa, axis_states);

        let known_axis_ids = axis_states
            .iter()
            .map(|state| normalize_key(&state.axis_id))
            .collect();
        let known_cell_ids = axis_states
            .iter()
            .flat_map(|state| state.terrain_cells.iter())
            .map(|cell| normalize_key(&cell.cell_id))
            .filter(|id| !id.is_empty())
            .collect();

        let impacted_cell_ids: BTreeSet<String> = match &coa.impacted_cell_ids {
            Some(cells) => cells.iter().map(|cell| normalize_key(cell)).collect(),
            None => used
                .iter()
                .flat_map(|state| state.terrain_cells.iter())
                .map(|cell| normalize_key(&cell.cell_id))
                .collect(),
        };
        let impacted_cell_ids = impacted_cell_ids
            .into_iter()
            .filter(|id| !id.is_empty())
            .collect::<BTreeSet<_>>();

        let affected_civilian_areas = match &coa.affected_civilian_area_ids {
            Some(areas) => areas
                .iter()
                .map(|area| normalize_key(area))
                .filter(|area| !area.is_empty())
                .collect::<BTreeSet<_>>()
                .len(),
            None => used
                .iter()
                .flat_map(|state| state.civilian_areas.iter())
                .filter(|area| {
                    area.location_cell_id
                        .as_deref()
                        .map(|cell| impacted_cell_ids.contains(&normalize_key(cell)))
                        .unwrap_or(false)
                })
                .map(|area| normalize_key(&area.area_id))
                .collect::<BTreeSet<_>>()
                .len(),
        };

        Self {
            estimated_duration_hours: estimate_duration(coa, &used),
            planned_start: coa.planned_start,
            planned_end: coa.planned_end,
            used_axis_ids: used
                .iter()
                .map(|state| normalize_key(&state.axis_id))
                .collect(),
            known_axis_ids,
            known_cell_ids,
            impacted_cell_ids,
            affected_civilian_areas,
            adverse_weather: used.iter().any(|state| state.has_adverse_weather()),
        }
    }

    /// Planned end, or the planned start plus the estimated duration.
    pub fn projected_end(&self) -> Option<NaiveDateTime> {
        if self.planned_end.is_some() {
            return self.planned_end;
        }
        let start = self.planned_start?;
        let hours = self.estimated_duration_hours?;
        let minutes = (hours * 60.0).round();
        if !minutes.is_finite() || !(0.0..=MAX_PROJECTION_MINUTES).contains(&minutes) {
            return None;
        }
        start.checked_add_signed(chrono::Duration::minutes(minutes as i64))
    }
}

/// Axis states the candidate moves along, in the candidate's declared order.
///
/// Exact id or name matches win over fuzzy ones so `AXIS1` never captures `AXIS10`.
pub fn candidate_axes<'a>(coa: &CourseOfAction, axis_states: &'a [AxisState]) -> Vec<&'a AxisState> {
    let mut selected: Vec<&AxisState> = Vec::new();
    for reference in &coa.axis_ids {
        let found = axis_states
            .iter()
            .find(|state| same_key(&state.axis_id, reference) || same_key(&state.axis_name, reference))
            .or_else(|| axis_states.iter().find(|state| state.matches_reference(reference)));

        if let Some(state) = found {
            if !selected.iter().any(|chosen| chosen.axis_id == state.axis_id) {
                selected.push(state);
            }
        }
    }
    selected
}

fn estimate_duration(coa: &CourseOfAction, used: &[&AxisState]) -> Option<f64> {
    if let Some(hours) = coa
        .estimated_duration_hours
        .filter(|hours| hours.is_finite() && *hours >= 0.0)
    {
        return Some(hours);
    }

    if let (Some(start), Some(end)) = (coa.planned_start, coa.planned_end) {
        let minutes = (end - start).num_minutes();
        if minutes >= 0 {
            return Some(minutes as f64 / 60.0);
        }
    }

    used.iter()
        .filter_map(|state| state.max_traversal_time_hours)
        .fold(None, |longest: Option<f64>, hours| {
            Some(longest.map_or(hours, |current| current.max(hours)))
        })
}
