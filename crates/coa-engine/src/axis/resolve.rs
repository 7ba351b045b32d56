use super::catalog::BattlefieldCatalog;
use crate::domain::{Axis, ThreatEvent};
use crate::ingest::same_key;
use serde::Serialize;

/// Which fallback tier produced a mission's axis set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionAxisSource {
    PrimaryAxis,
    AssignedUnits,
    ThreatReferences,
    AllAxes,
}

/// Which fallback tier produced a threat event's axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatAxisSource {
    RelatedAxis,
    CellMembership,
    MissionPrimaryAxis,
    /// Last resort; the result is degraded.
    FirstAxis,
}

/// Axes for a mission, in axis-table order. Each tier runs only when the previous one found
/// nothing; the last tier returns every axis.
pub(crate) fn mission_axes<'a>(
    catalog: &'a BattlefieldCatalog,
    mission_id: &str,
) -> (Vec<&'a Axis>, MissionAxisSource) {
    let primary: Vec<&Axis> = catalog
        .mission(mission_id)
        .and_then(|mission| mission.primary_axis_id.as_deref())
        .and_then(|reference| catalog.find_axis(reference))
        .into_iter()
        .collect();
    if !primary.is_empty() {
        return (primary, MissionAxisSource::PrimaryAxis);
    }

    let from_units = in_table_order(
        catalog,
        catalog
            .friendly_units
            .iter()
            .filter(|unit| {
                unit.assigned_mission_id
                    .as_deref()
                    .map(|assigned| same_key(assigned, mission_id))
                    .unwrap_or(false)
            })
            .filter_map(|unit| {
                unit.deployed_axis_id
                    .as_deref()
                    .and_then(|reference| catalog.find_axis(reference))
                    .or_else(|| {
                        unit.deployed_cell_id
                            .as_deref()
                            .and_then(|cell| catalog.axis_containing_cell(cell))
                    })
            }),
    );
    if !from_units.is_empty() {
        return (from_units, MissionAxisSource::AssignedUnits);
    }

    let from_threats = in_table_order(
        catalog,
        catalog.threat_events.iter().filter_map(|event| {
            event
                .related_axis_id
                .as_deref()
                .and_then(|reference| catalog.find_axis(reference))
        }),
    );
    if !from_threats.is_empty() {
        return (from_threats, MissionAxisSource::ThreatReferences);
    }

    (catalog.axes.iter().collect(), MissionAxisSource::AllAxes)
}

/// Single axis for a threat event, or `None` when the catalog has no axes.
pub(crate) fn threat_axis<'a>(
    catalog: &'a BattlefieldCatalog,
    event: &ThreatEvent,
    mission_id: Option<&str>,
) -> Option<(&'a Axis, ThreatAxisSource)> {
    if let Some(axis) = event
        .related_axis_id
        .as_deref()
        .and_then(|reference| catalog.find_axis(reference))
    {
        return Some((axis, ThreatAxisSource::RelatedAxis));
    }

    if let Some(axis) = event
        .location_cell_id
        .as_deref()
        .and_then(|cell| catalog.axis_containing_cell(cell))
    {
        return Some((axis, ThreatAxisSource::CellMembership));
    }

    if let Some(axis) = mission_id
        .and_then(|mission_id| catalog.mission(mission_id))
        .and_then(|mission| mission.primary_axis_id.as_deref())
        .and_then(|reference| catalog.find_axis(reference))
    {
        return Some((axis, ThreatAxisSource::MissionPrimaryAxis));
    }

    catalog
        .axes
        .first()
        .map(|axis| (axis, ThreatAxisSource::FirstAxis))
}

/// Mission for a threat-centered request: the declared id, the event's own mission, then the
/// first defensive mission.
pub(crate) fn threat_mission(
    catalog: &BattlefieldCatalog,
    event: &ThreatEvent,
    mission_id: Option<&str>,
) -> Option<String> {
    let declared = mission_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    if declared.is_some() {
        return declared;
    }

    let related = event
        .related_mission_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    if related.is_some() {
        return related;
    }

    catalog
        .missions
        .iter()
        .find(|mission| mission.is_defensive())
        .map(|mission| mission.mission_id.clone())
}

fn in_table_order<'a, I>(catalog: &'a BattlefieldCatalog, found: I) -> Vec<&'a Axis>
where
    I: Iterator<Item = &'a Axis>,
{
    let found: Vec<&Axis> = found.collect();
    catalog
        .axes
        .iter()
        .filter(|axis| found.iter().any(|hit| hit.axis_id == axis.axis_id))
        .collect()
}
