use super::hydrate::hydrate_threat_event;
use crate::domain::{
    Axis, CivilianArea, Constraint, EnemyUnit, FriendlyUnit, Mission, Resource, TerrainCell,
    ThreatEvent, ThreatTypeMaster, Weather,
};
use crate::ingest::{rows_into, same_key, Row, TableKind};

/// Typed view over every battlefield table, converted once per cache generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattlefieldCatalog {
    pub missions: Vec<Mission>,
    pub axes: Vec<Axis>,
    pub terrain_cells: Vec<TerrainCell>,
    pub friendly_units: Vec<FriendlyUnit>,
    pub enemy_units: Vec<EnemyUnit>,
    pub resources: Vec<Resource>,
    pub constraints: Vec<Constraint>,
    /// Threat events with master data already hydrated.
    pub threat_events: Vec<ThreatEvent>,
    pub threat_types: Vec<ThreatTypeMaster>,
    pub civilian_areas: Vec<CivilianArea>,
    pub weather: Vec<Weather>,
}

impl BattlefieldCatalog {
    /// Convert raw tables. Rows without an id are dropped.
    pub fn from_tables<F>(mut table: F) -> Self
    where
        F: FnMut(TableKind) -> Vec<Row>,
    {
        let threat_types: Vec<ThreatTypeMaster> = rows_into(&table(TableKind::ThreatTypes));
        let threat_types: Vec<ThreatTypeMaster> = threat_types
            .into_iter()
            .filter(|master| !master.code.trim().is_empty() || master.name.is_some())
            .collect();

        let mut threat_events: Vec<ThreatEvent> = rows_into(&table(TableKind::ThreatEvents));
        threat_events.retain(|event| !event.threat_id.trim().is_empty());
        for event in &mut threat_events {
            hydrate_threat_event(event, &threat_types);
        }

        let mut missions: Vec<Mission> = rows_into(&table(TableKind::Missions));
        missions.retain(|mission| !mission.mission_id.trim().is_empty());
        let mut axes: Vec<Axis> = rows_into(&table(TableKind::Axes));
        axes.retain(|axis| !axis.axis_id.trim().is_empty());
        let mut terrain_cells: Vec<TerrainCell> = rows_into(&table(TableKind::TerrainCells));
        terrain_cells.retain(|cell| !cell.cell_id.trim().is_empty());
        let mut friendly_units: Vec<FriendlyUnit> = rows_into(&table(TableKind::FriendlyUnits));
        friendly_units.retain(|unit| !unit.unit_id.trim().is_empty());
        let mut enemy_units: Vec<EnemyUnit> = rows_into(&table(TableKind::EnemyUnits));
        enemy_units.retain(|unit| !unit.unit_id.trim().is_empty());
        let mut resources: Vec<Resource> = rows_into(&table(TableKind::Resources));
        resources.retain(|resource| !resource.resource_id.trim().is_empty());
        let mut constraints: Vec<Constraint> = rows_into(&table(TableKind::Constraints));
        constraints.retain(|constraint| !constraint.constraint_id.trim().is_empty());
        let mut civilian_areas: Vec<CivilianArea> = rows_into(&table(TableKind::CivilianAreas));
        civilian_areas.retain(|area| !area.area_id.trim().is_empty());
        let weather: Vec<Weather> = rows_into(&table(TableKind::Weather));

        Self {
            missions,
            axes,
            terrain_cells,
            friendly_units,
            enemy_units,
            resources,
            constraints,
            threat_events,
            threat_types,
            civilian_areas,
            weather,
        }
    }

    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions
            .iter()
            .find(|mission| same_key(&mission.mission_id, mission_id))
    }

    pub fn threat_event(&self, threat_id: &str) -> Option<&ThreatEvent> {
        self.threat_events
            .iter()
            .find(|event| same_key(&event.threat_id, threat_id))
    }

    pub fn terrain_cell(&self, cell_id: &str) -> Option<&TerrainCell> {
        self.terrain_cells
            .iter()
            .find(|cell| same_key(&cell.cell_id, cell_id))
    }

    /// Exact id or name match first, then the first fuzzy match in table order.
    pub fn find_axis(&self, reference: &str) -> Option<&Axis> {
        self.axes
            .iter()
            .find(|axis| {
                same_key(&axis.axis_id, reference)
                    || axis
                        .name
                        .as_deref()
                        .map(|name| same_key(name, reference))
                        .unwrap_or(false)
            })
            .or_else(|| self.axes.iter().find(|axis| axis.matches_reference(reference)))
    }

    pub fn axis_containing_cell(&self, cell_id: &str) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.contains_cell(cell_id))
    }
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
    fn conversion_hydrates_events_and_drops_anonymous_rows() {
        let catalog = BattlefieldCatalog::from_tables(|kind| match kind {
            TableKind::Axes => vec![
                row(&[("axis_id", "AXIS01"), ("axis_name", "서부축")]),
                row(&[("axis_name", "이름만 있음")]),
            ],
            TableKind::ThreatTypes => vec![row(&[
                ("threat_type_code", "INF"),
                ("threat_type_name", "침투"),
                ("severity", "High"),
            ])],
            TableKind::ThreatEvents => vec![row(&[
                ("threat_id", "T-1"),
                ("threat_type_code", "침투"),
            ])],
            _ => Vec::new(),
        });

        assert_eq!(catalog.axes.len(), 1);
        let event = catalog.threat_event("t-1").expect("event");
        assert_eq!(event.threat_name.as_deref(), Some("침투"));
        assert_eq!(event.threat_severity.as_deref(), Some("High"));
    }

    #[test]
    fn axis_lookup_prefers_exact_match() {
        let catalog = BattlefieldCatalog {
            axes: vec![
                Axis {
                    axis_id: "AXIS10".to_string(),
                    ..Axis::default()
                },
                Axis {
                    axis_id: "AXIS1".to_string(),
                    ..Axis::default()
                },
            ],
            ..BattlefieldCatalog::default()
        };
        assert_eq!(catalog.find_axis("axis1").map(|axis| axis.axis_id.as_str()), Some("AXIS1"));
        assert_eq!(catalog.find_axis("AXIS10 (주공)").map(|axis| axis.axis_id.as_str()), Some("AXIS10"));
        assert!(catalog.find_axis("").is_none());
    }
}
