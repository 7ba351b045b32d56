//! Axis-state aggregation.
//!
//! [`AxisStateBuilder`] turns the raw battlefield tables into per-axis snapshots for a
//! mission or a single threat event. Loaded tables and their typed conversion are memoized
//! per builder; population happens under a lock so concurrent first calls load once.

mod assemble;
mod catalog;
mod hydrate;
mod resolve;

pub(crate) use assemble::mean;
pub use catalog::BattlefieldCatalog;
pub use hydrate::hydrate_threat_event;
pub use resolve::{MissionAxisSource, ThreatAxisSource};

use crate::domain::{AxisState, ThreatEvent};
use crate::ingest::{DataSource, Row, TableKind};
use crate::threat::SharedThreatScorer;
use assemble::build_axis_state;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AxisBuildError {
    #[error("no axes are defined in the battlefield data")]
    NoAxesDefined,
}

pub struct AxisStateBuilder {
    source: Arc<dyn DataSource>,
    threat_scorer: SharedThreatScorer,
    tables: Mutex<HashMap<TableKind, Arc<Vec<Row>>>>,
    catalog: Mutex<Option<Arc<BattlefieldCatalog>>>,
}

impl AxisStateBuilder {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            threat_scorer: SharedThreatScorer::default(),
            tables: Mutex::new(HashMap::new()),
            catalog: Mutex::new(None),
        }
    }

    pub fn with_threat_scorer(mut self, threat_scorer: SharedThreatScorer) -> Self {
        self.set_threat_scorer(threat_scorer);
        self
    }

    pub fn threat_scorer(&self) -> &SharedThreatScorer {
        &self.threat_scorer
    }

    /// Swap the scoring dependency; both caches are dropped.
    pub fn set_threat_scorer(&mut self, threat_scorer: SharedThreatScorer) {
        self.threat_scorer = threat_scorer;
        self.invalidate_cache();
    }

    /// Swap the data source; both caches are dropped.
    pub fn replace_source(&mut self, source: Arc<dyn DataSource>) {
        self.source = source;
        self.invalidate_cache();
    }

    pub fn invalidate_cache(&self) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = None;
        debug!("axis builder caches invalidated");
    }

    /// Typed tables for the current cache generation.
    pub fn catalog(&self) -> Arc<BattlefieldCatalog> {
        let mut cached = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = cached.as_ref() {
            return Arc::clone(catalog);
        }

        let catalog = Arc::new(BattlefieldCatalog::from_tables(|kind| {
            self.table(kind).as_ref().clone()
        }));
        info!(
            axes = catalog.axes.len(),
            missions = catalog.missions.len(),
            threat_events = catalog.threat_events.len(),
            "battlefield catalog loaded"
        );
        *cached = Some(Arc::clone(&catalog));
        catalog
    }

    /// Stored threat event by id, hydrated with master data.
    pub fn find_threat_event(&self, threat_id: &str) -> Option<ThreatEvent> {
        self.catalog().threat_event(threat_id).cloned()
    }

    /// One state per axis resolved for the mission.
    ///
    /// Fails only when the battlefield data has no axes at all; every other gap degrades to a
    /// broader axis set.
    pub fn build_axis_states(&self, mission_id: &str) -> Result<Vec<AxisState>, AxisBuildError> {
        let catalog = self.catalog();
        if catalog.axes.is_empty() {
            warn!(mission_id, "no axes defined; cannot build axis states");
            return Err(AxisBuildError::NoAxesDefined);
        }

        let scorer = self.threat_scorer.snapshot();
        let (axes, source) = resolve::mission_axes(&catalog, mission_id);
        info!(mission_id, ?source, axes = axes.len(), "resolved mission axes");

        let primary_axis_id = catalog
            .mission(mission_id)
            .and_then(|mission| mission.primary_axis_id.as_deref())
            .and_then(|reference| catalog.find_axis(reference))
            .map(|axis| axis.axis_id.clone());

        Ok(axes
            .into_iter()
            .map(|axis| {
                let is_primary = primary_axis_id.as_deref() == Some(axis.axis_id.as_str());
                build_axis_state(&catalog, axis, Some(mission_id), is_primary, &scorer)
            })
            .collect())
    }

    /// The single axis state around `event`, with the event injected. Empty when no axis or
    /// mission can be resolved.
    pub fn build_axis_states_from_threat(
        &self,
        event: &ThreatEvent,
        mission_id: Option<&str>,
    ) -> Vec<AxisState> {
        let catalog = self.catalog();
        let scorer = self.threat_scorer.snapshot();

        let mut event = event.clone();
        if !event.is_hydrated() {
            hydrate_threat_event(&mut event, &catalog.threat_types);
        }

        let mission = resolve::threat_mission(&catalog, &event, mission_id);
        let Some((axis, source)) = resolve::threat_axis(&catalog, &event, mission.as_deref())
        else {
            warn!(threat_id = %event.threat_id, "no axis resolvable for threat event");
            return Vec::new();
        };
        if source == ThreatAxisSource::FirstAxis {
            warn!(
                threat_id = %event.threat_id,
                axis_id = %axis.axis_id,
                "threat axis unresolved; falling back to first axis"
            );
        } else {
            debug!(threat_id = %event.threat_id, axis_id = %axis.axis_id, ?source, "resolved threat axis");
        }

        let Some(mission) = mission else {
            warn!(threat_id = %event.threat_id, "no mission resolvable for threat event");
            return Vec::new();
        };

        let is_primary = catalog
            .mission(&mission)
            .and_then(|record| record.primary_axis_id.as_deref())
            .and_then(|reference| catalog.find_axis(reference))
            .map(|primary| primary.axis_id == axis.axis_id)
            .unwrap_or(false);

        let mut state = build_axis_state(&catalog, axis, Some(&mission), is_primary, &scorer);
        state.inject_threat_event(event, &scorer);
        vec![state]
    }

    fn table(&self, kind: TableKind) -> Arc<Vec<Row>> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rows) = tables.get(&kind) {
            return Arc::clone(rows);
        }

        let rows = match self.source.load_table(kind.canonical_name()) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(table = kind.canonical_name(), error = %err, "table load failed; treating as empty");
                Vec::new()
            }
        };
        let rows = Arc::new(rows);
        tables.insert(kind, Arc::clone(&rows));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{DataSourceError, InMemoryTables};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: InMemoryTables,
        loads: AtomicUsize,
    }

    impl DataSource for CountingSource {
        fn load_table(&self, name: &str) -> Result<Vec<Row>, DataSourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load_table(name)
        }
    }

    fn axis_row(id: &str) -> Row {
        [("axis_id", id)]
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn tables_load_once_per_generation() {
        let source = Arc::new(CountingSource {
            inner: InMemoryTables::new().with_table(TableKind::Axes, vec![axis_row("AXIS01")]),
            loads: AtomicUsize::new(0),
        });
        let builder = AxisStateBuilder::new(source.clone());

        builder.build_axis_states("M-01").expect("axes");
        builder.build_axis_states("M-01").expect("axes");
        assert_eq!(source.loads.load(Ordering::SeqCst), TableKind::all().len());

        builder.invalidate_cache();
        builder.build_axis_states("M-01").expect("axes");
        assert_eq!(source.loads.load(Ordering::SeqCst), 2 * TableKind::all().len());
    }

    #[test]
    fn replacing_the_source_drops_cached_tables() {
        let mut builder = AxisStateBuilder::new(Arc::new(InMemoryTables::new()));
        match builder.build_axis_states("M-01") {
            Err(AxisBuildError::NoAxesDefined) => {}
            other => panic!("expected missing axes, got {other:?}"),
        }

        builder.replace_source(Arc::new(
            InMemoryTables::new().with_table(TableKind::Axes, vec![axis_row("AXIS01")]),
        ));
        let states = builder.build_axis_states("M-01").expect("axes");
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn failing_tables_degrade_to_empty() {
        struct Broken;
        impl DataSource for Broken {
            fn load_table(&self, name: &str) -> Result<Vec<Row>, DataSourceError> {
                Err(DataSourceError::UnknownTable(name.to_string()))
            }
        }

        let builder = AxisStateBuilder::new(Arc::new(Broken));
        assert!(builder.catalog().axes.is_empty());
        let event = ThreatEvent {
            threat_id: "T-1".to_string(),
            ..ThreatEvent::default()
        };
        assert!(builder.build_axis_states_from_threat(&event, Some("M-01")).is_empty());
    }
}
