//! Battlefield data model.

mod axis_state;
mod coa;
mod constraint;
mod entities;
mod threat_event;

pub use axis_state::{summarize_constraints, AxisState};
pub use coa::{CourseOfAction, FireSupportAllocation, MettcScores};
pub use constraint::{Constraint, ConstraintKind};
pub use entities::{
    Axis, CivilianArea, EnemyUnit, FriendlyUnit, Mission, Resource, TerrainCell, Weather,
};
pub use threat_event::{ThreatEvent, ThreatLevel, ThreatTypeMaster};
