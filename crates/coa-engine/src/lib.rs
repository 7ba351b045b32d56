//! Battlefield-state aggregation and multi-criteria course-of-action scoring.
//!
//! Tabular battlefield data flows through [`axis::AxisStateBuilder`] into per-axis
//! snapshots, candidate plans are ranked by [`evaluation::CoaEvaluator`], and every
//! ranked plan is gated by the METT-C validator before
//! [`service::CoaRecommendationService`] hands the decision back to the caller.

pub mod axis;
pub mod config;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod ingest;
pub mod service;
pub mod telemetry;
pub mod threat;

#[cfg(test)]
mod tests;
