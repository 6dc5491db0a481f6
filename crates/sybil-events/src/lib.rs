//! Shared event types and serialization for the Sybil spread simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers, dashboards and the simulation engine all depend on it.

pub mod event;
pub mod metrics;
pub mod snapshot;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export event types
pub use event::{AttackEffect, Event, EventParseError};

// Re-export metrics types
pub use metrics::{format_ratio, MetricsRow, TimeSeries};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, EdgeSnapshot, NetworkSnapshot, NodeSnapshot};
