//! Output Generation
//!
//! Network snapshots, the current-state file and the metrics time series.

pub mod metrics;
pub mod snapshot;

pub use metrics::*;
pub use snapshot::*;
