//! Metrics Types
//!
//! Per-tick population aggregates and the append-only series they form.

use serde::{Deserialize, Serialize};

/// Aggregates measured over the population at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub tick: u64,
    pub normal: usize,
    pub sybil: usize,
    /// Mean confidence over NORMAL agents, 0 when there are none.
    pub average_confidence: f64,
}

impl MetricsRow {
    /// Total number of agents counted in this row.
    pub fn population(&self) -> usize {
        self.normal + self.sybil
    }

    /// Sybil/Normal ratio, infinite once no NORMAL agent remains.
    pub fn sybil_normal_ratio(&self) -> f64 {
        if self.normal == 0 {
            f64::INFINITY
        } else {
            self.sybil as f64 / self.normal as f64
        }
    }

    /// Human-readable ratio, e.g. `"0.25"` or `"∞"`.
    pub fn ratio_label(&self) -> String {
        format_ratio(self.sybil_normal_ratio())
    }
}

/// Formats a ratio with two decimals, or `∞` when unbounded.
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_infinite() {
        "∞".to_string()
    } else {
        format!("{:.2}", ratio)
    }
}

/// Append-only time series of metrics rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    rows: Vec<MetricsRow>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: MetricsRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn latest(&self) -> Option<&MetricsRow> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row recorded for a given tick, if any.
    pub fn at_tick(&self, tick: u64) -> Option<&MetricsRow> {
        self.rows.iter().find(|row| row.tick == tick)
    }
}
