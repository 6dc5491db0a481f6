//! Metrics Collection
//!
//! Pure aggregates over the population, recorded once at setup and once
//! after every tick.

use bevy_ecs::prelude::*;
use sybil_events::{MetricsRow, TimeSeries};

use crate::components::agent::{AgentState, Confidence};
use crate::components::world::SimulationState;

/// Resource: the run's append-only metrics time series
#[derive(Resource, Debug, Default)]
pub struct MetricsCollector {
    series: TimeSeries,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: MetricsRow) {
        self.series.push(row);
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn latest(&self) -> Option<&MetricsRow> {
        self.series.latest()
    }
}

/// Measure the population in a single pass.
pub fn measure<'a>(
    tick: u64,
    agents: impl IntoIterator<Item = (&'a AgentState, &'a Confidence)>,
) -> MetricsRow {
    let mut normal = 0;
    let mut sybil = 0;
    let mut normal_confidence = 0.0;

    for (state, confidence) in agents {
        match state {
            AgentState::Normal => {
                normal += 1;
                normal_confidence += confidence.value();
            }
            AgentState::Sybil => sybil += 1,
        }
    }

    MetricsRow {
        tick,
        normal,
        sybil,
        average_confidence: if normal > 0 {
            normal_confidence / normal as f64
        } else {
            0.0
        },
    }
}

/// Number of agents currently in `state`
pub fn count_state<'a>(states: impl IntoIterator<Item = &'a AgentState>, state: AgentState) -> usize {
    states.into_iter().filter(|s| **s == state).count()
}

/// Mean confidence of NORMAL agents, 0 when there are none
pub fn average_confidence_normal<'a>(
    agents: impl IntoIterator<Item = (&'a AgentState, &'a Confidence)>,
) -> f64 {
    measure(0, agents).average_confidence
}

/// System: Append a row for the tick just completed
pub fn collect_metrics(
    state: Res<SimulationState>,
    query: Query<(&AgentState, &Confidence)>,
    mut collector: ResMut<MetricsCollector>,
) {
    collector.record(measure(state.current_tick, query.iter()));
}

/// System: Clear the running flag once no NORMAL agent is left, if enabled
pub fn check_halt(collector: Res<MetricsCollector>, mut state: ResMut<SimulationState>) {
    if !state.halt_when_saturated || !state.running {
        return;
    }
    if let Some(row) = collector.latest() {
        if row.normal == 0 {
            state.running = false;
            tracing::info!(tick = row.tick, "no normal agents left, halting");
        }
    }
}
