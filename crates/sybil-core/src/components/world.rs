//! World Resources
//!
//! Run-wide state: the tick counter, the running flag and the constants that
//! drive agent interactions.

use bevy_ecs::prelude::*;

use crate::config::ModelConfig;

/// Global simulation state resource
#[derive(Resource, Debug, Clone)]
pub struct SimulationState {
    /// Number of completed steps
    pub current_tick: u64,
    /// Cleared when a halt rule fires; drivers stop calling `step()`
    pub running: bool,
    /// Clear `running` once no NORMAL agent remains
    pub halt_when_saturated: bool,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            current_tick: 0,
            running: true,
            halt_when_saturated: false,
        }
    }
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_halt_when_saturated(halt_when_saturated: bool) -> Self {
        Self {
            halt_when_saturated,
            ..Self::default()
        }
    }

    /// Advance by exactly one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }
}

/// Constants consulted on every agent activation
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct InteractionParams {
    pub normal_to_sybil_interaction_chance: f64,
    pub max_interactions_per_step: usize,
    pub sybil_identity_count: usize,
    pub exposure_gated_conversion: bool,
}

impl From<&ModelConfig> for InteractionParams {
    fn from(model: &ModelConfig) -> Self {
        Self {
            normal_to_sybil_interaction_chance: model.normal_to_sybil_interaction_chance,
            max_interactions_per_step: model.max_interactions_per_step,
            sybil_identity_count: model.sybil_identity_count,
            exposure_gated_conversion: model.exposure_gated_conversion,
        }
    }
}
