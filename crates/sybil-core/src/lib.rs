//! Sybil Spread Simulation Engine Library
//!
//! Public API for the simulation engine.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod events;
pub mod interventions;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{Config, ConfigError, ModelConfig, RunConfig};
pub use interventions::{Intervention, InterventionError};
pub use simulation::Simulation;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
