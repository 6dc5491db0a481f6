//! Activation System
//!
//! Random activation: every tick, each agent acts exactly once, in a fresh
//! uniformly random order, one at a time.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::network::Network;
use crate::components::world::{InteractionParams, SimulationState};
use crate::events::TickEvents;
use crate::systems::interaction::{activate_agent, ActivationContext};
use crate::SimRng;

/// System: Clear last tick's events before agents act
pub fn clear_tick_events(mut tick_events: ResMut<TickEvents>) {
    tick_events.events.clear();
}

/// A fresh uniformly random permutation of every bound agent
pub fn activation_order(network: &Network, rng: &mut impl Rng) -> Vec<Entity> {
    let mut order = network.bound_agents();
    order.shuffle(rng);
    order
}

/// Exclusive system: shuffle the agents and activate them in that order.
///
/// Runs with exclusive world access so each agent's changes are visible to
/// the agents activated after it in the same tick.
pub fn activate_agents(world: &mut World) {
    let ctx = ActivationContext {
        tick: world.resource::<SimulationState>().current_tick,
        params: world.resource::<InteractionParams>().clone(),
    };
    world.resource_scope(|world, mut rng: Mut<SimRng>| {
        let order = activation_order(world.resource::<Network>(), &mut rng.0);

        let mut interactions = 0;
        for entity in order {
            interactions += activate_agent(world, entity, &ctx, &mut rng.0);
        }
        tracing::trace!(tick = ctx.tick, interactions, "activated agents");
    });
}

/// System: Advance the tick counter by one
pub fn advance_tick(mut state: ResMut<SimulationState>) {
    state.advance_tick();
}
