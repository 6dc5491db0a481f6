//! Interaction Rules
//!
//! What a single agent does when it is activated. A SYBIL below the attack
//! threshold only drifts upward. Everyone else walks up to
//! `max_interactions_per_step` neighbors, NORMAL agents after first losing
//! confidence to any SYBIL neighbor. Every mutation is written to the world
//! immediately, so agents activated later in the same tick see it.

use bevy_ecs::prelude::*;
use rand::Rng;
use sybil_events::{AttackEffect, Event};

use crate::components::agent::{AgentId, AgentState, Confidence, Identities, NodePosition};
use crate::components::network::Network;
use crate::components::world::InteractionParams;
use crate::events::TickEvents;

/// Constants of the state machine
pub mod rule_constants {
    /// SYBIL agents attack only at or above this confidence
    pub const ATTACK_CONFIDENCE_THRESHOLD: f64 = 0.8;
    /// Per-activation drift of a low-confidence SYBIL is `DRIFT_RATE * tick / DRIFT_TICK_SCALE`
    pub const DRIFT_RATE: f64 = 0.005;
    pub const DRIFT_TICK_SCALE: f64 = 10.0;
    /// Confidence lost by a NORMAL agent with any SYBIL neighbor
    pub const EXPOSURE_EROSION: f64 = 0.05;
    /// Probability of self-conversion once the interaction roll succeeds
    pub const SELF_CONVERSION_CHANCE: f64 = 0.1;
    pub const SELF_CONVERSION_CONFIDENCE: f64 = 0.1;
    /// NORMAL targets below this confidence are corrupted rather than converted
    pub const CORRUPTION_CEILING: f64 = 0.5;
    pub const CORRUPTION_GAIN: f64 = 0.1;
    /// Confidence of a target converted by influence
    pub const INFLUENCE_CONVERSION_CONFIDENCE: f64 = 0.2;
}

use rule_constants::*;

/// Per-tick values shared by every activation in that tick
#[derive(Debug, Clone)]
pub struct ActivationContext {
    /// Tick being executed, read before the counter advances
    pub tick: u64,
    pub params: InteractionParams,
}

/// Upward drift for a low-confidence SYBIL agent at `tick`
pub fn drift_amount(tick: u64) -> f64 {
    DRIFT_RATE * (tick as f64 / DRIFT_TICK_SCALE)
}

/// Effect of influence on a target in the given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluenceOutcome {
    /// Confidence rises by `CORRUPTION_GAIN`
    Corrupt,
    /// Target becomes SYBIL with `INFLUENCE_CONVERSION_CONFIDENCE`
    Convert,
    NoEffect,
}

impl From<InfluenceOutcome> for AttackEffect {
    fn from(outcome: InfluenceOutcome) -> Self {
        match outcome {
            InfluenceOutcome::Corrupt => AttackEffect::Corrupted,
            InfluenceOutcome::Convert => AttackEffect::Converted,
            InfluenceOutcome::NoEffect => AttackEffect::NoEffect,
        }
    }
}

/// Decide the influence outcome for a target without touching it
pub fn influence_outcome(state: AgentState, confidence: f64) -> InfluenceOutcome {
    match state {
        AgentState::Normal if confidence < CORRUPTION_CEILING => InfluenceOutcome::Corrupt,
        AgentState::Normal if confidence >= 1.0 => InfluenceOutcome::Convert,
        AgentState::Normal | AgentState::Sybil => InfluenceOutcome::NoEffect,
    }
}

fn read_agent(world: &World, entity: Entity) -> Option<(AgentId, AgentState, f64)> {
    Some((
        *world.get::<AgentId>(entity)?,
        *world.get::<AgentState>(entity)?,
        world.get::<Confidence>(entity)?.value(),
    ))
}

fn adjust_confidence(world: &mut World, entity: Entity, delta: f64) {
    if let Some(mut confidence) = world.get_mut::<Confidence>(entity) {
        confidence.adjust(delta);
    }
}

fn record(world: &mut World, event: Event) {
    if let Some(mut events) = world.get_resource_mut::<TickEvents>() {
        events.push(event);
    }
}

/// Turn an agent SYBIL with the given confidence and forge its identities.
///
/// Returns false if the entity is not an agent or is already SYBIL.
pub fn convert_to_sybil(
    world: &mut World,
    entity: Entity,
    confidence: f64,
    identity_count: usize,
) -> bool {
    let Some((agent_id, state, _)) = read_agent(world, entity) else {
        return false;
    };
    if state.is_sybil() {
        return false;
    }

    let mut agent = world.entity_mut(entity);
    agent.insert((
        AgentState::Sybil,
        Confidence::new(confidence),
        Identities::forge(agent_id, identity_count),
    ));
    true
}

/// Apply SYBIL influence to a target; mutates only the target.
pub fn apply_influence(world: &mut World, target: Entity, identity_count: usize) -> InfluenceOutcome {
    let Some((_, state, confidence)) = read_agent(world, target) else {
        return InfluenceOutcome::NoEffect;
    };

    let outcome = influence_outcome(state, confidence);
    match outcome {
        InfluenceOutcome::Corrupt => adjust_confidence(world, target, CORRUPTION_GAIN),
        InfluenceOutcome::Convert => {
            convert_to_sybil(world, target, INFLUENCE_CONVERSION_CONFIDENCE, identity_count);
        }
        InfluenceOutcome::NoEffect => {}
    }
    outcome
}

fn has_sybil_neighbor(world: &World, neighbors: &[Entity]) -> bool {
    neighbors
        .iter()
        .any(|n| world.get::<AgentState>(*n).is_some_and(|s| s.is_sybil()))
}

/// Erosion for a NORMAL agent with any SYBIL neighbor; applied once per
/// activation and not capped by the interaction counter.
fn apply_exposure_erosion(world: &mut World, entity: Entity, neighbors: &[Entity]) {
    if has_sybil_neighbor(world, neighbors) {
        adjust_confidence(world, entity, -EXPOSURE_EROSION);
    }
}

/// Walk the neighbor list, stopping once the interaction cap is reached.
/// Returns the number of interactions made.
fn interact_with_neighbors(
    world: &mut World,
    entity: Entity,
    neighbors: &[Entity],
    ctx: &ActivationContext,
    rng: &mut impl Rng,
) -> usize {
    let params = &ctx.params;
    let exposed = has_sybil_neighbor(world, neighbors);
    let mut interactions = 0;

    for &neighbor in neighbors {
        if interactions >= params.max_interactions_per_step {
            break;
        }

        // Re-read every iteration: a NORMAL agent may convert mid-walk
        let Some((agent_id, state, confidence)) = read_agent(world, entity) else {
            break;
        };

        match state {
            AgentState::Sybil => {
                if confidence < ATTACK_CONFIDENCE_THRESHOLD {
                    break;
                }
                if rng.gen::<f64>() < params.normal_to_sybil_interaction_chance {
                    let outcome = apply_influence(world, neighbor, params.sybil_identity_count);
                    interactions += 1;

                    let target_id = world.get::<AgentId>(neighbor).map_or(0, |id| id.0);
                    tracing::debug!(
                        tick = ctx.tick,
                        attacker = agent_id.0,
                        target_id,
                        ?outcome,
                        interactions,
                        "sybil attack"
                    );
                    record(
                        world,
                        Event::Attack {
                            tick: ctx.tick,
                            attacker: agent_id.0,
                            target: target_id,
                            effect: outcome.into(),
                            interactions,
                        },
                    );
                }
            }
            AgentState::Normal => {
                if params.exposure_gated_conversion && !exposed {
                    break;
                }
                if rng.gen::<f64>() < params.normal_to_sybil_interaction_chance {
                    if rng.gen::<f64>() < SELF_CONVERSION_CHANCE
                        && convert_to_sybil(
                            world,
                            entity,
                            SELF_CONVERSION_CONFIDENCE,
                            params.sybil_identity_count,
                        )
                    {
                        tracing::debug!(tick = ctx.tick, agent = agent_id.0, "self conversion");
                        record(
                            world,
                            Event::SelfConversion {
                                tick: ctx.tick,
                                agent: agent_id.0,
                            },
                        );
                    }
                    interactions += 1;
                }
            }
        }
    }

    interactions
}

/// Run one agent's per-tick behavior against the live world.
pub fn activate_agent(
    world: &mut World,
    entity: Entity,
    ctx: &ActivationContext,
    rng: &mut impl Rng,
) -> usize {
    let Some(node) = world.get::<NodePosition>(entity).map(|p| p.0) else {
        return 0;
    };
    let Some((_, state, confidence)) = read_agent(world, entity) else {
        return 0;
    };

    // A low-confidence SYBIL only builds credibility this tick, even if the
    // drift carries it past the attack threshold.
    if state.is_sybil() && confidence < ATTACK_CONFIDENCE_THRESHOLD {
        adjust_confidence(world, entity, drift_amount(ctx.tick));
        return 0;
    }

    let neighbors = world.resource::<Network>().neighbor_agents(node);
    if !state.is_sybil() {
        apply_exposure_erosion(world, entity, &neighbors);
    }
    interact_with_neighbors(world, entity, &neighbors, ctx, rng)
}
