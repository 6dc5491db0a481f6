//! Intervention System
//!
//! Allows an external driver to modify agents between ticks. Interventions
//! arrive as JSON (`{"type": "convert_to_sybil", "agent_id": 3}`) and go
//! through the same components the systems mutate, so every invariant still
//! holds afterwards.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::agent::{AgentId, AgentState, Confidence};
use crate::components::network::Network;
use crate::components::world::InteractionParams;
use crate::systems::interaction::convert_to_sybil;

/// Types of interventions that can be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intervention {
    /// Overwrite an agent's confidence score (clamped into [0, 1])
    SetConfidence { agent_id: u64, value: f64 },
    /// Turn a NORMAL agent SYBIL, forging its identities
    ConvertToSybil { agent_id: u64 },
}

impl Intervention {
    pub fn agent_id(&self) -> AgentId {
        match self {
            Intervention::SetConfidence { agent_id, .. }
            | Intervention::ConvertToSybil { agent_id } => AgentId(*agent_id),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, InterventionError> {
        serde_json::from_str(json).map_err(|e| InterventionError::ParseError(e.to_string()))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InterventionError {
    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),
    #[error("invalid intervention: {0}")]
    ParseError(String),
}

/// Find the entity for an agent id through the node bindings.
pub fn find_agent(world: &World, id: AgentId) -> Option<Entity> {
    let network = world.get_resource::<Network>()?;
    network
        .bound_agents()
        .into_iter()
        .find(|&entity| world.get::<AgentId>(entity) == Some(&id))
}

/// Apply an intervention to the world
pub fn apply_intervention(
    world: &mut World,
    intervention: &Intervention,
) -> Result<(), InterventionError> {
    let id = intervention.agent_id();
    let entity = find_agent(world, id).ok_or(InterventionError::UnknownAgent(id))?;

    match intervention {
        Intervention::SetConfidence { value, .. } => {
            if let Some(mut confidence) = world.get_mut::<Confidence>(entity) {
                confidence.set(*value);
            }
            tracing::info!(agent = %id, value, "intervention: set confidence");
        }
        Intervention::ConvertToSybil { .. } => {
            let identity_count = world
                .get_resource::<InteractionParams>()
                .map_or(0, |p| p.sybil_identity_count);
            let confidence = AgentState::Sybil.initial_confidence();
            if convert_to_sybil(world, entity, confidence, identity_count) {
                tracing::info!(agent = %id, "intervention: converted to sybil");
            } else {
                tracing::debug!(agent = %id, "intervention: agent already sybil");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::Identities;
    use crate::config::ModelConfig;
    use crate::setup::{generate_network, spawn_population, SpawnConfig};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn world() -> World {
        let model = ModelConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let graph = generate_network(model.num_nodes, model.avg_node_degree, &mut rng).unwrap();
        let mut network = Network::new(graph);
        let mut world = World::new();
        spawn_population(&mut world, &mut network, &SpawnConfig::from(&model));
        world.insert_resource(network);
        world.insert_resource(InteractionParams::from(&model));
        world
    }

    #[test]
    fn test_parse_intervention() {
        let parsed = Intervention::from_json(r#"{"type":"set_confidence","agent_id":4,"value":0.3}"#)
            .unwrap();
        assert_eq!(
            parsed,
            Intervention::SetConfidence {
                agent_id: 4,
                value: 0.3
            }
        );

        assert!(matches!(
            Intervention::from_json(r#"{"type":"delete_agent","agent_id":4}"#),
            Err(InterventionError::ParseError(_))
        ));
    }

    #[test]
    fn test_set_confidence_clamps() {
        let mut world = world();
        apply_intervention(
            &mut world,
            &Intervention::SetConfidence {
                agent_id: 5,
                value: 1.8,
            },
        )
        .unwrap();

        let entity = find_agent(&world, AgentId(5)).unwrap();
        assert_eq!(world.get::<Confidence>(entity).unwrap().value(), 1.0);
    }

    #[test]
    fn test_convert_to_sybil_forges_identities() {
        let mut world = world();
        apply_intervention(&mut world, &Intervention::ConvertToSybil { agent_id: 7 }).unwrap();

        let entity = find_agent(&world, AgentId(7)).unwrap();
        assert_eq!(*world.get::<AgentState>(entity).unwrap(), AgentState::Sybil);
        assert_eq!(world.get::<Confidence>(entity).unwrap().value(), 0.2);
        assert_eq!(
            world.get::<Identities>(entity).unwrap().labels(),
            &["Sybil_7_0", "Sybil_7_1", "Sybil_7_2"]
        );
    }

    #[test]
    fn test_unknown_agent() {
        let mut world = world();
        let result = apply_intervention(&mut world, &Intervention::ConvertToSybil { agent_id: 99 });
        assert_eq!(result, Err(InterventionError::UnknownAgent(AgentId(99))));
    }
}
