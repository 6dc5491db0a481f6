//! Agent Spawning
//!
//! Creates exactly one agent per graph node and binds it to that node.

use bevy_ecs::prelude::*;

use crate::components::agent::{
    Agent, AgentId, AgentState, Confidence, Identities, NodePosition,
};
use crate::components::network::Network;
use crate::config::ModelConfig;

/// Configuration for agent spawning
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    pub initial_sybil_nodes: usize,
    pub sybil_identity_count: usize,
}

impl From<&ModelConfig> for SpawnConfig {
    fn from(model: &ModelConfig) -> Self {
        Self {
            initial_sybil_nodes: model.initial_sybil_nodes,
            sybil_identity_count: model.sybil_identity_count,
        }
    }
}

/// Initial state for the agent at a given enumeration index
fn initial_state(index: usize, config: &SpawnConfig) -> AgentState {
    if index < config.initial_sybil_nodes {
        AgentState::Sybil
    } else {
        AgentState::Normal
    }
}

/// Spawn one agent per node, in ascending node order, and bind each to its
/// node. The agent id equals the enumeration index.
pub fn spawn_population(
    world: &mut World,
    network: &mut Network,
    config: &SpawnConfig,
) -> Vec<Entity> {
    let nodes: Vec<_> = network.nodes().collect();
    let mut spawned_entities = Vec::with_capacity(nodes.len());

    for (i, node) in nodes.into_iter().enumerate() {
        let agent_id = AgentId(i as u64);
        let state = initial_state(i, config);
        let identities = match state {
            AgentState::Sybil => Identities::forge(agent_id, config.sybil_identity_count),
            AgentState::Normal => Identities::none(),
        };

        let entity = world
            .spawn((
                Agent,
                agent_id,
                state,
                Confidence::new(state.initial_confidence()),
                identities,
                NodePosition(node),
            ))
            .id();

        network.bind(node, entity);
        spawned_entities.push(entity);
    }

    spawned_entities
}

/// Get summary stats for spawned agents
pub fn get_spawn_summary(world: &mut World) -> SpawnSummary {
    let mut summary = SpawnSummary::default();
    let mut query = world.query::<&AgentState>();

    for state in query.iter(world) {
        summary.total_agents += 1;
        match state {
            AgentState::Normal => summary.normal += 1,
            AgentState::Sybil => summary.sybil += 1,
        }
    }

    summary
}

/// Summary of spawned agents
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub normal: usize,
    pub sybil: usize,
}

impl std::fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total agents: {}", self.total_agents)?;
        writeln!(f, "  normal: {}", self.normal)?;
        write!(f, "  sybil: {}", self.sybil)
    }
}
