//! Agent Components
//!
//! Components for individual agents: identity, state, confidence, forged
//! identities and the node each agent is bound to.

use bevy_ecs::prelude::*;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Unique identifier for an agent, assigned at creation and never reused
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an agent is honest or operating under forged identities
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    #[default]
    Normal,
    Sybil,
}

impl AgentState {
    pub fn is_sybil(&self) -> bool {
        matches!(self, AgentState::Sybil)
    }

    /// Lowercase label used in snapshots and logs.
    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Normal => "normal",
            AgentState::Sybil => "sybil",
        }
    }

    /// Confidence an agent is seeded with at population construction.
    pub fn initial_confidence(&self) -> f64 {
        match self {
            AgentState::Normal => 1.0,
            AgentState::Sybil => 0.2,
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trust level in [0, 1]
///
/// Every constructor and mutator clamps, so the bound holds without any
/// outside enforcement.
#[derive(Component, Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn set(&mut self, value: f64) {
        self.0 = value.clamp(0.0, 1.0);
    }

    /// Add a (possibly negative) delta, staying within [0, 1].
    pub fn adjust(&mut self, delta: f64) {
        self.set(self.0 + delta);
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Forged identity labels held while SYBIL
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identities(pub Vec<String>);

impl Identities {
    /// `Sybil_<agent_id>_<index>` for every index below `count`.
    pub fn forge(agent_id: AgentId, count: usize) -> Self {
        Self(
            (0..count)
                .map(|i| format!("Sybil_{}_{}", agent_id.0, i))
                .collect(),
        )
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

/// Graph node an agent occupies; fixed for the agent's lifetime
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePosition(pub NodeIndex);

impl NodePosition {
    pub fn node_id(&self) -> usize {
        self.0.index()
    }
}

/// Owned read-only copy of one agent, for consumers outside the ECS world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    pub id: AgentId,
    pub node_id: usize,
    pub state: AgentState,
    pub confidence_score: f64,
    pub identities: Vec<String>,
}

impl AgentView {
    /// Read an agent's components, `None` if the entity is not a full agent.
    pub fn from_world(world: &World, entity: Entity) -> Option<Self> {
        let id = *world.get::<AgentId>(entity)?;
        let position = world.get::<NodePosition>(entity)?;
        let state = *world.get::<AgentState>(entity)?;
        let confidence = world.get::<Confidence>(entity)?;
        let identities = world.get::<Identities>(entity)?;

        Some(Self {
            id,
            node_id: position.node_id(),
            state,
            confidence_score: confidence.value(),
            identities: identities.0.clone(),
        })
    }
}
