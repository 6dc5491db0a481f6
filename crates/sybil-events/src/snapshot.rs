//! Snapshot Types
//!
//! Serialization structs for network snapshots and state output.
//!
//! A snapshot captures the graph, every agent bound to it and the population
//! metrics at one tick. It is everything a renderer needs to color nodes,
//! weight edges and fill tooltips, without any presentation decisions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MetricsRow;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Agent bound to a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub node_id: usize,
    pub agent_id: u64,
    /// `"normal"` or `"sybil"`
    pub state: String,
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<String>,
}

impl NodeSnapshot {
    pub fn is_sybil(&self) -> bool {
        self.state == "sybil"
    }
}

/// Undirected edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: usize,
    pub target: usize,
    /// At least one endpoint is SYBIL.
    pub involves_sybil: bool,
}

/// Full network snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub snapshot_id: String,
    pub run_id: Uuid,
    pub tick: u64,
    pub triggered_by: String,
    pub running: bool,
    pub metrics: MetricsRow,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl NetworkSnapshot {
    pub fn new(
        snapshot_id: impl Into<String>,
        run_id: Uuid,
        metrics: MetricsRow,
        triggered_by: impl Into<String>,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            run_id,
            tick: metrics.tick,
            triggered_by: triggered_by.into(),
            running: true,
            metrics,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Node entry for a graph node id.
    pub fn node(&self, node_id: usize) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    /// Number of edges with at least one SYBIL endpoint.
    pub fn sybil_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.involves_sybil).count()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
