//! Snapshot Generation
//!
//! Builds renderer-facing network snapshots from a running simulation and
//! writes them as pretty JSON.

use std::fs;
use std::path::Path;

use sybil_events::{generate_snapshot_id, EdgeSnapshot, NetworkSnapshot, NodeSnapshot};

use crate::simulation::Simulation;

/// Tracks snapshot numbering and cadence for one run
#[derive(Debug, Clone)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
    last_snapshot_tick: Option<u64>,
}

impl SnapshotGenerator {
    /// An interval of 0 disables periodic snapshots; tick 0 is always taken.
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
            last_snapshot_tick: None,
        }
    }

    pub fn should_snapshot(&self, current_tick: u64) -> bool {
        current_tick == 0
            || (self.snapshot_interval > 0 && current_tick % self.snapshot_interval == 0)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn mark_snapshot(&mut self, tick: u64) {
        self.last_snapshot_tick = Some(tick);
    }

    pub fn last_snapshot_tick(&self) -> Option<u64> {
        self.last_snapshot_tick
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Generate a complete network snapshot
pub fn generate_snapshot(
    simulation: &Simulation,
    generator: &mut SnapshotGenerator,
    triggered_by: &str,
) -> NetworkSnapshot {
    let mut snapshot = NetworkSnapshot::new(
        generator.next_id(),
        simulation.run_id(),
        simulation.measure(),
        triggered_by,
    );
    snapshot.running = simulation.is_running();

    let agents = simulation.agents();
    let mut sybil_nodes = vec![false; simulation.network().node_count()];
    for agent in &agents {
        if let Some(flag) = sybil_nodes.get_mut(agent.node_id) {
            *flag = agent.state.is_sybil();
        }
    }

    snapshot.nodes = agents
        .into_iter()
        .map(|agent| NodeSnapshot {
            node_id: agent.node_id,
            agent_id: agent.id.0,
            state: agent.state.label().to_string(),
            confidence_score: agent.confidence_score,
            identities: agent.identities,
        })
        .collect();

    snapshot.edges = simulation
        .network()
        .edges()
        .map(|(source, target)| EdgeSnapshot {
            source,
            target,
            involves_sybil: sybil_nodes.get(source).copied().unwrap_or(false)
                || sybil_nodes.get(target).copied().unwrap_or(false),
        })
        .collect();

    generator.mark_snapshot(snapshot.tick);
    snapshot
}

/// Write snapshot to a JSON file
pub fn write_snapshot(snapshot: &NetworkSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = snapshot.to_json_pretty()?;
    fs::write(path, json)?;
    Ok(())
}

/// Write snapshot to `<dir>/snapshots/<snapshot_id>.json`
pub fn write_snapshot_to_dir(
    snapshot: &NetworkSnapshot,
    output_dir: impl AsRef<Path>,
) -> std::io::Result<()> {
    let dir = output_dir.as_ref().join("snapshots");
    fs::create_dir_all(&dir)?;
    write_snapshot(snapshot, dir.join(format!("{}.json", snapshot.snapshot_id)))
}

/// Write current state (overwrites each time)
pub fn write_current_state(
    snapshot: &NetworkSnapshot,
    output_dir: impl AsRef<Path>,
) -> std::io::Result<()> {
    write_snapshot(snapshot, output_dir.as_ref().join("current_state.json"))
}
