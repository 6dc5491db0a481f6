//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // sybil-events = { path = "../sybil-events", features = ["test-fixtures"] }
//!
//! use sybil_events::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! ```

use uuid::Uuid;

use crate::{AttackEffect, EdgeSnapshot, Event, MetricsRow, NetworkSnapshot, NodeSnapshot};

/// A three-node path `0 - 1 - 2` where node 0 is SYBIL.
pub fn sample_snapshot() -> NetworkSnapshot {
    let mut snapshot = NetworkSnapshot::new("snap_000001", Uuid::nil(), sample_rows()[0], "simulation_start");
    snapshot.nodes = vec![
        NodeSnapshot {
            node_id: 0,
            agent_id: 0,
            state: "sybil".to_string(),
            confidence_score: 0.2,
            identities: vec![
                "Sybil_0_0".to_string(),
                "Sybil_0_1".to_string(),
                "Sybil_0_2".to_string(),
            ],
        },
        NodeSnapshot {
            node_id: 1,
            agent_id: 1,
            state: "normal".to_string(),
            confidence_score: 1.0,
            identities: Vec::new(),
        },
        NodeSnapshot {
            node_id: 2,
            agent_id: 2,
            state: "normal".to_string(),
            confidence_score: 1.0,
            identities: Vec::new(),
        },
    ];
    snapshot.edges = vec![
        EdgeSnapshot {
            source: 0,
            target: 1,
            involves_sybil: true,
        },
        EdgeSnapshot {
            source: 1,
            target: 2,
            involves_sybil: false,
        },
    ];
    snapshot
}

/// Metrics for the sample path over its first three ticks.
pub fn sample_rows() -> Vec<MetricsRow> {
    vec![
        MetricsRow {
            tick: 0,
            normal: 2,
            sybil: 1,
            average_confidence: 1.0,
        },
        MetricsRow {
            tick: 1,
            normal: 2,
            sybil: 1,
            average_confidence: 0.975,
        },
        MetricsRow {
            tick: 2,
            normal: 1,
            sybil: 2,
            average_confidence: 0.95,
        },
    ]
}

/// One attack and one self-conversion.
pub fn sample_events() -> Vec<Event> {
    vec![
        Event::Attack {
            tick: 1,
            attacker: 0,
            target: 1,
            effect: AttackEffect::NoEffect,
            interactions: 1,
        },
        Event::SelfConversion { tick: 2, agent: 1 },
    ]
}
