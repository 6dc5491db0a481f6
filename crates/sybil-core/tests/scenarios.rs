//! End-to-end scenarios through the `Simulation` API.

use sybil_core::components::network::NetworkGraph;
use sybil_core::config::ModelConfig;
use sybil_core::output::{generate_snapshot, SnapshotGenerator};
use sybil_core::{AgentId, AgentState, Intervention, InterventionError, Simulation};
use sybil_events::{fixtures, AttackEffect, Event};

fn graph(nodes: usize, edges: &[(usize, usize)]) -> NetworkGraph {
    let mut graph = NetworkGraph::new_undirected();
    let indices: Vec<_> = (0..nodes).map(|i| graph.add_node(i)).collect();
    for &(a, b) in edges {
        graph.add_edge(indices[a], indices[b], ());
    }
    graph
}

fn complete(nodes: usize) -> NetworkGraph {
    let mut edges = Vec::new();
    for i in 0..nodes {
        for j in (i + 1)..nodes {
            edges.push((i, j));
        }
    }
    graph(nodes, &edges)
}

#[test]
fn test_initial_population() {
    let model = ModelConfig {
        num_nodes: 10,
        avg_node_degree: 3.0,
        initial_sybil_nodes: 1,
        sybil_identity_count: 3,
        normal_to_sybil_interaction_chance: 0.3,
        max_interactions_per_step: 5,
        ..ModelConfig::default()
    };

    for seed in 0..5 {
        let sim = Simulation::new(&model, seed).unwrap();
        assert_eq!(sim.count(AgentState::Sybil), 1);
        assert_eq!(sim.count(AgentState::Normal), 9);

        for agent in sim.agents() {
            match agent.state {
                AgentState::Sybil => {
                    assert_eq!(agent.identities.len(), 3);
                    assert_eq!(agent.confidence_score, 0.2);
                }
                AgentState::Normal => {
                    assert!(agent.identities.is_empty());
                    assert_eq!(agent.confidence_score, 1.0);
                }
            }
        }
    }
}

#[test]
fn test_attack_converts_confident_neighbor() {
    let model = ModelConfig {
        initial_sybil_nodes: 1,
        normal_to_sybil_interaction_chance: 1.0,
        ..ModelConfig::default()
    };

    let mut conversions = 0;
    for seed in 0..20 {
        let mut sim = Simulation::from_graph(&model, graph(2, &[(0, 1)]), seed).unwrap();
        sim.apply(&Intervention::SetConfidence {
            agent_id: 0,
            value: 0.9,
        })
        .unwrap();
        sim.step();

        for event in sim.tick_events() {
            if let Event::Attack {
                target,
                effect: AttackEffect::Converted,
                ..
            } = event
            {
                let target = sim.agent(AgentId(*target)).unwrap();
                assert_eq!(target.state, AgentState::Sybil);
                assert_eq!(target.confidence_score, 0.2);
                assert_eq!(target.identities, vec!["Sybil_1_0", "Sybil_1_1", "Sybil_1_2"]);
                conversions += 1;
            }
        }
    }
    assert!(conversions > 0, "some activation order should let the sybil act first");
}

#[test]
fn test_isolated_agents() {
    let model = ModelConfig {
        initial_sybil_nodes: 1,
        normal_to_sybil_interaction_chance: 1.0,
        ..ModelConfig::default()
    };
    let mut sim = Simulation::from_graph(&model, graph(3, &[]), 3).unwrap();
    sim.run_for(30);

    for id in 1..3 {
        let agent = sim.agent(AgentId(id)).unwrap();
        assert_eq!(agent.state, AgentState::Normal);
        assert_eq!(agent.confidence_score, 1.0);
    }

    // drift over ticks 0..30 is 0.005 * (0 + 1 + ... + 29) / 10
    let sybil = sim.agent(AgentId(0)).unwrap();
    assert!((sybil.confidence_score - (0.2 + 0.2175)).abs() < 1e-9);
    assert!(sim.time_series().rows().iter().all(|r| r.sybil == 1));
}

#[test]
fn test_zero_interaction_cap() {
    let model = ModelConfig {
        initial_sybil_nodes: 1,
        normal_to_sybil_interaction_chance: 1.0,
        max_interactions_per_step: 0,
        ..ModelConfig::default()
    };
    let mut sim = Simulation::from_graph(&model, complete(4), 8).unwrap();
    sim.step();
    sim.step();

    assert_eq!(sim.count(AgentState::Sybil), 1);
    assert!(sim.tick_events().is_empty());
    // erosion still applies to every normal agent next to the sybil
    for agent in sim.agents().into_iter().filter(|a| a.state == AgentState::Normal) {
        assert!((agent.confidence_score - 0.9).abs() < 1e-9);
    }
}

#[test]
fn test_metrics_read_is_idempotent() {
    let mut sim = Simulation::new(&ModelConfig::default(), 4).unwrap();
    sim.run_for(5);

    let first = sim.measure();
    let second = sim.measure();
    assert_eq!(first, second);
    assert_eq!(sim.latest_metrics().copied(), Some(first));
    assert_eq!(sim.time_series().len(), 6);
    assert_eq!(sim.average_confidence_normal(), first.average_confidence);
}

#[test]
fn test_all_sybil_average_is_zero() {
    let model = ModelConfig {
        num_nodes: 5,
        initial_sybil_nodes: 5,
        ..ModelConfig::default()
    };
    let sim = Simulation::new(&model, 1).unwrap();

    assert_eq!(sim.average_confidence_normal(), 0.0);
    let row = sim.measure();
    assert!(row.sybil_normal_ratio().is_infinite());
    assert_eq!(row.ratio_label(), "∞");
}

#[test]
fn test_interventions() {
    let mut sim = Simulation::new(&ModelConfig::default(), 2).unwrap();

    sim.apply(&Intervention::ConvertToSybil { agent_id: 3 }).unwrap();
    assert_eq!(sim.count(AgentState::Sybil), 2);
    assert_eq!(sim.agent(AgentId(3)).unwrap().identities.len(), 3);

    assert_eq!(
        sim.apply(&Intervention::SetConfidence {
            agent_id: 42,
            value: 0.5
        }),
        Err(InterventionError::UnknownAgent(AgentId(42)))
    );
}

#[test]
fn test_halt_when_saturated() {
    let model = ModelConfig {
        num_nodes: 4,
        initial_sybil_nodes: 4,
        halt_when_saturated: true,
        ..ModelConfig::default()
    };
    let mut sim = Simulation::new(&model, 1).unwrap();
    assert!(sim.is_running());

    assert_eq!(sim.run_for(10), 1);
    assert!(!sim.is_running());
    assert_eq!(sim.tick(), 1);
}

#[test]
fn test_running_by_default_when_saturated() {
    let model = ModelConfig {
        num_nodes: 4,
        initial_sybil_nodes: 4,
        ..ModelConfig::default()
    };
    let mut sim = Simulation::new(&model, 1).unwrap();

    assert_eq!(sim.run_for(10), 10);
    assert!(sim.is_running());
}

#[test]
fn test_snapshot_matches_sample_path() {
    let sim = Simulation::from_graph(&ModelConfig::default(), graph(3, &[(0, 1), (1, 2)]), 0).unwrap();
    let mut generator = SnapshotGenerator::new(10);
    let snapshot = generate_snapshot(&sim, &mut generator, "simulation_start");
    let expected = fixtures::sample_snapshot();

    assert_eq!(snapshot.snapshot_id, expected.snapshot_id);
    assert_eq!(snapshot.nodes, expected.nodes);
    assert_eq!(snapshot.edges, expected.edges);
    assert_eq!(snapshot.metrics, expected.metrics);
}
