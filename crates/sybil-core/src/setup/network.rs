//! Network Generation
//!
//! Erdős–Rényi random graphs for the agent population to live on.

use petgraph::graph::NodeIndex;
use rand::Rng;

use crate::components::network::NetworkGraph;
use crate::config::{edge_probability, ConfigError};

/// Build G(n, p) with `p = avg_degree / n` (saturating at 1).
///
/// Unordered pairs `i < j` are visited in a fixed order with one draw each,
/// so the graph is a pure function of the RNG state.
pub fn generate_network(
    num_nodes: usize,
    avg_degree: f64,
    rng: &mut impl Rng,
) -> Result<NetworkGraph, ConfigError> {
    if num_nodes == 0 {
        return Err(ConfigError::invalid("num_nodes", "must be at least 1"));
    }
    if !avg_degree.is_finite() || avg_degree < 0.0 {
        return Err(ConfigError::invalid(
            "avg_node_degree",
            format!("must be a non-negative number, got {}", avg_degree),
        ));
    }

    let p = edge_probability(num_nodes, avg_degree);
    let mut graph = NetworkGraph::with_capacity(num_nodes, 0);
    let nodes: Vec<NodeIndex> = (0..num_nodes).map(|i| graph.add_node(i)).collect();

    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if rng.gen::<f64>() < p {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    tracing::debug!(
        nodes = num_nodes,
        edges = graph.edge_count(),
        p,
        "generated network"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_node_ids_match_indices() {
        let mut rng = SmallRng::seed_from_u64(1);
        let graph = generate_network(25, 3.0, &mut rng).unwrap();

        assert_eq!(graph.node_count(), 25);
        for node in graph.node_indices() {
            assert_eq!(graph[node], node.index());
        }
    }

    #[test]
    fn test_saturated_probability_is_complete() {
        let mut rng = SmallRng::seed_from_u64(2);
        let graph = generate_network(6, 10.0, &mut rng).unwrap();
        assert_eq!(graph.edge_count(), 6 * 5 / 2);
    }

    #[test]
    fn test_zero_degree_has_no_edges() {
        let mut rng = SmallRng::seed_from_u64(3);
        let graph = generate_network(8, 0.0, &mut rng).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_simple_graph() {
        let mut rng = SmallRng::seed_from_u64(4);
        let graph = generate_network(40, 6.0, &mut rng).unwrap();

        for node in graph.node_indices() {
            assert!(!graph.contains_edge(node, node), "self-loop at {:?}", node);
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let edges = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let graph = generate_network(30, 4.0, &mut rng).unwrap();
            graph
                .raw_edges()
                .iter()
                .map(|e| (e.source().index(), e.target().index()))
                .collect::<Vec<_>>()
        };
        assert_eq!(edges(99), edges(99));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(generate_network(0, 3.0, &mut rng).is_err());
        assert!(generate_network(5, -2.0, &mut rng).is_err());
        assert!(generate_network(5, f64::INFINITY, &mut rng).is_err());
    }

    #[test]
    fn test_average_degree_is_close() {
        let mut rng = SmallRng::seed_from_u64(6);
        let graph = generate_network(400, 4.0, &mut rng).unwrap();
        let mean_degree = 2.0 * graph.edge_count() as f64 / 400.0;
        assert!((mean_degree - 4.0).abs() < 1.0, "mean degree {}", mean_degree);
    }
}
