//! Network Resource
//!
//! The immutable interaction graph and the 1:1 binding of graph nodes to
//! agent entities.

use bevy_ecs::prelude::*;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Undirected graph whose node weight is the node id
pub type NetworkGraph = UnGraph<usize, ()>;

/// Resource: the graph plus the agent entity bound to each node
#[derive(Resource, Debug)]
pub struct Network {
    graph: NetworkGraph,
    /// Indexed by node index
    bindings: Vec<Option<Entity>>,
}

impl Network {
    pub fn new(graph: NetworkGraph) -> Self {
        let bindings = vec![None; graph.node_count()];
        Self { graph, bindings }
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node indices in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Every edge once, as `(source, target)` node ids
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Bind an agent to a node. Returns false if the node does not exist or
    /// already has an agent.
    pub fn bind(&mut self, node: NodeIndex, entity: Entity) -> bool {
        match self.bindings.get_mut(node.index()) {
            Some(slot) if slot.is_none() => {
                *slot = Some(entity);
                true
            }
            _ => false,
        }
    }

    pub fn agent_at(&self, node: NodeIndex) -> Option<Entity> {
        self.bindings.get(node.index()).copied().flatten()
    }

    /// Agent entities in node order
    pub fn bound_agents(&self) -> Vec<Entity> {
        self.bindings.iter().flatten().copied().collect()
    }

    pub fn is_fully_bound(&self) -> bool {
        self.bindings.iter().all(Option::is_some)
    }

    /// Adjacent node indices, in the order the graph stores them
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    /// Agents bound to the nodes adjacent to `node`
    pub fn neighbor_agents(&self, node: NodeIndex) -> Vec<Entity> {
        self.neighbors(node)
            .filter_map(|n| self.agent_at(n))
            .collect()
    }

    pub fn degree(&self, node: NodeIndex) -> usize {
        self.neighbors(node).count()
    }

    pub fn are_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.contains_edge(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: usize) -> NetworkGraph {
        let mut graph = NetworkGraph::new_undirected();
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();
        for pair in nodes.windows(2) {
            graph.add_edge(pair[0], pair[1], ());
        }
        graph
    }

    #[test]
    fn test_binding_is_one_to_one() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut network = Network::new(path_graph(2));
        assert!(!network.is_fully_bound());
        assert!(network.bind(NodeIndex::new(0), a));
        assert!(!network.bind(NodeIndex::new(0), b));
        assert!(!network.bind(NodeIndex::new(5), b));
        assert!(network.bind(NodeIndex::new(1), b));

        assert!(network.is_fully_bound());
        assert_eq!(network.agent_at(NodeIndex::new(0)), Some(a));
        assert_eq!(network.bound_agents(), vec![a, b]);
    }

    #[test]
    fn test_neighbors() {
        let mut world = World::new();
        let network = {
            let mut network = Network::new(path_graph(3));
            for node in 0..3 {
                let entity = world.spawn_empty().id();
                network.bind(NodeIndex::new(node), entity);
            }
            network
        };

        let middle = NodeIndex::new(1);
        assert_eq!(network.degree(middle), 2);
        assert_eq!(network.neighbor_agents(middle).len(), 2);
        assert_eq!(network.degree(NodeIndex::new(0)), 1);
        assert!(network.are_adjacent(NodeIndex::new(0), middle));
        assert!(!network.are_adjacent(NodeIndex::new(0), NodeIndex::new(2)));
        assert_eq!(network.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }
}
