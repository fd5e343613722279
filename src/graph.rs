//! In-memory network graph.
//!
//! Undirected simple graph over integer node ids. Switches use the ids
//! `0..switch_count`, end devices are numbered from `switch_count` upwards and
//! have exactly one incident edge.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Identifier of a switch or end device
pub type NodeId = u32;

/// Undirected graph without self-loops or parallel edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with the isolated nodes `0..count`
    pub fn with_nodes(count: u32) -> Self {
        let mut graph = Self::new();
        for node in 0..count {
            graph.add_node(node);
        }
        graph
    }

    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
    }

    /// Add the undirected edge `a - b`, creating missing nodes.
    ///
    /// Self-loops and already present edges are ignored. Returns true if the
    /// edge was new.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        inserted
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(&a).is_some_and(|n| n.contains(&b))
    }

    /// Neighbours of `node`, ascending. Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&node).into_iter().flat_map(|n| n.iter().copied())
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeSet::len)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Node ids, ascending
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Every edge once as `(low, high)`, ordered by the low endpoint first
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().flat_map(|(&a, neighbours)| {
            neighbours
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Nodes with exactly one neighbour, ascending
    pub fn leaves(&self) -> Vec<NodeId> {
        self.adjacency
            .iter()
            .filter(|(_, neighbours)| neighbours.len() == 1)
            .map(|(&node, _)| node)
            .collect()
    }

    /// Neighbour sets keyed by node, the form produced by the edge-list loader
    pub fn neighbor_sets(&self) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
        self.adjacency.clone()
    }

    /// True if every node is reachable from every other node.
    ///
    /// A graph without nodes is not considered connected.
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.adjacency.keys().next() else {
            return false;
        };

        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for next in self.neighbors(node) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == self.adjacency.len()
    }
}
