//! Switch backbone builders.
//!
//! Each builder returns a graph over the switches `0..n` only; end devices
//! are attached afterwards by [`crate::topology::attachment`].

use std::collections::BTreeSet;

use rand::{Rng, RngCore};

use crate::graph::{Graph, NodeId};

/// Default Waxman model parameters
pub const WAXMAN_BETA: f64 = 0.4;
pub const WAXMAN_ALPHA: f64 = 0.1;

/// Erdős–Rényi G(n, p): every unordered switch pair is linked with probability `p`
pub fn gnp_random_graph(n: u32, p: f64, rng: &mut dyn RngCore) -> Graph {
    let mut graph = Graph::with_nodes(n);
    if p <= 0.0 {
        return graph;
    }
    for a in 0..n {
        for b in (a + 1)..n {
            if p >= 1.0 || rng.gen_bool(p) {
                graph.add_edge(a, b);
            }
        }
    }
    graph
}

/// Edge probability giving an expected `edges` links among `n` switches, `2m / n²`
pub fn edge_probability(n: u32, edges: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (2.0 * f64::from(edges) / f64::from(n).powi(2)).min(1.0)
}

/// Circulant graph: switch `i` links to `i ± o (mod n)` for every offset `o`.
///
/// Offsets that wrap onto the switch itself or onto an existing neighbour add
/// nothing.
pub fn circulant_graph(n: u32, offsets: &[u32]) -> Graph {
    let mut graph = Graph::with_nodes(n);
    if n == 0 {
        return graph;
    }
    for i in 0..n {
        for &offset in offsets {
            let offset = offset % n;
            graph.add_edge(i, (i + offset) % n);
            graph.add_edge(i, (i + n - offset) % n);
        }
    }
    graph
}

/// Uniformly random labeled tree on `n` switches, decoded from a random Prüfer sequence
pub fn random_tree(n: u32, rng: &mut dyn RngCore) -> Graph {
    let mut graph = Graph::with_nodes(n);
    if n < 2 {
        return graph;
    }
    if n == 2 {
        graph.add_edge(0, 1);
        return graph;
    }

    let sequence: Vec<NodeId> = (0..n - 2).map(|_| rng.gen_range(0..n)).collect();
    let mut remaining = vec![1usize; n as usize];
    for &node in &sequence {
        remaining[node as usize] += 1;
    }

    let mut leaves: BTreeSet<NodeId> = (0..n).filter(|&v| remaining[v as usize] == 1).collect();
    for &node in &sequence {
        let Some(leaf) = leaves.pop_first() else {
            break;
        };
        graph.add_edge(leaf, node);
        remaining[node as usize] -= 1;
        if remaining[node as usize] == 1 {
            leaves.insert(node);
        }
    }

    let last: Vec<NodeId> = leaves.into_iter().collect();
    if let [a, b] = last[..] {
        graph.add_edge(a, b);
    }
    graph
}

/// Waxman random geometric graph on `n` switches placed uniformly in the unit square.
///
/// Each pair `(u, v)` is linked with probability `beta * exp(-d(u, v) / (alpha * L))`
/// where `L` is the largest pairwise distance.
pub fn waxman_graph(n: u32, beta: f64, alpha: f64, rng: &mut dyn RngCore) -> Graph {
    let mut graph = Graph::with_nodes(n);
    let positions: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

    let distance = |a: usize, b: usize| {
        let (ax, ay) = positions[a];
        let (bx, by) = positions[b];
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    };

    let mut max_distance = 0.0f64;
    for a in 0..positions.len() {
        for b in (a + 1)..positions.len() {
            max_distance = max_distance.max(distance(a, b));
        }
    }
    if max_distance == 0.0 {
        return graph;
    }

    for a in 0..positions.len() {
        for b in (a + 1)..positions.len() {
            let p = (beta * (-distance(a, b) / (alpha * max_distance)).exp()).clamp(0.0, 1.0);
            if rng.gen_bool(p) {
                graph.add_edge(a as NodeId, b as NodeId);
            }
        }
    }
    graph
}

/// Rectangular grid of `rows x columns` switches with 4-neighbour links and no wraparound.
///
/// Switches are numbered row by row.
pub fn grid_graph(rows: u32, columns: u32) -> Graph {
    let mut graph = Graph::with_nodes(rows * columns);
    let mut node = 0;
    for row in 0..rows {
        for column in 0..columns {
            if column + 1 < columns {
                graph.add_edge(node, node + 1);
            }
            if row + 1 < rows {
                graph.add_edge(node, node + columns);
            }
            node += 1;
        }
    }
    graph
}
