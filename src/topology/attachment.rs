//! End-device attachment.
//!
//! End devices are appended to a switch backbone with ids continuing from the
//! switch count, each with a single link. The strategies differ in how the
//! target switch is chosen:
//!
//! - **Random**: uniformly among all switches
//! - **Modulo**: device `d` goes to switch `d mod n`
//! - **Sequential**: a fixed number of devices per switch, switch by switch
//! - **Leaves**: one device per leaf switch, overflow spread afterwards

use log::{debug, warn};
use rand::RngCore;

use crate::graph::{Graph, NodeId};
use crate::topology::types::TopologyWarning;
use crate::utils::random::pick_index;

/// Attach `count` end devices, each to a switch drawn uniformly from `0..switches`
pub fn attach_random(graph: &mut Graph, switches: u32, count: u32, rng: &mut dyn RngCore) {
    for i in 0..count {
        let device = switches + i;
        let switch = pick_index(rng, switches as usize) as NodeId;
        graph.add_edge(switch, device);
    }
    debug!("Attached {} end devices to random switches", count);
}

/// Attach `switches * per_switch` end devices, device `d` linked to switch `d mod switches`
pub fn attach_modulo(graph: &mut Graph, switches: u32, per_switch: u32) {
    for i in 0..switches * per_switch {
        let device = switches + i;
        graph.add_edge(device % switches, device);
    }
}

/// Attach exactly `per_switch` end devices to every switch, numbered switch by switch
pub fn attach_sequential(graph: &mut Graph, switches: u32, per_switch: u32) {
    let mut device = switches;
    for switch in 0..switches {
        for _ in 0..per_switch {
            graph.add_edge(switch, device);
            device += 1;
        }
    }
}

/// Where devices beyond the one-per-leaf go
pub enum Overflow<'a> {
    /// Uniformly among the leaf switches
    Leaves(&'a mut dyn RngCore),
    /// Uniformly among all switches
    AnySwitch(&'a mut dyn RngCore),
}

/// Attach one end device to every leaf switch of the backbone, then the
/// remaining devices according to `overflow`.
///
/// If the backbone has more leaves than `end_devices`, every leaf still gets
/// its device and a [`TopologyWarning::LeafShortfall`] is returned. Overflow
/// devices are dropped if the chosen pool is empty.
pub fn attach_to_leaves(
    graph: &mut Graph,
    switches: u32,
    end_devices: u32,
    overflow: Overflow<'_>,
) -> Option<TopologyWarning> {
    let leaves: Vec<NodeId> = graph.leaves().into_iter().filter(|&n| n < switches).collect();

    let warning = if leaves.len() > end_devices as usize {
        debug!("{} leaf switches for {} requested end devices", leaves.len(), end_devices);
        Some(TopologyWarning::LeafShortfall {
            leaves: leaves.len(),
            end_devices,
        })
    } else {
        None
    };

    for (i, &leaf) in leaves.iter().enumerate() {
        graph.add_edge(leaf, switches + i as u32);
    }

    let first_overflow = leaves.len() as u32;
    let (pool, rng): (Vec<NodeId>, &mut dyn RngCore) = match overflow {
        Overflow::Leaves(rng) => (leaves, rng),
        Overflow::AnySwitch(rng) => ((0..switches).collect(), rng),
    };

    if first_overflow < end_devices && pool.is_empty() {
        warn!("No switch available for {} overflow end devices", end_devices - first_overflow);
        return warning;
    }

    for i in first_overflow..end_devices {
        let target = pool[pick_index(rng, pool.len())];
        graph.add_edge(target, switches + i);
    }

    warning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::generators::{circulant_graph, grid_graph};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn path_graph(n: u32) -> Graph {
        let mut graph = Graph::with_nodes(n);
        for i in 1..n {
            graph.add_edge(i - 1, i);
        }
        graph
    }

    #[test]
    fn test_attach_random_devices_have_degree_one() {
        let mut graph = circulant_graph(5, &[1, 2]);
        let mut rng = StdRng::seed_from_u64(3);
        attach_random(&mut graph, 5, 12, &mut rng);
        for device in 5..17 {
            assert_eq!(graph.degree(device), 1);
            assert!(graph.neighbors(device).all(|s| s < 5));
        }
    }

    #[test]
    fn test_attach_modulo() {
        let mut graph = circulant_graph(4, &[1, 3]);
        attach_modulo(&mut graph, 4, 2);
        assert_eq!(graph.edge_count(), 4 + 8);
        assert!(graph.contains_edge(0, 4));
        assert!(graph.contains_edge(0, 8));
        assert!(graph.contains_edge(3, 11));
    }

    #[test]
    fn test_attach_sequential() {
        let mut graph = grid_graph(2, 2);
        attach_sequential(&mut graph, 4, 3);
        assert!(graph.contains_edge(0, 4));
        assert!(graph.contains_edge(0, 6));
        assert!(graph.contains_edge(1, 7));
        assert!(graph.contains_edge(3, 15));
        assert_eq!(graph.node_count(), 16);
    }

    #[test]
    fn test_leaves_get_one_device_each_then_overflow() {
        let mut graph = path_graph(4);
        let mut rng = StdRng::seed_from_u64(11);
        let warning = attach_to_leaves(&mut graph, 4, 6, Overflow::Leaves(&mut rng));
        assert!(warning.is_none());

        assert!(graph.contains_edge(0, 4));
        assert!(graph.contains_edge(3, 5));
        for device in 6..10 {
            let target: Vec<_> = graph.neighbors(device).collect();
            assert_eq!(target.len(), 1);
            assert!(target[0] == 0 || target[0] == 3);
        }
    }

    #[test]
    fn test_leaf_shortfall_still_attaches_every_leaf() {
        let mut graph = path_graph(3);
        let mut rng = StdRng::seed_from_u64(0);
        let warning = attach_to_leaves(&mut graph, 3, 1, Overflow::AnySwitch(&mut rng));
        assert_eq!(
            warning,
            Some(TopologyWarning::LeafShortfall { leaves: 2, end_devices: 1 })
        );
        assert_eq!(graph.degree(3), 1);
        assert_eq!(graph.degree(4), 1);
        assert_eq!(graph.node_count(), 5);
    }
}
