//! Active flow population.
//!
//! Flows live in clusters: groups created together around one hub end
//! device and removed together. The state tracks the clusters in creation
//! order, the total flow count and the next unused flow id.

use crate::graph::NodeId;
use crate::scenario::types::{Flow, FlowId};

/// Flows created together around one hub end device
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub hub: NodeId,
    pub flows: Vec<Flow>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// Active clusters of a running scenario
#[derive(Debug, Clone, Default)]
pub struct ScenarioState {
    clusters: Vec<Cluster>,
    flow_set_size: usize,
    next_flow_id: FlowId,
}

impl ScenarioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active flows across all clusters
    pub fn current_flow_count(&self) -> usize {
        self.flow_set_size
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// First id not yet handed out
    pub fn next_flow_id(&self) -> FlowId {
        self.next_flow_id
    }

    /// Add a cluster whose flow ids continue from [`Self::next_flow_id`]
    pub fn add_cluster(&mut self, cluster: Cluster) {
        self.flow_set_size += cluster.len();
        if let Some(max_id) = cluster.flows.iter().map(|f| f.flow_id).max() {
            self.next_flow_id = self.next_flow_id.max(max_id + 1);
        }
        self.clusters.push(cluster);
    }

    /// Index of the cluster holding the `flow_index`-th active flow when
    /// clusters are laid end to end. Sampling `flow_index` uniformly selects
    /// clusters proportionally to their size.
    pub fn cluster_index_for_flow(&self, flow_index: usize) -> Option<usize> {
        let mut accumulated = 0;
        for (index, cluster) in self.clusters.iter().enumerate() {
            accumulated += cluster.len();
            if accumulated > flow_index {
                return Some(index);
            }
        }
        None
    }

    /// Remove the cluster at `index` and return its flows
    pub fn remove_cluster_at(&mut self, index: usize) -> Vec<Flow> {
        let cluster = self.clusters.remove(index);
        self.flow_set_size -= cluster.len();
        cluster.flows
    }

    /// Keep the first `keep` flows of the cluster at `index`, remove and
    /// return the rest
    pub fn truncate_cluster_at(&mut self, index: usize, keep: usize) -> Vec<Flow> {
        let removed = self.clusters[index].flows.split_off(keep);
        self.flow_set_size -= removed.len();
        removed
    }

    /// Ids of all active flows, in cluster order
    pub fn active_flow_ids(&self) -> impl Iterator<Item = FlowId> + '_ {
        self.clusters
            .iter()
            .flat_map(|c| c.flows.iter().map(|f| f.flow_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::types::PackageSize;

    fn cluster(hub: NodeId, ids: std::ops::Range<FlowId>) -> Cluster {
        Cluster {
            hub,
            flows: ids
                .map(|id| Flow {
                    flow_id: id,
                    package_size: PackageSize::Exact(100),
                    period: 1000,
                    source: hub,
                    destination: hub + 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_add_tracks_size_and_ids() {
        let mut state = ScenarioState::new();
        state.add_cluster(cluster(10, 0..3));
        state.add_cluster(cluster(11, 3..5));
        assert_eq!(state.current_flow_count(), 5);
        assert_eq!(state.cluster_count(), 2);
        assert_eq!(state.next_flow_id(), 5);
    }

    #[test]
    fn test_cluster_index_for_flow_is_cumulative() {
        let mut state = ScenarioState::new();
        state.add_cluster(cluster(10, 0..3));
        state.add_cluster(cluster(11, 3..4));
        state.add_cluster(cluster(12, 4..6));
        let indices: Vec<_> = (0..6).map(|i| state.cluster_index_for_flow(i)).collect();
        assert_eq!(
            indices,
            vec![Some(0), Some(0), Some(0), Some(1), Some(2), Some(2)]
        );
        assert_eq!(state.cluster_index_for_flow(6), None);
    }

    #[test]
    fn test_remove_and_truncate() {
        let mut state = ScenarioState::new();
        state.add_cluster(cluster(10, 0..4));
        state.add_cluster(cluster(11, 4..6));

        let removed = state.truncate_cluster_at(0, 1);
        assert_eq!(removed.iter().map(|f| f.flow_id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(state.current_flow_count(), 3);

        let removed = state.remove_cluster_at(1);
        assert_eq!(removed.len(), 2);
        assert_eq!(state.active_flow_ids().collect::<Vec<_>>(), vec![0]);
        assert_eq!(state.current_flow_count(), 1);
        // ids are never reused
        assert_eq!(state.next_flow_id(), 6);
    }
}
