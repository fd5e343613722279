//! Scenario document types.
//!
//! Field names on the wire follow the format consumed by the scheduling
//! simulator (`flowID`, `package size`, `removeFlows`, `addFlows`).

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::graph::NodeId;

/// Identifier of a flow, unique over a whole scenario
pub type FlowId = u64;

/// Frame size of a flow.
///
/// Fixed-rate mode can derive sizes that are not whole numbers; those are
/// kept as floats instead of being truncated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageSize {
    Exact(u64),
    Fractional(f64),
}

/// A periodic traffic demand between two end devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(rename = "flowID")]
    pub flow_id: FlowId,
    #[serde(rename = "package size")]
    pub package_size: PackageSize,
    pub period: u64,
    pub source: NodeId,
    pub destination: NodeId,
}

/// Changes to the flow population at one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStep {
    pub time: usize,
    #[serde(rename = "removeFlows")]
    pub remove_flows: Vec<FlowId>,
    #[serde(rename = "addFlows")]
    pub add_flows: Vec<Flow>,
}

/// Echo of the generation parameters stored alongside the time steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub number_of_time_steps: usize,
    pub number_of_initial_flows: usize,
    pub flow_add: usize,
    pub flow_remove: usize,
    pub package_sizes: Vec<u64>,
    pub hyper_cycle: u64,
    pub equal_traffic: u64,
    pub cluster_sizes: Vec<usize>,
    pub network_path: String,
    pub periods: Vec<u64>,
}

impl ConfigInfo {
    /// Echo `config` together with its already computed hyper-cycle
    pub fn new(config: &ScenarioConfig, hyper_cycle: u64) -> Self {
        Self {
            number_of_time_steps: config.number_of_time_steps,
            number_of_initial_flows: config.number_of_initial_flows,
            flow_add: config.average_flow_add_per_step,
            flow_remove: config.average_flow_remove_per_step,
            package_sizes: config.frame_sizes.clone(),
            hyper_cycle,
            equal_traffic: config.equal_traffic,
            cluster_sizes: config.cluster_sizes.clone(),
            network_path: config.network.clone(),
            periods: config.periods.clone(),
        }
    }
}

/// Complete generated scenario, replayable without the original config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    pub time_steps: Vec<TimeStep>,
    pub config_info: ConfigInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flow_wire_format() {
        let flow = Flow {
            flow_id: 7,
            package_size: PackageSize::Exact(625),
            period: 2,
            source: 10,
            destination: 12,
        };
        assert_eq!(
            serde_json::to_value(&flow).unwrap(),
            json!({"flowID": 7, "package size": 625, "period": 2, "source": 10, "destination": 12})
        );
    }

    #[test]
    fn test_fractional_package_size() {
        let value = serde_json::to_value(PackageSize::Fractional(312.5)).unwrap();
        assert_eq!(value, json!(312.5));
        let parsed: PackageSize = serde_json::from_value(json!(1250)).unwrap();
        assert_eq!(parsed, PackageSize::Exact(1250));
    }

    #[test]
    fn test_time_step_keys() {
        let step = TimeStep {
            time: 3,
            remove_flows: vec![1, 2],
            add_flows: vec![],
        };
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({"time": 3, "removeFlows": [1, 2], "addFlows": []})
        );
    }
}
