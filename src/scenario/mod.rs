//! Traffic scenario generation.
//!
//! A scenario is a sequence of time steps over a loaded topology. Each step
//! lists the flows that leave and the flows that join the network. Flows are
//! created and removed in clusters sharing one hub end device.

pub mod generator;
pub mod state;
pub mod types;

pub use generator::{fixed_rate_package_size, ScenarioError, ScenarioGenerator, ScenarioWarning};
pub use state::{Cluster, ScenarioState};
pub use types::{ConfigInfo, Flow, FlowId, PackageSize, ScenarioDocument, TimeStep};
