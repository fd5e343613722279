//! Shared utilities: bounded retry, random sources, period arithmetic, output naming.

pub mod math;
pub mod naming;
pub mod random;
pub mod retry;

pub use math::{gcd, lcm, lcm_all};
pub use naming::{derived_scenario_name, graph_file_name, scenario_file_name, topology_base_name};
pub use random::RandomSources;
pub use retry::{retry_bounded, Outcome};
