//! Output file naming.
//!
//! Both generators name their output after the inputs that produced it so a
//! directory of generated files stays self-describing.

use chrono::{DateTime, TimeZone};
use std::path::Path;

/// Timestamp format used in derived scenario names
pub const SCENARIO_TIMESTAMP_FORMAT: &str = "%Y_%m_%d-%H_%M";

/// File name of a generated topology: `graph_{generator}_{switches}_{edges}_{end_devices}.txt`.
///
/// An omitted end-device count is rendered as `None`.
pub fn graph_file_name(generator: &str, switches: u32, edges: u32, end_devices: Option<u32>) -> String {
    let end_devices = end_devices.map_or_else(|| "None".to_string(), |d| d.to_string());
    format!("graph_{}_{}_{}_{}.txt", generator, switches, edges, end_devices)
}

/// Base name of a topology file: the file name without directory and last extension
pub fn topology_base_name(network_path: &Path) -> String {
    network_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| network_path.to_string_lossy().into_owned())
}

/// Scenario name used when none is given: `{topologyBaseName}_{YYYY_MM_DD-HH_MM}`
pub fn derived_scenario_name<Tz>(network_path: &Path, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}",
        topology_base_name(network_path),
        now.format(SCENARIO_TIMESTAMP_FORMAT)
    )
}

/// File name of a generated scenario: `scenario_{name}.json`
pub fn scenario_file_name(name: &str) -> String {
    format!("scenario_{}.json", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_graph_file_name() {
        assert_eq!(graph_file_name("mesh", 3, 4, Some(2)), "graph_mesh_3_4_2.txt");
        assert_eq!(graph_file_name("even_random", 10, 9, None), "graph_even_random_10_9_None.txt");
    }

    #[test]
    fn test_topology_base_name() {
        assert_eq!(topology_base_name(Path::new("graphs/graph_tree_10_9_12.txt")), "graph_tree_10_9_12");
        assert_eq!(topology_base_name(Path::new("net.v2.txt")), "net.v2");
    }

    #[test]
    fn test_derived_scenario_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let name = derived_scenario_name(Path::new("/tmp/graph_ring_8_7_16.txt"), &now);
        assert_eq!(name, "graph_ring_8_7_16_2024_03_07-09_05");
        assert_eq!(scenario_file_name(&name), "scenario_graph_ring_8_7_16_2024_03_07-09_05.json");
    }
}
