//! Topology type definitions.
//!
//! Generator kinds selectable on the command line, their sizing parameters,
//! and the warnings emitted when a topology had to be accepted as a best
//! effort.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Strategy used to build the switch backbone and attach end devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// Erdős–Rényi backbone, end devices at random switches
    #[value(name = "random")]
    Random,
    /// Erdős–Rényi backbone, one end device per switch
    #[value(name = "even_random")]
    EvenRandom,
    /// Circulant backbone with offsets {1, 2}, end devices at random switches
    #[value(name = "circle")]
    Circle,
    /// Alias of `circle`
    #[value(name = "ring")]
    Ring,
    /// Circulant backbone with offsets {1, edges}, equal devices per switch
    #[value(name = "even_circle")]
    EvenCircle,
    /// Alias of `even_circle`
    #[value(name = "even_ring")]
    EvenRing,
    /// Uniform random labeled tree, end devices on the leaves
    #[value(name = "tree")]
    Tree,
    /// Waxman geometric random graph
    #[value(name = "waxman")]
    Waxman,
    /// Square grid of side floor(sqrt(switches))
    #[value(name = "even_mesh")]
    EvenMesh,
    /// Alias of `even_mesh`
    #[value(name = "even_grid")]
    EvenGrid,
    /// Rectangular grid of switches x edges
    #[value(name = "mesh")]
    Mesh,
    /// Alias of `mesh`
    #[value(name = "grid")]
    Grid,
}

impl GeneratorKind {
    /// Name as used on the command line and in output file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::EvenRandom => "even_random",
            Self::Circle => "circle",
            Self::Ring => "ring",
            Self::EvenCircle => "even_circle",
            Self::EvenRing => "even_ring",
            Self::Tree => "tree",
            Self::Waxman => "waxman",
            Self::EvenMesh => "even_mesh",
            Self::EvenGrid => "even_grid",
            Self::Mesh => "mesh",
            Self::Grid => "grid",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sizing parameters shared by all generators.
///
/// `edges` and `end_devices` are interpreted per generator: an edge budget
/// for `random`, the second circulant offset for `even_circle`, the second
/// grid dimension for `mesh`, and a total or per-switch device count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyParams {
    pub switches: u32,
    pub edges: u32,
    pub end_devices: u32,
}

impl TopologyParams {
    /// Parameters with the edge parameter defaulting to `switches - 1`
    pub fn new(switches: u32, edges: Option<u32>, end_devices: Option<u32>) -> Self {
        Self {
            switches,
            edges: edges.unwrap_or_else(|| switches.saturating_sub(1)),
            end_devices: end_devices.unwrap_or(0),
        }
    }
}

/// Conditions under which a generated topology was accepted as a best effort
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyWarning {
    /// No connected backbone was found within the retry budget
    Disconnected { attempts: usize },
    /// More leaf switches than requested end devices; every leaf still got one
    LeafShortfall { leaves: usize, end_devices: u32 },
}

impl fmt::Display for TopologyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { attempts } => {
                write!(f, "graph is not connected after {} attempts", attempts)
            }
            Self::LeafShortfall { leaves, end_devices } => write!(
                f,
                "{} leaf switches but only {} end devices requested; attached one device per leaf, exceeding the requested count",
                leaves, end_devices
            ),
        }
    }
}

/// Invalid sizing parameters
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("At least one switch is required")]
    NoSwitches,

    #[error("Generator '{kind}' requires at least {required} switches, got {switches}")]
    TooFewSwitches {
        kind: GeneratorKind,
        required: u32,
        switches: u32,
    },

    #[error("Grid of {rows}x{columns} switches has no nodes")]
    EmptyGrid { rows: u32, columns: u32 },

    #[error("Generator '{kind}' would need more node ids than fit in u32")]
    TooManyNodes { kind: GeneratorKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_names_round_trip() {
        for kind in GeneratorKind::value_variants() {
            let parsed = GeneratorKind::from_str(kind.as_str(), false).unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn test_params_default_edges() {
        let params = TopologyParams::new(10, None, None);
        assert_eq!(params.edges, 9);
        assert_eq!(params.end_devices, 0);
        assert_eq!(TopologyParams::new(0, None, Some(3)).edges, 0);
    }

    #[test]
    fn test_warning_messages() {
        let warning = TopologyWarning::Disconnected { attempts: 3000 };
        assert_eq!(warning.to_string(), "graph is not connected after 3000 attempts");

        let warning = TopologyWarning::LeafShortfall { leaves: 3, end_devices: 1 };
        assert_eq!(
            warning.to_string(),
            "3 leaf switches but only 1 end devices requested; attached one device per leaf, exceeding the requested count"
        );
    }
}
