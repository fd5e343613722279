//! Network topology generation.
//!
//! Builds a switch backbone for the selected [`GeneratorKind`] and attaches
//! end devices to it. Randomized backbones are retried until connected within
//! a fixed budget; if the budget runs out the last attempt is kept and the
//! outcome is marked degraded.

pub mod attachment;
pub mod generators;
pub mod types;

use log::{info, warn};

use crate::graph::{Graph, NodeId};
use crate::utils::random::RandomSources;
use crate::utils::retry::{retry_bounded, Outcome};

pub use attachment::Overflow;
pub use types::{GeneratorKind, TopologyError, TopologyParams, TopologyWarning};

/// Connectivity attempts for Erdős–Rényi backbones
pub const RANDOM_CONNECT_ATTEMPTS: usize = 3000;

/// Connectivity attempts for Waxman backbones
pub const WAXMAN_CONNECT_ATTEMPTS: usize = 10000;

/// Generated topology together with any degradation warnings
pub type TopologyOutcome = Outcome<Graph, TopologyWarning>;

/// Generate a topology.
///
/// Randomized backbones use the statistical source; end-device targets that
/// must not be replayable use the secure source.
pub fn generate(
    kind: GeneratorKind,
    params: &TopologyParams,
    sources: &mut RandomSources,
) -> Result<TopologyOutcome, TopologyError> {
    validate_params(kind, params)?;
    info!(
        "Generating '{}' topology: {} switches, edge parameter {}, {} end devices",
        kind, params.switches, params.edges, params.end_devices
    );

    let n = params.switches;
    let outcome = match kind {
        GeneratorKind::Random => {
            random_backbone(n, params.edges, sources).map(|mut graph| {
                attachment::attach_random(&mut graph, n, params.end_devices, sources.secure());
                graph
            })
        }
        GeneratorKind::EvenRandom => random_backbone(n, params.edges, sources).map(|mut graph| {
            attachment::attach_sequential(&mut graph, n, 1);
            graph
        }),
        GeneratorKind::Circle | GeneratorKind::Ring => {
            let mut graph = generators::circulant_graph(n, &[1, 2]);
            attachment::attach_random(&mut graph, n, params.end_devices, sources.secure());
            Outcome::Success(graph)
        }
        GeneratorKind::EvenCircle | GeneratorKind::EvenRing => {
            let mut graph = generators::circulant_graph(n, &[1, params.edges]);
            let per_switch = (params.end_devices / n).max(1);
            attachment::attach_modulo(&mut graph, n, per_switch);
            Outcome::Success(graph)
        }
        GeneratorKind::Tree => {
            let mut graph = generators::random_tree(n, sources.statistical());
            let warning = attachment::attach_to_leaves(
                &mut graph,
                n,
                params.end_devices,
                Overflow::Leaves(sources.statistical()),
            );
            Outcome::Success(graph).with_optional_warning(warning)
        }
        GeneratorKind::Waxman => {
            let (mut graph, mut warnings) = retry_bounded(
                WAXMAN_CONNECT_ATTEMPTS,
                || {
                    generators::waxman_graph(
                        n,
                        generators::WAXMAN_BETA,
                        generators::WAXMAN_ALPHA,
                        sources.statistical(),
                    )
                },
                Graph::is_connected,
                |attempts| TopologyWarning::Disconnected { attempts },
            )
            .into_parts();
            let warning = attachment::attach_to_leaves(
                &mut graph,
                n,
                params.end_devices,
                Overflow::AnySwitch(sources.secure()),
            );
            warnings.extend(warning);
            if warnings.is_empty() {
                Outcome::Success(graph)
            } else {
                Outcome::Degraded(graph, warnings)
            }
        }
        GeneratorKind::EvenMesh | GeneratorKind::EvenGrid => {
            let side = (f64::from(n)).sqrt().floor() as u32;
            Outcome::Success(mesh(side, side, params.end_devices))
        }
        GeneratorKind::Mesh | GeneratorKind::Grid => {
            Outcome::Success(mesh(n, params.edges, params.end_devices))
        }
    };

    for warning in outcome.warnings() {
        warn!("Topology '{}' degraded: {}", kind, warning);
    }
    info!(
        "Generated {} nodes and {} edges",
        outcome.value().node_count(),
        outcome.value().edge_count()
    );
    Ok(outcome)
}

fn validate_params(kind: GeneratorKind, params: &TopologyParams) -> Result<(), TopologyError> {
    match kind {
        GeneratorKind::Mesh | GeneratorKind::Grid => {
            if params.switches == 0 || params.edges == 0 {
                return Err(TopologyError::EmptyGrid {
                    rows: params.switches,
                    columns: params.edges,
                });
            }
        }
        GeneratorKind::Tree if params.switches < 2 => {
            return Err(TopologyError::TooFewSwitches {
                kind,
                required: 2,
                switches: params.switches,
            });
        }
        _ if params.switches == 0 => return Err(TopologyError::NoSwitches),
        _ => {}
    }
    if required_node_ids(kind, params).is_none() {
        return Err(TopologyError::TooManyNodes { kind });
    }
    Ok(())
}

/// Upper bound on node ids the generator hands out, `None` past `u32::MAX`
fn required_node_ids(kind: GeneratorKind, params: &TopologyParams) -> Option<NodeId> {
    let n = params.switches;
    let d = params.end_devices;
    match kind {
        GeneratorKind::Random | GeneratorKind::Circle | GeneratorKind::Ring => n.checked_add(d),
        GeneratorKind::EvenRandom => n.checked_mul(2),
        GeneratorKind::EvenCircle | GeneratorKind::EvenRing => {
            n.checked_mul((d / n).max(1))?.checked_add(n)
        }
        GeneratorKind::Tree | GeneratorKind::Waxman => n.checked_add(d.max(n)),
        GeneratorKind::EvenMesh | GeneratorKind::EvenGrid => {
            let side = (f64::from(n)).sqrt().floor() as u32;
            (side * side).checked_mul(d.checked_add(1)?)
        }
        GeneratorKind::Mesh | GeneratorKind::Grid => {
            n.checked_mul(params.edges)?.checked_mul(d.checked_add(1)?)
        }
    }
}

/// G(n, p) backbone retried until connected
fn random_backbone(n: u32, edges: u32, sources: &mut RandomSources) -> TopologyOutcome {
    let p = generators::edge_probability(n, edges);
    retry_bounded(
        RANDOM_CONNECT_ATTEMPTS,
        || generators::gnp_random_graph(n, p, sources.statistical()),
        Graph::is_connected,
        |attempts| TopologyWarning::Disconnected { attempts },
    )
}

fn mesh(rows: u32, columns: u32, per_switch: u32) -> Graph {
    let mut graph = generators::grid_graph(rows, columns);
    attachment::attach_sequential(&mut graph, rows * columns, per_switch);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(switches: u32, edges: Option<u32>, end_devices: Option<u32>) -> TopologyParams {
        TopologyParams::new(switches, edges, end_devices)
    }

    #[test]
    fn test_even_circle_four_switches_eight_devices() {
        let mut sources = RandomSources::new(Some(1));
        let graph = generate(GeneratorKind::EvenCircle, &params(4, None, Some(8)), &mut sources)
            .unwrap()
            .into_parts()
            .0;

        for switch in 0..4 {
            assert_eq!(graph.degree(switch), 4);
            assert_eq!(graph.neighbors(switch).filter(|&n| n >= 4).count(), 2);
        }
        assert_eq!((4..12).filter(|&d| graph.degree(d) == 1).count(), 8);
        assert_eq!(graph.edge_count(), 4 + 8);
    }

    #[test]
    fn test_even_circle_at_least_one_device_per_switch() {
        let mut sources = RandomSources::new(Some(1));
        let outcome = generate(GeneratorKind::EvenRing, &params(6, Some(2), Some(3)), &mut sources).unwrap();
        let graph = outcome.value();
        assert_eq!(graph.node_count(), 12);
        for switch in 0..6 {
            assert!(graph.contains_edge(switch, switch + 6));
        }
    }

    #[test]
    fn test_mesh_sizes() {
        let mut sources = RandomSources::new(Some(1));
        let graph = generate(GeneratorKind::Mesh, &params(3, Some(4), Some(2)), &mut sources)
            .unwrap()
            .into_parts()
            .0;
        let switch_edges = graph.edges().filter(|&(a, b)| a < 12 && b < 12).count();
        assert_eq!(switch_edges, 3 * 3 + 4 * 2);
        for switch in 0..12 {
            assert_eq!(graph.neighbors(switch).filter(|&n| n >= 12).count(), 2);
        }
    }

    #[test]
    fn test_even_mesh_uses_square_side() {
        let mut sources = RandomSources::new(Some(1));
        let graph = generate(GeneratorKind::EvenGrid, &params(10, None, Some(1)), &mut sources)
            .unwrap()
            .into_parts()
            .0;
        // floor(sqrt(10)) = 3
        assert_eq!(graph.node_count(), 9 + 9);
        assert_eq!(graph.edge_count(), 12 + 9);
    }

    #[test]
    fn test_even_random_one_device_per_switch() {
        let mut sources = RandomSources::new(Some(2));
        let graph = generate(GeneratorKind::EvenRandom, &params(8, Some(12), Some(30)), &mut sources)
            .unwrap()
            .into_parts()
            .0;
        for switch in 0..8 {
            assert!(graph.contains_edge(switch, switch + 8));
        }
        assert_eq!(graph.node_count(), 16);
    }

    #[test]
    fn test_complete_random_backbone_is_not_degraded() {
        let mut sources = RandomSources::new(Some(3));
        // p clamps to 1 so the first attempt is connected
        let outcome = generate(GeneratorKind::Random, &params(5, Some(100), Some(7)), &mut sources).unwrap();
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value().node_count(), 12);
    }

    #[test]
    fn test_empty_random_backbone_is_degraded() {
        let mut sources = RandomSources::new(Some(3));
        let outcome = generate(GeneratorKind::Random, &params(4, Some(0), Some(2)), &mut sources).unwrap();
        assert_eq!(
            outcome.warnings(),
            [TopologyWarning::Disconnected { attempts: RANDOM_CONNECT_ATTEMPTS }]
        );
        assert_eq!(outcome.value().node_count(), 6);
    }

    #[test]
    fn test_invalid_params() {
        let mut sources = RandomSources::new(Some(0));
        assert_eq!(
            generate(GeneratorKind::Circle, &params(0, None, None), &mut sources).unwrap_err(),
            TopologyError::NoSwitches
        );
        assert!(matches!(
            generate(GeneratorKind::Tree, &params(1, None, Some(1)), &mut sources),
            Err(TopologyError::TooFewSwitches { required: 2, .. })
        ));
        assert!(matches!(
            generate(GeneratorKind::Grid, &params(3, Some(0), Some(1)), &mut sources),
            Err(TopologyError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_node_ids_past_u32_are_rejected() {
        let mut sources = RandomSources::new(Some(0));
        assert_eq!(
            generate(GeneratorKind::Mesh, &params(70000, Some(70000), Some(0)), &mut sources).unwrap_err(),
            TopologyError::TooManyNodes { kind: GeneratorKind::Mesh }
        );
        assert_eq!(
            generate(GeneratorKind::Grid, &params(2, Some(2), Some(u32::MAX)), &mut sources).unwrap_err(),
            TopologyError::TooManyNodes { kind: GeneratorKind::Grid }
        );
        assert_eq!(
            generate(GeneratorKind::Circle, &params(10, None, Some(u32::MAX - 5)), &mut sources).unwrap_err(),
            TopologyError::TooManyNodes { kind: GeneratorKind::Circle }
        );
        assert_eq!(
            generate(GeneratorKind::EvenRing, &params(u32::MAX / 2 + 1, Some(2), Some(0)), &mut sources).unwrap_err(),
            TopologyError::TooManyNodes { kind: GeneratorKind::EvenRing }
        );
    }

    #[test]
    fn test_node_id_bound_accepts_exact_fit() {
        let p = params(4, Some(4), Some(3));
        assert_eq!(required_node_ids(GeneratorKind::Mesh, &p), Some(64));
        assert_eq!(required_node_ids(GeneratorKind::EvenCircle, &params(4, None, Some(8))), Some(12));
        assert_eq!(required_node_ids(GeneratorKind::Tree, &params(12, None, Some(3))), Some(24));
    }
}
