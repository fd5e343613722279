//! Edge-list topology files.
//!
//! A topology file holds one edge per line as `source<TAB>destination`.
//! The reader also accepts space-separated pairs, skips comment lines starting
//! with `#` or `%` and ignores lines too short to hold an edge. Columns past
//! the second are ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::graph::{Graph, NodeId};

/// Errors that can occur while reading or writing an edge list
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read topology file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write topology file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid edge on line {line}: '{content}'")]
    InvalidLine { line: usize, content: String },
}

/// Adjacency structure of a loaded topology.
///
/// Neighbour lists keep one entry per edge line, so parallel edges show up as
/// repeated neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Topology {
    fn link(&mut self, a: NodeId, b: NodeId) {
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    /// Raw neighbour list of `node`, one entry per incident edge line
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Deduplicated neighbour sets keyed by node
    pub fn neighbor_sets(&self) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
        self.adjacency
            .iter()
            .map(|(&node, neighbours)| (node, neighbours.iter().copied().collect()))
            .collect()
    }

    /// Nodes with exactly one distinct neighbour, ascending.
    ///
    /// A node joined to the same neighbour by several edge lines counts as an
    /// end device as well.
    pub fn end_devices(&self) -> Vec<NodeId> {
        self.adjacency
            .iter()
            .filter(|(_, neighbours)| {
                let distinct: BTreeSet<_> = neighbours.iter().collect();
                distinct.len() == 1
            })
            .map(|(&node, _)| node)
            .collect()
    }
}

/// Parse edge-list text into a [`Topology`]
pub fn parse_edge_list(content: &str) -> Result<Topology, LoadError> {
    let mut topology = Topology::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.starts_with('#') || line.starts_with('%') || line.len() < 3 {
            continue;
        }

        let separator = if line.contains('\t') { '\t' } else { ' ' };
        let mut fields = line.split(separator).map(str::trim);
        let invalid = || LoadError::InvalidLine {
            line: index + 1,
            content: line.to_string(),
        };

        let a = fields.next().and_then(|f| f.parse::<NodeId>().ok()).ok_or_else(invalid)?;
        let b = fields.next().and_then(|f| f.parse::<NodeId>().ok()).ok_or_else(invalid)?;
        topology.link(a, b);
    }

    Ok(topology)
}

/// Load a topology file from disk
pub fn load_topology(path: &Path) -> Result<Topology, LoadError> {
    info!("Loading topology from: {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let topology = parse_edge_list(&content)?;
    debug!("Loaded {} nodes from {:?}", topology.node_count(), path);
    Ok(topology)
}

/// Render a graph as edge-list text, one `a\tb` line per edge
pub fn to_edge_list(graph: &Graph) -> String {
    let mut out = String::new();
    for (a, b) in graph.edges() {
        let _ = writeln!(out, "{}\t{}", a, b);
    }
    out
}

/// Write a graph to `path` in edge-list form
pub fn write_edge_list(path: &Path, graph: &Graph) -> Result<(), LoadError> {
    fs::write(path, to_edge_list(graph)).map_err(|source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} edges to {:?}", graph.edge_count(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_short_lines() {
        let text = "# comment\n% other comment\n\n0\t1\n1\t2\r\n1\t3\n";
        let topology = parse_edge_list(text).unwrap();
        assert_eq!(topology.node_count(), 4);
        assert_eq!(topology.neighbors(1), &[0, 2, 3]);
        assert_eq!(topology.end_devices(), vec![0, 2, 3]);
    }

    #[test]
    fn test_parse_space_separated() {
        let topology = parse_edge_list("0 1\n1 2 0.5\n").unwrap();
        assert_eq!(topology.neighbors(1), &[0, 2]);
    }

    #[test]
    fn test_parallel_edges_count_as_end_device() {
        // node 2 has two edge lines to switch 0 but one distinct neighbour
        let topology = parse_edge_list("0\t1\n0\t2\n0\t2\n1\t3\n").unwrap();
        assert_eq!(topology.neighbors(2), &[0, 0]);
        assert!(topology.end_devices().contains(&2));
    }

    #[test]
    fn test_invalid_line_reports_position() {
        let err = parse_edge_list("0\t1\nfoo\tbar\n").unwrap_err();
        match err {
            LoadError::InvalidLine { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "foo\tbar");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_round_trip_through_text() {
        let mut graph = Graph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(0, 3);
        graph.add_edge(2, 4);

        let text = to_edge_list(&graph);
        assert_eq!(text, "0\t1\n0\t3\n1\t2\n2\t4\n");

        let topology = parse_edge_list(&text).unwrap();
        assert_eq!(topology.neighbor_sets(), graph.neighbor_sets());
    }

    #[test]
    fn test_write_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.txt");

        let mut graph = Graph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        write_edge_list(&path, &graph).unwrap();

        let topology = load_topology(&path).unwrap();
        assert_eq!(topology.neighbor_sets(), graph.neighbor_sets());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_topology(Path::new("/nonexistent/graph.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
