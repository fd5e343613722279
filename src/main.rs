use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use netscenario::edge_list::write_edge_list;
use netscenario::topology::{self, GeneratorKind, TopologyParams};
use netscenario::utils::{graph_file_name, RandomSources};

/// Generate a network topology of switches and end devices as an edge list
#[derive(Parser, Debug)]
#[command(name = "create-network-graph", author, version, about, long_about = None)]
struct Args {
    /// Graph generator to be used
    #[arg(short = 'g', long = "graphGenerator", value_enum)]
    graph_generator: GeneratorKind,

    /// Number of switches/bridges in the graph
    #[arg(short, long)]
    switches: u32,

    /// Number of end devices (with degree 1) in the graph or per switch
    #[arg(short = 'd', long = "end_devices")]
    end_devices: Option<u32>,

    /// Number of edges/links between switches, or a second dimension, depending on the generator
    #[arg(short, long)]
    edges: Option<u32>,

    /// Directory the edge list is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed for the reproducible part of the randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let params = TopologyParams::new(args.switches, args.edges, args.end_devices);
    let mut sources = RandomSources::new(args.seed);

    let outcome = topology::generate(args.graph_generator, &params, &mut sources)
        .wrap_err("Failed to generate topology")?;
    if outcome.is_degraded() {
        warn!("Writing best-effort topology with {} warning(s)", outcome.warnings().len());
    }
    let (graph, _) = outcome.into_parts();

    fs::create_dir_all(&args.output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", args.output_dir.display()))?;
    let path = args.output_dir.join(graph_file_name(
        args.graph_generator.as_str(),
        params.switches,
        params.edges,
        args.end_devices,
    ));

    info!("Write to {:?}", path);
    write_edge_list(&path, &graph)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from([
            "create-network-graph",
            "--graphGenerator", "even_circle",
            "--switches", "4",
            "--end_devices", "8",
        ]);

        assert_eq!(args.graph_generator, GeneratorKind::EvenCircle);
        assert_eq!(args.switches, 4);
        assert_eq!(args.end_devices, Some(8));
        assert_eq!(args.edges, None);
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from(["create-network-graph", "-g", "mesh", "-s", "3", "-e", "4", "-d", "2"]);
        assert_eq!(args.graph_generator, GeneratorKind::Mesh);
        assert_eq!(args.edges, Some(4));
    }

    #[test]
    fn test_generator_is_required() {
        assert!(Args::try_parse_from(["create-network-graph", "--switches", "4"]).is_err());
        assert!(Args::try_parse_from(["create-network-graph", "-g", "hexagon", "-s", "4"]).is_err());
    }
}
