//! Traffic scenario generator.
//!
//! Reads a scenario config and the topology it names, then writes a JSON
//! document of time steps with flow additions and removals.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use netscenario::config_loader;
use netscenario::edge_list;
use netscenario::scenario::ScenarioGenerator;
use netscenario::utils::{derived_scenario_name, scenario_file_name, RandomSources};

#[derive(Parser, Debug)]
#[command(name = "create-scenario")]
#[command(about = "Generate a time-stepped flow scenario for a network topology")]
#[command(version)]
struct Cli {
    /// Path to the config file used to create the scenario
    #[arg(short, long, default_value = "create_scenario.ini")]
    ini: PathBuf,

    /// Name of the output file, derived from the topology and time if omitted
    #[arg(short, long)]
    name: Option<String>,

    /// Directory the scenario is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed for the reproducible part of the randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Write indented JSON
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level)).init();

    let config = config_loader::load_config(&cli.ini)?;
    let network_path = config_loader::resolve_network_path(&cli.ini, &config);
    let topology = edge_list::load_topology(&network_path)?;
    let end_devices = topology.end_devices();
    log::info!(
        "Loaded {} nodes, {} end devices from {}",
        topology.node_count(),
        end_devices.len(),
        network_path.display()
    );

    let mut generator = ScenarioGenerator::new(config, end_devices, RandomSources::new(cli.seed))?;
    let document = generator.run().context("Failed to generate scenario")?;

    let name = cli
        .name
        .unwrap_or_else(|| derived_scenario_name(&network_path, &chrono::Local::now()));
    let json = if cli.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create output directory: {}", cli.output_dir.display()))?;
    let path = cli.output_dir.join(scenario_file_name(&name));
    fs::write(&path, json).with_context(|| format!("Failed to write scenario: {}", path.display()))?;

    log::info!("Scenario written to {}", path.display());
    if !generator.warnings().is_empty() {
        log::warn!("{} warning(s) during generation", generator.warnings().len());
    }
    Ok(())
}
