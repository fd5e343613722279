//! # Netscenario - input generators for network scheduling simulations
//!
//! This library provides the two offline generators that produce synthetic
//! inputs for a time-sensitive network scheduling simulator.
//!
//! ## Overview
//!
//! - **Topologies**: a switch backbone (random, ring, tree, Waxman or grid)
//!   with end devices attached, written as a tab-separated edge list.
//! - **Scenarios**: a time-stepped sequence of flow additions and removals
//!   over a topology's end devices, written as JSON.
//!
//! The topology generator runs first; the scenario generator reads its output
//! file later. The two share no runtime state.
//!
//! ## Architecture
//!
//! - `graph`: in-memory undirected graph of switches and end devices
//! - `edge_list`: edge-list reader and writer
//! - `topology`: backbone builders, end-device attachment and the generator dispatcher
//! - `config`: scenario configuration structure and validation
//! - `config_loader`: INI/YAML configuration loading
//! - `scenario`: flow clusters, time-step generation and the output document
//! - `utils`: bounded retry, random sources, period arithmetic, file naming
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use netscenario::topology::{self, GeneratorKind, TopologyParams};
//! use netscenario::scenario::ScenarioGenerator;
//! use netscenario::utils::RandomSources;
//! use netscenario::{config_loader, edge_list};
//! use std::path::Path;
//!
//! let mut sources = RandomSources::new(None);
//! let params = TopologyParams::new(20, None, Some(40));
//! let (graph, _warnings) = topology::generate(GeneratorKind::Tree, &params, &mut sources)?.into_parts();
//! edge_list::write_edge_list(Path::new("graph_tree_20_19_40.txt"), &graph)?;
//!
//! let config = config_loader::load_config(Path::new("create_scenario.ini"))?;
//! let topology = edge_list::load_topology(Path::new(&config.network))?;
//! let mut generator = ScenarioGenerator::new(config, topology.end_devices(), sources)?;
//! let document = generator.run()?;
//! println!("{}", serde_json::to_string(&document)?);
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! Library modules return typed `thiserror` errors for invalid input.
//! Conditions that only degrade the result (a disconnected backbone after the
//! retry budget, a truncated cluster removal) are returned as warnings inside
//! [`utils::Outcome`] and logged; they never abort generation. The binaries
//! report errors through `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod edge_list;
pub mod graph;
pub mod scenario;
pub mod topology;
pub mod utils;
