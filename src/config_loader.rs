//! Scenario configuration loading.
//!
//! The scenario config is an INI file whose `[generic]` section holds plain
//! integers, JSON lists and the topology path:
//!
//! ```ini
//! [generic]
//! number_of_initial_flows = 100
//! number_of_time_steps = 20
//! average_flow_add_per_step = 10
//! average_flow_remove_per_step = 10
//! frame_sizes = [100, 500, 1500]
//! periods = [500, 1000, 2000]
//! equal_traffic = 0
//! cluster_sizes = [1, 2, 4]
//! network = graph_tree_20_19_40.txt
//! ```
//!
//! Files ending in `.yaml` or `.yml` carry the same keys under a `generic:`
//! mapping.

use crate::config::{ScenarioConfig, ValidationError};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Section holding the scenario parameters
pub const GENERIC_SECTION: &str = "generic";

/// Load and validate a scenario configuration file
pub fn load_config(config_path: &Path) -> Result<ScenarioConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)
        .wrap_err_with(|| format!("Failed to read config file '{}'", config_path.display()))?;

    let is_yaml = config_path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");

    let config = if is_yaml {
        debug!("Parsing YAML configuration");
        parse_yaml_config(&content)?
    } else {
        debug!("Parsing INI configuration");
        parse_ini_config(&content)?
    };

    config.validate()?;
    Ok(config)
}

#[derive(Deserialize)]
struct YamlConfigFile {
    generic: ScenarioConfig,
}

/// Parse the YAML form of the configuration
pub fn parse_yaml_config(content: &str) -> Result<ScenarioConfig> {
    let file: YamlConfigFile = serde_yaml::from_str(content).wrap_err("Failed to parse YAML configuration")?;
    Ok(file.generic)
}

/// Parse the INI form of the configuration
pub fn parse_ini_config(content: &str) -> Result<ScenarioConfig, ValidationError> {
    let sections = parse_ini(content);
    let generic = sections
        .get(GENERIC_SECTION)
        .ok_or_else(|| ValidationError::MissingSection(GENERIC_SECTION.to_string()))?;
    let section = IniSection(generic);

    Ok(ScenarioConfig {
        number_of_initial_flows: section.parsed("number_of_initial_flows")?,
        number_of_time_steps: section.parsed("number_of_time_steps")?,
        average_flow_add_per_step: section.parsed("average_flow_add_per_step")?,
        average_flow_remove_per_step: section.parsed("average_flow_remove_per_step")?,
        frame_sizes: section.json_list("frame_sizes")?,
        periods: section.json_list("periods")?,
        equal_traffic: section.parsed("equal_traffic")?,
        cluster_sizes: section.json_list("cluster_sizes")?,
        network: section.string("network")?,
    })
}

/// Split INI text into sections of `key -> value`.
///
/// Keys are lower-cased, `=` and `:` both separate key and value, and lines
/// starting with `#` or `;` are comments. Keys before the first section
/// header are dropped.
pub fn parse_ini(content: &str) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let Some(section) = current.as_ref() else {
            continue;
        };
        if let Some(pos) = line.find(['=', ':']) {
            let key = line[..pos].trim().to_lowercase();
            let value = line[pos + 1..].trim().to_string();
            if let Some(entries) = sections.get_mut(section) {
                entries.insert(key, value);
            }
        }
    }

    sections
}

struct IniSection<'a>(&'a BTreeMap<String, String>);

impl IniSection<'_> {
    fn string(&self, key: &str) -> Result<String, ValidationError> {
        self.0
            .get(key)
            .cloned()
            .ok_or_else(|| ValidationError::MissingKey(key.to_string()))
    }

    fn parsed<T>(&self, key: &str) -> Result<T, ValidationError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.string(key)?;
        value.parse().map_err(|e: T::Err| ValidationError::UnparsableValue {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })
    }

    fn json_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, ValidationError> {
        let value = self.string(key)?;
        serde_json::from_str(&value).map_err(|e| ValidationError::UnparsableValue {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })
    }
}

/// Resolve the topology path of a configuration.
///
/// Paths are used as given if they exist; otherwise a relative path is
/// looked up next to the config file.
pub fn resolve_network_path(config_path: &Path, config: &ScenarioConfig) -> PathBuf {
    let network = PathBuf::from(&config.network);
    if network.exists() || network.is_absolute() {
        return network;
    }

    match config_path.parent() {
        Some(dir) if dir.join(&network).exists() => {
            let resolved = dir.join(&network);
            debug!("Resolved network path {:?} relative to config: {:?}", network, resolved);
            resolved
        }
        _ => network,
    }
}
