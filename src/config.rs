use serde::{Deserialize, Serialize};

use crate::utils::math::lcm_all;

/// Bytes per unit of `equal_traffic` in fixed-rate mode
pub const BYTES_PER_TRAFFIC_UNIT: u64 = 125;

/// Scenario generation parameters, read from the `[generic]` section of the
/// scenario config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Flows present at time step 0
    pub number_of_initial_flows: usize,
    /// Total number of time steps, including step 0
    pub number_of_time_steps: usize,
    /// Minimum number of flows added per later step
    pub average_flow_add_per_step: usize,
    /// Minimum number of flows removed per later step
    pub average_flow_remove_per_step: usize,
    /// Candidate frame sizes in bytes
    pub frame_sizes: Vec<u64>,
    /// Candidate flow periods
    pub periods: Vec<u64>,
    /// Per-flow bit rate for fixed-rate mode; 0 disables it
    pub equal_traffic: u64,
    /// Candidate cluster sizes
    pub cluster_sizes: Vec<usize>,
    /// Path of the topology edge list
    pub network: String,
}

impl ScenarioConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number_of_time_steps == 0 {
            return Err(ValidationError::InvalidValue {
                key: "number_of_time_steps".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Self::validate_list("frame_sizes", &self.frame_sizes)?;
        Self::validate_list("periods", &self.periods)?;
        Self::validate_list("cluster_sizes", &self.cluster_sizes)?;
        self.hyper_cycle()?;
        self.total_traffic()?;

        if self.network.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                key: "network".to_string(),
                reason: "path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    fn validate_list<T: Copy + Default + PartialEq>(key: &str, values: &[T]) -> Result<(), ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::InvalidValue {
                key: key.to_string(),
                reason: "list cannot be empty".to_string(),
            });
        }
        if values.iter().any(|v| *v == T::default()) {
            return Err(ValidationError::InvalidValue {
                key: key.to_string(),
                reason: "entries must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Least common multiple of all periods
    pub fn hyper_cycle(&self) -> Result<u64, ValidationError> {
        lcm_all(&self.periods).ok_or_else(|| ValidationError::InvalidValue {
            key: "periods".to_string(),
            reason: "hyper-cycle of the periods exceeds the u64 range".to_string(),
        })
    }

    /// Bytes each flow sends per hyper-cycle in fixed-rate mode
    pub fn total_traffic(&self) -> Result<u64, ValidationError> {
        BYTES_PER_TRAFFIC_UNIT
            .checked_mul(self.equal_traffic)
            .ok_or_else(|| ValidationError::InvalidValue {
                key: "equal_traffic".to_string(),
                reason: format!("{} bytes per unit exceeds the u64 range", BYTES_PER_TRAFFIC_UNIT),
            })
    }

    /// True if per-flow frame sizes are derived from `equal_traffic`
    pub fn is_fixed_rate(&self) -> bool {
        self.equal_traffic > 0
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing configuration section [{0}]")]
    MissingSection(String),
    #[error("Missing configuration key '{0}'")]
    MissingKey(String),
    #[error("Invalid value '{value}' for key '{key}': {reason}")]
    UnparsableValue { key: String, value: String, reason: String },
    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
