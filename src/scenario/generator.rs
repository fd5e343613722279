//! Time-stepped scenario generation.
//!
//! Step 0 fills the network with `number_of_initial_flows` flows. Every later
//! step first removes whole clusters until at least
//! `average_flow_remove_per_step` flows are gone, then adds new clusters until
//! at least `average_flow_add_per_step` flows were added.
//!
//! Clusters to remove are sampled proportionally to their size. If no
//! sampled cluster fits the outstanding removal budget within
//! [`REMOVAL_RESAMPLE_LIMIT`] re-samples, the last one is cut down instead so
//! that every step makes progress.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info, warn};

use crate::config::{ScenarioConfig, ValidationError};
use crate::graph::NodeId;
use crate::scenario::state::{Cluster, ScenarioState};
use crate::scenario::types::{ConfigInfo, Flow, FlowId, PackageSize, ScenarioDocument, TimeStep};
use crate::utils::random::{coin_flip, pick_index, RandomSources};
use crate::utils::retry::{retry_bounded, Outcome};

/// Re-samples allowed when looking for a cluster that fits the removal budget
pub const REMOVAL_RESAMPLE_LIMIT: usize = 1000;

/// Errors that abort scenario generation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("No configured cluster size fits the remaining budget of {remaining} flows (cluster sizes: {sizes:?})")]
    NoClusterSizeFits { remaining: usize, sizes: Vec<usize> },

    #[error("At least two end devices are required to build flows, topology has {0}")]
    TooFewEndDevices(usize),

    #[error(transparent)]
    InvalidConfig(#[from] ValidationError),
}

/// Conditions logged during generation that do not stop it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioWarning {
    /// A period does not divide the hyper-cycle
    HyperCycleMismatch { hyper_cycle: u64, period: u64 },
    /// The fixed-rate frame size is not a whole number of bytes
    InexactFrameSize { total_traffic: u64, packets: u64, period: u64 },
    /// No fitting cluster was sampled; a larger one was cut down
    TruncatedRemoval { attempts: usize, cluster_size: usize, removed: usize },
    /// Removal was requested but no flows were active
    EmptyPopulation { outstanding: usize },
}

impl fmt::Display for ScenarioWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HyperCycleMismatch { hyper_cycle, period } => {
                write!(f, "hyper-cycle {} is not a multiple of period {}", hyper_cycle, period)
            }
            Self::InexactFrameSize { total_traffic, packets, period } => write!(
                f,
                "total traffic {} is not divisible into {} packages for period {}",
                total_traffic, packets, period
            ),
            Self::TruncatedRemoval { attempts, cluster_size, removed } => write!(
                f,
                "no fitting cluster after {} samples; removed {} of {} flows from one cluster",
                attempts, removed, cluster_size
            ),
            Self::EmptyPopulation { outstanding } => {
                write!(f, "{} removals requested but no flows are active", outstanding)
            }
        }
    }
}

/// Frame size giving every flow the same bandwidth in fixed-rate mode:
/// `total_traffic / (hyper_cycle / period)`, with `total_traffic` the bytes
/// per hyper-cycle from [`ScenarioConfig::total_traffic`].
///
/// Sizes that do not come out as whole bytes are returned as fractional with
/// a warning.
pub fn fixed_rate_package_size(
    total_traffic: u64,
    hyper_cycle: u64,
    period: u64,
) -> Outcome<PackageSize, ScenarioWarning> {
    if period == 0 || hyper_cycle % period != 0 {
        let packets = hyper_cycle as f64 / period as f64;
        return Outcome::Degraded(
            PackageSize::Fractional(total_traffic as f64 / packets),
            vec![ScenarioWarning::HyperCycleMismatch { hyper_cycle, period }],
        );
    }

    let packets = hyper_cycle / period;
    if total_traffic % packets == 0 {
        Outcome::Success(PackageSize::Exact(total_traffic / packets))
    } else {
        Outcome::Degraded(
            PackageSize::Fractional(total_traffic as f64 / packets as f64),
            vec![ScenarioWarning::InexactFrameSize { total_traffic, packets, period }],
        )
    }
}

/// Evolves a population of flow clusters over discrete time steps
pub struct ScenarioGenerator {
    config: ScenarioConfig,
    end_devices: Vec<NodeId>,
    hyper_cycle: u64,
    fixed_rate_sizes: BTreeMap<u64, PackageSize>,
    state: ScenarioState,
    sources: RandomSources,
    warnings: Vec<ScenarioWarning>,
}

impl ScenarioGenerator {
    /// Create a generator over the given end devices.
    ///
    /// Fails on an invalid configuration or with fewer than two end devices.
    pub fn new(
        config: ScenarioConfig,
        end_devices: Vec<NodeId>,
        sources: RandomSources,
    ) -> Result<Self, ScenarioError> {
        config.validate()?;
        let hyper_cycle = config.hyper_cycle()?;
        if end_devices.len() < 2 {
            return Err(ScenarioError::TooFewEndDevices(end_devices.len()));
        }
        info!("Generating scenario over {} end devices", end_devices.len());

        let mut generator = Self {
            config,
            end_devices,
            hyper_cycle,
            fixed_rate_sizes: BTreeMap::new(),
            state: ScenarioState::new(),
            sources,
            warnings: Vec::new(),
        };

        if generator.config.is_fixed_rate() {
            let total_traffic = generator.config.total_traffic()?;
            info!(
                "Fixed-rate mode: equal_traffic {} over hyper-cycle {}",
                generator.config.equal_traffic, hyper_cycle
            );
            for period in generator.config.periods.clone() {
                let (size, warnings) =
                    fixed_rate_package_size(total_traffic, hyper_cycle, period).into_parts();
                debug!("Period {} -> package size {:?}", period, size);
                generator.fixed_rate_sizes.insert(period, size);
                generator.record_warnings(warnings);
            }
        }

        Ok(generator)
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn state(&self) -> &ScenarioState {
        &self.state
    }

    /// Number of currently active flows
    pub fn current_flow_count(&self) -> usize {
        self.state.current_flow_count()
    }

    /// Warnings recorded so far
    pub fn warnings(&self) -> &[ScenarioWarning] {
        &self.warnings
    }

    fn record_warnings(&mut self, warnings: Vec<ScenarioWarning>) {
        for warning in warnings {
            warn!("{}", warning);
            self.warnings.push(warning);
        }
    }

    /// Pick a configured cluster size no larger than `remaining`
    pub fn next_cluster_size(&mut self, remaining: usize) -> Result<usize, ScenarioError> {
        let choices: Vec<usize> = self
            .config
            .cluster_sizes
            .iter()
            .copied()
            .filter(|&size| size <= remaining)
            .collect();

        if choices.is_empty() {
            return Err(ScenarioError::NoClusterSizeFits {
                remaining,
                sizes: self.config.cluster_sizes.clone(),
            });
        }
        Ok(choices[pick_index(self.sources.statistical(), choices.len())])
    }

    /// Build a cluster of `size` flows with ids starting at `start_flow_id`.
    ///
    /// All flows share one hub end device as source or destination; the
    /// other endpoint is any other end device.
    pub fn generate_cluster(&mut self, start_flow_id: FlowId, size: usize) -> Cluster {
        let device_count = self.end_devices.len();
        let hub_index = pick_index(self.sources.secure(), device_count);
        let hub = self.end_devices[hub_index];

        let mut flows = Vec::with_capacity(size);
        for offset in 0..size {
            let mut peer_index = pick_index(self.sources.secure(), device_count - 1);
            if peer_index >= hub_index {
                peer_index += 1;
            }
            let peer = self.end_devices[peer_index];

            let (source, destination) = if coin_flip(self.sources.statistical()) {
                (peer, hub)
            } else {
                (hub, peer)
            };

            let periods = &self.config.periods;
            let period = periods[pick_index(self.sources.statistical(), periods.len())];
            let frame_sizes = &self.config.frame_sizes;
            let frame_size = frame_sizes[pick_index(self.sources.statistical(), frame_sizes.len())];
            let package_size = self
                .fixed_rate_sizes
                .get(&period)
                .copied()
                .unwrap_or(PackageSize::Exact(frame_size));

            flows.push(Flow {
                flow_id: start_flow_id + offset as FlowId,
                package_size,
                period,
                source,
                destination,
            });
        }

        Cluster { hub, flows }
    }

    /// Create a cluster of a size fitting `max_size` and make it active.
    /// Returns the new flows.
    pub fn add_cluster(&mut self, max_size: usize) -> Result<Vec<Flow>, ScenarioError> {
        let size = self.next_cluster_size(max_size)?;
        let cluster = self.generate_cluster(self.state.next_flow_id(), size);
        let flows = cluster.flows.clone();
        self.state.add_cluster(cluster);
        Ok(flows)
    }

    /// Remove a size-weighted random cluster of at most `max_size` flows.
    ///
    /// If none is sampled within the re-sample limit, the last sampled
    /// cluster keeps its first `max_size` flows and the rest are removed; the
    /// outcome is then degraded. Returns `None` if no flows are active.
    pub fn remove_cluster(&mut self, max_size: usize) -> Option<Outcome<Vec<Flow>, ScenarioWarning>> {
        let flow_count = self.state.current_flow_count();
        if flow_count == 0 {
            return None;
        }

        let state = &self.state;
        let sources = &mut self.sources;
        let last_cluster = state.cluster_count().saturating_sub(1);
        let sampled = retry_bounded(
            REMOVAL_RESAMPLE_LIMIT + 1,
            || {
                let flow_index = pick_index(sources.secure(), flow_count);
                state.cluster_index_for_flow(flow_index).unwrap_or(last_cluster)
            },
            |&index| state.clusters()[index].len() <= max_size,
            |attempts| attempts,
        );

        let (index, exhausted) = sampled.into_parts();
        let Some(&attempts) = exhausted.first() else {
            return Some(Outcome::Success(self.state.remove_cluster_at(index)));
        };

        let cluster_size = self.state.clusters()[index].len();
        let removed = if max_size == 0 {
            self.state.remove_cluster_at(index)
        } else {
            self.state.truncate_cluster_at(index, max_size)
        };
        let warning = ScenarioWarning::TruncatedRemoval {
            attempts,
            cluster_size,
            removed: removed.len(),
        };
        Some(Outcome::Degraded(removed, vec![warning]))
    }

    /// Add clusters until at least `target` new flows exist
    fn add_flows(&mut self, target: usize) -> Result<Vec<Flow>, ScenarioError> {
        let mut added = Vec::with_capacity(target);
        while added.len() < target {
            let flows = self.add_cluster(target - added.len())?;
            added.extend(flows);
        }
        Ok(added)
    }

    /// Remove clusters until at least `target` flows are gone or none are left
    fn remove_flows(&mut self, target: usize) -> Vec<FlowId> {
        let mut removed = Vec::with_capacity(target);
        let mut outstanding = target;
        while outstanding > 0 {
            let Some(outcome) = self.remove_cluster(outstanding) else {
                self.record_warnings(vec![ScenarioWarning::EmptyPopulation { outstanding }]);
                break;
            };
            let (flows, warnings) = outcome.into_parts();
            self.record_warnings(warnings);
            outstanding = outstanding.saturating_sub(flows.len());
            removed.extend(flows.iter().map(|f| f.flow_id));
        }
        removed
    }

    /// Step 0: the initial flow population
    pub fn initial_step(&mut self) -> Result<TimeStep, ScenarioError> {
        let add_flows = self.add_flows(self.config.number_of_initial_flows)?;
        debug!("Step 0: {} initial flows", add_flows.len());
        Ok(TimeStep {
            time: 0,
            remove_flows: Vec::new(),
            add_flows,
        })
    }

    /// A later step: removals first, then additions
    pub fn step(&mut self, time: usize) -> Result<TimeStep, ScenarioError> {
        let remove_flows = self.remove_flows(self.config.average_flow_remove_per_step);
        let add_flows = self.add_flows(self.config.average_flow_add_per_step)?;
        debug!(
            "Step {}: removed {}, added {}, active {}",
            time,
            remove_flows.len(),
            add_flows.len(),
            self.state.current_flow_count()
        );
        Ok(TimeStep {
            time,
            remove_flows,
            add_flows,
        })
    }

    /// Run all `number_of_time_steps` steps, including step 0
    pub fn run(&mut self) -> Result<ScenarioDocument, ScenarioError> {
        let steps = self.config.number_of_time_steps;
        let mut time_steps = Vec::with_capacity(steps);
        time_steps.push(self.initial_step()?);
        for time in 1..steps {
            time_steps.push(self.step(time)?);
        }

        let total_added: usize = time_steps.iter().map(|s| s.add_flows.len()).sum();
        let total_removed: usize = time_steps.iter().map(|s| s.remove_flows.len()).sum();
        info!(
            "Generated {} time steps: {} flows added, {} removed, {} active at the end",
            time_steps.len(),
            total_added,
            total_removed,
            self.state.current_flow_count()
        );

        Ok(ScenarioDocument {
            time_steps,
            config_info: ConfigInfo::new(&self.config, self.hyper_cycle),
        })
    }
}
