//! Parameter variation framework for exploring simulation parameter space.
//!
//! Defines parameter spaces over hospital capacities, demand, and the
//! OR-release policy, and generates parameter sets for parallel runs.
//! Supports grid search and random sampling strategies.

use sim_core::{Distribution, SimConfig};
use std::collections::HashSet;

/// Represents a single parameter combination.
#[derive(Debug, Clone)]
struct ParameterCombination {
    interarrival_mean: f64,
    prep_units: usize,
    op_units: usize,
    recovery_units: usize,
    block_or_until_recovery: bool,
    sim_duration: f64,
}

/// Holds all parameter variations to explore.
struct ParameterVariations {
    interarrival_means: Vec<f64>,
    prep_units: Vec<usize>,
    op_units: Vec<usize>,
    recovery_units: Vec<usize>,
    blocking_policies: Vec<bool>,
    sim_durations: Vec<f64>,
}

impl ParameterVariations {
    fn from_space(space: &ParameterSpace) -> Self {
        Self {
            interarrival_means: if space.interarrival_means.is_empty() {
                vec![space.base.interarrival.mean()]
            } else {
                space.interarrival_means.clone()
            },
            prep_units: if space.prep_units.is_empty() {
                vec![space.base.prep_units]
            } else {
                space.prep_units.clone()
            },
            op_units: if space.op_units.is_empty() {
                vec![space.base.op_units]
            } else {
                space.op_units.clone()
            },
            recovery_units: if space.recovery_units.is_empty() {
                vec![space.base.recovery_units]
            } else {
                space.recovery_units.clone()
            },
            blocking_policies: if space.blocking_policies.is_empty() {
                vec![space.base.block_or_until_recovery]
            } else {
                space.blocking_policies.clone()
            },
            sim_durations: if space.sim_durations.is_empty() {
                vec![space.base.sim_duration]
            } else {
                space.sim_durations.clone()
            },
        }
    }

    /// Generate all combinations using Cartesian product.
    fn generate_combinations(&self) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.interarrival_means
            .iter()
            .flat_map(move |&interarrival_mean| self.expand_with_prep_units(interarrival_mean))
    }

    fn expand_with_prep_units(
        &self,
        interarrival_mean: f64,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.prep_units
            .iter()
            .flat_map(move |&prep_units| self.expand_with_op_units(interarrival_mean, prep_units))
    }

    fn expand_with_op_units(
        &self,
        interarrival_mean: f64,
        prep_units: usize,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.op_units.iter().flat_map(move |&op_units| {
            self.expand_with_recovery_units(interarrival_mean, prep_units, op_units)
        })
    }

    fn expand_with_recovery_units(
        &self,
        interarrival_mean: f64,
        prep_units: usize,
        op_units: usize,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.recovery_units.iter().flat_map(move |&recovery_units| {
            self.expand_with_blocking(interarrival_mean, prep_units, op_units, recovery_units)
        })
    }

    fn expand_with_blocking(
        &self,
        interarrival_mean: f64,
        prep_units: usize,
        op_units: usize,
        recovery_units: usize,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.blocking_policies.iter().flat_map(move |&blocking| {
            self.expand_with_duration(
                interarrival_mean,
                prep_units,
                op_units,
                recovery_units,
                blocking,
            )
        })
    }

    fn expand_with_duration(
        &self,
        interarrival_mean: f64,
        prep_units: usize,
        op_units: usize,
        recovery_units: usize,
        block_or_until_recovery: bool,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.sim_durations
            .iter()
            .map(move |&sim_duration| ParameterCombination {
                interarrival_mean,
                prep_units,
                op_units,
                recovery_units,
                block_or_until_recovery,
                sim_duration,
            })
    }
}

/// A single parameter configuration for a simulation run.
///
/// Wraps `SimConfig` with experiment metadata for tracking and
/// reproducibility.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Base run configuration.
    pub config: SimConfig,
    /// Unique experiment ID for this parameter configuration.
    pub experiment_id: String,
    /// Run ID within the experiment (for multiple runs with same params).
    pub run_id: usize,
    /// Seed used for this run (ensures reproducibility).
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(config: SimConfig, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            config,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// Get the run configuration with the seed applied.
    pub fn sim_config(&self) -> SimConfig {
        self.config.clone().with_seed(self.seed)
    }
}

/// Defines a parameter space for exploration.
///
/// Supports grid search (Cartesian product) and random sampling strategies.
/// Interarrival means are interpreted as exponential distributions; stage
/// durations come from the base configuration.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    /// Base configuration (used as defaults for unspecified parameters).
    base: SimConfig,
    /// Explicit seeds for replicated runs of each combination. When empty a
    /// seed is derived from the experiment id.
    seeds: Vec<u64>,
    /// Mean interarrival times (minutes) to explore.
    interarrival_means: Vec<f64>,
    /// Preparation bed counts to explore.
    prep_units: Vec<usize>,
    /// Operating room counts to explore.
    op_units: Vec<usize>,
    /// Recovery bed counts to explore.
    recovery_units: Vec<usize>,
    /// OR-release policies to explore.
    blocking_policies: Vec<bool>,
    /// Horizons (minutes) to explore.
    sim_durations: Vec<f64>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base: SimConfig::default(),
            seeds: vec![],
            interarrival_means: vec![],
            prep_units: vec![],
            op_units: vec![],
            recovery_units: vec![],
            blocking_policies: vec![],
            sim_durations: vec![],
        }
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    /// Set explicit seeds; each combination is replicated once per seed.
    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Set mean interarrival times to explore.
    pub fn interarrival_mean(mut self, means: Vec<f64>) -> Self {
        self.interarrival_means = means;
        self
    }

    /// Set preparation bed counts to explore.
    pub fn prep_units(mut self, counts: Vec<usize>) -> Self {
        self.prep_units = counts;
        self
    }

    /// Set operating room counts to explore.
    pub fn op_units(mut self, counts: Vec<usize>) -> Self {
        self.op_units = counts;
        self
    }

    /// Set recovery bed counts to explore.
    pub fn recovery_units(mut self, counts: Vec<usize>) -> Self {
        self.recovery_units = counts;
        self
    }

    /// Set OR-release policies to explore.
    pub fn blocking_policy(mut self, policies: Vec<bool>) -> Self {
        self.blocking_policies = policies;
        self
    }

    /// Set horizons (minutes) to explore.
    pub fn sim_duration(mut self, durations: Vec<f64>) -> Self {
        self.sim_durations = durations;
        self
    }

    /// Set base configuration (used as defaults).
    pub fn with_base(mut self, base: SimConfig) -> Self {
        self.base = base;
        self
    }

    /// Generate all parameter sets using grid search (Cartesian product).
    ///
    /// Each combination of specified parameters will be generated; explicit
    /// seeds replicate every combination once per seed, with the seed index
    /// as the run id. Parameters not specified will use values from the base
    /// configuration.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);

        variations
            .generate_combinations()
            .enumerate()
            .flat_map(|(experiment_id, combo)| {
                let config = self
                    .base
                    .clone()
                    .with_sim_duration(combo.sim_duration)
                    .with_units(combo.prep_units, combo.op_units, combo.recovery_units)
                    .with_interarrival(Distribution::exponential(combo.interarrival_mean))
                    .with_blocking_policy(combo.block_or_until_recovery);

                if self.seeds.is_empty() {
                    let seed = (experiment_id as u64).wrapping_mul(0x9e3779b9);
                    vec![ParameterSet::new(
                        config,
                        format!("exp_{}", experiment_id),
                        0,
                        seed,
                    )]
                } else {
                    self.seeds
                        .iter()
                        .enumerate()
                        .map(|(run_id, &seed)| {
                            ParameterSet::new(
                                config.clone(),
                                format!("exp_{}", experiment_id),
                                run_id,
                                seed,
                            )
                        })
                        .collect()
                }
            })
            .collect()
    }

    /// Generate random parameter sets (Monte Carlo sampling).
    ///
    /// Samples `count` parameter sets randomly from the defined space.
    /// If duplicates are encountered, continues sampling until `count` unique
    /// sets are generated or the attempt budget runs out.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        use rand::rngs::StdRng;
        use rand::Rng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut parameter_sets = Vec::new();
        let mut seen = HashSet::new();
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 10000;

        while parameter_sets.len() < count && attempts < MAX_ATTEMPTS {
            attempts += 1;

            let interarrival_mean = if !self.interarrival_means.is_empty() {
                self.interarrival_means[rng.gen_range(0..self.interarrival_means.len())]
            } else {
                self.base.interarrival.mean()
            };
            let prep_units = if !self.prep_units.is_empty() {
                self.prep_units[rng.gen_range(0..self.prep_units.len())]
            } else {
                self.base.prep_units
            };
            let op_units = if !self.op_units.is_empty() {
                self.op_units[rng.gen_range(0..self.op_units.len())]
            } else {
                self.base.op_units
            };
            let recovery_units = if !self.recovery_units.is_empty() {
                self.recovery_units[rng.gen_range(0..self.recovery_units.len())]
            } else {
                self.base.recovery_units
            };
            let blocking = if !self.blocking_policies.is_empty() {
                self.blocking_policies[rng.gen_range(0..self.blocking_policies.len())]
            } else {
                self.base.block_or_until_recovery
            };
            let sim_duration = if !self.sim_durations.is_empty() {
                self.sim_durations[rng.gen_range(0..self.sim_durations.len())]
            } else {
                self.base.sim_duration
            };

            let config = self
                .base
                .clone()
                .with_sim_duration(sim_duration)
                .with_units(prep_units, op_units, recovery_units)
                .with_interarrival(Distribution::exponential(interarrival_mean))
                .with_blocking_policy(blocking);

            let param_hash = format!("{:?}", config);
            if seen.contains(&param_hash) {
                continue;
            }
            seen.insert(param_hash);

            let seed_value = seed
                .wrapping_add(parameter_sets.len() as u64)
                .wrapping_mul(0x9e3779b9);

            parameter_sets.push(ParameterSet::new(
                config,
                format!("random_{}", parameter_sets.len()),
                0,
                seed_value,
            ));
        }

        parameter_sets
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}
