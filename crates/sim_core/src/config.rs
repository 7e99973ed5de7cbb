//! Run configuration: capacities, demand, stage durations, and the OR-release policy.
//!
//! All time values are in minutes. The configuration is an immutable value
//! object; callers build it, validation happens once before the run starts,
//! and nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

use crate::distributions::Distribution;
use crate::error::SimError;

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total horizon in minutes. Events due at or past this time never dispatch.
    pub sim_duration: f64,
    /// Seed for the run's RNG stream; `None` means non-reproducible randomness.
    pub random_seed: Option<u64>,
    /// Time between patient arrivals.
    pub interarrival: Distribution,
    /// Preparation bed count.
    pub prep_units: usize,
    /// Operating room count.
    pub op_units: usize,
    /// Recovery bed count.
    pub recovery_units: usize,
    pub prep_time: Distribution,
    pub op_time: Distribution,
    pub recovery_time: Distribution,
    /// Time between queue/utilization snapshots.
    pub monitor_interval: f64,
    /// When true the OR is held until a recovery bed is secured; when false it
    /// frees the moment the operation ends.
    pub block_or_until_recovery: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sim_duration: 24.0 * 60.0,
            random_seed: None,
            interarrival: Distribution::exponential(25.0),
            prep_units: 3,
            op_units: 1,
            recovery_units: 3,
            prep_time: Distribution::exponential(40.0),
            op_time: Distribution::exponential(20.0),
            recovery_time: Distribution::exponential(40.0),
            monitor_interval: 5.0,
            block_or_until_recovery: true,
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_sim_duration(mut self, minutes: f64) -> Self {
        self.sim_duration = minutes;
        self
    }

    pub fn with_units(mut self, prep: usize, op: usize, recovery: usize) -> Self {
        self.prep_units = prep;
        self.op_units = op;
        self.recovery_units = recovery;
        self
    }

    pub fn with_interarrival(mut self, dist: Distribution) -> Self {
        self.interarrival = dist;
        self
    }

    pub fn with_stage_times(mut self, prep: Distribution, op: Distribution, recovery: Distribution) -> Self {
        self.prep_time = prep;
        self.op_time = op;
        self.recovery_time = recovery;
        self
    }

    pub fn with_monitor_interval(mut self, minutes: f64) -> Self {
        self.monitor_interval = minutes;
        self
    }

    pub fn with_blocking_policy(mut self, block_or_until_recovery: bool) -> Self {
        self.block_or_until_recovery = block_or_until_recovery;
        self
    }

    /// Reject impossible configurations before the run starts.
    ///
    /// A zero OR capacity would also make utilization undefined at sample
    /// time, so it is caught here rather than in the monitor.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.sim_duration <= 0.0 || !self.sim_duration.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "sim_duration must be positive, got {}",
                self.sim_duration
            )));
        }
        if self.monitor_interval <= 0.0 || !self.monitor_interval.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "monitor_interval must be positive, got {}",
                self.monitor_interval
            )));
        }
        for (name, units) in [
            ("prep_units", self.prep_units),
            ("op_units", self.op_units),
            ("recovery_units", self.recovery_units),
        ] {
            if units == 0 {
                return Err(SimError::InvalidConfiguration(format!(
                    "{name} must be a positive capacity"
                )));
            }
        }
        self.interarrival.validate("interarrival")?;
        self.prep_time.validate("prep_time")?;
        self.op_time.validate("op_time")?;
        self.recovery_time.validate("recovery_time")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = SimConfig::default().with_units(3, 0, 3);
        let err = config.validate().expect_err("zero OR capacity");
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn non_positive_durations_are_rejected() {
        assert!(SimConfig::default()
            .with_sim_duration(0.0)
            .validate()
            .is_err());
        assert!(SimConfig::default()
            .with_monitor_interval(-5.0)
            .validate()
            .is_err());
        assert!(SimConfig::default()
            .with_stage_times(
                Distribution::exponential(-40.0),
                Distribution::exponential(20.0),
                Distribution::exponential(40.0),
            )
            .validate()
            .is_err());
    }

    #[test]
    fn builders_set_fields() {
        let config = SimConfig::default()
            .with_seed(42)
            .with_units(2, 2, 2)
            .with_blocking_policy(false);
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.op_units, 2);
        assert!(!config.block_or_until_recovery);
    }
}
