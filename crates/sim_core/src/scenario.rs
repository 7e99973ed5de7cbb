//! Scenario setup: builds the world a run executes in.
//!
//! Everything the systems need at runtime is inserted as a resource here:
//! the clock, the stage pools, the metrics store, the seeded RNG stream, and
//! the sampled-parameter set. The caller keeps the [SimConfig] itself.

use bevy_ecs::prelude::{Resource, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::clock::{EventKind, SimTime, SimulationClock};
use crate::config::SimConfig;
use crate::distributions::Distribution;
use crate::error::SimError;
use crate::metrics::SimMetrics;
use crate::resources::Hospital;

/// The single RNG stream all sampling draws from. One stream plus
/// deterministic event dispatch makes whole runs reproducible per seed.
#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

/// Horizon: events due at or past this time are never dispatched.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEnd(pub SimTime);

/// Runtime parameters the systems sample and branch on.
#[derive(Debug, Clone, Resource)]
pub struct SimParams {
    pub interarrival: Distribution,
    pub prep_time: Distribution,
    pub op_time: Distribution,
    pub recovery_time: Distribution,
    pub monitor_interval: f64,
    pub block_or_until_recovery: bool,
}

impl From<&SimConfig> for SimParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            interarrival: config.interarrival,
            prep_time: config.prep_time,
            op_time: config.op_time,
            recovery_time: config.recovery_time,
            monitor_interval: config.monitor_interval,
            block_or_until_recovery: config.block_or_until_recovery,
        }
    }
}

/// Hands out sequential patient ids, starting at 1.
#[derive(Debug, Default, Resource)]
pub struct PatientCounter {
    assigned: u64,
}

impl PatientCounter {
    pub fn next_id(&mut self) -> u64 {
        self.assigned += 1;
        self.assigned
    }

    /// Total patients created so far.
    pub fn assigned(&self) -> u64 {
        self.assigned
    }
}

/// Validates `config` and populates `world` with all run resources, then
/// schedules the bootstrap event at time 0.
pub fn build_simulation(world: &mut World, config: &SimConfig) -> Result<(), SimError> {
    config.validate()?;

    let rng = match config.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    world.insert_resource(SimulationClock::default());
    world.insert_resource(Hospital::from_config(config));
    world.insert_resource(SimMetrics::default());
    world.insert_resource(SimRng(rng));
    world.insert_resource(SimulationEnd(config.sim_duration));
    world.insert_resource(SimParams::from(config));
    world.insert_resource(PatientCounter::default());

    world
        .resource_mut::<SimulationClock>()
        .schedule_at(0.0, EventKind::SimulationStarted, None);

    debug!(
        horizon = config.sim_duration,
        seed = ?config.random_seed,
        blocking = config.block_or_until_recovery,
        "simulation world built"
    );
    Ok(())
}
