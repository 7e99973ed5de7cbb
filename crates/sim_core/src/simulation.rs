//! Run-to-completion entry point.

use bevy_ecs::prelude::World;
use serde::Serialize;
use tracing::debug;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::metrics::SimMetrics;
use crate::resources::{Hospital, PoolState};
use crate::runner::{run_to_horizon, simulation_schedule};
use crate::scenario::build_simulation;

/// Safety valve against runaway event generation; far above anything a
/// day-scale run produces.
const MAX_EVENTS: usize = 10_000_000;

/// Terminal state of the three stage pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalPools {
    pub prep: PoolState,
    pub op: PoolState,
    pub recovery: PoolState,
}

/// Everything a finished run reports back.
#[derive(Debug, Clone, Serialize)]
pub struct SimOutcome {
    pub metrics: SimMetrics,
    pub pools: FinalPools,
}

/// Validates the configuration, runs the simulation to its horizon, and
/// returns the accumulated metrics plus terminal pool states.
pub fn run_sim(config: &SimConfig) -> Result<SimOutcome, SimError> {
    let mut world = World::new();
    build_simulation(&mut world, config)?;

    let mut schedule = simulation_schedule();
    let steps = run_to_horizon(&mut world, &mut schedule, MAX_EVENTS)?;
    debug!(steps, "simulation run finished");

    let metrics = world
        .remove_resource::<SimMetrics>()
        .expect("metrics resource inserted at build");
    let hospital = world
        .remove_resource::<Hospital>()
        .expect("hospital resource inserted at build");

    Ok(SimOutcome {
        metrics,
        pools: FinalPools {
            prep: PoolState::from(&hospital.prep),
            op: PoolState::from(&hospital.op),
            recovery: PoolState::from(&hospital.recovery),
        },
    })
}
