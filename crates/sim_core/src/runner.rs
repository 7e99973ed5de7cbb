//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Each step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule. The schedule is chained so exactly
//! one flow of control executes between suspension points, which is what
//! makes dispatch order (and therefore whole runs) deterministic.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};
use tracing::trace;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::error::SimError;
use crate::scenario::SimulationEnd;
use crate::systems::{
    arrival::{patient_arrival_system, simulation_started_system},
    monitor::monitor_tick_system,
    operation_done::operation_done_system,
    prep_done::prep_done_system,
    recovery_done::recovery_done_system,
};

// Condition functions for each event kind
fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_patient_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PatientArrival)
        .unwrap_or(false)
}

fn is_prep_done(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PrepDone)
        .unwrap_or(false)
}

fn is_operation_done(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::OperationDone)
        .unwrap_or(false)
}

fn is_recovery_done(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::RecoveryDone)
        .unwrap_or(false)
}

fn is_monitor_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::MonitorTick)
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [CurrentEvent], then runs the schedule. Returns `Ok(false)` without
/// dispatching when the clock is empty or the next event is at or past
/// [SimulationEnd].
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Result<bool, SimError> {
    let stop_at = world.get_resource::<SimulationEnd>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end), Some(ts)) = (stop_at, next_ts) {
        if ts >= end {
            return Ok(false);
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next()? {
        Some(event) => event,
        None => return Ok(false),
    };
    trace!(timestamp = event.timestamp, kind = ?event.kind, "dispatching event");
    world.insert_resource(CurrentEvent(event));

    schedule.run(world);
    Ok(true)
}

/// Runs steps until the queue is empty, the horizon is reached, or
/// `max_steps` is hit. Returns the number of steps executed.
pub fn run_to_horizon(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
) -> Result<usize, SimError> {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule)? {
        steps += 1;
    }
    Ok(steps)
}

/// Builds the simulation schedule: one system per event kind, gated on the
/// current event, chained for deterministic execution, with [apply_deferred]
/// at the tail so spawned patients exist before the next step.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            simulation_started_system.run_if(is_simulation_started),
            patient_arrival_system.run_if(is_patient_arrival),
            prep_done_system.run_if(is_prep_done),
            operation_done_system.run_if(is_operation_done),
            recovery_done_system.run_if(is_recovery_done),
            monitor_tick_system.run_if(is_monitor_tick),
            apply_deferred,
        )
            .chain(),
    );
    schedule
}
