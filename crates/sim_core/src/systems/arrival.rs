//! Arrival generation: bootstraps the run and spawns patient flows at
//! stochastic inter-arrival intervals.

use bevy_ecs::prelude::{Commands, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{FlowState, Patient, PatientFlow};
use crate::resources::Hospital;
use crate::scenario::{PatientCounter, SimParams, SimRng};
use crate::systems::flow::begin_prep;

/// Reacts to the bootstrap event: the first arrival fires immediately, the
/// first monitor tick one interval in.
pub fn simulation_started_system(
    mut clock: ResMut<SimulationClock>,
    params: Res<SimParams>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    clock.schedule_in(0.0, EventKind::PatientArrival, None);
    clock.schedule_in(params.monitor_interval, EventKind::MonitorTick, None);
}

/// One arrival: assign the next id, sample all three stage durations, spawn
/// the flow, then schedule the following arrival. The spawned flow requests a
/// prep bed immediately; whether it is granted or queued never delays the
/// generator.
pub fn patient_arrival_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut hospital: ResMut<Hospital>,
    mut rng: ResMut<SimRng>,
    mut counter: ResMut<PatientCounter>,
    params: Res<SimParams>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::PatientArrival {
        return;
    }

    let now = clock.now();
    let patient = Patient {
        id: counter.next_id(),
        created_at: now,
        prep_time: params.prep_time.sample(&mut rng.0),
        op_time: params.op_time.sample(&mut rng.0),
        rec_time: params.recovery_time.sample(&mut rng.0),
    };

    let entity = commands.spawn_empty().id();
    let mut flow = PatientFlow::queued_at(now);
    flow.state = FlowState::PrepQueued;
    if hospital.prep.try_acquire(entity) {
        begin_prep(&mut clock, entity, &patient, &mut flow);
    }
    commands.entity(entity).insert((patient, flow));

    let interarrival = params.interarrival.sample(&mut rng.0);
    clock.schedule_in(interarrival, EventKind::PatientArrival, None);
}
