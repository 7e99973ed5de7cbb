//! Preparation-timer expiry: frees the prep bed, resumes the next queued
//! patient, and moves this patient into the OR queue.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{FlowState, Patient, PatientFlow};
use crate::metrics::SimMetrics;
use crate::resources::Hospital;
use crate::systems::flow::{begin_operation, begin_prep};

pub fn prep_done_system(
    mut clock: ResMut<SimulationClock>,
    mut hospital: ResMut<Hospital>,
    mut metrics: ResMut<SimMetrics>,
    mut patients: Query<(&Patient, &mut PatientFlow)>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::PrepDone {
        return;
    }
    let Some(entity) = event.0.subject else {
        return;
    };
    let now = clock.now();

    let Ok((patient, _)) = patients.get(entity) else {
        return;
    };
    metrics.prep_busy_time += patient.prep_time;

    // The prep unit frees before the OR request is made; if someone is
    // waiting for prep, the unit transfers to them here.
    if let Some(next) = hospital.prep.release() {
        if let Ok((next_patient, mut next_flow)) = patients.get_mut(next) {
            begin_prep(&mut clock, next, next_patient, &mut next_flow);
        }
    }

    let Ok((patient, mut flow)) = patients.get_mut(entity) else {
        return;
    };
    flow.or_queued_at = Some(now);
    if hospital.op.try_acquire(entity) {
        begin_operation(&mut clock, entity, patient, &mut flow);
    } else {
        flow.state = FlowState::OrQueued;
    }
}
