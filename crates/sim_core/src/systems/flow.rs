//! Shared stage-entry helpers.
//!
//! Entering a stage means the pool unit is already held: record the service
//! start, flip the state, and arm the stage timer. Used both when a request
//! is granted immediately and when a released unit resumes the head waiter.

use bevy_ecs::prelude::Entity;

use crate::clock::{EventKind, SimulationClock};
use crate::ecs::{FlowState, Patient, PatientFlow};

pub(crate) fn begin_prep(
    clock: &mut SimulationClock,
    entity: Entity,
    patient: &Patient,
    flow: &mut PatientFlow,
) {
    flow.state = FlowState::Prepping;
    flow.prep_started_at = Some(clock.now());
    clock.schedule_in(patient.prep_time, EventKind::PrepDone, Some(entity));
}

pub(crate) fn begin_operation(
    clock: &mut SimulationClock,
    entity: Entity,
    patient: &Patient,
    flow: &mut PatientFlow,
) {
    flow.state = FlowState::Operating;
    flow.op_started_at = Some(clock.now());
    clock.schedule_in(patient.op_time, EventKind::OperationDone, Some(entity));
}

pub(crate) fn begin_recovery(
    clock: &mut SimulationClock,
    entity: Entity,
    patient: &Patient,
    flow: &mut PatientFlow,
) {
    flow.state = FlowState::Recovering;
    flow.recovery_started_at = Some(clock.now());
    clock.schedule_in(patient.rec_time, EventKind::RecoveryDone, Some(entity));
}
