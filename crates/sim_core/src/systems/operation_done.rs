//! Operation-timer expiry: hands the OR on and requests a recovery bed,
//! branching on the configured OR-release policy.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{FlowState, Patient, PatientFlow};
use crate::metrics::SimMetrics;
use crate::resources::Hospital;
use crate::scenario::SimParams;
use crate::systems::flow::{begin_operation, begin_recovery};

pub fn operation_done_system(
    mut clock: ResMut<SimulationClock>,
    mut hospital: ResMut<Hospital>,
    mut metrics: ResMut<SimMetrics>,
    params: Res<SimParams>,
    mut patients: Query<(&Patient, &mut PatientFlow)>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::OperationDone {
        return;
    }
    let Some(entity) = event.0.subject else {
        return;
    };
    let now = clock.now();

    let Ok((patient, _)) = patients.get(entity) else {
        return;
    };
    metrics.op_busy_time += patient.op_time;

    if params.block_or_until_recovery {
        // The OR is not released until a recovery bed is secured. A granted
        // request frees the OR right away; otherwise the patient keeps the
        // OR occupied for as long as the recovery wait lasts.
        let granted = hospital.recovery.try_acquire(entity);
        if granted {
            if let Some(next) = hospital.op.release() {
                if let Ok((next_patient, mut next_flow)) = patients.get_mut(next) {
                    begin_operation(&mut clock, next, next_patient, &mut next_flow);
                }
            }
            let Ok((patient, mut flow)) = patients.get_mut(entity) else {
                return;
            };
            flow.recovery_queued_at = Some(now);
            begin_recovery(&mut clock, entity, patient, &mut flow);
        } else {
            let Ok((_, mut flow)) = patients.get_mut(entity) else {
                return;
            };
            flow.recovery_queued_at = Some(now);
            flow.or_blocked_since = Some(now);
            flow.state = FlowState::AwaitingRecovery;
        }
    } else {
        // The OR frees the moment the operation ends; the next queued
        // patient starts surgery while this one waits for recovery.
        if let Some(next) = hospital.op.release() {
            if let Ok((next_patient, mut next_flow)) = patients.get_mut(next) {
                begin_operation(&mut clock, next, next_patient, &mut next_flow);
            }
        }
        let Ok((patient, mut flow)) = patients.get_mut(entity) else {
            return;
        };
        flow.recovery_queued_at = Some(now);
        if hospital.recovery.try_acquire(entity) {
            begin_recovery(&mut clock, entity, patient, &mut flow);
        } else {
            flow.state = FlowState::RecoveryQueued;
        }
    }
}
