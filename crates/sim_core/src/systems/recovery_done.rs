//! Recovery-timer expiry: the flow completes. Emits the patient's timing
//! record, frees the recovery bed, and resumes the head waiter, unwinding a
//! blocked OR when the waiter was still holding one.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{FlowState, Patient, PatientFlow};
use crate::metrics::{PatientRecord, SimMetrics};
use crate::resources::Hospital;
use crate::systems::flow::{begin_operation, begin_recovery};

pub fn recovery_done_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut hospital: ResMut<Hospital>,
    mut metrics: ResMut<SimMetrics>,
    mut patients: Query<(&Patient, &mut PatientFlow)>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::RecoveryDone {
        return;
    }
    let Some(entity) = event.0.subject else {
        return;
    };
    let now = clock.now();

    let Ok((patient, flow)) = patients.get(entity) else {
        return;
    };
    metrics.recovery_busy_time += patient.rec_time;
    metrics.patient_records.push(PatientRecord {
        id: patient.id,
        arrival: patient.created_at,
        end: now,
        total_time: now - patient.created_at,
        prep_wait: flow.prep_started_at.unwrap_or(flow.prep_queued_at) - flow.prep_queued_at,
        or_wait: wait_between(flow.or_queued_at, flow.op_started_at),
        rec_wait: wait_between(flow.recovery_queued_at, flow.recovery_started_at),
    });
    metrics.completed += 1;
    commands.entity(entity).despawn();

    // Hand the bed to the earliest waiter. Under the blocking policy that
    // waiter is still holding the OR, which unwinds here: the blocked span is
    // recorded and the OR transfers to its own head waiter.
    if let Some(next) = hospital.recovery.release() {
        let mut unblocked_or = false;
        if let Ok((next_patient, mut next_flow)) = patients.get_mut(next) {
            if next_flow.state == FlowState::AwaitingRecovery {
                if let Some(since) = next_flow.or_blocked_since.take() {
                    metrics.or_blocked_time += now - since;
                }
                unblocked_or = true;
            }
            begin_recovery(&mut clock, next, next_patient, &mut next_flow);
        }
        if unblocked_or {
            if let Some(or_next) = hospital.op.release() {
                if let Ok((or_patient, mut or_flow)) = patients.get_mut(or_next) {
                    begin_operation(&mut clock, or_next, or_patient, &mut or_flow);
                }
            }
        }
    }
}

fn wait_between(queued: Option<f64>, started: Option<f64>) -> f64 {
    match (queued, started) {
        (Some(q), Some(s)) => s - q,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Entity, Schedule, World};

    use crate::resources::ResourcePool;

    fn test_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(Hospital {
            prep: ResourcePool::new(1),
            op: ResourcePool::new(1),
            recovery: ResourcePool::new(1),
        });
        world.insert_resource(SimMetrics::default());
        world
    }

    fn spawn_patient(world: &mut World, id: u64, state: FlowState) -> Entity {
        let mut flow = PatientFlow::queued_at(0.0);
        flow.state = state;
        world
            .spawn((
                Patient {
                    id,
                    created_at: 0.0,
                    prep_time: 6.0,
                    op_time: 3.0,
                    rec_time: 4.0,
                },
                flow,
            ))
            .id()
    }

    fn fire_recovery_done(world: &mut World, entity: Entity, at: f64) {
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(at, EventKind::RecoveryDone, Some(entity));
        let event = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("no fault")
            .expect("event");
        world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(recovery_done_system);
        schedule.run(world);
    }

    #[test]
    fn completion_records_metrics_and_despawns() {
        let mut world = test_world();
        let entity = spawn_patient(&mut world, 1, FlowState::Recovering);
        {
            let mut entity_mut = world.entity_mut(entity);
            let mut flow = entity_mut.get_mut::<PatientFlow>().expect("flow");
            flow.prep_started_at = Some(1.0);
            flow.or_queued_at = Some(7.0);
            flow.op_started_at = Some(9.0);
            flow.recovery_queued_at = Some(12.0);
            flow.recovery_started_at = Some(12.0);
        }
        world.resource_mut::<Hospital>().recovery.try_acquire(entity);

        fire_recovery_done(&mut world, entity, 16.0);

        let metrics = world.resource::<SimMetrics>();
        assert_eq!(metrics.completed, 1);
        assert_eq!(metrics.patient_records.len(), 1);
        let record = &metrics.patient_records[0];
        assert_eq!(record.total_time, 16.0);
        assert_eq!(record.prep_wait, 1.0);
        assert_eq!(record.or_wait, 2.0);
        assert_eq!(record.rec_wait, 0.0);
        assert_eq!(metrics.recovery_busy_time, 4.0);

        assert!(world.get_entity(entity).is_none(), "patient despawned");
        assert_eq!(world.resource::<Hospital>().recovery.in_use(), 0);
    }

    #[test]
    fn freed_bed_resumes_plain_recovery_waiter() {
        let mut world = test_world();
        let leaving = spawn_patient(&mut world, 1, FlowState::Recovering);
        let waiter = spawn_patient(&mut world, 2, FlowState::RecoveryQueued);
        {
            let mut hospital = world.resource_mut::<Hospital>();
            hospital.recovery.try_acquire(leaving);
            hospital.recovery.try_acquire(waiter);
        }

        fire_recovery_done(&mut world, leaving, 20.0);

        let flow = world.entity(waiter).get::<PatientFlow>().expect("flow");
        assert_eq!(flow.state, FlowState::Recovering);
        assert_eq!(flow.recovery_started_at, Some(20.0));
        assert_eq!(world.resource::<SimMetrics>().or_blocked_time, 0.0);
    }

    #[test]
    fn freed_bed_unblocks_or_holder_and_cascades() {
        let mut world = test_world();
        let leaving = spawn_patient(&mut world, 1, FlowState::Recovering);
        let blocked = spawn_patient(&mut world, 2, FlowState::AwaitingRecovery);
        let queued = spawn_patient(&mut world, 3, FlowState::OrQueued);
        {
            let mut entity_mut = world.entity_mut(blocked);
            let mut flow = entity_mut.get_mut::<PatientFlow>().expect("flow");
            flow.or_blocked_since = Some(12.0);
            flow.recovery_queued_at = Some(12.0);
        }
        {
            let mut hospital = world.resource_mut::<Hospital>();
            hospital.recovery.try_acquire(leaving);
            hospital.recovery.try_acquire(blocked);
            hospital.op.try_acquire(blocked);
            hospital.op.try_acquire(queued);
        }

        fire_recovery_done(&mut world, leaving, 20.0);

        // Blocked span is 12 -> 20 and the OR handed on to the queued patient.
        let metrics = world.resource::<SimMetrics>();
        assert_eq!(metrics.or_blocked_time, 8.0);

        let blocked_flow = world.entity(blocked).get::<PatientFlow>().expect("flow");
        assert_eq!(blocked_flow.state, FlowState::Recovering);
        assert_eq!(blocked_flow.recovery_started_at, Some(20.0));
        assert_eq!(blocked_flow.recovery_queued_at, Some(12.0));

        let queued_flow = world.entity(queued).get::<PatientFlow>().expect("flow");
        assert_eq!(queued_flow.state, FlowState::Operating);
        assert_eq!(queued_flow.op_started_at, Some(20.0));

        let hospital = world.resource::<Hospital>();
        assert_eq!(hospital.op.in_use(), 1);
        assert_eq!(hospital.recovery.in_use(), 1);
    }
}
