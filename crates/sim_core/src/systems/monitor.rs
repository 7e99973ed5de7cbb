//! Periodic monitor: samples queue lengths and OR utilization onto the
//! metrics time series, then re-arms itself one interval out.

use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::metrics::{QueueSnapshot, SimMetrics};
use crate::resources::Hospital;
use crate::scenario::SimParams;

pub fn monitor_tick_system(
    mut clock: ResMut<SimulationClock>,
    hospital: Res<Hospital>,
    mut metrics: ResMut<SimMetrics>,
    params: Res<SimParams>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::MonitorTick {
        return;
    }

    metrics.snapshots.push(QueueSnapshot {
        timestamp: clock.now(),
        prep_queue: hospital.prep.queue_len(),
        or_queue: hospital.op.queue_len(),
        recovery_queue: hospital.recovery.queue_len(),
        or_utilization: hospital.op.utilization(),
    });

    clock.schedule_in(params.monitor_interval, EventKind::MonitorTick, None);
}
