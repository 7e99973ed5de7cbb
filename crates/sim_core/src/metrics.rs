//! Metrics store: per-patient timing records, periodic snapshots, and
//! run-level aggregates.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::clock::SimTime;

/// Timing of one completed patient, derived when the flow finishes.
/// Waits are the queueing delays before each stage's service began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientRecord {
    pub id: u64,
    pub arrival: SimTime,
    pub end: SimTime,
    /// Arrival to end of recovery.
    pub total_time: f64,
    pub prep_wait: f64,
    pub or_wait: f64,
    pub rec_wait: f64,
}

/// Point-in-time sample of queue lengths and OR utilization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueSnapshot {
    pub timestamp: SimTime,
    pub prep_queue: usize,
    pub or_queue: usize,
    pub recovery_queue: usize,
    /// OR in-use count over capacity, in [0, 1].
    pub or_utilization: f64,
}

/// Accumulates everything a run produces. Appended to by the flow systems and
/// the monitor; dispatch is single-threaded so appends are already serialized.
#[derive(Debug, Clone, Default, Resource, Serialize)]
pub struct SimMetrics {
    /// Patients that finished recovery before the horizon.
    pub completed: u64,
    /// One record per completed patient, in completion order.
    pub patient_records: Vec<PatientRecord>,
    /// Monitor samples, in timestamp order.
    pub snapshots: Vec<QueueSnapshot>,
    /// Total time the OR was held past operation end waiting for a recovery
    /// bed (blocking policy only).
    pub or_blocked_time: f64,
    /// Aggregate service time delivered per stage.
    pub prep_busy_time: f64,
    pub op_busy_time: f64,
    pub recovery_busy_time: f64,
}

impl SimMetrics {
    pub fn mean_total_time(&self) -> f64 {
        mean(self.patient_records.iter().map(|r| r.total_time))
    }

    pub fn mean_prep_wait(&self) -> f64 {
        mean(self.patient_records.iter().map(|r| r.prep_wait))
    }

    pub fn mean_or_wait(&self) -> f64 {
        mean(self.patient_records.iter().map(|r| r.or_wait))
    }

    pub fn mean_rec_wait(&self) -> f64 {
        mean(self.patient_records.iter().map(|r| r.rec_wait))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut count = 0usize;
    let mut total = 0.0;
    for value in values {
        count += 1;
        total += value;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
