//! Metrics extraction from simulation results.
//!
//! Condenses a run's per-patient records and monitor snapshots into a flat
//! summary row suitable for comparison across parameter combinations.

use sim_core::SimOutcome;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExperimentResult {
    /// Patients that finished recovery before the horizon.
    pub completed: u64,
    /// Average total time in system (arrival to end of recovery), minutes.
    pub avg_total_time: f64,
    /// Median total time in system, minutes.
    pub median_total_time: f64,
    /// P90 total time in system, minutes.
    pub p90_total_time: f64,
    /// Average wait for a preparation bed, minutes.
    pub avg_prep_wait: f64,
    /// Average wait for the operating room, minutes.
    pub avg_or_wait: f64,
    /// Average wait for a recovery bed, minutes.
    pub avg_rec_wait: f64,
    /// Total time the OR was held past operation end waiting for a recovery bed.
    pub or_blocked_time: f64,
    /// Mean OR utilization across monitor snapshots, in [0, 1].
    pub avg_or_utilization: f64,
    /// Mean queue lengths across monitor snapshots.
    pub avg_prep_queue: f64,
    pub avg_or_queue: f64,
    pub avg_recovery_queue: f64,
    /// Aggregate service time delivered per stage, minutes.
    pub prep_busy_time: f64,
    pub op_busy_time: f64,
    pub recovery_busy_time: f64,
}

impl ExperimentResult {
    /// Average, median, and P90 of a sample.
    fn calculate_stats(values: &[f64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let avg = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        } else {
            sorted[sorted.len() / 2]
        };
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)];

        (avg, median, p90)
    }
}

/// Extract a summary row from a completed simulation outcome.
pub fn extract_metrics(outcome: &SimOutcome) -> ExperimentResult {
    let metrics = &outcome.metrics;

    let totals: Vec<f64> = metrics.patient_records.iter().map(|r| r.total_time).collect();
    let (avg_total_time, median_total_time, p90_total_time) =
        ExperimentResult::calculate_stats(&totals);

    let snapshot_count = metrics.snapshots.len();
    let snapshot_mean = |values: &mut dyn Iterator<Item = f64>| {
        if snapshot_count == 0 {
            0.0
        } else {
            values.sum::<f64>() / snapshot_count as f64
        }
    };
    let avg_or_utilization =
        snapshot_mean(&mut metrics.snapshots.iter().map(|s| s.or_utilization));
    let avg_prep_queue =
        snapshot_mean(&mut metrics.snapshots.iter().map(|s| s.prep_queue as f64));
    let avg_or_queue = snapshot_mean(&mut metrics.snapshots.iter().map(|s| s.or_queue as f64));
    let avg_recovery_queue =
        snapshot_mean(&mut metrics.snapshots.iter().map(|s| s.recovery_queue as f64));

    ExperimentResult {
        completed: metrics.completed,
        avg_total_time,
        median_total_time,
        p90_total_time,
        avg_prep_wait: metrics.mean_prep_wait(),
        avg_or_wait: metrics.mean_or_wait(),
        avg_rec_wait: metrics.mean_rec_wait(),
        or_blocked_time: metrics.or_blocked_time,
        avg_or_utilization,
        avg_prep_queue,
        avg_or_queue,
        avg_recovery_queue,
        prep_busy_time: metrics.prep_busy_time,
        op_busy_time: metrics.op_busy_time,
        recovery_busy_time: metrics.recovery_busy_time,
    }
}
