//! One patient through an idle hospital: every stage starts the moment the
//! previous one ends, so waits are zero and the total is the sum of the
//! stage durations.

use sim_core::{run_sim, Distribution, SimConfig};

fn single_patient_config() -> SimConfig {
    SimConfig::default()
        .with_seed(0)
        .with_sim_duration(100.0)
        .with_units(1, 1, 1)
        // Push the second arrival past the horizon so exactly one patient enters.
        .with_interarrival(Distribution::fixed(1000.0))
        .with_stage_times(
            Distribution::fixed(10.0),
            Distribution::fixed(5.0),
            Distribution::fixed(8.0),
        )
        .with_monitor_interval(7.0)
}

#[test]
fn no_contention_means_zero_waits() {
    let outcome = run_sim(&single_patient_config()).expect("clean run");

    assert_eq!(outcome.metrics.completed, 1);
    let record = &outcome.metrics.patient_records[0];
    assert_eq!(record.id, 1);
    assert_eq!(record.arrival, 0.0);
    assert_eq!(record.total_time, 23.0);
    assert_eq!(record.prep_wait, 0.0);
    assert_eq!(record.or_wait, 0.0);
    assert_eq!(record.rec_wait, 0.0);
    assert_eq!(record.end, 23.0);
}

#[test]
fn stage_busy_times_equal_service_durations() {
    let outcome = run_sim(&single_patient_config()).expect("clean run");

    assert_eq!(outcome.metrics.prep_busy_time, 10.0);
    assert_eq!(outcome.metrics.op_busy_time, 5.0);
    assert_eq!(outcome.metrics.recovery_busy_time, 8.0);
    assert_eq!(outcome.metrics.or_blocked_time, 0.0);
}

#[test]
fn all_units_are_returned_by_run_end() {
    let outcome = run_sim(&single_patient_config()).expect("clean run");

    for pool in [outcome.pools.prep, outcome.pools.op, outcome.pools.recovery] {
        assert_eq!(pool.in_use, 0);
        assert_eq!(pool.queue_len, 0);
    }
}

#[test]
fn monitor_sees_the_or_busy_only_during_the_operation() {
    let outcome = run_sim(&single_patient_config()).expect("clean run");

    // Operation runs from t=10 to t=15; ticks land every 7 minutes.
    let at = |t: f64| {
        outcome
            .metrics
            .snapshots
            .iter()
            .find(|s| s.timestamp == t)
            .expect("snapshot at tick")
    };
    assert_eq!(at(7.0).or_utilization, 0.0); // still prepping
    assert_eq!(at(14.0).or_utilization, 1.0); // operating
    assert_eq!(at(21.0).or_utilization, 0.0); // recovering
    assert_eq!(at(28.0).or_utilization, 0.0); // long gone
}
