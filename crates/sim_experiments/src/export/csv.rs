use crate::metrics::ExperimentResult;
use crate::parameters::ParameterSet;

pub(crate) fn export_to_csv_impl(
    results: &[ExperimentResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "sim_duration",
        "interarrival_mean",
        "prep_units",
        "op_units",
        "recovery_units",
        "block_or_until_recovery",
        "monitor_interval",
        "completed",
        "avg_total_time",
        "median_total_time",
        "p90_total_time",
        "avg_prep_wait",
        "avg_or_wait",
        "avg_rec_wait",
        "or_blocked_time",
        "avg_or_utilization",
        "avg_prep_queue",
        "avg_or_queue",
        "avg_recovery_queue",
        "prep_busy_time",
        "op_busy_time",
        "recovery_busy_time",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let config = &param_set.config;

        wtr.write_record([
            &param_set.experiment_id,
            &param_set.run_id.to_string(),
            &param_set.seed.to_string(),
            &config.sim_duration.to_string(),
            &config.interarrival.mean().to_string(),
            &config.prep_units.to_string(),
            &config.op_units.to_string(),
            &config.recovery_units.to_string(),
            &config.block_or_until_recovery.to_string(),
            &config.monitor_interval.to_string(),
            &result.completed.to_string(),
            &result.avg_total_time.to_string(),
            &result.median_total_time.to_string(),
            &result.p90_total_time.to_string(),
            &result.avg_prep_wait.to_string(),
            &result.avg_or_wait.to_string(),
            &result.avg_rec_wait.to_string(),
            &result.or_blocked_time.to_string(),
            &result.avg_or_utilization.to_string(),
            &result.avg_prep_queue.to_string(),
            &result.avg_or_queue.to_string(),
            &result.avg_recovery_queue.to_string(),
            &result.prep_busy_time.to_string(),
            &result.op_busy_time.to_string(),
            &result.recovery_busy_time.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
