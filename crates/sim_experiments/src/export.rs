//! Result export utilities.
//!
//! Writes experiment results to JSON and, paired with their parameter sets,
//! to CSV for analysis in external tooling.

use std::path::Path;

use crate::metrics::ExperimentResult;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export experiment results to JSON format.
///
/// Creates a JSON file with an array of all results.
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_to_json(
    results: &[ExperimentResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export experiment results with parameters to CSV format.
///
/// Creates a CSV file with columns for all parameters and all metrics.
/// Parameters and results are paired by index (results[i] corresponds to
/// parameter_sets[i]).
///
/// # Errors
///
/// Returns an error if file creation or CSV writing fails, or if results and
/// parameter_sets lengths don't match.
pub fn export_to_csv(
    results: &[ExperimentResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;
    use tempfile::NamedTempFile;

    fn sample_result() -> ExperimentResult {
        ExperimentResult {
            completed: 50,
            avg_total_time: 95.0,
            median_total_time: 88.0,
            p90_total_time: 160.0,
            avg_prep_wait: 12.0,
            avg_or_wait: 18.0,
            avg_rec_wait: 4.0,
            or_blocked_time: 36.0,
            avg_or_utilization: 0.8,
            avg_prep_queue: 1.5,
            avg_or_queue: 2.1,
            avg_recovery_queue: 0.4,
            prep_busy_time: 2000.0,
            op_busy_time: 1100.0,
            recovery_busy_time: 2100.0,
        }
    }

    #[test]
    fn test_export_to_json() {
        let results = vec![sample_result()];

        let file = NamedTempFile::new().unwrap();
        export_to_json(&results, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("avg_or_utilization"));
        assert!(contents.contains("or_blocked_time"));
    }

    #[test]
    fn test_export_to_csv() {
        let sets = ParameterSpace::grid().blocking_policy(vec![true, false]).generate();
        let results = vec![sample_result(), sample_result()];

        let file = NamedTempFile::new().unwrap();
        export_to_csv(&results, &sets, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("experiment_id,run_id,seed"));
        assert!(header.contains("block_or_until_recovery"));
        assert!(header.contains("avg_total_time"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_export_to_csv_rejects_length_mismatch() {
        let sets = ParameterSpace::grid().blocking_policy(vec![true, false]).generate();
        let results = vec![sample_result()];

        let file = NamedTempFile::new().unwrap();
        assert!(export_to_csv(&results, &sets, file.path()).is_err());
    }

    #[test]
    fn test_export_to_csv_rejects_empty_results() {
        let file = NamedTempFile::new().unwrap();
        assert!(export_to_csv(&[], &[], file.path()).is_err());
    }
}
