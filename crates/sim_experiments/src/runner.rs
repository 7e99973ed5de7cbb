//! Parallel simulation execution using rayon.
//!
//! Runs single simulations and executes parameter sweeps concurrently.
//! Each run owns its world and RNG stream, so runs share no state.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use sim_core::{run_sim, SimError};

use crate::metrics::{extract_metrics, ExperimentResult};
use crate::parameters::ParameterSet;

/// Run a single simulation with the given parameter set.
///
/// Applies the set's seed, runs the simulation to its horizon, and extracts
/// the summary metrics.
pub fn run_single_experiment(param_set: &ParameterSet) -> Result<ExperimentResult, SimError> {
    let outcome = run_sim(&param_set.sim_config())?;
    Ok(extract_metrics(&outcome))
}

/// Run multiple simulations in parallel.
///
/// Uses rayon to execute simulations concurrently across available CPU cores.
/// Results come back in the same order as the input parameter sets; the first
/// failing run aborts the sweep.
///
/// # Arguments
///
/// * `parameter_sets` - Parameter sets to run
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
pub fn run_parallel_experiments(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
) -> Result<Vec<ExperimentResult>, SimError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with optional progress bar.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<ExperimentResult>, SimError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let pool = if let Some(threads) = num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("Failed to create thread pool")
    } else {
        rayon::ThreadPoolBuilder::new()
            .build()
            .expect("Failed to create thread pool")
    };

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_experiment(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;
    use sim_core::SimConfig;

    fn quick_base() -> SimConfig {
        SimConfig::default().with_sim_duration(240.0)
    }

    #[test]
    fn test_single_experiment() {
        let space = ParameterSpace::grid().with_base(quick_base()).op_units(vec![1]);
        let sets = space.generate();
        let result = run_single_experiment(&sets[0]).expect("clean run");

        assert!(result.completed > 0);
        assert!(result.avg_total_time > 0.0);
    }

    #[test]
    fn test_single_experiment_rejects_invalid_config() {
        let set = crate::parameters::ParameterSet::new(
            SimConfig::default().with_sim_duration(-1.0),
            "exp_bad".to_string(),
            0,
            0,
        );
        assert!(run_single_experiment(&set).is_err());
    }

    #[test]
    fn test_parallel_experiments() {
        let space = ParameterSpace::grid()
            .with_base(quick_base())
            .recovery_units(vec![2, 4])
            .blocking_policy(vec![true, false]);
        let sets = space.generate();
        let results =
            run_parallel_experiments_with_progress(&sets, Some(2), false).expect("clean sweep");

        assert_eq!(results.len(), 4); // 2 * 2 = 4 combinations
        for result in &results {
            assert!(result.avg_or_utilization >= 0.0);
        }
    }

    #[test]
    fn test_parallel_results_match_sequential_order() {
        let space = ParameterSpace::grid()
            .with_base(quick_base())
            .op_units(vec![1, 2]);
        let sets = space.generate();

        let parallel =
            run_parallel_experiments_with_progress(&sets, Some(2), false).expect("clean sweep");
        let sequential: Vec<_> = sets
            .iter()
            .map(|set| run_single_experiment(set).expect("clean run"))
            .collect();

        assert_eq!(parallel, sequential);
    }
}
