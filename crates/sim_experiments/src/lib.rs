//! Parallel experimentation framework for hospital patient-flow parameter sweeps.
//!
//! Runs multiple simulations in parallel with varying capacities, demand, and
//! OR-release policies, extracts summary metrics, and exports results for
//! analysis of how resource levels and blocking affect patient throughput.
//!
//! # Quick Start
//!
//! ```no_run
//! use sim_experiments::{run_parallel_experiments, export_to_csv, ParameterSpace};
//!
//! // Define parameter space (grid search)
//! let space = ParameterSpace::grid()
//!     .recovery_units(vec![2, 3, 4, 5])
//!     .interarrival_mean(vec![15.0, 20.0, 25.0])
//!     .blocking_policy(vec![true, false]);
//!
//! // Generate parameter sets
//! let parameter_sets = space.generate();
//!
//! // Run experiments in parallel
//! let results = run_parallel_experiments(&parameter_sets, None).unwrap();
//!
//! // Export paired results for analysis
//! export_to_csv(&results, &parameter_sets, "sweep.csv").unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: Parameter variation framework (grid search, random sampling)
//! - [`runner`]: Parallel simulation execution using rayon
//! - [`metrics`]: Metrics extraction from simulation results
//! - [`export`]: Result export to JSON/CSV

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{export_to_csv, export_to_json};
pub use metrics::{extract_metrics, ExperimentResult};
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_single_experiment};
