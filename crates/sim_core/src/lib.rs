//! Discrete-event simulation of patient flow through a three-stage hospital
//! pipeline: preparation -> operating room -> recovery.
//!
//! Patients are ECS entities; the clock, stage pools, RNG stream, and metrics
//! store are resources; each event kind is handled by one system. Dispatch is
//! single-threaded and deterministic: simultaneous events fire in scheduling
//! order, so a fixed seed reproduces a run exactly.

pub mod clock;
pub mod config;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod metrics;
pub mod resources;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;

pub use config::SimConfig;
pub use distributions::Distribution;
pub use error::SimError;
pub use simulation::{run_sim, SimOutcome};
