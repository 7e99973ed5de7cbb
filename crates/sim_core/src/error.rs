//! Error taxonomy for the simulation core.
//!
//! There are no recoverable runtime errors in the modeled domain: a patient
//! that enters a stage always completes it. Everything here is either a
//! pre-run configuration problem or an internal scheduler fault.

use thiserror::Error;

use crate::clock::SimTime;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Rejected eagerly by validation, before any event is dispatched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An event came due earlier than the current clock. This is a scheduler
    /// defect, not an expected runtime condition; treat any occurrence as fatal.
    #[error("event due at {due} is earlier than the current clock {now}")]
    InvalidScheduling { due: SimTime, now: SimTime },
}
