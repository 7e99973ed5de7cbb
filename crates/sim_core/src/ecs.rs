use bevy_ecs::prelude::Component;

use crate::clock::SimTime;

/// Where a patient currently is in the prep -> OR -> recovery pipeline.
///
/// `AwaitingRecovery` only occurs under the blocking OR-release policy: the
/// operation has finished but the patient still holds the OR while waiting
/// for a recovery bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    PrepQueued,
    Prepping,
    OrQueued,
    Operating,
    AwaitingRecovery,
    RecoveryQueued,
    Recovering,
}

/// Patient identity and stage durations, fixed at arrival and immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Patient {
    pub id: u64,
    pub created_at: SimTime,
    pub prep_time: f64,
    pub op_time: f64,
    pub rec_time: f64,
}

/// Mutable per-patient flow context: the current state plus the timestamps
/// needed to derive waiting times when the flow completes.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct PatientFlow {
    pub state: FlowState,
    /// When the patient joined the prep queue (equals arrival time).
    pub prep_queued_at: SimTime,
    pub prep_started_at: Option<SimTime>,
    pub or_queued_at: Option<SimTime>,
    pub op_started_at: Option<SimTime>,
    pub recovery_queued_at: Option<SimTime>,
    /// Set while the OR is held past operation end waiting for a recovery bed.
    pub or_blocked_since: Option<SimTime>,
    pub recovery_started_at: Option<SimTime>,
}

impl PatientFlow {
    pub fn queued_at(now: SimTime) -> Self {
        Self {
            state: FlowState::PrepQueued,
            prep_queued_at: now,
            prep_started_at: None,
            or_queued_at: None,
            op_started_at: None,
            recovery_queued_at: None,
            or_blocked_since: None,
            recovery_started_at: None,
        }
    }
}
