use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

/// Simulation time in minutes. Continuous; advanced only by event dispatch.
pub type SimTime = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SimulationStarted,
    PatientArrival,
    PrepDone,
    OperationDone,
    RecoveryDone,
    MonitorTick,
}

/// One pending timer on the simulation timeline.
///
/// `seq` is the insertion order; simultaneous events dispatch in scheduling
/// order, which keeps full runs deterministic for a fixed seed.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub timestamp: SimTime,
    pub seq: u64,
    pub kind: EventKind,
    /// Patient entity a stage timer belongs to; `None` for generator/monitor events.
    pub subject: Option<Entity>,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp,
        // with insertion sequence as the tie-break.
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being dispatched; inserted by the runner before each step.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

use crate::error::SimError;

/// Priority-ordered timeline of pending events plus the simulated clock.
///
/// The clock only moves forward, and only when an event is popped. Scheduling
/// an event in the past is not checked here; it surfaces as
/// [SimError::InvalidScheduling] when the event would be dispatched.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Enqueue an event at an absolute due time.
    pub fn schedule_at(&mut self, due: SimTime, kind: EventKind, subject: Option<Entity>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp: due,
            seq,
            kind,
            subject,
        });
    }

    /// Enqueue an event `delay` minutes from the current clock.
    pub fn schedule_in(&mut self, delay: SimTime, kind: EventKind, subject: Option<Entity>) {
        self.schedule_at(self.now + delay, kind, subject);
    }

    /// Pop the earliest-due event and advance the clock to its due time.
    ///
    /// Fails if the due time is behind the clock, which indicates a scheduler
    /// defect rather than anything a caller can recover from.
    pub fn pop_next(&mut self) -> Result<Option<Event>, SimError> {
        let Some(event) = self.events.pop() else {
            return Ok(None);
        };
        if event.timestamp < self.now {
            return Err(SimError::InvalidScheduling {
                due: event.timestamp,
                now: self.now,
            });
        }
        self.now = event.timestamp;
        Ok(Some(event))
    }

    /// Due time of the earliest pending event, if any. Does not advance the clock.
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pop(clock: &mut SimulationClock) -> Event {
        clock.pop_next().expect("no scheduling fault").expect("event")
    }

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10.0, EventKind::PatientArrival, None);
        clock.schedule_at(5.0, EventKind::MonitorTick, None);
        clock.schedule_at(20.0, EventKind::PatientArrival, None);

        let first = pop(&mut clock);
        assert_eq!(first.timestamp, 5.0);
        assert_eq!(first.kind, EventKind::MonitorTick);
        assert_eq!(clock.now(), 5.0);

        let second = pop(&mut clock);
        assert_eq!(second.timestamp, 10.0);
        assert_eq!(clock.now(), 10.0);

        let third = pop(&mut clock);
        assert_eq!(third.timestamp, 20.0);
        assert_eq!(clock.now(), 20.0);

        assert!(clock.pop_next().expect("clean pop").is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn simultaneous_events_dispatch_in_scheduling_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(7.0, EventKind::PrepDone, None);
        clock.schedule_at(7.0, EventKind::OperationDone, None);
        clock.schedule_at(7.0, EventKind::RecoveryDone, None);

        assert_eq!(pop(&mut clock).kind, EventKind::PrepDone);
        assert_eq!(pop(&mut clock).kind, EventKind::OperationDone);
        assert_eq!(pop(&mut clock).kind, EventKind::RecoveryDone);
    }

    #[test]
    fn schedule_in_is_relative_to_current_clock() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(5.0, EventKind::PatientArrival, None);
        pop(&mut clock);

        clock.schedule_in(3.0, EventKind::PrepDone, None);
        let event = pop(&mut clock);
        assert_eq!(event.timestamp, 8.0);
        assert_eq!(clock.now(), 8.0);
    }

    #[test]
    fn event_due_behind_clock_is_a_scheduling_fault() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(5.0, EventKind::PatientArrival, None);
        pop(&mut clock);

        clock.schedule_at(2.0, EventKind::PrepDone, None);
        let err = clock.pop_next().expect_err("past-due event");
        assert_eq!(err, SimError::InvalidScheduling { due: 2.0, now: 5.0 });
    }

    #[test]
    fn next_event_time_peeks_without_advancing() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.next_event_time(), None);

        clock.schedule_at(12.0, EventKind::MonitorTick, None);
        assert_eq!(clock.next_event_time(), Some(12.0));
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.pending_event_count(), 1);
    }
}
