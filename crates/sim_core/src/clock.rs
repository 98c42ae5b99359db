//! Simulation clock: the time-ordered event queue.
//!
//! Events are popped in timestamp order. Events sharing a timestamp come out
//! in the order they were scheduled, so a replay of the same input always
//! processes the same sequence.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::error::SimError;

/// The five transitions of the dispatch timeline. Payloads are entity
/// handles; the current rider/driver state is read at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RiderRequest { rider: Entity },
    DriverRequest { driver: Entity },
    Cancellation { rider: Entity },
    Pickup { rider: Entity, driver: Entity },
    Dropoff { rider: Entity, driver: Entity },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::RiderRequest { .. } => "RiderRequest",
            EventKind::DriverRequest { .. } => "DriverRequest",
            EventKind::Cancellation { .. } => "Cancellation",
            EventKind::Pickup { .. } => "Pickup",
            EventKind::Dropoff { .. } => "Dropoff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
}

impl Event {
    pub fn new(timestamp: u64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }
}

/// Heap entry: the event plus its insertion sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    event: Event,
    seq: u64,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .event
            .timestamp
            .cmp(&self.event.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Scheduled>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Scheduled { event, seq });
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind) {
        self.schedule(Event::new(timestamp, kind));
    }

    pub fn schedule_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.schedule(event);
        }
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let Scheduled { event, .. } = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    /// Strict variant of [Self::pop_next] for callers that have already
    /// checked [Self::is_empty].
    pub fn remove(&mut self) -> Result<Event, SimError> {
        self.pop_next().ok_or(SimError::EmptyQueue)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|scheduled| scheduled.event.timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
