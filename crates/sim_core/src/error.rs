//! Error types for the simulation core and event-list ingestion.

use bevy_ecs::prelude::Entity;
use thiserror::Error;

/// Fatal conditions raised while running the simulation.
///
/// None of these are recoverable: they indicate a defect in the event graph
/// and abort the run without producing a report.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// The scheduler was asked for an event while empty.
    #[error("event queue is empty")]
    EmptyQueue,
    /// A state transition found the world in a state it can never be in.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// An event referenced an entity that holds no rider/driver component.
    #[error("unknown entity {0:?}")]
    UnknownEntity(Entity),
    /// Two riders or two drivers share an identifier.
    #[error("duplicate identifier `{0}`")]
    DuplicateId(String),
    /// A driver cannot move with the given speed.
    #[error("driver `{id}` has unusable speed {speed}")]
    InvalidSpeed { id: String, speed: f64 },
    /// A scheduled time or travel duration does not fit in a `u64`.
    #[error("time overflow: {0}")]
    TimeOverflow(String),
}

impl SimError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        SimError::InvariantViolation(message.into())
    }
}

/// Errors surfaced while reading an event list.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    #[error("line {line}: identifier `{id}` already declared")]
    DuplicateId { line: usize, id: String },
    #[error("failed to read event list: {0}")]
    Io(#[from] std::io::Error),
}
