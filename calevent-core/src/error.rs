//! Error types for calevent operations.

use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in calevent operations.
#[derive(Error, Debug)]
pub enum CalEventError {
    /// A write-once UID check refused to overwrite an existing UID.
    #[error("Cannot set UID '{uid}' on event {event_id}: it already has UID '{existing}'")]
    UidAlreadySet {
        uid: String,
        event_id: EventId,
        existing: String,
    },

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Invalid event hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("User lookup failed: {0}")]
    Lookup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calevent operations.
pub type CalEventResult<T> = Result<T, CalEventError>;
