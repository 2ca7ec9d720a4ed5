//! Domain error types.

use thiserror::Error;

/// Value object / entity construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("shape id must not be empty")]
    EmptyShapeId,

    #[error("stroke width must be a positive finite number (got {0})")]
    InvalidStrokeWidth(f64),

    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
}

/// Broken room bookkeeping. Never expected under atomic access; the store
/// deletes the offending room when it sees one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomInvariantError {
    #[error("connection count of room '{room_id}' would drop below zero")]
    ConnectionCountUnderflow { room_id: String },

    #[error("room '{room_id}' counts {actual} connections but has {expected} members")]
    ConnectionCountMismatch {
        room_id: String,
        expected: usize,
        actual: usize,
    },
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
