#![forbid(unsafe_code)]

use thiserror::Error;

use crate::{media_type::MediaType, queue::OperationKind};

/// Failure reported by an external sink. Opaque: the core never
/// interprets collaborator failures, it only routes them.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SinkError {
    message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Registry-level errors, surfaced synchronously from `create`.
#[derive(Debug, Error)]
pub enum BufferError {
    /// A slot for the type is already live. Callers must dispose before
    /// recreating; two consumers never race on one physical sink.
    #[error("A {0} buffer has already been created")]
    AlreadyExists(MediaType),

    /// No sink constructor was registered for this custom type.
    #[error("No {0} sink capability is registered")]
    FeatureNotActivated(MediaType),

    /// Required per-type construction data is missing.
    #[error("Invalid {media_type} buffer options: {reason}")]
    InvalidOptions {
        media_type: MediaType,
        reason: String,
    },

    #[error("Unknown buffer type: {0}")]
    UnknownType(String),

    /// The media source refused to attach a native sink.
    #[error("Failed to attach native sink: {0}")]
    Sink(#[from] SinkError),
}

pub type BufferResult<T> = Result<T, BufferError>;

/// Per-operation outcomes delivered through [`OperationHandle`]s.
///
/// A failed operation, an operation cancelled because an earlier one
/// failed, and an operation cancelled by an explicit abort are three
/// distinct outcomes: callers retry them differently.
///
/// [`OperationHandle`]: crate::queue::OperationHandle
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    /// The sink rejected this specific operation.
    #[error("Sink rejected {kind} operation: {source}")]
    Sink {
        kind: OperationKind,
        source: SinkError,
    },

    /// Cascade cancellation: an operation queued ahead of this one
    /// failed, leaving the buffer in an indeterminate state.
    #[error("Operation cancelled after an earlier operation failed: {cause}")]
    CancelledByFailure { cause: String },

    /// Cancelled by `abort` or queue disposal.
    #[error("Operation aborted")]
    Aborted,

    /// The queue was shut down before the operation could be accepted.
    #[error("Sink queue is closed")]
    Closed,
}

pub type QueueResult<T> = Result<T, QueueError>;
