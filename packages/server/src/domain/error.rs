//! Domain errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomIdError {
    #[error("room id must not be empty")]
    Empty,
}

/// Errors raised by the persistence collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("transaction for room '{0}' was aborted")]
    TransactionAborted(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while pushing messages to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
