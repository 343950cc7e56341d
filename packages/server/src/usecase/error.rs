//! UseCase errors.

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError};

/// Failure of a raise / lower / expire transaction.
///
/// Nothing was committed; callers treat it as "not granted".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArbiterError {
    #[error("hand state transaction failed: {0}")]
    Storage(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("failed to read room state: {0}")]
    Repository(#[from] RepositoryError),

    #[error("failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to push message: {0}")]
    Push(#[from] MessagePushError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomStateError {
    #[error("room not found")]
    RoomNotFound,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
