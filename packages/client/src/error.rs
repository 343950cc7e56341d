//! Error types for the raise-hand client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was closed or failed
    #[error("Disconnected: {0}")]
    Disconnected(String),

    #[error("Failed to encode message: {0}")]
    Serialization(#[from] serde_json::Error),
}
