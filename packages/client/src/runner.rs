//! Client execution logic.
//!
//! A dropped connection ends the client; there is no automatic reconnect.

use crate::{
    error::ClientError,
    room_name::{build_join_url, generate_room_name},
    session::run_client_session,
};

/// Join `room` (or a freshly named one) on the server at `url` as `username`.
pub async fn run_client(
    url: String,
    room: Option<String>,
    username: String,
) -> Result<(), ClientError> {
    let room_id = room.unwrap_or_else(generate_room_name);
    let join_url = build_join_url(&url, &room_id, &username)?;

    tracing::info!(
        "Attempting to join room '{}' at {} as '{}'",
        room_id,
        url,
        username
    );

    match run_client_session(&join_url, &room_id, &username).await {
        Ok(()) => {
            tracing::info!("Client session ended normally");
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Client session ended: {}", e);
            Err(e)
        }
    }
}
