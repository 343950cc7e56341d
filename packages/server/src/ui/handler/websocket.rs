//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use handraise_shared::protocol::ClientMessage;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{RoomId, Username},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let username = Username::new(query.username.unwrap_or_default());

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, username)))
}

/// `/ws` without a room segment
pub async fn missing_room() -> StatusCode {
    tracing::warn!("Rejecting connection without room id");
    StatusCode::BAD_REQUEST
}

/// Spawns a task that forwards queued messages to the WebSocket sender.
///
/// Ends when the channel closes or the socket refuses a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    username: Username,
) {
    let (sender, mut receiver) = socket.split();

    // Channel for messages pushed to this connection
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state
        .connect_member_usecase
        .execute(&room_id, username.clone(), tx)
        .await;

    let state_clone = state.clone();
    let room_id_clone = room_id.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text);
                    let intent = match ClientMessage::from_json(&text) {
                        Ok(intent) => intent,
                        Err(e) => {
                            tracing::warn!("Ignoring invalid message from '{}': {}", username, e);
                            continue;
                        }
                    };

                    let result = match intent {
                        ClientMessage::RaiseHand => {
                            state_clone
                                .raise_hand_usecase
                                .execute(&room_id_clone, &username)
                                .await
                        }
                        ClientMessage::LowerHand => {
                            state_clone
                                .lower_hand_usecase
                                .execute(&room_id_clone, &username)
                                .await
                        }
                    };
                    if let Err(e) = result {
                        tracing::warn!("{:?} from '{}' failed: {}", intent, username, e);
                    }
                }
                Message::Binary(_) => {
                    tracing::warn!("Ignoring binary frame from '{}'", username);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_member_usecase
        .execute(&room_id, &connection_id)
        .await;
}
