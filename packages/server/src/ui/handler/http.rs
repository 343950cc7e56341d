//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    infrastructure::dto::http::{HandDetailDto, MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomStateError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms with at least one connection
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.room_id.as_str().to_string(),
            members: room
                .members
                .into_iter()
                .map(|m| m.username.into_string())
                .collect(),
        })
        .collect();

    Json(room_summaries)
}

/// Get room members and hand state by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_state_usecase.execute(room_id).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: room.room_id.as_str().to_string(),
                members: room.members.into_iter().map(MemberDetailDto::from).collect(),
                hand: room.hand_state.map(HandDetailDto::from),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomStateError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomStateError::Repository(e)) => {
            tracing::error!("Failed to read room state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Fallback for every unknown route
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({})))
}
