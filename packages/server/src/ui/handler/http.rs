//! HTTP API endpoint handlers.
//!
//! Read-only observation endpoints; none of them take part in routing.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use idobata_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.registry.rooms().await;

    let mut summaries: Vec<RoomSummaryDto> = rooms
        .iter()
        .map(|room| {
            let mut members: Vec<String> =
                room.members.iter().map(|id| id.to_string()).collect();
            members.sort();
            RoomSummaryDto {
                id: room.id.as_str().to_string(),
                members,
                created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            }
        })
        .collect();

    // Sort by room id for consistent ordering
    summaries.sort_by(|a, b| a.id.cmp(&b.id));

    Json(summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .registry
        .room(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut members = Vec::new();
    for connection_id in &room.members {
        // A member evicted between the two snapshots is simply omitted.
        if let Some(session) = state.registry.session(connection_id).await {
            members.push(MemberDetailDto {
                connection_id: connection_id.to_string(),
                display_name: session.display_name.map(|name| name.into_string()),
                connected_at: timestamp_to_jst_rfc3339(session.connected_at.value()),
            });
        }
    }

    // Sort by connection id for consistent ordering
    members.sort_by(|a, b| a.connection_id.cmp(&b.connection_id));

    Ok(Json(RoomDetailDto {
        id: room.id.as_str().to_string(),
        members,
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    }))
}
