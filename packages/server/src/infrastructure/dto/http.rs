//! HTTP API response DTOs for the chat relay.

use serde::{Deserialize, Serialize};

/// Room summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
    pub created_at: String, // ISO 8601
}

/// Room detail for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub created_at: String, // ISO 8601
}

/// Member detail for the room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub display_name: Option<String>,
    pub connected_at: String, // ISO 8601
}
