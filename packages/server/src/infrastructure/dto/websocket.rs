//! WebSocket event DTOs for the chat relay.
//!
//! Events are JSON objects tagged by a kebab-case `type` field. Decoding is
//! permissive at the gateway: a frame that fails to decode is discarded
//! without closing the connection.

use serde::{Deserialize, Serialize};

/// Display name used for server-authored notices.
pub const SYSTEM_SENDER: &str = "System";

/// Inbound events (client → server).
///
/// The `sender` fields are part of the wire format for compatibility but
/// carry no authority: the server derives the sender identity from the
/// registered session. `contact` is accepted at join time and not used by
/// the routing core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    Join {
        name: String,
        contact: String,
    },
    RoomMessage {
        text: String,
        sender: String,
    },
    DirectMessage {
        to: String,
        text: String,
        sender: String,
    },
}

/// Outbound events (server → client).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    RoomMessage { text: String, sender: String },
    DirectMessage { text: String, sender: String },
}
