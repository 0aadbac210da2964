//! Core domain models for the chat relay.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::value_object::{ConnectionId, DisplayName, RoomId, Timestamp};

/// Represents one live connection.
///
/// A session exists in the registry if and only if its underlying connection
/// is open and has not yet been evicted by the disconnect handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Connection identifier assigned by the gateway
    pub id: ConnectionId,
    /// Display name registered at join time, if any
    pub display_name: Option<DisplayName>,
    /// Timestamp when the connection was accepted
    pub connected_at: Timestamp,
}

impl Session {
    /// Create a new session with no display name and no room membership.
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name: None,
            connected_at,
        }
    }

    /// Record the display name for this session.
    ///
    /// Calling again overwrites the previous name; room membership is
    /// unaffected.
    pub fn set_display_name(&mut self, name: DisplayName) {
        self.display_name = Some(name);
    }

    /// Whether this session registered the given display name.
    pub fn has_name(&self, name: &str) -> bool {
        self.display_name
            .as_ref()
            .is_some_and(|n| n.as_str() == name)
    }
}

/// Represents a named broadcast group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Connection ids currently joined
    pub members: HashSet<ConnectionId>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room.
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: HashSet::new(),
            created_at,
        }
    }

    /// Add a connection to the member set. Returns false if it was already
    /// a member.
    pub fn insert_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// Remove a connection from the member set. Returns false if it was not
    /// a member.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    /// Whether the connection is currently a member.
    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }
}
