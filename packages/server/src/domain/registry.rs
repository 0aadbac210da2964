//! Session registry contract.
//!
//! The registry exclusively owns the session and room tables. The usecase
//! layer only reads and requests mutations through this trait and never
//! touches the tables directly (依存性の逆転). Implementations must make every
//! mutating operation and every membership snapshot atomic with respect to
//! concurrent mutations: a fan-out snapshot taken after `evict` returns must
//! never contain the evicted connection.

use async_trait::async_trait;

use super::{
    entity::{Room, Session},
    error::RegistryError,
    value_object::{ConnectionId, DisplayName, RoomId},
};

/// Result of evicting a session: the rooms it was removed from and the
/// display name it had registered, if any. Empty when the connection was
/// not registered (disconnects may be delivered more than once).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Eviction {
    pub rooms: Vec<RoomId>,
    pub display_name: Option<DisplayName>,
}

impl Eviction {
    /// Whether the eviction removed anything.
    pub fn is_noop(&self) -> bool {
        self.rooms.is_empty() && self.display_name.is_none()
    }
}

/// Registry of live connections and room membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Create a session with no display name and no room membership.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateConnection` if the id is already
    /// registered.
    async fn register(&self, connection_id: ConnectionId) -> Result<(), RegistryError>;

    /// Record the display name for a session. Overwrites a previous name
    /// without touching room membership. No uniqueness check is made.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownConnection` if the session does not
    /// exist.
    async fn set_display_name(
        &self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), RegistryError>;

    /// Add the connection to the room's member set, creating the room if
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownConnection` if the session does not
    /// exist.
    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), RegistryError>;

    /// Remove the connection from the room's member set. Returns the room's
    /// members prior to removal, for notification purposes. No-op (returns
    /// the current members) if the connection was not a member.
    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Remove the session and strip it from every room's member set
    /// atomically. No-op returning an empty `Eviction` if the connection
    /// does not exist.
    async fn evict(&self, connection_id: &ConnectionId) -> Eviction;

    /// Resolve a display name to one member of the room. When several
    /// members share the name, the earliest-registered one wins, so the
    /// result is deterministic.
    async fn resolve_by_name(&self, room_id: &RoomId, name: &str) -> Option<ConnectionId>;

    /// Snapshot of the room's current member set. May be stale immediately
    /// after return under concurrent modification; callers must tolerate
    /// delivering to a connection that has just disconnected.
    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Snapshot of one session.
    async fn session(&self, connection_id: &ConnectionId) -> Option<Session>;

    /// Snapshot of all sessions.
    async fn sessions(&self) -> Vec<Session>;

    /// Snapshot of one room.
    async fn room(&self, room_id: &RoomId) -> Option<Room>;

    /// Snapshot of all rooms.
    async fn rooms(&self) -> Vec<Room>;
}
