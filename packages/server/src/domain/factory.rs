//! Domain factories for creating domain entities and value objects.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Factory for generating ConnectionId instances.
///
/// Encapsulates identifier generation so the gateway never constructs ids by
/// hand. UUID v4 keeps ids unique for the process lifetime, which upholds the
/// registry invariant that an id is never reused while referenced.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(Uuid::new_v4())
    }
}
