//! Domain layer for the chat relay.
//!
//! This module contains the session/room model and the registry contract,
//! independent of data transfer objects and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod value_object;

pub use entity::{Room, Session};
pub use error::{RegistryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use registry::{Eviction, SessionRegistry};
pub use value_object::{
    ConnectionId, DEFAULT_ROOM_ID, DisplayName, MessageContent, RoomId, Timestamp,
};
