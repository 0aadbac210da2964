//! Idobata chat relay server library.
//!
//! Clients join a shared room over WebSocket, exchange broadcast messages,
//! and may exchange direct messages routed by display name. The session
//! registry and the routing usecases form the core; the Axum gateway bridges
//! raw connections to typed events.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, run};
