//! CLI chat client for the Idobata relay.
//!
//! Connects to the relay, joins the shared room, and bridges an interactive
//! prompt to the WebSocket event stream.

pub mod client;
pub mod error;

// Re-export entry points
pub use client::{ClientConfig, run_client};
pub use error::ClientError;
