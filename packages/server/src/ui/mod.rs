//! Transport gateway: WebSocket/HTTP handlers, shared server state, runner.

mod handler;
mod runner;
mod signal;
mod state;

pub use runner::{run, ServerConfig};
