//! Shared utilities for the Idobata chat relay.
//!
//! Logging setup and timestamp helpers used by both the server and the
//! CLI client binaries.

pub mod logger;
pub mod time;
