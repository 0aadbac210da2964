//! Client error definitions.

use thiserror::Error;

/// Errors that end the client session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// WebSocket connect/send failure
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Outbound event could not be encoded
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    /// Prompt editor could not be created
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
