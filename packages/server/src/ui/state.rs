//! Server state and connection handle management.
//!
//! The gateway owns the raw connection handles. The registry and the usecase
//! layer only ever see `ConnectionId`s; frames reach a connection through the
//! per-connection sender channel kept here.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, mpsc};

use crate::domain::{ConnectionId, SessionRegistry};

/// Shared application state
pub struct AppState {
    /// Session registry (ルーティングの唯一の共有可変状態)
    pub registry: Arc<dyn SessionRegistry>,
    /// Per-connection sender channels for outbound frames
    pub connected_clients: Arc<Mutex<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>>,
}

impl AppState {
    /// Create the shared state around an injected registry.
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self {
            registry,
            connected_clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Deliver an encoded frame to each target connection.
    ///
    /// A target whose handle is gone or whose channel is closed is skipped:
    /// delivery to a connection mid-teardown is dropped, not retried, and not
    /// reported to the original sender.
    pub async fn deliver(&self, targets: &[ConnectionId], payload: &str) {
        let clients = self.connected_clients.lock().await;
        for target in targets {
            if let Some(sender) = clients.get(target)
                && sender.send(payload.to_string()).is_err()
            {
                tracing::warn!("failed to deliver frame to connection '{}'", target);
            }
        }
    }
}
