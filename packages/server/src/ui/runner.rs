//! Server runner: wires the registry, the routes, and the listener together.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::SessionRegistry,
    infrastructure::registry::InMemorySessionRegistry,
    ui::{handler, signal, state::AppState},
};

/// Listening address configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Run the chat relay server until a shutdown signal arrives.
///
/// The registry lives exactly as long as the server future: it is created
/// here and injected into the gateway state, never stored globally.
pub async fn run(config: ServerConfig) -> Result<(), std::io::Error> {
    let registry: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
    let state = Arc::new(AppState::new(registry));

    let app = Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/api/rooms", get(handler::get_rooms))
        .route("/api/rooms/{room_id}", get(handler::get_room_detail))
        .route("/ws", get(handler::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(signal::shutdown_signal())
        .await
}
