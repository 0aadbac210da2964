//! WebSocket connection handlers.
//!
//! One task pair per connection: a read loop decoding inbound frames into
//! typed events and dispatching them to the usecase layer, and a write loop
//! draining the per-connection channel. Events from one connection are
//! processed in arrival order.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, DisplayName, MessageContent},
    infrastructure::dto::websocket::{ClientEvent, SYSTEM_SENDER, ServerEvent},
    ui::state::AppState,
    usecase::{
        ConnectParticipantUseCase, DirectMessageUseCase, DisconnectParticipantUseCase,
        JoinRoomUseCase, RoomMessageUseCase,
    },
};

/// Interval for server-initiated pings; bounds how long a dead peer can hold
/// its session.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();

    let connect_usecase = ConnectParticipantUseCase::new(state.registry.clone());
    if let Err(e) = connect_usecase.execute(connection_id.clone()).await {
        // Identifier generation defect; fatal to this connection's setup.
        tracing::error!("failed to register connection '{}': {}", connection_id, e);
        return;
    }

    // Create a channel for this client to receive outbound frames
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connected_clients
        .lock()
        .await
        .insert(connection_id.clone(), tx);
    tracing::info!("connection '{}' registered", connection_id);

    let (sender, receiver) = socket.split();
    let mut send_task = tokio::spawn(write_frames(sender, rx));
    let read_state = state.clone();
    let read_connection_id = connection_id.clone();
    let mut recv_task =
        tokio::spawn(async move { read_frames(receiver, read_state, read_connection_id).await });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Release the handle first: delivery to this connection is over.
    state.connected_clients.lock().await.remove(&connection_id);

    let disconnect_usecase = DisconnectParticipantUseCase::new(state.registry.clone());
    for departure in disconnect_usecase.execute(&connection_id).await {
        let payload = serde_json::to_string(&ServerEvent::RoomMessage {
            text: departure.notice,
            sender: SYSTEM_SENDER.to_string(),
        })
        .unwrap();
        state.deliver(&departure.targets, &payload).await;
    }
    tracing::info!("connection '{}' disconnected", connection_id);
}

/// Read loop: decode inbound frames and dispatch them in arrival order.
async fn read_frames(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("websocket error on '{}': {}", connection_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_event(&state, &connection_id, &text).await,
            Message::Close(_) => {
                tracing::info!("connection '{}' requested close", connection_id);
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                // keep-alive traffic; pings are answered by the protocol layer
            }
            Message::Binary(_) => {
                // not part of the protocol; discarded without closing
                tracing::debug!("discarding binary frame from '{}'", connection_id);
            }
        }
    }
}

/// Decode one frame and route it. Malformed frames and events that fail
/// validation are logged and dropped; the connection stays open.
async fn handle_event(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("discarding malformed frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match event {
        // contact is accepted for the join form but plays no role in routing
        ClientEvent::Join { name, contact: _ } => {
            let name = match DisplayName::try_from(name) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!("dropping join from '{}': {}", connection_id, e);
                    return;
                }
            };
            tracing::info!("'{}' joined as '{}'", connection_id, name);

            let join_usecase = JoinRoomUseCase::new(state.registry.clone());
            match join_usecase.execute(connection_id, name).await {
                Ok(join) => {
                    let payload = serde_json::to_string(&ServerEvent::RoomMessage {
                        text: join.notice,
                        sender: SYSTEM_SENDER.to_string(),
                    })
                    .unwrap();
                    state.deliver(&join.targets, &payload).await;
                }
                Err(e) => {
                    tracing::warn!("dropping join from '{}': {}", connection_id, e);
                }
            }
        }
        // the client-asserted sender field carries no authority; the usecase
        // derives the sender name from the registered session
        ClientEvent::RoomMessage { text, sender: _ } => {
            let text = match MessageContent::try_from(text) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("dropping room message from '{}': {}", connection_id, e);
                    return;
                }
            };

            let room_usecase = RoomMessageUseCase::new(state.registry.clone());
            match room_usecase.execute(connection_id, text).await {
                Ok(broadcast) => {
                    let payload = serde_json::to_string(&ServerEvent::RoomMessage {
                        text: broadcast.text.into_string(),
                        sender: broadcast.sender.into_string(),
                    })
                    .unwrap();
                    state.deliver(&broadcast.targets, &payload).await;
                }
                Err(e) => {
                    tracing::warn!("dropping room message from '{}': {}", connection_id, e);
                }
            }
        }
        ClientEvent::DirectMessage { to, text, sender: _ } => {
            let text = match MessageContent::try_from(text) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("dropping direct message from '{}': {}", connection_id, e);
                    return;
                }
            };

            let direct_usecase = DirectMessageUseCase::new(state.registry.clone());
            match direct_usecase.execute(connection_id, &to, text).await {
                Ok(Some(delivery)) => {
                    let payload = serde_json::to_string(&ServerEvent::DirectMessage {
                        text: delivery.text.into_string(),
                        sender: delivery.sender.into_string(),
                    })
                    .unwrap();
                    state.deliver(&[delivery.target], &payload).await;
                }
                Ok(None) => {
                    // unresolved recipient: no delivery, no error to the sender
                    tracing::debug!(
                        "direct message from '{}' to unknown name '{}' dropped",
                        connection_id,
                        to
                    );
                }
                Err(e) => {
                    tracing::warn!("dropping direct message from '{}': {}", connection_id, e);
                }
            }
        }
    }
}

/// Write loop: drain the per-connection channel and ping on an interval so
/// the transport notices dead peers.
async fn write_frames(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let mut keep_alive = tokio::time::interval(KEEP_ALIVE_INTERVAL);
    loop {
        tokio::select! {
            maybe_frame = rx.recv() => match maybe_frame {
                Some(frame) => {
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            _ = keep_alive.tick() => {
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}
