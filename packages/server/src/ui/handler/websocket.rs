//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, RelayMessage},
    ui::state::AppState,
};

/// `GET /`: upgrades WebSocket requests, answers plain HTTP requests with the greeting
pub async fn root_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match ws {
        Ok(ws) => upgrade(ws, state),
        Err(_) => state.config.greeting.clone().into_response(),
    }
}

/// `GET /ws`: WebSocket only
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    upgrade(ws, state)
}

fn upgrade(ws: WebSocketUpgrade, state: Arc<AppState>) -> Response {
    ws.on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

fn to_ws_message(message: RelayMessage) -> Message {
    match message {
        RelayMessage::Text(text) => Message::Text(text.to_string().into()),
        RelayMessage::Binary(data) => Message::Binary(data),
    }
}

/// Spawns a task that drains the connection's send queue into the WebSocket sender.
///
/// The queue is closed when the hub unregisters the connection; the task then
/// sends a close frame and exits.
///
/// # Arguments
///
/// * `id` - Connection the queue belongs to (for logging)
/// * `rx` - Send queue filled by the hub
/// * `sender` - WebSocket sink of this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    id: ConnectionId,
    mut rx: mpsc::Receiver<RelayMessage>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = sender.send(to_ws_message(message)).await {
                tracing::debug!("Failed to write to '{}': {}", id, e);
                return;
            }
        }
        if let Err(e) = sender.close().await {
            tracing::debug!("Failed to close '{}': {}", id, e);
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = ConnectionIdFactory::generate();
    let (tx, rx) = mpsc::channel(state.config.send_queue_capacity);

    // Registers the connection and queues the greeting before any broadcast can reach it
    if let Err(e) = state.hub.connect(id, tx).await {
        tracing::warn!("Failed to register connection '{}': {}", id, e);
        return;
    }
    tracing::info!("Client '{}' connected", id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(id, rx, sender);

    // Spawn a task to receive messages from this client
    let hub = state.hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", id, e);
                    break;
                }
            };

            let message = match msg {
                Message::Text(text) => RelayMessage::text(text.as_str()),
                Message::Binary(data) => RelayMessage::binary(data),
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", id);
                    break;
                }
            };

            if let Err(e) = hub.relay(id, message).await {
                tracing::warn!("Failed to relay message from '{}': {}", id, e);
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.hub.disconnect(id).await {
        tracing::debug!("Skipping removal of '{}': {}", id, e);
    }
    tracing::info!("Client '{}' disconnected", id);
}
