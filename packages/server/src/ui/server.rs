//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::trace::TraceLayer;
use yamabiko_shared::time::{Clock, SystemClock};

use crate::{
    config::{ConfigError, RelayConfig},
    domain::{RelayMessage, Timestamp},
    infrastructure::{message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRelayStatsUseCase, RelayHub,
        RelayMessageUseCase,
    },
};

use super::{
    handler::{get_stats, health_check, root_handler, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(RelayConfig::default())?;
/// server.run("0.0.0.0".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    hub_task: JoinHandle<()>,
}

impl Server {
    /// Create a new Server instance with the in-memory registry and WebSocket pusher.
    ///
    /// Must be called from within a tokio runtime: the relay hub task is spawned here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid (e.g. a zero send queue capacity).
    pub fn from_config(config: RelayConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let started_at = Timestamp::new(clock.now_millis());
        let greeting = RelayMessage::text(config.greeting.as_str());

        // 1. Registry と MessagePusher
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 2. UseCases
        let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            clock,
            greeting.clone(),
        ));
        let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            config.follow_up_greeting.then_some(greeting),
        ));
        let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
            registry.clone(),
            message_pusher,
        ));
        let get_relay_stats_usecase = Arc::new(GetRelayStatsUseCase::new(registry, started_at));

        // 3. Relay hub
        let (hub, hub_task) = RelayHub::spawn(
            connect_client_usecase,
            relay_message_usecase,
            disconnect_client_usecase,
        );

        let state = Arc::new(AppState {
            hub,
            get_relay_stats_usecase,
            config,
        });

        Ok(Self { state, hub_task })
    }

    fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント（`/` は通常の GET ではあいさつを返す）
            .route("/", get(root_handler))
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the relay server until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// On shutdown the relay hub closes every remaining connection before the
    /// HTTP server finishes draining.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting connections fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let hub = self.state.hub.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                match hub.shutdown().await {
                    Ok(closed) => tracing::info!("Closed {} connections", closed),
                    Err(e) => tracing::warn!("Relay hub already stopped: {}", e),
                }
            })
            .await?;

        drop(self.state);
        if let Err(e) = self.hub_task.await {
            tracing::error!("Relay hub task failed: {}", e);
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_rejects_zero_send_queue_capacity() {
        // テスト項目: 送信キューの容量 0 ではサーバーを作成できない
        // given (前提条件):
        let config = RelayConfig {
            send_queue_capacity: 0,
            ..RelayConfig::default()
        };

        // when (操作):
        let result = Server::from_config(config);

        // then (期待する結果):
        assert!(matches!(result, Err(ConfigError::ZeroSendQueueCapacity)));
    }

    #[tokio::test]
    async fn test_from_config_accepts_default_config() {
        // テスト項目: デフォルト設定でサーバーを作成できる
        // given (前提条件):
        let config = RelayConfig::default();

        // when (操作):
        let result = Server::from_config(config);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
