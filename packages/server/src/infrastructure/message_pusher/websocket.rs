//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`PusherChannel`）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と送信タスクは UI 層（`ui/handler/websocket.rs`）が持ちます。
//! この実装は送信キューにメッセージを積むだけで、ソケットへの書き込みを待ちません。
//! 遅いクライアントのキューが満杯になった場合、そのクライアント宛てのメッセージだけを破棄します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{
    BroadcastReport, ConnectionId, MessagePushError, MessagePusher, PusherChannel, RelayMessage,
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

fn try_push(
    id: &ConnectionId,
    sender: &PusherChannel,
    message: &RelayMessage,
) -> Result<(), MessagePushError> {
    sender.try_send(message.clone()).map_err(|e| match e {
        TrySendError::Full(_) => MessagePushError::QueueFull(*id),
        TrySendError::Closed(_) => MessagePushError::ChannelClosed(*id),
    })
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(id, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", id);
    }

    async fn unregister_client(&self, id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(id).is_some() {
            tracing::debug!("Client '{}' unregistered from MessagePusher", id);
        }
    }

    async fn push_to(
        &self,
        id: &ConnectionId,
        message: &RelayMessage,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(id)
            .ok_or(MessagePushError::ClientNotFound(*id))?;
        try_push(id, sender, message)?;
        tracing::debug!("Pushed message to client '{}'", id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        message: &RelayMessage,
    ) -> BroadcastReport {
        let clients = self.clients.lock().await;
        let mut report = BroadcastReport::default();

        for target in targets {
            let Some(sender) = clients.get(target) else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                report.failed.push(*target);
                continue;
            };

            // ブロードキャストでは一部の送信失敗を許容
            match try_push(target, sender, message) {
                Ok(()) => {
                    tracing::debug!("Broadcasted message to client '{}'", target);
                    report.delivered.push(*target);
                }
                Err(e @ MessagePushError::QueueFull(_)) => {
                    tracing::warn!("Dropping message: {}", e);
                    report.dropped.push(*target);
                }
                Err(e) => {
                    tracing::warn!("Failed to push message: {}", e);
                    report.failed.push(*target);
                }
            }
        }

        report
    }
}
