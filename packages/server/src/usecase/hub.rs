//! リレーハブ
//!
//! 接続・リレー・切断のコマンドを 1 本のタスクで順番に処理します。
//! Registry を変更するのはこのタスクだけで、各コマンドは次のコマンドより前に完了します。
//!
//! ```text
//! 接続ごとの受信タスク ──(HubCommand)──> RelayHub タスク ──> MessagePusher ──> 接続ごとの送信タスク
//! ```
//!
//! 同じ接続から送られたコマンドは送信順に処理されるため、
//! ある接続のメッセージは受信した順にファンアウトされます。

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{ConnectionId, PusherChannel, RelayMessage, Timestamp};

use super::{
    ConnectClientUseCase, DisconnectClientUseCase, RelayMessageUseCase,
    error::{ConnectError, HubError},
};

/// ハブのコマンドキューの容量
///
/// 満杯の間、受信タスクはソケットからの読み込みを止めて待ちます。
const HUB_QUEUE_CAPACITY: usize = 1024;

enum HubCommand {
    Connect {
        id: ConnectionId,
        sender: PusherChannel,
        reply: oneshot::Sender<Result<Timestamp, ConnectError>>,
    },
    Relay {
        from: ConnectionId,
        message: RelayMessage,
    },
    Disconnect {
        id: ConnectionId,
    },
    Shutdown {
        reply: oneshot::Sender<usize>,
    },
}

/// リレーハブへのハンドル
#[derive(Clone)]
pub struct RelayHub {
    commands: mpsc::Sender<HubCommand>,
}

impl RelayHub {
    /// ハブのタスクを起動
    ///
    /// ハブはハンドルが全て drop されるか、`shutdown()` が呼ばれるまで動き続けます。
    pub fn spawn(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    ) -> (Self, JoinHandle<()>) {
        let (commands, rx) = mpsc::channel(HUB_QUEUE_CAPACITY);
        let worker = HubWorker {
            connect_client_usecase,
            relay_message_usecase,
            disconnect_client_usecase,
        };
        let handle = tokio::spawn(worker.run(rx));
        (Self { commands }, handle)
    }

    /// 接続を登録し、あいさつを送信キューに積む
    pub async fn connect(
        &self,
        id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, HubError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Connect { id, sender, reply }).await?;
        let connected_at = rx.await.map_err(|_| HubError::Stopped)??;
        Ok(connected_at)
    }

    /// 受信したメッセージのファンアウトを依頼
    pub async fn relay(&self, from: ConnectionId, message: RelayMessage) -> Result<(), HubError> {
        self.send(HubCommand::Relay { from, message }).await
    }

    /// 接続の削除を依頼（冪等）
    pub async fn disconnect(&self, id: ConnectionId) -> Result<(), HubError> {
        self.send(HubCommand::Disconnect { id }).await
    }

    /// 残っている全ての接続を閉じてハブを停止
    ///
    /// # Returns
    ///
    /// 閉じた接続数
    pub async fn shutdown(&self) -> Result<usize, HubError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Shutdown { reply }).await?;
        rx.await.map_err(|_| HubError::Stopped)
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HubError::Stopped)
    }
}

struct HubWorker {
    connect_client_usecase: Arc<ConnectClientUseCase>,
    relay_message_usecase: Arc<RelayMessageUseCase>,
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
}

impl HubWorker {
    async fn run(self, mut rx: mpsc::Receiver<HubCommand>) {
        tracing::debug!("Relay hub started");

        while let Some(command) = rx.recv().await {
            match command {
                HubCommand::Connect { id, sender, reply } => {
                    let result = self.connect_client_usecase.execute(id, sender).await;
                    if let Err(e) = &result {
                        tracing::warn!("Rejected connection '{}': {}", id, e);
                    }
                    if reply.send(result).is_err() {
                        // 接続タスクが応答を待たずに終了した
                        self.disconnect_client_usecase.execute(id).await;
                    }
                }
                HubCommand::Relay { from, message } => {
                    let outcome = self.relay_message_usecase.execute(from, message).await;
                    for id in outcome.evict {
                        tracing::warn!("Evicting connection '{}' after failed write", id);
                        self.disconnect_client_usecase.execute(id).await;
                    }
                }
                HubCommand::Disconnect { id } => {
                    self.disconnect_client_usecase.execute(id).await;
                }
                HubCommand::Shutdown { reply } => {
                    rx.close();
                    let closed = self.disconnect_client_usecase.close_all().await;
                    tracing::info!("Relay hub closed {} remaining connections", closed);
                    let _ = reply.send(closed);
                    break;
                }
            }
        }

        tracing::debug!("Relay hub stopped");
    }
}
