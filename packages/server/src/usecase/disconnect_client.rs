//! UseCase: クライアント切断処理
//!
//! 切断は冪等です。既に削除済みの接続に対して実行しても何も起きません。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, MessagePusher, RegistryError};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// クライアント切断を実行
    ///
    /// Closing に遷移させてから送信キューを閉じ、Registry から削除します。
    ///
    /// # Returns
    ///
    /// * `Some(Connection)` - 削除された接続（Closed 状態）
    /// * `None` - 既に削除済み
    pub async fn execute(&self, id: ConnectionId) -> Option<Connection> {
        match self.registry.mark_closing(&id).await {
            Ok(()) => {}
            Err(RegistryError::ConnectionNotFound(_)) => {
                tracing::debug!("Connection '{}' already removed", id);
                return None;
            }
            Err(e) => tracing::debug!("Closing '{}' without transition: {}", id, e),
        }

        self.message_pusher.unregister_client(&id).await;
        let removed = self.registry.remove(&id).await;
        if removed.is_some() {
            tracing::info!(
                "Connection '{}' removed ({} remaining)",
                id,
                self.registry.count().await
            );
        }
        removed
    }

    /// 登録中の全ての接続を切断（シャットダウン時）
    ///
    /// # Returns
    ///
    /// 切断した接続数
    pub async fn close_all(&self) -> usize {
        let mut closed = 0;
        for connection in self.registry.snapshot().await {
            if self.execute(connection.id).await.is_some() {
                closed += 1;
            }
        }
        closed
    }
}
