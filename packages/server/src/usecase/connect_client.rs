//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - Registry への追加、Open への遷移、接続直後のあいさつ送信
//!
//! ### なぜこのテストが必要か
//! - 接続直後のクライアントは、ブロードキャストより先にあいさつを 1 回だけ受け取る必要がある
//! - 登録に失敗した場合に送信キューが残らないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：同じ ID での二重接続

use std::sync::Arc;

use yamabiko_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, MessagePusher, PusherChannel, RelayMessage,
    Timestamp,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Registry（接続中のクライアントの集合）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 接続時刻の取得元
    clock: Arc<dyn Clock>,
    /// 接続直後に送るあいさつ
    greeting: RelayMessage,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        greeting: RelayMessage,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            clock,
            greeting,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 接続 ID
    /// * `sender` - クライアントへのメッセージ送信用キュー
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻を返す）
    /// * `Err(ConnectError)` - 接続失敗（送信キューは登録されない）
    pub async fn execute(
        &self,
        id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());

        // 1. Registry に Connecting 状態で追加
        self.registry
            .add(Connection::new(id, connected_at))
            .await?;

        // 2. MessagePusher に送信キューを登録
        self.message_pusher.register_client(id, sender).await;

        // 3. Open に遷移
        if let Err(e) = self.registry.mark_open(&id).await {
            self.message_pusher.unregister_client(&id).await;
            self.registry.remove(&id).await;
            return Err(e.into());
        }

        // 4. このクライアントにだけあいさつを送る
        if let Err(e) = self.message_pusher.push_to(&id, &self.greeting).await {
            tracing::warn!("Failed to send greeting to '{}': {}", id, e);
        }

        Ok(connected_at)
    }
}
