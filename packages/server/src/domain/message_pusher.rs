//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）のインターフェース。
//! 具体的な送信手段（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RelayMessage};

/// クライアントごとの送信キュー
///
/// 容量付きのチャンネル。満杯の場合そのクライアント宛てのメッセージは破棄されます。
pub type PusherChannel = mpsc::Sender<RelayMessage>;

/// ブロードキャスト結果
///
/// 一部の宛先への送信失敗は他の宛先への配信を止めません。
/// 呼び出し側は `failed` の接続を Registry から削除します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// キューに積めた宛先
    pub delivered: Vec<ConnectionId>,
    /// キューが満杯で破棄した宛先（接続は維持）
    pub dropped: Vec<ConnectionId>,
    /// キューが閉じていた、または未登録だった宛先
    pub failed: Vec<ConnectionId>,
}

/// MessagePusher trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信キューを登録
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信キューを登録解除
    ///
    /// 送信キューが drop されるため、そのクライアントの送信タスクは終了します。
    async fn unregister_client(&self, id: &ConnectionId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        id: &ConnectionId,
        message: &RelayMessage,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信
    async fn broadcast(&self, targets: &[ConnectionId], message: &RelayMessage)
    -> BroadcastReport;
}
