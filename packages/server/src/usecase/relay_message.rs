//! UseCase: メッセージのリレー（ファンアウト）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - Open の全接続（送信者を含む）へのファンアウトと、送信者へのあいさつの再送
//!
//! ### なぜこのテストが必要か
//! - 1 つの宛先への送信失敗が他の宛先への配信を止めないことを保証する
//! - 閉じた送信キューの接続が切断対象として返されることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 接続へのファンアウト
//! - 異常系：一部の宛先のキューが閉じている・満杯、送信者自身のキューが閉じている
//! - エッジケース：Registry が空

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, ConnectionId, ConnectionRegistry, MessagePushError, MessagePusher,
    RelayMessage,
};

/// リレー結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// ファンアウトの結果
    pub report: BroadcastReport,
    /// これまでに受信したメッセージの累計
    pub messages_seen: u64,
    /// 送信キューが閉じていたため切断すべき接続
    pub evict: Vec<ConnectionId>,
}

/// メッセージリレーのユースケース
pub struct RelayMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    /// ファンアウト後に送信者へ送るあいさつ（`None` なら送らない）
    follow_up_greeting: Option<RelayMessage>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        follow_up_greeting: Option<RelayMessage>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            follow_up_greeting,
        }
    }

    /// メッセージのリレーを実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者の接続 ID
    /// * `message` - 受信したメッセージ（そのまま転送する）
    pub async fn execute(&self, from: ConnectionId, message: RelayMessage) -> RelayOutcome {
        let messages_seen = self.registry.record_message().await;
        match &message {
            RelayMessage::Text(text) => {
                tracing::info!("Received message from '{}': {}", from, text)
            }
            RelayMessage::Binary(data) => {
                tracing::info!("Received binary message from '{}' ({} bytes)", from, data.len())
            }
        }
        tracing::debug!("Messages seen: {}", messages_seen);

        // 1. 呼び出し時点で Open の接続に送信者を含めて配信
        let targets = self.registry.open_connection_ids().await;
        let report = self.message_pusher.broadcast(&targets, &message).await;
        let mut evict = report.failed.clone();

        // 2. 送信者にだけあいさつを再送
        if let Some(greeting) = &self.follow_up_greeting
            && targets.contains(&from)
            && !evict.contains(&from)
        {
            match self.message_pusher.push_to(&from, greeting).await {
                Ok(()) => {}
                Err(e @ MessagePushError::QueueFull(_)) => {
                    tracing::warn!("Dropping follow-up greeting: {}", e);
                }
                Err(e) => {
                    tracing::warn!("Failed to send follow-up greeting: {}", e);
                    evict.push(from);
                }
            }
        }

        RelayOutcome {
            report,
            messages_seen,
            evict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, ConnectionIdFactory, MockMessagePusher, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        },
    };
    use mockall::predicate::eq;
    use tokio::sync::mpsc;

    const GREETING: &str = "Hello! Message From Server!!";

    async fn add_open(registry: &InMemoryConnectionRegistry) -> ConnectionId {
        let id = ConnectionIdFactory::generate();
        registry
            .add(Connection::new(id, Timestamp::new(1000)))
            .await
            .unwrap();
        registry.mark_open(&id).await.unwrap();
        id
    }

    async fn connect(
        registry: &InMemoryConnectionRegistry,
        pusher: &WebSocketMessagePusher,
    ) -> (ConnectionId, mpsc::Receiver<RelayMessage>) {
        let id = add_open(registry).await;
        let (tx, rx) = mpsc::channel(8);
        pusher.register_client(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn test_relay_to_all_open_connections_including_sender() {
        // テスト項目: 送信者を含む全ての Open 接続にそのまま届き、送信者にはあいさつが続く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (c1, mut rx1) = connect(&registry, &pusher).await;
        let (_c2, mut rx2) = connect(&registry, &pusher).await;
        let (_c3, mut rx3) = connect(&registry, &pusher).await;
        let usecase = RelayMessageUseCase::new(
            registry.clone(),
            pusher.clone(),
            Some(RelayMessage::text(GREETING)),
        );
        let message = RelayMessage::binary(vec![1u8, 2, 3]);

        // when (操作):
        let outcome = usecase.execute(c1, message.clone()).await;

        // then (期待する結果):
        assert_eq!(outcome.report.delivered.len(), 3);
        assert!(outcome.evict.is_empty());
        assert_eq!(outcome.messages_seen, 1);
        assert_eq!(rx1.recv().await, Some(message.clone()));
        assert_eq!(rx1.recv().await, Some(RelayMessage::text(GREETING)));
        assert_eq!(rx2.recv().await, Some(message.clone()));
        assert_eq!(rx3.recv().await, Some(message));
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_without_follow_up_greeting() {
        // テスト項目: あいさつの再送を無効にすると送信者にはメッセージだけが届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (c1, mut rx1) = connect(&registry, &pusher).await;
        let usecase = RelayMessageUseCase::new(registry.clone(), pusher.clone(), None);

        // when (操作):
        usecase.execute(c1, RelayMessage::text("ping")).await;

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some(RelayMessage::text("ping")));
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_with_empty_registry() {
        // テスト項目: 接続が 1 つもなくてもエラーにならない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = RelayMessageUseCase::new(
            registry.clone(),
            Arc::new(WebSocketMessagePusher::new()),
            Some(RelayMessage::text(GREETING)),
        );

        // when (操作):
        let outcome = usecase
            .execute(ConnectionIdFactory::generate(), RelayMessage::text("ping"))
            .await;

        // then (期待する結果):
        assert_eq!(outcome.report, BroadcastReport::default());
        assert!(outcome.evict.is_empty());
        assert_eq!(outcome.messages_seen, 1);
    }

    #[tokio::test]
    async fn test_relay_isolates_failed_recipient() {
        // テスト項目: 宛先の 1 つが失敗しても送信者へのあいさつは送られ、失敗した宛先が切断対象になる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let sender = add_open(&registry).await;
        let broken = add_open(&registry).await;
        let healthy = add_open(&registry).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .times(1)
            .returning(move |targets, _| BroadcastReport {
                delivered: targets.iter().copied().filter(|id| *id != broken).collect(),
                dropped: vec![],
                failed: vec![broken],
            });
        pusher
            .expect_push_to()
            .with(eq(sender), eq(RelayMessage::text(GREETING)))
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = RelayMessageUseCase::new(
            registry.clone(),
            Arc::new(pusher),
            Some(RelayMessage::text(GREETING)),
        );

        // when (操作):
        let outcome = usecase.execute(sender, RelayMessage::text("ping")).await;

        // then (期待する結果):
        assert_eq!(outcome.evict, vec![broken]);
        assert!(outcome.report.delivered.contains(&sender));
        assert!(outcome.report.delivered.contains(&healthy));
    }

    #[tokio::test]
    async fn test_relay_evicts_sender_with_closed_queue() {
        // テスト項目: 送信者自身のキューが閉じている場合、あいさつは送らず送信者を切断対象にする
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (sender, rx_sender) = connect(&registry, &pusher).await;
        drop(rx_sender);
        let (_other, mut rx_other) = connect(&registry, &pusher).await;
        let usecase = RelayMessageUseCase::new(
            registry.clone(),
            pusher.clone(),
            Some(RelayMessage::text(GREETING)),
        );

        // when (操作):
        let outcome = usecase.execute(sender, RelayMessage::text("ping")).await;

        // then (期待する結果):
        assert_eq!(outcome.evict, vec![sender]);
        assert_eq!(rx_other.recv().await, Some(RelayMessage::text("ping")));
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_keeps_recipient_with_full_queue() {
        // テスト項目: 送信キューが満杯の宛先はそのメッセージだけ破棄され、切断対象にはならない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let sender = add_open(&registry).await;
        let slow = add_open(&registry).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .times(1)
            .returning(move |targets, _| BroadcastReport {
                delivered: targets.iter().copied().filter(|id| *id != slow).collect(),
                dropped: vec![slow],
                failed: vec![],
            });
        pusher
            .expect_push_to()
            .with(eq(sender), eq(RelayMessage::text(GREETING)))
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = RelayMessageUseCase::new(
            registry.clone(),
            Arc::new(pusher),
            Some(RelayMessage::text(GREETING)),
        );

        // when (操作):
        let outcome = usecase.execute(sender, RelayMessage::text("ping")).await;

        // then (期待する結果):
        assert!(outcome.evict.is_empty());
        assert_eq!(outcome.report.dropped, vec![slow]);
        assert!(registry.open_connection_ids().await.contains(&slow));
    }

    #[tokio::test]
    async fn test_relay_keeps_sender_when_follow_up_greeting_is_dropped() {
        // テスト項目: 送信者のキューが満杯であいさつを送れなくても送信者は切断されない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let sender = add_open(&registry).await;
        let (tx, mut rx) = mpsc::channel(1);
        pusher.register_client(sender, tx).await;
        let usecase = RelayMessageUseCase::new(
            registry.clone(),
            pusher.clone(),
            Some(RelayMessage::text(GREETING)),
        );

        // when (操作):
        let outcome = usecase.execute(sender, RelayMessage::text("ping")).await;

        // then (期待する結果):
        assert!(outcome.evict.is_empty());
        assert_eq!(outcome.report.delivered, vec![sender]);
        assert_eq!(rx.recv().await, Some(RelayMessage::text("ping")));
        assert!(rx.try_recv().is_err());
    }
}
