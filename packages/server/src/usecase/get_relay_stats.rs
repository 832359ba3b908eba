//! UseCase: リレーの統計情報取得（診断用）

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRegistry, Timestamp};

/// リレーの統計情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayStats {
    pub connections: Vec<Connection>,
    pub messages_seen: u64,
    pub started_at: Timestamp,
}

/// 統計情報取得のユースケース
pub struct GetRelayStatsUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    started_at: Timestamp,
}

impl GetRelayStatsUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, started_at: Timestamp) -> Self {
        Self {
            registry,
            started_at,
        }
    }

    pub async fn execute(&self) -> RelayStats {
        RelayStats {
            connections: self.registry.snapshot().await,
            messages_seen: self.registry.messages_seen().await,
            started_at: self.started_at,
        }
    }
}
