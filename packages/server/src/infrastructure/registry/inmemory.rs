//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する `ConnectionRegistry` trait の具体的な実装。
//! 書き込みはリレーハブのタスクからのみ行われますが、HTTP の統計エンドポイントが
//! 同時に読み取るため `Mutex` で保護します。

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, RegistryError};

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// 接続中のクライアント
    connections: Mutex<HashMap<ConnectionId, Connection>>,
    /// 受信メッセージの累計（診断用）
    messages_seen: AtomicU64,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, connection: Connection) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection.id) {
            return Err(RegistryError::DuplicateConnection(connection.id));
        }
        tracing::debug!("Connection '{}' added to registry", connection.id);
        connections.insert(connection.id, connection);
        Ok(())
    }

    async fn mark_open(&self, id: &ConnectionId) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(id)
            .ok_or(RegistryError::ConnectionNotFound(*id))?;
        connection.open()?;
        Ok(())
    }

    async fn mark_closing(&self, id: &ConnectionId) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(id)
            .ok_or(RegistryError::ConnectionNotFound(*id))?;
        connection.begin_closing()?;
        Ok(())
    }

    async fn remove(&self, id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let mut connection = connections.remove(id)?;
        if let Err(e) = connection.close() {
            // 既に Closed の接続は登録されないため、ここには来ない想定
            tracing::warn!("Connection '{}' removed in unexpected state: {}", id, e);
        }
        tracing::debug!("Connection '{}' removed from registry", id);
        Some(connection)
    }

    async fn snapshot(&self) -> Vec<Connection> {
        let connections = self.connections.lock().await;
        connections.values().cloned().collect()
    }

    async fn open_connection_ids(&self) -> Vec<ConnectionId> {
        let connections = self.connections.lock().await;
        connections
            .values()
            .filter(|connection| connection.is_open())
            .map(|connection| connection.id)
            .collect()
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }

    async fn record_message(&self) -> u64 {
        self.messages_seen.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn messages_seen(&self) -> u64 {
        self.messages_seen.load(Ordering::Relaxed)
    }
}
