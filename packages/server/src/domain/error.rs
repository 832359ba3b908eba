//! ドメイン層のエラー型

use thiserror::Error;

use super::{ConnectionId, ConnectionState};

/// 接続状態の遷移エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionStateError {
    #[error("Invalid connection state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ConnectionState,
        to: ConnectionState,
    },
}

/// Registry 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("Connection '{0}' not found")]
    ConnectionNotFound(ConnectionId),

    #[error(transparent)]
    InvalidState(#[from] ConnectionStateError),
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(ConnectionId),

    #[error("Send queue for client '{0}' is full")]
    QueueFull(ConnectionId),

    #[error("Send queue for client '{0}' is closed")]
    ChannelClosed(ConnectionId),
}
