//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RegistryError;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Failed to register connection: {0}")]
    Registry(#[from] RegistryError),
}

/// リレーハブへのコマンド送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("Relay hub has stopped")]
    Stopped,

    #[error(transparent)]
    Connect(#[from] ConnectError),
}
