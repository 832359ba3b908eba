//! エンティティ: Connection
//!
//! 1 つの WebSocket 接続のライフサイクルを状態機械として表現します。
//!
//! ```text
//! Connecting ──> Open ──> Closing ──> Closed
//!     │            │                    ▲
//!     └────────────┴────────────────────┘  (異常切断)
//! ```
//!
//! `Closed` からの遷移はありません。

use serde::Serialize;

use super::{ConnectionId, ConnectionStateError, Timestamp};

/// 接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    /// ハンドシェイク中
    Connecting,
    /// 書き込み可能
    Open,
    /// 切断処理中
    Closing,
    /// 切断済み
    Closed,
}

impl ConnectionState {
    /// `self` から `next` への遷移が許されるか
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        matches!(
            (self, next),
            (Connecting, Open)
                | (Connecting, Closing)
                | (Connecting, Closed)
                | (Open, Closing)
                | (Open, Closed)
                | (Closing, Closed)
        )
    }

    /// この状態の接続に書き込んでよいか（`Open` のみ）
    pub fn is_writable(self) -> bool {
        self == ConnectionState::Open
    }
}

/// 接続エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub state: ConnectionState,
    pub connected_at: Timestamp,
}

impl Connection {
    /// `Connecting` 状態の接続を作成
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            state: ConnectionState::Connecting,
            connected_at,
        }
    }

    pub fn open(&mut self) -> Result<(), ConnectionStateError> {
        self.transition(ConnectionState::Open)
    }

    pub fn begin_closing(&mut self) -> Result<(), ConnectionStateError> {
        self.transition(ConnectionState::Closing)
    }

    pub fn close(&mut self) -> Result<(), ConnectionStateError> {
        self.transition(ConnectionState::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.state.is_writable()
    }

    fn transition(&mut self, next: ConnectionState) -> Result<(), ConnectionStateError> {
        if !self.state.can_transition_to(next) {
            return Err(ConnectionStateError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
