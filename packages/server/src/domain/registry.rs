//! ConnectionRegistry trait 定義
//!
//! 現在接続中のクライアントの集合へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Connection, ConnectionId, RegistryError};

/// Connection Registry trait
///
/// ## 不変条件
///
/// - 各接続はちょうど 1 回追加され、シャットダウンまでにちょうど 1 回削除される
/// - `Open` 以外の接続は `open_connection_ids()` に含まれない（書き込み対象にならない）
///
/// ## 列挙
///
/// `snapshot()` / `open_connection_ids()` は呼び出し時点のコピーを返します。
/// 列挙中に追加・削除が起きても、返されたリストは壊れず、重複配信も起きません。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を追加
    async fn add(&self, connection: Connection) -> Result<(), RegistryError>;

    /// 接続を `Open` に遷移
    async fn mark_open(&self, id: &ConnectionId) -> Result<(), RegistryError>;

    /// 接続を `Closing` に遷移
    async fn mark_closing(&self, id: &ConnectionId) -> Result<(), RegistryError>;

    /// 接続を削除
    ///
    /// 冪等: 登録されていない接続の削除は何もせず `None` を返します。
    /// 削除された接続は `Closed` 状態で返されます。
    async fn remove(&self, id: &ConnectionId) -> Option<Connection>;

    /// 登録中の全ての接続のスナップショット
    async fn snapshot(&self) -> Vec<Connection>;

    /// `Open` 状態の接続 ID のスナップショット
    async fn open_connection_ids(&self) -> Vec<ConnectionId>;

    /// 登録中の接続数
    async fn count(&self) -> usize;

    /// 受信メッセージ数をカウントし、更新後の累計を返す（診断用）
    async fn record_message(&self) -> u64;

    /// 受信メッセージの累計（診断用）
    async fn messages_seen(&self) -> u64;
}
