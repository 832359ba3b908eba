//! UseCase 層
//!
//! 接続・リレー・切断の各処理と、それらを 1 本のタスクで順番に実行するリレーハブを提供します。

mod connect_client;
mod disconnect_client;
mod error;
mod get_relay_stats;
mod hub;
mod relay_message;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, HubError};
pub use get_relay_stats::{GetRelayStatsUseCase, RelayStats};
pub use hub::RelayHub;
pub use relay_message::{RelayMessageUseCase, RelayOutcome};
