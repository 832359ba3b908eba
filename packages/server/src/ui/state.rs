//! Shared application state.

use std::sync::Arc;

use crate::{
    config::RelayConfig,
    usecase::{GetRelayStatsUseCase, RelayHub},
};

/// Shared application state
pub struct AppState {
    /// Handle to the relay hub task（Registry への書き込みはハブだけが行う）
    pub hub: RelayHub,
    /// GetRelayStatsUseCase（統計情報取得のユースケース）
    pub get_relay_stats_usecase: Arc<GetRelayStatsUseCase>,
    pub config: RelayConfig,
}
