//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::RelayStatsDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Relay statistics (diagnostic only)
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<RelayStatsDto> {
    let stats = state.get_relay_stats_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RelayStatsDto::from(stats))
}
