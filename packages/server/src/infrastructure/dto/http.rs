//! HTTP API response DTOs.

use serde::Serialize;
use yamabiko_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{Connection, ConnectionState},
    usecase::RelayStats,
};

/// Connection entry in `/api/stats`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConnectionDto {
    pub id: String,
    pub state: ConnectionState,
    /// RFC 3339 (UTC)
    pub connected_at: String,
}

/// Response body of `/api/stats`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RelayStatsDto {
    pub connection_count: usize,
    pub open_count: usize,
    pub messages_seen: u64,
    /// RFC 3339 (UTC)
    pub started_at: String,
    pub connections: Vec<ConnectionDto>,
}

impl From<&Connection> for ConnectionDto {
    fn from(connection: &Connection) -> Self {
        Self {
            id: connection.id.to_string(),
            state: connection.state,
            connected_at: timestamp_to_rfc3339(connection.connected_at.value()),
        }
    }
}

impl From<RelayStats> for RelayStatsDto {
    fn from(stats: RelayStats) -> Self {
        let mut connections: Vec<ConnectionDto> =
            stats.connections.iter().map(ConnectionDto::from).collect();
        // Oldest connection first, id as tie-breaker for stable output
        connections.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Self {
            connection_count: connections.len(),
            open_count: stats.connections.iter().filter(|c| c.is_open()).count(),
            messages_seen: stats.messages_seen,
            started_at: timestamp_to_rfc3339(stats.started_at.value()),
            connections,
        }
    }
}
