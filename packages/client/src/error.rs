//! Error types for the relay client.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting to the server failed
    #[error("Connection error: {0}")]
    Connection(#[from] tungstenite::Error),

    /// The connection was established and then dropped
    #[error("Connection lost")]
    ConnectionLost,
}

impl ClientError {
    /// Whether the session got past connecting before failing
    pub fn was_connected(&self) -> bool {
        matches!(self, Self::ConnectionLost)
    }
}
