//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{error::ClientError, session::run_client_session, ui::spawn_input_reader};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Consecutive failed attempts since the last established connection
#[derive(Debug, Default)]
struct ReconnectBudget {
    failures: u32,
}

impl ReconnectBudget {
    /// Record a failed session
    ///
    /// A session that got connected before failing starts a fresh budget, so
    /// only consecutive failures count towards the limit.
    ///
    /// # Returns
    ///
    /// `true` if another attempt is allowed
    fn record_failure(&mut self, error: &ClientError) -> bool {
        if error.was_connected() {
            self.failures = 0;
        }
        self.failures += 1;
        self.failures < MAX_RECONNECT_ATTEMPTS
    }

    fn next_attempt(&self) -> u32 {
        self.failures + 1
    }
}

/// Run the relay client with reconnection logic
///
/// The greeting is sent again after every successful reconnect.
pub async fn run_client(url: String, greeting: String) -> Result<(), ClientError> {
    let mut input = spawn_input_reader();
    let mut budget = ReconnectBudget::default();

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            budget.next_attempt(),
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &greeting, &mut input).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                tracing::warn!("{}", e);

                if !budget.record_failure(&e) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    budget.next_attempt(),
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
