//! Relay configuration.

use thiserror::Error;

/// Greeting sent to a client right after it connects, and again after each relay.
pub const DEFAULT_GREETING: &str = "Hello! Message From Server!!";

/// Default number of messages buffered per connection before new ones are dropped.
pub const DEFAULT_SEND_QUEUE_CAPACITY: usize = 64;

/// Runtime configuration of the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Text frame sent on connect (and after each relay when `follow_up_greeting` is set)
    pub greeting: String,
    /// Send the greeting to the sender again after every fan-out
    pub follow_up_greeting: bool,
    /// Capacity of each connection's outbound queue
    pub send_queue_capacity: usize,
}

/// Invalid relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("send queue capacity must be at least 1")]
    ZeroSendQueueCapacity,
}

impl RelayConfig {
    /// Check the values the relay cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.send_queue_capacity == 0 {
            return Err(ConfigError::ZeroSendQueueCapacity);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            follow_up_greeting: true,
            send_queue_capacity: DEFAULT_SEND_QUEUE_CAPACITY,
        }
    }
}
