//! Latest-message view for client display.

use tokio_tungstenite::tungstenite::Message;
use yamabiko_shared::time::timestamp_to_rfc3339;

/// Payload of the most recently received data frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(usize),
}

/// Keeps only the most recently received message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestMessage {
    latest: Option<(Payload, i64)>,
    received: u64,
}

impl LatestMessage {
    /// Replace the latest message with `message` if it is a data frame.
    ///
    /// Control frames (ping, pong, close) leave the view unchanged.
    ///
    /// # Returns
    ///
    /// `true` if the view changed
    pub fn update(&mut self, message: &Message, received_at: i64) -> bool {
        let payload = match message {
            Message::Text(text) => Payload::Text(text.as_str().to_string()),
            Message::Binary(data) => Payload::Binary(data.len()),
            _ => return false,
        };
        self.latest = Some((payload, received_at));
        self.received += 1;
        true
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.latest.as_ref().map(|(payload, _)| payload)
    }

    /// Number of data frames received so far
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Format the view for the terminal
    pub fn render(&self) -> String {
        match &self.latest {
            None => "\nWaiting for messages...\n".to_string(),
            Some((payload, received_at)) => {
                let body = match payload {
                    Payload::Text(text) => text.clone(),
                    Payload::Binary(len) => format!("<binary, {} bytes>", len),
                };
                format!(
                    "\n[{}] #{} {}\n",
                    timestamp_to_rfc3339(*received_at),
                    self.received,
                    body
                )
            }
        }
    }
}
