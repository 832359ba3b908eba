//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use yamabiko_shared::time::get_utc_timestamp;

use super::{display::LatestMessage, error::ClientError, ui::redisplay_prompt};

/// Run one client session
///
/// Sends `greeting` once the socket is open, then sends every line from
/// `input` as a text frame while printing the latest received message.
///
/// # Returns
///
/// * `Ok(())` - `input` was closed (the user exited)
/// * `Err(ClientError::Connection)` - connecting failed
/// * `Err(ClientError::ConnectionLost)` - the connection dropped after it was established
pub async fn run_client_session(
    url: &str,
    greeting: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await?;
    tracing::info!("Connected to relay server at {}", url);

    let (mut write, mut read) = ws_stream.split();
    if let Err(e) = write.send(Message::text(greeting.to_string())).await {
        tracing::warn!("Failed to send greeting: {}", e);
        return Err(ClientError::ConnectionLost);
    }

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut latest = LatestMessage::default();

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Ok(message) => {
                    if latest.update(&message, get_utc_timestamp()) {
                        print!("{}", latest.render());
                        redisplay_prompt();
                    }
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => return Err(ClientError::ConnectionLost),
            line = input.recv() => match line {
                Some(line) => {
                    if let Err(e) = write.send(Message::text(line)).await {
                        tracing::warn!("Failed to send message: {}", e);
                        read_task.abort();
                        return Err(ClientError::ConnectionLost);
                    }
                }
                None => {
                    if let Err(e) = write.close().await {
                        tracing::debug!("Failed to close connection: {}", e);
                    }
                    read_task.abort();
                    return Ok(());
                }
            },
        }
    }
}
