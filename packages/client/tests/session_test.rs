//! Integration tests for the client session against an in-process relay server.

use std::{net::SocketAddr, time::Duration};

use futures_util::{Stream, StreamExt};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use yamabiko_client::{error::ClientError, session::run_client_session};
use yamabiko_server::{config::RelayConfig, ui::Server};

const SERVER_GREETING: &str = "Hello! Message From Server!!";
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a relay server on an ephemeral port that runs until the test ends
async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to get local address");
    let server = Server::from_config(RelayConfig::default()).expect("Invalid relay config");
    tokio::spawn(server.serve(listener, std::future::pending()));
    addr
}

async fn next_text<S>(stream: &mut S) -> String
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
                Some(Ok(_)) => continue,
                other => panic!("Unexpected stream item: {:?}", other),
            }
        }
    })
    .await
    .expect("Timed out waiting for a text message")
}

#[tokio::test]
async fn test_session_sends_greeting_and_input_lines() {
    // テスト項目: セッションは接続直後にあいさつを送り、入力された行を送信する
    // given (前提条件):
    let addr = start_server().await;
    let url = format!("ws://{}", addr);
    let (mut observer, _response) = connect_async(url.as_str()).await.unwrap();
    assert_eq!(next_text(&mut observer).await, SERVER_GREETING);

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let session_url = url.clone();
    let session = tokio::spawn(async move {
        run_client_session(&session_url, "Hello Server!", &mut input_rx).await
    });

    // when (操作):
    assert_eq!(next_text(&mut observer).await, "Hello Server!");
    input_tx.send("typed line".to_string()).unwrap();
    assert_eq!(next_text(&mut observer).await, "typed line");
    drop(input_tx);

    // then (期待する結果): closing the input ends the session normally
    let result = tokio::time::timeout(RECV_TIMEOUT, session)
        .await
        .expect("Session did not end")
        .expect("Session task panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_session_fails_when_server_is_unreachable() {
    // テスト項目: サーバーに接続できない場合は接続エラーを返す
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (_input_tx, mut input_rx) = mpsc::unbounded_channel();

    // when (操作):
    let url = format!("ws://{}", addr);
    let result = run_client_session(&url, "Hello Server!", &mut input_rx).await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::Connection(_))));
}
