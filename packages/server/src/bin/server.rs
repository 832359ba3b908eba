//! WebSocket relay server.
//!
//! Receives messages from clients and broadcasts them to every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yamabiko-server
//! cargo run --bin yamabiko-server -- --host 127.0.0.1 --port 3000
//! ```

use clap::Parser;
use yamabiko_server::{
    config::{DEFAULT_GREETING, DEFAULT_SEND_QUEUE_CAPACITY, RelayConfig},
    ui::Server,
};
use yamabiko_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "yamabiko-server")]
#[command(about = "WebSocket relay server that rebroadcasts every message to all clients", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Greeting sent to each client on connect
    #[arg(long, default_value = DEFAULT_GREETING)]
    greeting: String,

    /// Do not send the greeting again to the sender after each relayed message
    #[arg(long)]
    no_follow_up_greeting: bool,

    /// Messages buffered per client before new ones are dropped
    #[arg(long, default_value_t = DEFAULT_SEND_QUEUE_CAPACITY)]
    send_queue_capacity: usize,
}

impl From<Args> for RelayConfig {
    fn from(args: Args) -> Self {
        Self {
            greeting: args.greeting,
            follow_up_greeting: !args.no_follow_up_greeting,
            send_queue_capacity: args.send_queue_capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let host = args.host.clone();
    let port = args.port;

    let server = match Server::from_config(RelayConfig::from(args)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = server.run(host, port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
