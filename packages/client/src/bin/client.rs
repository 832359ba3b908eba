//! CLI client for the relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yamabiko-client
//! cargo run --bin yamabiko-client -- --url ws://127.0.0.1:8080 --greeting "Hi!"
//! ```

use clap::Parser;
use yamabiko_client::runner::run_client;
use yamabiko_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "yamabiko-client")]
#[command(about = "WebSocket relay client", long_about = None)]
struct Args {
    /// WebSocket URL of the relay server
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Message sent once right after connecting
    #[arg(short = 'g', long, default_value = "Hello Server!")]
    greeting: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    if let Err(e) = run_client(args.url, args.greeting).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
