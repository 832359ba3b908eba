//! UI layer: HTTP routes, WebSocket upgrade handling and server bootstrap.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
