//! WebSocket fan-out relay server.
//!
//! Every message received from a client is rebroadcast verbatim to all
//! connected clients (the sender included). A fixed greeting is sent to each
//! client when it connects and, by default, again after each of its messages.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
