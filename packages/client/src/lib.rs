//! CLI client for the Yamabiko relay.
//!
//! Connects, sends a one-time greeting, shows the most recently received
//! message and sends every line typed by the user.

pub mod display;
pub mod error;
pub mod runner;
pub mod session;
pub mod ui;
