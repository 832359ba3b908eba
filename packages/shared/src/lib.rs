//! Utilities shared by the Yamabiko relay server and client.

pub mod logger;
pub mod time;
