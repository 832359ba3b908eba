//! Data Transfer Objects
//!
//! - `http`: HTTP API のレスポンス

pub mod http;
