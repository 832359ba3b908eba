//! ドメイン層
//!
//! リレーサーバーの中核となる概念（接続、接続状態、メッセージ）と、
//! UseCase 層が依存するインターフェース（`ConnectionRegistry`, `MessagePusher`）を定義します。

mod entity;
mod error;
mod message;
mod message_pusher;
mod registry;
mod value_object;

pub use entity::{Connection, ConnectionState};
pub use error::{ConnectionStateError, MessagePushError, RegistryError};
pub use message::RelayMessage;
pub use message_pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use value_object::{ConnectionId, ConnectionIdFactory, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
