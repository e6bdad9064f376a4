//! ドメイン層
//!
//! チャットルームのエンティティ・値オブジェクトと、UseCase 層が依存する
//! インターフェース（ストア trait、接続レジストリ trait）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod connection;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use connection::{ConnectionRecord, ConnectionRegistry, ConnectionSink, Delivery};
pub use entity::{Message, Room, Session, User};
pub use error::{DeliveryError, RepositoryError, ValueObjectError};
pub use repository::{MessageStore, RoomStore, SessionStore, UserStore};
pub use value_object::{
    ConnectionId, MAX_MESSAGE_BODY_CHARS, MessageBody, MessageId, RoomKey, SessionId, Timestamp,
    Username,
};

#[cfg(test)]
pub use connection::MockConnectionSink;
#[cfg(test)]
pub use repository::{MockMessageStore, MockRoomStore, MockSessionStore, MockUserStore};
