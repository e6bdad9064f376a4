//! Conversion logic between DTOs and domain entities.
//!
//! Inbound frames are not converted here: the server builds domain messages from
//! the connection's identity and only takes the body from the client.

use chatterfly_shared::time::timestamp_to_rfc3339;

use crate::domain::{Delivery, Message, Room, User};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Message> for ws::ChatMessage {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.to_string(),
            username: model.author.into_string(),
            first_name: model.author_first_name,
            room_key: model.room_key.into_string(),
            body: model.body.into_string(),
            timestamp: model.created_at.value(),
        }
    }
}

impl From<Room> for ws::RoomMessage {
    fn from(model: Room) -> Self {
        Self {
            key: model.key.into_string(),
            name: model.name,
        }
    }
}

impl From<Delivery> for ws::ServerMessage {
    fn from(delivery: Delivery) -> Self {
        match delivery {
            Delivery::Chat(message) => Self::Chat(message.into()),
            Delivery::Room(room) => Self::Room(room.into()),
            Delivery::Error(message) => Self::Error(ws::ErrorMessage { message }),
        }
    }
}

impl From<Room> for http::RoomDto {
    fn from(model: Room) -> Self {
        Self {
            key: model.key.into_string(),
            name: model.name,
        }
    }
}

impl From<User> for http::UserProfileDto {
    fn from(model: User) -> Self {
        Self {
            username: model.username.into_string(),
            first_name: model.first_name,
            last_name: model.last_name,
            rooms: model.rooms.into_iter().map(Into::into).collect(),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, RoomKey, Timestamp, Username};

    #[test]
    fn test_domain_message_to_chat_frame() {
        // テスト項目: ドメインのメッセージがチャットフレームに変換される
        // given (前提条件):
        let message = Message::new(
            RoomKey::new("r1".to_string()).unwrap(),
            Username::new("bob".to_string()).unwrap(),
            "Bob".to_string(),
            MessageBody::new("Hi!".to_string()).unwrap(),
            Timestamp::new(2000),
        );
        let id = message.id.to_string();

        // when (操作):
        let frame: ws::ChatMessage = message.into();

        // then (期待する結果):
        assert_eq!(frame.id, id);
        assert_eq!(frame.username, "bob");
        assert_eq!(frame.first_name, "Bob");
        assert_eq!(frame.room_key, "r1");
        assert_eq!(frame.body, "Hi!");
        assert_eq!(frame.timestamp, 2000);
    }

    #[test]
    fn test_error_delivery_to_frame() {
        // テスト項目: エラー配信が error フレームに変換される
        // given (前提条件):
        let delivery = Delivery::Error("internal server error".to_string());

        // when (操作):
        let frame: ws::ServerMessage = delivery.into();

        // then (期待する結果):
        assert_eq!(
            frame,
            ws::ServerMessage::Error(ws::ErrorMessage {
                message: "internal server error".to_string(),
            })
        );
    }

    #[test]
    fn test_user_to_profile_dto() {
        // テスト項目: ユーザーがプロフィール DTO に変換され、ルーム一覧の順序が保たれる
        // given (前提条件):
        let mut user = User::new(
            Username::new("alice".to_string()).unwrap(),
            "Alice".to_string(),
            "Liddell".to_string(),
            Timestamp::new(1672531200000),
        );
        user.rooms = vec![
            Room::new(RoomKey::new("r1".to_string()).unwrap(), "general".to_string()),
            Room::new(RoomKey::new("r2".to_string()).unwrap(), "random".to_string()),
        ];

        // when (操作):
        let dto: http::UserProfileDto = user.into();

        // then (期待する結果):
        assert_eq!(dto.username, "alice");
        assert_eq!(dto.rooms.len(), 2);
        assert_eq!(dto.rooms[0].key, "r1");
        assert_eq!(dto.rooms[1].name, "random");
        assert!(dto.created_at.starts_with("2023-01-01T00:00:00"));
    }
}
