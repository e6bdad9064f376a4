//! エンティティ

use super::value_object::{MessageBody, MessageId, RoomKey, Timestamp, Username};

/// チャットメッセージ
///
/// 生成後は不変。Room Join Handler がクライアント入力から生成し、
/// Broadcast Worker が永続化・配信します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room_key: RoomKey,
    pub author: Username,
    pub author_first_name: String,
    pub body: MessageBody,
    pub created_at: Timestamp,
}

impl Message {
    /// 新しい ID を採番してメッセージを作成
    pub fn new(
        room_key: RoomKey,
        author: Username,
        author_first_name: String,
        body: MessageBody,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            room_key,
            author,
            author_first_name,
            body,
            created_at,
        }
    }
}

/// チャットルーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub key: RoomKey,
    pub name: String,
}

impl Room {
    pub fn new(key: RoomKey, name: String) -> Self {
        Self { key, name }
    }
}

/// ユーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    /// 参加したことのあるルームの一覧（参加順）
    pub rooms: Vec<Room>,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(
        username: Username,
        first_name: String,
        last_name: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            username,
            first_name,
            last_name,
            rooms: Vec::new(),
            created_at,
        }
    }

    /// 指定したルームのメンバーかどうか
    pub fn is_member_of(&self, room_key: &RoomKey) -> bool {
        self.rooms.iter().any(|room| &room.key == room_key)
    }

    /// ルームを末尾に追加したメンバーシップ一覧を返す（既にメンバーならそのまま）
    pub fn rooms_with(&self, room: &Room) -> Vec<Room> {
        let mut rooms = self.rooms.clone();
        if !self.is_member_of(&room.key) {
            rooms.push(room.clone());
        }
        rooms
    }
}

/// ログインセッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    /// 最後に入室したルーム。WebSocket 接続時にこのルームへ参加する
    pub current_room: Option<RoomKey>,
}

impl Session {
    pub fn new(username: Username, first_name: String, last_name: String) -> Self {
        Self {
            username,
            first_name,
            last_name,
            current_room: None,
        }
    }
}
