//! WebSocket frame DTOs.
//!
//! All frames are JSON text frames with camelCase field names.

use serde::{Deserialize, Serialize};

/// Frame sent by a client.
///
/// Identity fields are accepted for compatibility but never trusted: the server
/// overwrites them with the identity bound to the connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_key: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Frame sent by the server, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Chat(ChatMessage),
    Room(RoomMessage),
    Error(ErrorMessage),
}

/// A chat message, from history replay or live fan-out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub room_key: String,
    pub body: String,
    pub timestamp: i64,
}

/// Room metadata, sent once per connection right after history replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomMessage {
    pub key: String,
    pub name: String,
}

/// An error reported to a single connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}
