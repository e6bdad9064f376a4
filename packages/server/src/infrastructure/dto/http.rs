//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// `POST /api/sessions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub username: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedDto {
    pub session_id: String,
}

/// `POST /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDto {
    pub key: String,
    pub name: String,
}

/// `GET /api/me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub rooms: Vec<RoomDto>,
    /// RFC 3339
    pub created_at: String,
}
