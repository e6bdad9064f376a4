//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The session is missing or expired on the server
    #[error("Session is not valid, sign in again")]
    Unauthorized,

    /// The room to enter does not exist
    #[error("Room '{0}' does not exist")]
    RoomNotFound(String),

    /// Connected without entering a room first
    #[error("No room has been entered")]
    NoRoomSelected,

    /// The server rejected the request payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected HTTP status from the API
    #[error("Server responded with HTTP {0}")]
    Api(u16),

    /// HTTP request could not be performed
    #[error("Request error: {0}")]
    Request(String),

    /// WebSocket connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Request(e.to_string())
    }
}
