//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// ルーム参加（WebSocket 接続）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("no room has been entered in this session")]
    NoRoomSelected,

    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("user '{0}' does not exist")]
    UserNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("invalid message: {0}")]
    InvalidBody(#[from] ValueObjectError),

    /// Message Channel が閉じている（シャットダウン中）
    #[error("message channel is closed")]
    ChannelClosed,
}

/// セッション（サインイン・サインアウト・プロフィール）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("user '{0}' does not exist")]
    UserNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ルーム作成・入室のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("room name must not be empty")]
    EmptyName,

    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
