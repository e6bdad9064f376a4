//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成時に発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("room key must not be empty")]
    EmptyRoomKey,

    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("message body must not be empty")]
    EmptyMessageBody,

    #[error("message body is too long ({actual} > {max} characters)")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// ストア（Session Store / Persistence Store）へのアクセスで発生するエラー
///
/// `NotFound` は「レコードが 0 件」であり、I/O 障害（`Unavailable`）とは区別されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 接続への配信時に発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// 相手が正常にクローズ済み。読み込み側が登録解除するので、配信側は何もしない
    #[error("peer went away")]
    PeerGone,

    /// それ以外の配信失敗。接続は死んでいるものとして扱う
    #[error("delivery failed: {0}")]
    Failed(String),
}
