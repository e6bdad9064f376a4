//! ストア trait 定義
//!
//! コアが依存する外部コラボレーター（Session Store / Persistence Store）の
//! インターフェースを定義します。UseCase 層はこの trait に依存し、
//! Infrastructure 層の具体的な実装には依存しません。
//!
//! いずれの実装も内部で並行アクセスに対して安全である必要があります。

use async_trait::async_trait;

use super::{
    entity::{Message, Room, Session, User},
    error::RepositoryError,
    value_object::{RoomKey, SessionId, Username},
};

/// Session Store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// セッションを取得。存在しない場合は `RepositoryError::NotFound`
    async fn get(&self, session_id: &SessionId) -> Result<Session, RepositoryError>;

    /// セッションを保存（上書き）
    async fn set(&self, session_id: &SessionId, session: Session) -> Result<(), RepositoryError>;

    /// セッションを削除。存在しなくてもエラーにしない
    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError>;
}

/// Persistence Store（メッセージ）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを追記
    async fn append(&self, message: &Message) -> Result<(), RepositoryError>;

    /// ルームのメッセージを作成順に取得
    ///
    /// 0 件の場合は `RepositoryError::NotFound` を返し、I/O 障害とは区別する。
    async fn find_by_room(&self, room_key: &RoomKey) -> Result<Vec<Message>, RepositoryError>;
}

/// Persistence Store（ルーム）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn find(&self, room_key: &RoomKey) -> Result<Room, RepositoryError>;

    async fn create(&self, room: Room) -> Result<(), RepositoryError>;
}

/// Persistence Store（ユーザー）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, username: &Username) -> Result<User, RepositoryError>;

    async fn create(&self, user: User) -> Result<(), RepositoryError>;

    /// ユーザーのルームメンバーシップ一覧を置き換える
    async fn update_room_membership(
        &self,
        username: &Username,
        rooms: Vec<Room>,
    ) -> Result<(), RepositoryError>;
}
