//! UseCase: ルーム参加（Room Join Handler のビジネスロジック部分）
//!
//! ## 概要
//!
//! WebSocket 1 接続ぶんの参加処理を、ソケットに依存しない手順に分けて提供します。
//! ソケットの読み書きとの組み立ては UI 層のハンドラが行います。
//!
//! 1. `authorize`: セッションから参加者とルームを解決（アップグレード前）
//! 2. `register`: 接続レコードをレジストリに登録
//! 3. `load_history`: ルームの履歴を保存順で取得
//! 4. `ensure_membership`: 未参加のルームならメンバーシップに追加
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：セッションとルームが揃っている
//! - 異常系：セッションなし・ルーム未選択・ルーム削除済み・ストア障害
//! - エッジケース：履歴 0 件、他ルームのレコードが混ざったストア

use std::sync::Arc;

use crate::domain::{
    ConnectionRecord, ConnectionRegistry, Message, MessageStore, RepositoryError, Room, RoomKey,
    RoomStore, SessionId, SessionStore, UserStore, Username,
};

use super::{error::JoinRoomError, session::lookup_session};

/// 参加が許可された接続の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTicket {
    pub username: Username,
    pub first_name: String,
    pub room: Room,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    sessions: Arc<dyn SessionStore>,
    rooms: Arc<dyn RoomStore>,
    users: Arc<dyn UserStore>,
    messages: Arc<dyn MessageStore>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl JoinRoomUseCase {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        rooms: Arc<dyn RoomStore>,
        users: Arc<dyn UserStore>,
        messages: Arc<dyn MessageStore>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            sessions,
            rooms,
            users,
            messages,
            registry,
        }
    }

    /// セッションから参加者と参加先ルームを解決する
    ///
    /// レジストリには触れない。失敗した場合はアップグレードせずに拒否する。
    pub async fn authorize(
        &self,
        session_id: Option<&SessionId>,
    ) -> Result<JoinTicket, JoinRoomError> {
        let session = lookup_session(self.sessions.as_ref(), session_id)
            .await?
            .ok_or(JoinRoomError::Unauthenticated)?;

        let room_key = session
            .current_room
            .clone()
            .ok_or(JoinRoomError::NoRoomSelected)?;

        let room = match self.rooms.find(&room_key).await {
            Ok(room) => room,
            Err(RepositoryError::NotFound(_)) => {
                return Err(JoinRoomError::RoomNotFound(room_key.into_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(JoinTicket {
            username: session.username,
            first_name: session.first_name,
            room,
        })
    }

    /// 接続をレジストリに登録する
    pub async fn register(&self, record: ConnectionRecord) {
        tracing::info!(
            "Connection '{}' ({}) joined room '{}'",
            record.id,
            record.username,
            record.room_key
        );
        self.registry.register(record).await;
    }

    /// ルームの履歴を保存順で取得する
    ///
    /// レコードが 0 件の場合は空の履歴。ストアが他ルームのレコードを返しても除外する。
    pub async fn load_history(&self, room_key: &RoomKey) -> Result<Vec<Message>, JoinRoomError> {
        let messages = match self.messages.find_by_room(room_key).await {
            Ok(messages) => messages,
            Err(RepositoryError::NotFound(_)) => Vec::new(),
            Err(e) => {
                tracing::error!("Failed to load history for room '{}': {}", room_key, e);
                return Err(e.into());
            }
        };

        Ok(messages
            .into_iter()
            .filter(|message| &message.room_key == room_key)
            .collect())
    }

    /// ユーザーのメンバーシップにルームが無ければ追加して保存する
    ///
    /// 追加した場合は `true`。
    pub async fn ensure_membership(
        &self,
        username: &Username,
        room: &Room,
    ) -> Result<bool, JoinRoomError> {
        let user = match self.users.find(username).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound(_)) => {
                return Err(JoinRoomError::UserNotFound(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if user.is_member_of(&room.key) {
            return Ok(false);
        }

        if let Err(e) = self
            .users
            .update_room_membership(username, user.rooms_with(room))
            .await
        {
            tracing::error!(
                "Failed to add room '{}' to the membership of '{}': {}",
                room.key,
                username,
                e
            );
            return Err(e.into());
        }

        tracing::debug!("Added room '{}' to the membership of '{}'", room.key, username);
        Ok(true)
    }
}
