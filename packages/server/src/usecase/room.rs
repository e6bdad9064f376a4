//! UseCase: ルームの作成と入室

use std::sync::Arc;

use crate::domain::{RepositoryError, Room, RoomKey, RoomStore, SessionId, SessionStore, UserStore};

use super::{error::RoomError, session::lookup_session};

/// ルーム作成のユースケース
///
/// 新しいキーでルームを作成し、作成者のメンバーシップ一覧に追加します。
pub struct CreateRoomUseCase {
    sessions: Arc<dyn SessionStore>,
    rooms: Arc<dyn RoomStore>,
    users: Arc<dyn UserStore>,
}

impl CreateRoomUseCase {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        rooms: Arc<dyn RoomStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            sessions,
            rooms,
            users,
        }
    }

    pub async fn execute(
        &self,
        session_id: Option<&SessionId>,
        name: String,
    ) -> Result<Room, RoomError> {
        let session = lookup_session(self.sessions.as_ref(), session_id)
            .await?
            .ok_or(RoomError::Unauthenticated)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let room = Room::new(RoomKey::generate(), name.to_string());
        self.rooms.create(room.clone()).await?;

        let user = self.users.find(&session.username).await?;
        self.users
            .update_room_membership(&user.username, user.rooms_with(&room))
            .await?;

        tracing::info!(
            "Room '{}' ({}) created by '{}'",
            room.name,
            room.key,
            session.username
        );
        Ok(room)
    }
}

/// 入室のユースケース
///
/// ルームの存在を確認し、セッションの現在のルームとして記録します。
/// 実際の参加は WebSocket 接続時に行われます。
pub struct EnterRoomUseCase {
    sessions: Arc<dyn SessionStore>,
    rooms: Arc<dyn RoomStore>,
}

impl EnterRoomUseCase {
    pub fn new(sessions: Arc<dyn SessionStore>, rooms: Arc<dyn RoomStore>) -> Self {
        Self { sessions, rooms }
    }

    pub async fn execute(
        &self,
        session_id: Option<&SessionId>,
        room_key: String,
    ) -> Result<Room, RoomError> {
        let mut session = lookup_session(self.sessions.as_ref(), session_id)
            .await?
            .ok_or(RoomError::Unauthenticated)?;

        let key = RoomKey::new(room_key.clone()).map_err(|_| RoomError::RoomNotFound(room_key))?;
        let room = match self.rooms.find(&key).await {
            Ok(room) => room,
            Err(RepositoryError::NotFound(_)) => {
                return Err(RoomError::RoomNotFound(key.into_string()));
            }
            Err(e) => return Err(e.into()),
        };

        session.current_room = Some(room.key.clone());
        if let Some(session_id) = session_id {
            self.sessions.set(session_id, session.clone()).await?;
        }

        tracing::info!("User '{}' entered room '{}'", session.username, room.key);
        Ok(room)
    }
}
