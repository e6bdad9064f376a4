//! InMemory Room Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Room, RoomKey, RoomStore};

#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomKey, Room>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn find(&self, room_key: &RoomKey) -> Result<Room, RepositoryError> {
        self.rooms
            .lock()
            .await
            .get(room_key)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("room '{}'", room_key)))
    }

    async fn create(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.key) {
            return Err(RepositoryError::AlreadyExists(format!("room '{}'", room.key)));
        }
        rooms.insert(room.key.clone(), room);
        Ok(())
    }
}
