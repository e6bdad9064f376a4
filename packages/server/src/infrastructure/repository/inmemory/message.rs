//! InMemory Message Store 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Message, MessageStore, RepositoryError, RoomKey};

/// 追記専用のメッセージログ
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }

    async fn find_by_room(&self, room_key: &RoomKey) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        let found: Vec<Message> = messages
            .iter()
            .filter(|message| &message.room_key == room_key)
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(RepositoryError::NotFound(format!(
                "messages for room '{}'",
                room_key
            )));
        }
        Ok(found)
    }
}
