//! InMemory User Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Room, User, UserStore, Username};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Username, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, username: &Username) -> Result<User, RepositoryError> {
        self.users
            .lock()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("user '{}'", username)))
    }

    async fn create(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.username) {
            return Err(RepositoryError::AlreadyExists(format!(
                "user '{}'",
                user.username
            )));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn update_room_membership(
        &self,
        username: &Username,
        rooms: Vec<Room>,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(username)
            .ok_or_else(|| RepositoryError::NotFound(format!("user '{}'", username)))?;
        user.rooms = rooms;
        Ok(())
    }
}
