//! InMemory Session Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Session, SessionId, SessionStore};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &SessionId) -> Result<Session, RepositoryError> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("session '{}'", session_id.as_str())))
    }

    async fn set(&self, session_id: &SessionId, session: Session) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .await
            .insert(session_id.clone(), session);
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
        self.sessions.lock().await.remove(session_id);
        Ok(())
    }
}
