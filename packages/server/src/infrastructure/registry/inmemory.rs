//! InMemory Connection Registry 実装
//!
//! ドメイン層の `ConnectionRegistry` trait を `Mutex<HashMap>` で実装します。
//!
//! ## ロック方針
//!
//! - ロックを保持するのは HashMap の操作中のみ
//! - `members_of` は一致するレコードを複製して返し、配信はロックの外で行われる
//!   （配信中に登録・解除が走ってもデッドロックしない）

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRecord, ConnectionRegistry, RoomKey};

/// インメモリ Connection Registry
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: ソケット ID, Value: 接続レコード
    connections: Mutex<HashMap<ConnectionId, ConnectionRecord>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, record: ConnectionRecord) {
        let id = record.id;
        let room_key = record.room_key.clone();
        let previous = self.connections.lock().await.insert(id, record);
        if previous.is_some() {
            tracing::warn!("Connection '{}' was already registered, overwriting", id);
        }
        tracing::debug!("Connection '{}' registered to room '{}'", id, room_key);
    }

    async fn deregister(&self, id: &ConnectionId) -> Option<ConnectionRecord> {
        let removed = self.connections.lock().await.remove(id);
        if removed.is_some() {
            tracing::debug!("Connection '{}' deregistered", id);
        }
        removed
    }

    async fn members_of(&self, room_key: &RoomKey) -> Vec<ConnectionRecord> {
        let connections = self.connections.lock().await;
        connections
            .values()
            .filter(|record| &record.room_key == room_key)
            .cloned()
            .collect()
    }

    async fn drain(&self) -> Vec<ConnectionRecord> {
        let mut connections = self.connections.lock().await;
        connections.drain().map(|(_, record)| record).collect()
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
