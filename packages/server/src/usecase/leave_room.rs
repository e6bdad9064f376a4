//! UseCase: ルーム退出（接続終了時のレジストリからの解除）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

pub struct LeaveRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続をレジストリから外す。登録されていた場合は `true`
    ///
    /// 配信失敗で既に外されている場合もあるので、未登録でもエラーにしない。
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        match self.registry.deregister(connection_id).await {
            Some(record) => {
                tracing::info!(
                    "Connection '{}' ({}) left room '{}'",
                    record.id,
                    record.username,
                    record.room_key
                );
                true
            }
            None => {
                tracing::debug!("Connection '{}' was already deregistered", connection_id);
                false
            }
        }
    }
}
