//! UseCase: メッセージ送信
//!
//! クライアントから受け取った本文に、接続レコードの ID・ルームキーと
//! サーバー側の時刻を付けて Message Channel に積みます。
//! クライアントが送ってきたユーザー名などは使いません。

use std::sync::Arc;

use chatterfly_shared::time::Clock;

use crate::domain::{ConnectionRecord, Message, MessageBody, Timestamp};

use super::{broadcast_message::MessageChannel, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    channel: MessageChannel,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(channel: MessageChannel, clock: Arc<dyn Clock>) -> Self {
        Self { channel, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信元の接続レコード（ID とルームキーの出どころ）
    /// * `body` - クライアントが送ってきた本文
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - キューに積んだメッセージ
    /// * `Err(SendMessageError)` - 本文が不正、またはキューが閉じている
    pub async fn execute(
        &self,
        sender: &ConnectionRecord,
        body: String,
    ) -> Result<Message, SendMessageError> {
        let body = MessageBody::new(body)?;
        let message = Message::new(
            sender.room_key.clone(),
            sender.username.clone(),
            sender.first_name.clone(),
            body,
            Timestamp::new(self.clock.now_millis()),
        );

        self.channel.enqueue(message.clone())?;
        tracing::debug!(
            "Enqueued message '{}' from '{}' for room '{}'",
            message.id,
            message.author,
            message.room_key
        );
        Ok(message)
    }
}
