//! UseCase: Message Channel と Broadcast Worker
//!
//! ## 概要
//!
//! - `MessageChannel`: 各接続の読み込みタスクから Broadcast Worker へメッセージを運ぶ
//!   unbounded な MPSC キュー。到着順がそのまま全体の順序になる
//! - `BroadcastWorker`: プロセスに 1 つだけ存在する消費者。1 件ずつ
//!   「永続化 → 同じルームの全接続へ配信」を行う
//!
//! ## 方針
//!
//! - 永続化に失敗してもログに残して配信は続ける（耐久性より可用性）
//! - `PeerGone` 以外で配信に失敗した接続は死んでいるものとして閉じ、レジストリから外す
//! - 1 つの接続の失敗が他の接続への配信を止めてはならない
//! - 自動リトライはしない

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{ConnectionRegistry, Delivery, DeliveryError, Message, MessageStore};

use super::error::SendMessageError;

/// Message Channel の送信側（複製して各接続に渡す）
#[derive(Clone)]
pub struct MessageChannel {
    sender: mpsc::UnboundedSender<Message>,
}

impl MessageChannel {
    /// 送信側と受信側の組を作成
    pub(crate) fn unbounded() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// メッセージをキューに積む。シャットダウン後は `ChannelClosed`
    pub fn enqueue(&self, message: Message) -> Result<(), SendMessageError> {
        self.sender
            .send(message)
            .map_err(|_| SendMessageError::ChannelClosed)
    }
}

/// 1 メッセージの処理結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub persisted: bool,
    pub delivered: usize,
    pub evicted: usize,
}

/// Broadcast Worker
pub struct BroadcastWorker {
    message_store: Arc<dyn MessageStore>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl BroadcastWorker {
    pub fn new(
        message_store: Arc<dyn MessageStore>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            message_store,
            registry,
        }
    }

    /// Message Channel を作成し、ワーカーをタスクとして起動する
    pub fn spawn(self) -> BroadcastHandle {
        let (channel, receiver) = MessageChannel::unbounded();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(receiver, shutdown_rx));

        BroadcastHandle {
            channel,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        self,
        mut receiver: mpsc::UnboundedReceiver<Message>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        tracing::info!("Broadcast worker started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                next = receiver.recv() => match next {
                    Some(message) => {
                        self.process(message).await;
                    }
                    None => break,
                },
            }
        }

        // 新規の受付を止めてから、キューに残っている分を処理する
        receiver.close();
        let mut flushed = 0;
        while let Some(message) = receiver.recv().await {
            self.process(message).await;
            flushed += 1;
        }

        let connections = self.registry.drain().await;
        for connection in &connections {
            connection.sink.close();
        }

        tracing::info!(
            "Broadcast worker stopped ({} queued messages flushed, {} connections closed)",
            flushed,
            connections.len()
        );
    }

    /// 1 件のメッセージを永続化し、同じルームの接続へ配信する
    pub async fn process(&self, message: Message) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        // 1. 永続化（失敗しても配信は行う）
        match self.message_store.append(&message).await {
            Ok(()) => report.persisted = true,
            Err(e) => {
                tracing::error!(
                    "Failed to persist message '{}' for room '{}': {}",
                    message.id,
                    message.room_key,
                    e
                );
            }
        }

        // 2. 同じルームの接続へ配信
        let members = self.registry.members_of(&message.room_key).await;
        for member in members {
            match member.sink.deliver(Delivery::Chat(message.clone())) {
                Ok(()) => report.delivered += 1,
                Err(DeliveryError::PeerGone) => {
                    tracing::debug!("Connection '{}' went away, skipping", member.id);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver message '{}' to connection '{}' ({}): {}",
                        message.id,
                        member.id,
                        member.username,
                        e
                    );
                    member.sink.close();
                    self.registry.deregister(&member.id).await;
                    report.evicted += 1;
                }
            }
        }

        tracing::debug!(
            "Broadcasted message '{}' to room '{}': {:?}",
            message.id,
            message.room_key,
            report
        );
        report
    }
}

/// 起動中の Broadcast Worker への参照
pub struct BroadcastHandle {
    channel: MessageChannel,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl BroadcastHandle {
    /// 送信側を取得（接続ごとに複製して使う）
    pub fn channel(&self) -> MessageChannel {
        self.channel.clone()
    }

    /// キューを閉じて残りを処理し、登録中の全接続を閉じてからワーカーを停止する
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Broadcast worker task failed: {}", e);
        }
    }
}
