//! WebSocket を使った ConnectionSink 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`UnboundedSender<PushCommand>`）の管理
//! - 送信キューを WebSocket の書き込み側へ流し込む（`pump_outbound`）
//!
//! ## 設計ノート
//!
//! Broadcast Worker は `deliver` でキューに積むだけで、ソケットへの書き込みは
//! 接続ごとの書き込みタスクが行います。遅いクライアントがいても他の接続への配信は止まりません。
//!
//! 書き込みタスクが終了すると受信側が破棄され、以降の `deliver` は失敗します。
//! Broadcast Worker はこれを死んだ接続として扱い、レジストリから外します。
//!
//! 送信キューは上限なしです。接続を保ったまま読み込みを止めたクライアントの分は
//! キューが伸び続け、Broadcast Worker もその接続を外しません。半開きのソケットは
//! 切断が検出されるまで残る前提で、キューの上限や遅いクライアントの切断は行いません。

use std::{
    collections::HashSet,
    fmt::Display,
    sync::atomic::{AtomicBool, Ordering},
};

use axum::extract::ws::Message as WsMessage;
use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionSink, Delivery, DeliveryError, MessageId};
use crate::infrastructure::dto::websocket::ServerMessage;

/// 書き込みタスクへの指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushCommand {
    Deliver(Delivery),
    /// Close フレームを送って書き込みタスクを終了する
    Close,
}

/// 書き込みタスクの終了理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpEnd {
    /// `close` が呼ばれた
    CloseRequested,
    /// すべての送信側が破棄された
    QueueClosed,
    /// ソケットへの書き込み（またはエンコード）に失敗した
    WriteFailed(String),
}

/// WebSocket を使った ConnectionSink 実装
pub struct WebSocketConnectionSink {
    sender: mpsc::UnboundedSender<PushCommand>,
    /// クライアントから Close フレームを受け取ったか
    peer_closed: AtomicBool,
}

impl WebSocketConnectionSink {
    /// 送信口と、書き込みタスクが読む受信側を作成
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PushCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink = Self {
            sender,
            peer_closed: AtomicBool::new(false),
        };
        (sink, receiver)
    }

    /// クライアントが正常にクローズしたことを記録する
    pub fn mark_peer_closed(&self) {
        self.peer_closed.store(true, Ordering::Release);
    }
}

impl ConnectionSink for WebSocketConnectionSink {
    fn deliver(&self, delivery: Delivery) -> Result<(), DeliveryError> {
        if self.peer_closed.load(Ordering::Acquire) {
            return Err(DeliveryError::PeerGone);
        }
        self.sender
            .send(PushCommand::Deliver(delivery))
            .map_err(|_| DeliveryError::Failed("outbound queue closed".to_string()))
    }

    fn close(&self) {
        // 書き込みタスクが既に終了していれば送れないが、それで構わない
        let _ = self.sender.send(PushCommand::Close);
    }
}

/// 1 件の配信をエンコードしてソケットに書き込む
pub async fn write_delivery<S>(sink: &mut S, delivery: Delivery) -> Result<(), String>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    let frame = ServerMessage::from(delivery);
    let json = serde_json::to_string(&frame).map_err(|e| e.to_string())?;
    sink.send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| e.to_string())
}

/// 送信キューの内容をソケットに書き込み続ける
///
/// `replayed` に含まれる ID のチャットメッセージは履歴として送信済みなので書き込まない。
pub async fn pump_outbound<S>(
    receiver: &mut mpsc::UnboundedReceiver<PushCommand>,
    sink: &mut S,
    replayed: &HashSet<MessageId>,
) -> PumpEnd
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    while let Some(command) = receiver.recv().await {
        let delivery = match command {
            PushCommand::Deliver(delivery) => delivery,
            PushCommand::Close => {
                if let Err(e) = sink.send(WsMessage::Close(None)).await {
                    tracing::debug!("Failed to send close frame: {}", e);
                }
                return PumpEnd::CloseRequested;
            }
        };

        if let Delivery::Chat(message) = &delivery
            && replayed.contains(&message.id)
        {
            tracing::debug!("Skipping message '{}' already sent as history", message.id);
            continue;
        }

        if let Err(e) = write_delivery(sink, delivery).await {
            return PumpEnd::WriteFailed(e);
        }
    }

    PumpEnd::QueueClosed
}
