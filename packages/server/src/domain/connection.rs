//! 接続レジストリと配信のインターフェース
//!
//! ## 概要
//!
//! - `ConnectionRecord`: 1 本のライブソケットとルームキー・表示用の ID の対応
//! - `ConnectionSink`: 1 接続への送信口（実装は WebSocket の書き込みタスクへのキュー）
//! - `ConnectionRegistry`: ソケット ID → `ConnectionRecord` の並行安全なマップ

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use super::{
    entity::{Message, Room},
    error::DeliveryError,
    value_object::{ConnectionId, RoomKey, Username},
};

/// 接続へ届けるもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// チャットメッセージ（履歴・ライブ共通）
    Chat(Message),
    /// ルームのメタデータ（ヘッダー表示用）
    Room(Room),
    /// この接続にだけ通知するエラー
    Error(String),
}

/// 1 接続への送信口
///
/// `deliver` はブロックしない。ソケットへの実際の書き込みは接続ごとの書き込みタスクが行う。
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionSink: Send + Sync {
    fn deliver(&self, delivery: Delivery) -> Result<(), DeliveryError>;

    /// ソケットを閉じる。既に閉じていれば何もしない
    fn close(&self);
}

/// レジストリが保持する接続レコード
///
/// ルームキーと表示用 ID は接続の生存期間中に変わらない。
#[derive(Clone)]
pub struct ConnectionRecord {
    pub id: ConnectionId,
    pub room_key: RoomKey,
    pub username: Username,
    pub first_name: String,
    pub sink: Arc<dyn ConnectionSink>,
}

impl ConnectionRecord {
    pub fn new(
        id: ConnectionId,
        room_key: RoomKey,
        username: Username,
        first_name: String,
        sink: Arc<dyn ConnectionSink>,
    ) -> Self {
        Self {
            id,
            room_key,
            username,
            first_name,
            sink,
        }
    }
}

impl fmt::Debug for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRecord")
            .field("id", &self.id)
            .field("room_key", &self.room_key)
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .finish_non_exhaustive()
    }
}

/// Connection Registry
///
/// 複数の Room Join Handler と Broadcast Worker から同時に呼ばれる。
/// 永続化はせず、プロセス再起動で空から作り直される。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 無条件に登録する。同じ ID のレコードがあれば上書き（後勝ち）
    async fn register(&self, record: ConnectionRecord);

    /// 登録を解除する。存在しなくてもエラーにしない
    async fn deregister(&self, id: &ConnectionId) -> Option<ConnectionRecord>;

    /// ルームキーが一致する接続のスナップショット
    ///
    /// 呼び出し中の登録・解除と並行して動くため、時点一貫性は保証しない。
    async fn members_of(&self, room_key: &RoomKey) -> Vec<ConnectionRecord>;

    /// すべての接続を取り出して空にする（シャットダウン用）
    async fn drain(&self) -> Vec<ConnectionRecord>;

    /// 登録中の接続数
    async fn count(&self) -> usize;
}
