//! InMemory ストア実装
//!
//! ドメイン層が定義するストア trait の具体的な実装。
//! HashMap / Vec をインメモリ DB として使用し、`tokio::sync::Mutex` で並行アクセスを保護します。
//! プロセス再起動でデータは失われます。

mod message;
mod room;
mod session;
mod user;

pub use message::InMemoryMessageStore;
pub use room::InMemoryRoomStore;
pub use session::InMemorySessionStore;
pub use user::InMemoryUserStore;
