//! Repository（ストア）の実装
//!
//! - `inmemory`: プロセス内 HashMap による実装（Redis / MongoDB の代替）

pub mod inmemory;

pub use inmemory::{
    InMemoryMessageStore, InMemoryRoomStore, InMemorySessionStore, InMemoryUserStore,
};
