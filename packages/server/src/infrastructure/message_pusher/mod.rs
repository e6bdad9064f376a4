//! 接続への送信（配信）の実装
//!
//! ## 概要
//!
//! このモジュールは `ConnectionSink` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装

pub mod websocket;

pub use websocket::{PumpEnd, PushCommand, WebSocketConnectionSink, pump_outbound, write_delivery};
