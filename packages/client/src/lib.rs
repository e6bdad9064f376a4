//! Chatterfly CLI chat client.
//!
//! Signs in over the HTTP API, creates or enters a room, then streams the room
//! over WebSocket with automatic reconnection.

pub mod config;
pub mod error;

mod api;
mod domain;
mod formatter;
mod runner;
mod session;
mod ui;

pub use config::{ClientConfig, RoomChoice};
pub use error::ClientError;
pub use runner::run_client;
