//! Chatterfly server: a live chatroom fan-out engine.
//!
//! Connections join a room over WebSocket, receive the room's history, and from
//! then on every message sent in the room. All messages flow through a single
//! broadcast worker that persists each one before fanning it out.

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod testing;
