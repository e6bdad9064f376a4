//! Utilities shared between the Chatterfly server and client.

pub mod logger;
pub mod time;
