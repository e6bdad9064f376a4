//! Request handlers.

mod cookie;
mod http;
mod websocket;

pub use http::{create_room, enter_room, get_me, health_check, sign_in, sign_out};
pub use websocket::websocket_handler;
