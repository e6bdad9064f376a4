//! Chatterfly CLI chat client.
//!
//! Signs in, creates or enters a room, and streams it over WebSocket.
//! Type messages and press Enter to send.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatterfly-client -- --username alice --first-name Alice --create-room general
//! cargo run --bin chatterfly-client -- -u bob -f Bob --room <room-key>
//! ```

use clap::Parser;

use chatterfly_client::{ClientConfig, run_client};
use chatterfly_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ClientConfig::parse();

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
