//! Chatterfly chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatterfly-server
//! cargo run --bin chatterfly-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use chatterfly_server::{
    app::{Stores, build_server},
    config::ServerConfig,
};
use chatterfly_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    let server = build_server(Stores::in_memory(), Arc::new(SystemClock));
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
