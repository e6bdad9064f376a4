//! Server configuration (command line flags with environment fallbacks).

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chatterfly-server")]
#[command(about = "Chatroom fan-out server over WebSocket", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "CHATTERFLY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "CHATTERFLY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "CHATTERFLY_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,
}
