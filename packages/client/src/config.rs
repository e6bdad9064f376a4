//! Client configuration (command line flags).

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chatterfly-client")]
#[command(about = "CLI chat client for the Chatterfly server", long_about = None)]
pub struct ClientConfig {
    /// Base URL of the Chatterfly server
    #[arg(short = 's', long, env = "CHATTERFLY_SERVER", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Username to sign in with (created on first use)
    #[arg(short = 'u', long)]
    pub username: String,

    /// First name shown next to your messages (used when the user is created)
    #[arg(short = 'f', long)]
    pub first_name: String,

    /// Last name (used when the user is created)
    #[arg(short = 'l', long, default_value = "")]
    pub last_name: String,

    /// Key of an existing room to enter
    #[arg(short = 'r', long, conflicts_with = "create_room", required_unless_present = "create_room")]
    pub room: Option<String>,

    /// Create a new room with this name and enter it
    #[arg(short = 'c', long)]
    pub create_room: Option<String>,
}

/// Which room to stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomChoice {
    Enter(String),
    Create(String),
}

impl ClientConfig {
    pub fn room_choice(&self) -> RoomChoice {
        match (&self.room, &self.create_room) {
            (Some(key), _) => RoomChoice::Enter(key.clone()),
            (None, Some(name)) => RoomChoice::Create(name.clone()),
            // clap guarantees one of them; an empty key is rejected by the server
            (None, None) => RoomChoice::Enter(String::new()),
        }
    }
}
