//! Message formatting utilities for client display.

use chatterfly_shared::time::{timestamp_to_clock_time, timestamp_to_rfc3339};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room header shown after history replay
    pub fn format_room(name: &str, key: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Room: {}\n", name));
        output.push_str(&format!("Key:  {}\n", key));
        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `first_name` - Display name of the sender
    /// * `username` - Username of the sender
    /// * `body` - The message body
    /// * `sent_at` - Unix timestamp stamped by the server (milliseconds)
    /// * `is_me` - Whether the current user sent it
    pub fn format_chat_message(
        first_name: &str,
        username: &str,
        body: &str,
        sent_at: i64,
        is_me: bool,
    ) -> String {
        let me_suffix = if is_me { " (me)" } else { "" };
        format!(
            "\n[{}] {} @{}{}: {}\n",
            timestamp_to_clock_time(sent_at),
            first_name,
            username,
            me_suffix,
            body
        )
    }

    /// Format an error reported by the server
    pub fn format_error(message: &str, received_at: i64) -> String {
        format!(
            "\n! Server error: {} ({})\n",
            message,
            timestamp_to_rfc3339(received_at)
        )
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
