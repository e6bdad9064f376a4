//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, StatusCode, header},
        protocol::Message,
    },
};

use chatterfly_server::infrastructure::dto::websocket::{InboundChatMessage, ServerMessage};
use chatterfly_shared::time::get_timestamp_millis;

use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket session until the user quits or the connection is lost
///
/// `input` carries the lines typed by the user and outlives reconnects.
pub async fn run_client_session(
    ws_url: &str,
    cookie: &str,
    username: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let mut request = ws_url
        .into_client_request()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let cookie =
        HeaderValue::from_str(cookie).map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    request.headers_mut().insert(header::COOKIE, cookie);

    let (ws_stream, _response) = connect_async(request).await.map_err(connect_error)?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        username
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let username_for_read = username.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print!("{}", format_frame(text.as_str(), &username_for_read));
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input.recv() => {
                let Some(line) = line else {
                    // stdin closed (Ctrl+C / Ctrl+D)
                    let _ = write.send(Message::Close(None)).await;
                    read_task.abort();
                    return Ok(());
                };

                let frame = InboundChatMessage {
                    body: line,
                    ..Default::default()
                };
                let json = match serde_json::to_string(&frame) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::text(json)).await {
                    tracing::warn!("Failed to send message: {}", e);
                    read_task.abort();
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
            }
        }
    }
}

/// Map a failed handshake to a client error
fn connect_error(e: tungstenite::Error) -> ClientError {
    match &e {
        tungstenite::Error::Http(response) => rejection_error(response.status()),
        _ => ClientError::ConnectionError(e.to_string()),
    }
}

/// Map the status of a rejected upgrade to a client error
fn rejection_error(status: StatusCode) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::BAD_REQUEST => ClientError::NoRoomSelected,
        StatusCode::NOT_FOUND => ClientError::RoomNotFound("current room".to_string()),
        status => ClientError::ConnectionError(format!("HTTP {}", status.as_u16())),
    }
}

/// Render one server frame for the terminal
fn format_frame(text: &str, me: &str) -> String {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Chat(chat)) => MessageFormatter::format_chat_message(
            &chat.first_name,
            &chat.username,
            &chat.body,
            chat.timestamp,
            chat.username == me,
        ),
        Ok(ServerMessage::Room(room)) => MessageFormatter::format_room(&room.name, &room.key),
        Ok(ServerMessage::Error(error)) => {
            MessageFormatter::format_error(&error.message, get_timestamp_millis())
        }
        Err(_) => MessageFormatter::format_raw_message(text),
    }
}
