//! WebSocket connection handlers (Room Join Handler).
//!
//! Lifecycle of one connection:
//!
//! 1. Before the upgrade: resolve the session and its current room. Rejections
//!    leave the registry untouched.
//! 2. Register the connection, then write the room's history and one room
//!    frame straight to the socket.
//! 3. Start the writer (draining the connection's outbound queue) and the
//!    reader (forwarding inbound frames to the Message Channel).
//! 4. When either side ends, deregister.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{
        State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::stream::{SplitSink, StreamExt};

use crate::{
    domain::{ConnectionId, ConnectionRecord, Delivery, MessageId},
    infrastructure::{
        dto::websocket::InboundChatMessage,
        message_pusher::{PumpEnd, WebSocketConnectionSink, pump_outbound, write_delivery},
    },
    ui::state::AppState,
    usecase::{JoinRoomError, JoinTicket, SendMessageError},
};

use super::cookie::session_id_from_headers;

/// Error text sent to a connection when a store fails during join
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let session_id = session_id_from_headers(&headers);

    let ticket = match state.join_room_usecase.authorize(session_id.as_ref()).await {
        Ok(ticket) => ticket,
        Err(e) => {
            let status = join_error_status(&e);
            tracing::warn!("Rejecting WebSocket connection ({}): {}", status, e);
            return Err(status);
        }
    };

    tracing::info!(
        "Upgrading connection for '{}' in room '{}'",
        ticket.username,
        ticket.room.key
    );
    Ok(ws
        .on_failed_upgrade(|e| tracing::error!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state, ticket)))
}

fn join_error_status(e: &JoinRoomError) -> StatusCode {
    match e {
        JoinRoomError::Unauthenticated => StatusCode::UNAUTHORIZED,
        JoinRoomError::NoRoomSelected => StatusCode::BAD_REQUEST,
        JoinRoomError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        JoinRoomError::UserNotFound(_) | JoinRoomError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, ticket: JoinTicket) {
    let (mut sender, mut receiver) = socket.split();

    let (sink, mut outbound) = WebSocketConnectionSink::channel();
    let sink = Arc::new(sink);
    let record = ConnectionRecord::new(
        ConnectionId::generate(),
        ticket.room.key.clone(),
        ticket.username.clone(),
        ticket.first_name.clone(),
        sink.clone(),
    );
    let connection_id = record.id;

    // Live messages arriving from here on wait in `outbound` until the writer starts
    state.join_room_usecase.register(record.clone()).await;

    let replayed = match replay(&state, &ticket, &mut sender).await {
        Ok(replayed) => replayed,
        Err(e) => {
            tracing::warn!(
                "Failed to write join frames to connection '{}': {}",
                connection_id,
                e
            );
            state.leave_room_usecase.execute(&connection_id).await;
            return;
        }
    };

    // Spawn a task to push queued deliveries to this client
    let mut send_task = tokio::spawn(async move {
        match pump_outbound(&mut outbound, &mut sender, &replayed).await {
            PumpEnd::CloseRequested => {
                tracing::debug!("Connection '{}' closed by server", connection_id);
            }
            PumpEnd::QueueClosed => {
                tracing::debug!("Outbound queue of '{}' closed", connection_id);
            }
            PumpEnd::WriteFailed(e) => {
                tracing::warn!("Failed to write to connection '{}': {}", connection_id, e);
            }
        }
    });

    // Spawn a task to forward messages from this client to the Message Channel
    let reader_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", record.id, e);
                    break;
                }
            };

            match frame {
                WsMessage::Text(text) => {
                    if !forward_inbound(&reader_state, &record, text.as_str()).await {
                        break;
                    }
                }
                WsMessage::Close(_) => {
                    tracing::info!("Connection '{}' requested close", record.id);
                    sink.mark_peer_closed();
                    break;
                }
                // Ping/pong is answered by the protocol layer; binary frames are not part of the protocol
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.leave_room_usecase.execute(&connection_id).await;
}

/// Writes history, the room frame and (if needed) a membership error directly to the socket.
///
/// Returns the ids of the replayed messages so the writer can skip live duplicates.
async fn replay(
    state: &AppState,
    ticket: &JoinTicket,
    sender: &mut SplitSink<WebSocket, WsMessage>,
) -> Result<HashSet<MessageId>, String> {
    let mut replayed = HashSet::new();

    match state.join_room_usecase.load_history(&ticket.room.key).await {
        Ok(history) => {
            tracing::debug!(
                "Replaying {} messages of room '{}' to '{}'",
                history.len(),
                ticket.room.key,
                ticket.username
            );
            for message in history {
                replayed.insert(message.id);
                write_delivery(sender, Delivery::Chat(message)).await?;
            }
        }
        Err(_) => {
            write_delivery(sender, Delivery::Error(INTERNAL_ERROR_MESSAGE.to_string())).await?;
        }
    }

    write_delivery(sender, Delivery::Room(ticket.room.clone())).await?;

    if state
        .join_room_usecase
        .ensure_membership(&ticket.username, &ticket.room)
        .await
        .is_err()
    {
        write_delivery(sender, Delivery::Error(INTERNAL_ERROR_MESSAGE.to_string())).await?;
    }

    Ok(replayed)
}

/// Decodes one inbound text frame and enqueues it with the connection's identity.
///
/// Returns `false` when the connection should stop reading.
async fn forward_inbound(state: &AppState, record: &ConnectionRecord, text: &str) -> bool {
    let inbound = match serde_json::from_str::<InboundChatMessage>(text) {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!("Ignoring undecodable frame from '{}': {}", record.id, e);
            return true;
        }
    };

    if let Some(claimed) = inbound.username.as_deref()
        && claimed != record.username.as_str()
    {
        tracing::warn!(
            "Connection '{}' claimed username '{}', overwriting with '{}'",
            record.id,
            claimed,
            record.username
        );
    }

    match state.send_message_usecase.execute(record, inbound.body).await {
        Ok(message) => {
            tracing::debug!("Received message '{}' from '{}'", message.id, record.username);
            true
        }
        Err(SendMessageError::InvalidBody(e)) => {
            tracing::warn!("Ignoring message from '{}': {}", record.id, e);
            true
        }
        Err(SendMessageError::ChannelClosed) => {
            tracing::info!("Message channel closed, ending connection '{}'", record.id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryError;

    #[test]
    fn test_join_error_status_mapping() {
        // テスト項目: 参加エラーがアップグレード前の HTTP ステータスに変換される
        // given (前提条件):
        let cases = vec![
            (JoinRoomError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (JoinRoomError::NoRoomSelected, StatusCode::BAD_REQUEST),
            (JoinRoomError::RoomNotFound("r1".to_string()), StatusCode::NOT_FOUND),
            (
                JoinRoomError::Repository(RepositoryError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            // when (操作):
            let status = join_error_status(&error);

            // then (期待する結果):
            assert_eq!(status, expected);
        }
    }
}
