//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};

use crate::{
    infrastructure::dto::http::{
        CreateRoomRequest, RoomDto, SessionCreatedDto, SignInRequest, UserProfileDto,
    },
    ui::state::AppState,
    usecase::{RoomError, SessionError},
};

use super::cookie::{expired_session_cookie, session_cookie, session_id_from_headers};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Sign in (creating the user on first use) and issue the session cookie
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let (session_id, _session) = state
        .sign_in_usecase
        .execute(request.username, request.first_name, request.last_name)
        .await
        .map_err(session_error_status)?;

    let cookie = session_cookie(&session_id);
    let body = SessionCreatedDto {
        session_id: session_id.as_str().to_string(),
    };
    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(body)))
}

/// Delete the session named by the cookie
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let session_id = session_id_from_headers(&headers);
    state
        .sign_out_usecase
        .execute(session_id.as_ref())
        .await
        .map_err(session_error_status)?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_session_cookie())],
    ))
}

/// Profile of the signed-in user, including room membership
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfileDto>, StatusCode> {
    let session_id = session_id_from_headers(&headers);
    let user = state
        .get_profile_usecase
        .execute(session_id.as_ref())
        .await
        .map_err(session_error_status)?;

    // Domain Model から DTO への変換
    Ok(Json(UserProfileDto::from(user)))
}

/// Create a room and add it to the creator's membership
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), StatusCode> {
    let session_id = session_id_from_headers(&headers);
    let room = state
        .create_room_usecase
        .execute(session_id.as_ref(), request.name)
        .await
        .map_err(room_error_status)?;

    Ok((StatusCode::CREATED, Json(RoomDto::from(room))))
}

/// Record the room as the session's current room (joined on the next WebSocket connect)
pub async fn enter_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_key): Path<String>,
) -> Result<Json<RoomDto>, StatusCode> {
    let session_id = session_id_from_headers(&headers);
    let room = state
        .enter_room_usecase
        .execute(session_id.as_ref(), room_key)
        .await
        .map_err(room_error_status)?;

    Ok(Json(RoomDto::from(room)))
}

fn session_error_status(e: SessionError) -> StatusCode {
    match e {
        SessionError::InvalidInput(e) => {
            tracing::warn!("Rejected sign-in: {}", e);
            StatusCode::BAD_REQUEST
        }
        SessionError::Unauthenticated => StatusCode::UNAUTHORIZED,
        SessionError::UserNotFound(username) => {
            tracing::warn!("Session refers to unknown user '{}'", username);
            StatusCode::NOT_FOUND
        }
        SessionError::Repository(e) => {
            tracing::error!("Session store failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn room_error_status(e: RoomError) -> StatusCode {
    match e {
        RoomError::Unauthenticated => StatusCode::UNAUTHORIZED,
        RoomError::EmptyName => StatusCode::BAD_REQUEST,
        RoomError::RoomNotFound(key) => {
            tracing::debug!("Room '{}' not found", key);
            StatusCode::NOT_FOUND
        }
        RoomError::Repository(e) => {
            tracing::error!("Room store failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
