//! Session cookie helpers.

use axum::http::{HeaderMap, header};

use crate::domain::SessionId;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "chatterfly-cookie";

/// Extracts the session id from the `Cookie` headers, if present and well-formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::new(value.trim().to_string()).ok())
}

/// `Set-Cookie` value issued on sign-in.
pub fn session_cookie(session_id: &SessionId) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        session_id.as_str()
    )
}

/// `Set-Cookie` value clearing the session on sign-out.
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
