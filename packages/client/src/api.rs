//! HTTP API calls (sign-in and room selection).

use chatterfly_server::infrastructure::dto::http::{
    CreateRoomRequest, RoomDto, SessionCreatedDto, SignInRequest,
};
use reqwest::{StatusCode, header};

use crate::error::ClientError;

/// Name of the session cookie issued by the server
const SESSION_COOKIE: &str = "chatterfly-cookie";

/// HTTP client holding the session cookie
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cookie: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: None,
        }
    }

    /// `Cookie` header value for the current session
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Sign in, creating the user on first use, and keep the session cookie
    pub async fn sign_in(
        &mut self,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), ClientError> {
        let request = SignInRequest {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/api/sessions", self.base_url))
            .json(&request)
            .send()
            .await?;
        let response = check_status(response, username)?;

        let created: SessionCreatedDto = response.json().await?;
        tracing::debug!("Signed in as '{}'", username);
        self.cookie = Some(format!("{}={}", SESSION_COOKIE, created.session_id));
        Ok(())
    }

    /// Create a room (joined to the membership list by the server)
    pub async fn create_room(&self, name: &str) -> Result<RoomDto, ClientError> {
        let request = CreateRoomRequest {
            name: name.to_string(),
        };
        let response = self
            .authorized(self.http.post(format!("{}/api/rooms", self.base_url)))
            .json(&request)
            .send()
            .await?;
        let response = check_status(response, name)?;
        Ok(response.json().await?)
    }

    /// Make the room the session's current room
    pub async fn enter_room(&self, key: &str) -> Result<RoomDto, ClientError> {
        let response = self
            .authorized(
                self.http
                    .put(format!("{}/api/rooms/{}/enter", self.base_url, key)),
            )
            .send()
            .await?;
        let response = check_status(response, key)?;
        Ok(response.json().await?)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        }
    }
}

/// Map non-success statuses to client errors. `subject` names what the request was about.
fn check_status(
    response: reqwest::Response,
    subject: &str,
) -> Result<reqwest::Response, ClientError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        status => Err(status_error(status, subject)),
    }
}

fn status_error(status: StatusCode, subject: &str) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::RoomNotFound(subject.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::InvalidInput(subject.to_string())
        }
        status => ClientError::Api(status.as_u16()),
    }
}
