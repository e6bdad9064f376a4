//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::{
    api::ApiClient,
    config::{ClientConfig, RoomChoice},
    error::ClientError,
};

use super::{
    domain::{should_attempt_reconnect, should_exit_immediately, websocket_url},
    session::run_client_session,
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Sign in, select the room and stream it, reconnecting on connection loss
///
/// Every reconnect replays the room's history, so nothing needs to be resent.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let mut api = ApiClient::new(&config.server);
    api.sign_in(&config.username, &config.first_name, &config.last_name)
        .await?;

    let room = match config.room_choice() {
        RoomChoice::Create(name) => {
            let created = api.create_room(&name).await?;
            tracing::info!("Created room '{}' ({})", created.name, created.key);
            api.enter_room(&created.key).await?
        }
        RoomChoice::Enter(key) => api.enter_room(&key).await?,
    };
    tracing::info!("Entered room '{}' ({})", room.name, room.key);

    let cookie = api.cookie().ok_or(ClientError::Unauthorized)?.to_string();
    let ws_url = websocket_url(&config.server);
    let mut input = spawn_line_reader(config.username.clone());

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            ws_url,
            config.username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&ws_url, &cookie, &config.username, &mut input).await {
            Ok(()) => {
                // If connection ended normally (user exit), don't reconnect
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("Cannot continue: {}", e);
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
