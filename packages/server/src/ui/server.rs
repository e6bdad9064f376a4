//! Server execution logic.

use std::{future::Future, io, sync::Arc};

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::BroadcastHandle;

use super::{
    handler::{
        create_room, enter_room, get_me, health_check, sign_in, sign_out, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chatterfly chat server
///
/// Owns the application state and the running broadcast worker. On shutdown the
/// worker is stopped first: queued messages are flushed and every live
/// connection receives a close frame.
///
/// # Example
///
/// ```ignore
/// let server = chatterfly_server::app::build_server(Stores::in_memory(), Arc::new(SystemClock));
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    broadcast: BroadcastHandle,
}

impl Server {
    pub fn new(state: AppState, broadcast: BroadcastHandle) -> Self {
        Self {
            state: Arc::new(state),
            broadcast,
        }
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> io::Result<()> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chatterfly server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` resolves
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state);
        let broadcast = self.broadcast;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                tracing::info!("Stopping broadcast worker");
                broadcast.shutdown().await;
            })
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/sessions", post(sign_in).delete(sign_out))
        .route("/api/me", get(get_me))
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/{key}/enter", put(enter_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
