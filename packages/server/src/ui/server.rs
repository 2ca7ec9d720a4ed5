//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, webrtc_config, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Room relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(state), None);
/// server.run("127.0.0.1", 3001).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Allowed CORS origin (any origin when `None`)
    client_url: Option<HeaderValue>,
}

impl Server {
    pub fn new(state: Arc<AppState>, client_url: Option<HeaderValue>) -> Self {
        Self { state, client_url }
    }

    /// Build the router with every endpoint and middleware attached
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/webrtc/config", get(webrtc_config))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(self.cors_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    fn cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET])
            .allow_headers(Any);

        match &self.client_url {
            Some(origin) => cors.allow_origin(origin.clone()),
            None => cors.allow_origin(Any),
        }
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Bind to `host:port` and run the server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Room relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
