//! Room relay server: drawing sync and WebRTC signaling for host/viewer rooms.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin easel-server
//! cargo run --bin easel-server -- --host 0.0.0.0 --port 3001
//! ```

use std::sync::Arc;

use clap::Parser;
use easel_server::{
    config::ServerConfig,
    domain::IceSettings,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
    },
    ui::{AppState, HeartbeatSettings, Server},
};
use easel_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME"), "easel_shared"], &config.log_level);

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Create Repositories (in-memory)
    let rooms = Arc::new(InMemoryRoomRepository::new());
    let connections = Arc::new(InMemoryConnectionRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let heartbeat = HeartbeatSettings {
        interval: config.heartbeat_interval(),
        client_timeout: config.client_timeout(),
    };
    let state = AppState::new(
        rooms,
        connections,
        message_pusher,
        IceSettings::from(config.ice.clone()),
        Arc::new(SystemClock),
        heartbeat,
    );

    // 4. Create and run the server
    let server = Server::new(Arc::new(state), config.client_url.clone());
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
