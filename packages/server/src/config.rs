//! Server configuration from command-line flags and environment variables.

use std::time::Duration;

use axum::http::HeaderValue;
use clap::{Args, Parser};

use crate::domain::IceSettings;

/// Room relay server configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "easel-server")]
#[command(about = "Room relay server for drawing sync and WebRTC signaling", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Allowed CORS origin (any origin when omitted)
    #[arg(long, env = "CLIENT_URL", value_parser = parse_origin)]
    pub client_url: Option<HeaderValue>,

    /// Seconds between server pings
    #[arg(
        long,
        env = "HEARTBEAT_INTERVAL_SECS",
        default_value_t = 25,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub heartbeat_interval_secs: u64,

    /// Seconds of client silence before the connection is dropped
    #[arg(
        long,
        env = "CLIENT_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub client_timeout_secs: u64,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub ice: IceConfig,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }
}

/// STUN/TURN settings served from `/api/webrtc/config`.
#[derive(Args, Debug, Clone)]
pub struct IceConfig {
    /// Comma-separated STUN server URLs
    #[arg(
        long,
        env = "STUN_URLS",
        value_delimiter = ',',
        default_values = ["stun:stun1.l.google.com:19302", "stun:stun2.l.google.com:19302"]
    )]
    pub stun_urls: Vec<String>,

    /// Comma-separated TURN server URLs
    #[arg(long, env = "TURN_URLS", value_delimiter = ',')]
    pub turn_urls: Vec<String>,

    #[arg(long, env = "TURN_USERNAME", default_value = "webrtc")]
    pub turn_username: String,

    #[arg(long, env = "TURN_CREDENTIAL", default_value = "")]
    pub turn_credential: String,

    /// Lifetime of issued TURN usernames, in seconds
    #[arg(long, env = "TURN_TTL_SECS", default_value_t = 86_400)]
    pub turn_ttl_secs: i64,

    #[arg(long, env = "ICE_CANDIDATE_POOL_SIZE", default_value_t = 10)]
    pub ice_candidate_pool_size: u32,
}

impl From<IceConfig> for IceSettings {
    fn from(config: IceConfig) -> Self {
        Self {
            stun_urls: non_empty(config.stun_urls),
            turn_urls: non_empty(config.turn_urls),
            turn_username: config.turn_username,
            turn_credential: config.turn_credential,
            turn_ttl_secs: config.turn_ttl_secs,
            ice_candidate_pool_size: config.ice_candidate_pool_size,
        }
    }
}

// `TURN_URLS=""` yields a single empty entry
fn non_empty(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

fn parse_origin(value: &str) -> Result<HeaderValue, String> {
    HeaderValue::from_str(value.trim_end_matches('/'))
        .map_err(|e| format!("invalid origin '{}': {}", value, e))
}
