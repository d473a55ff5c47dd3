//! Network module - Drives a game connection end to end
//!
//! Provides:
//! - Session for one connection: handshake, then the tick loop
//! - Client for connecting to the game server with reconnects

mod client;
mod session;

pub use client::*;
pub use session::*;

use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN};

/// Configuration for network operations
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Game server host name or address
    pub host: String,
    /// Game server port
    pub port: u16,
    /// Authentication token sent in the handshake
    pub token: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// First reconnect delay in milliseconds; doubles on each attempt
    pub reconnect_delay_ms: u64,
    /// Upper bound for the reconnect delay
    pub max_reconnect_delay_ms: u64,
    /// Reconnect attempts before giving up (0 = never give up)
    pub max_reconnect_attempts: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            token: DEFAULT_TOKEN.to_string(),
            connect_timeout_ms: 5000,
            reconnect_delay_ms: 500,
            max_reconnect_delay_ms: 8000,
            max_reconnect_attempts: 0,
        }
    }
}

impl NetworkConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Delay before reconnect attempt `attempt` (1-based), doubling up to the cap
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let delay = self
            .reconnect_delay_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_reconnect_delay_ms.max(self.reconnect_delay_ms));
        Duration::from_millis(delay)
    }

    /// Whether another reconnect attempt is allowed after `attempts` failures
    pub fn may_retry(&self, attempts: u32) -> bool {
        self.max_reconnect_attempts == 0 || attempts < self.max_reconnect_attempts
    }
}

/// Resolve a hostname to a socket address
pub async fn resolve_host(host: &str, port: u16) -> std::io::Result<SocketAddr> {
    use tokio::net::lookup_host;

    let addr_string = format!("{}:{}", host, port);
    let mut addrs = lookup_host(&addr_string).await?;

    addrs.next().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Could not resolve host: {}", host),
        )
    })
}
