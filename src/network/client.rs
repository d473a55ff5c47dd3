//! Game client
//!
//! Connects to the game server and plays one match. Connection-level
//! failures trigger a reconnect with exponential backoff; every attempt
//! starts from a brand-new session, so no entity state survives a reconnect.

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpStream;

use super::{resolve_host, NetworkConfig, Session, SessionSummary};
use crate::protocol::{is_transient_io, CodecError};
use crate::strategy::Strategy;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Codec(#[from] CodecError),

    #[error("Connection timeout")]
    Timeout,

    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },
}

impl ClientError {
    /// Whether a fresh connection might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Io(e) => is_transient_io(e),
            ClientError::Codec(e) => e.is_transient(),
            ClientError::Timeout => true,
            ClientError::RetriesExhausted { .. } => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Game server client
pub struct Client {
    config: NetworkConfig,
}

impl Client {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Open a TCP connection to the configured server
    pub async fn connect(&self) -> ClientResult<(TcpStream, SocketAddr)> {
        let server_addr = resolve_host(&self.config.host, self.config.port).await?;
        tracing::info!("Connecting to {}", server_addr);

        let stream =
            match tokio::time::timeout(self.config.connect_timeout(), TcpStream::connect(server_addr))
                .await
            {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return Err(ClientError::Io(e)),
                Err(_) => return Err(ClientError::Timeout),
            };

        // Moves are small and latency-bound
        stream.set_nodelay(true)?;
        Ok((stream, server_addr))
    }

    /// Connect once and play until GameOver
    pub async fn play_once<S>(&self, strategy: &mut S) -> ClientResult<SessionSummary>
    where
        S: Strategy + ?Sized,
    {
        let (stream, server_addr) = self.connect().await?;
        let (reader, writer) = stream.into_split();

        let mut session = Session::new(reader, writer, self.config.token.clone());
        let summary = session.play(strategy).await?;

        tracing::info!(
            "Session with {} finished: {} bytes sent, {} bytes received",
            server_addr,
            summary.bytes_sent,
            summary.bytes_received
        );
        Ok(summary)
    }

    /// Play one match, reconnecting on connection-level failures
    pub async fn run<S>(&self, strategy: &mut S) -> ClientResult<SessionSummary>
    where
        S: Strategy + ?Sized,
    {
        let mut failures = 0u32;

        loop {
            let error = match self.play_once(strategy).await {
                Ok(summary) => return Ok(summary),
                Err(e) if e.is_transient() => e,
                Err(e) => {
                    tracing::error!("Session failed: {}", e);
                    return Err(e);
                }
            };

            failures += 1;
            if !self.config.may_retry(failures) {
                tracing::error!("Giving up after {} attempts: {}", failures, error);
                return Err(ClientError::RetriesExhausted {
                    attempts: failures,
                    last: Box::new(error),
                });
            }

            let delay = self.config.backoff_delay(failures);
            tracing::warn!(
                "Connection failed ({}), reconnecting in {:?} (attempt {})",
                error,
                delay,
                failures + 1
            );
            tokio::time::sleep(delay).await;
        }
    }
}
