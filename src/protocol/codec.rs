//! Session-level message codec
//!
//! Wraps a reader/writer pair and speaks the handshake, the game context
//! and the per-tick opcode dispatch. Entity payloads are left to the
//! reconciler, which reads them straight from [`Codec::reader_mut`].

use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use super::move_encoder::encode_move;
use super::{FramingError, MessageType, WireReader, WireWriter};
use crate::model::{EntityKind, Game, Move};

/// Codec errors. Every variant is fatal to the session.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("Protocol violation: expected {expected}, got opcode {opcode}")]
    ProtocolViolation { expected: &'static str, opcode: u8 },

    #[error("Grid size mismatch: expected {expected} tiles, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },

    #[error("Reference to unknown {kind} id {id}")]
    UnknownEntity { kind: EntityKind, id: i64 },

    #[error("Invalid {field} value: {value}")]
    InvalidValue { field: &'static str, value: u8 },
}

impl CodecError {
    /// Connection-level failure (refused, reset, ...), as opposed to a
    /// malformed or desynchronized stream. Only these are worth a reconnect.
    pub fn is_transient(&self) -> bool {
        match self {
            CodecError::Framing(FramingError::Io(e)) => is_transient_io(e),
            _ => false,
        }
    }
}

/// I/O failures caused by the connection itself rather than by its contents
pub fn is_transient_io(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::TimedOut
    )
}

pub type CodecResult<T> = Result<T, CodecError>;

/// What the server sent at a tick-read point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incoming {
    /// The match is over; no payload follows
    GameOver,
    /// A tick's state follows
    PlayerContext,
}

/// Codec statistics
#[derive(Debug, Default, Clone)]
pub struct CodecStats {
    /// Messages sent
    pub messages_sent: u64,
    /// Messages received
    pub messages_received: u64,
}

/// Message-level reader/writer for one connection
pub struct Codec<R, W> {
    reader: WireReader<R>,
    writer: WireWriter<W>,
    stats: CodecStats,
}

impl<R, W> Codec<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: WireReader::new(reader),
            writer: WireWriter::new(writer),
            stats: CodecStats::default(),
        }
    }

    /// Reader positioned after the last consumed value
    pub fn reader_mut(&mut self) -> &mut WireReader<R> {
        &mut self.reader
    }

    pub fn stats(&self) -> &CodecStats {
        &self.stats
    }

    pub fn bytes_received(&self) -> u64 {
        self.reader.bytes_read()
    }

    pub fn bytes_sent(&self) -> u64 {
        self.writer.bytes_written()
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}

impl<R, W> Codec<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Read the next opcode byte
    pub async fn read_opcode(&mut self) -> CodecResult<u8> {
        let opcode = self.reader.read_u8().await?;
        self.stats.messages_received += 1;
        Ok(opcode)
    }

    async fn expect(&mut self, expected: MessageType) -> CodecResult<()> {
        let opcode = self.read_opcode().await?;
        if opcode != expected.type_id() {
            return Err(CodecError::ProtocolViolation {
                expected: message_name(expected),
                opcode,
            });
        }
        Ok(())
    }

    async fn flush(&mut self) -> CodecResult<()> {
        self.writer.flush().await?;
        self.stats.messages_sent += 1;
        Ok(())
    }

    /// Send the authentication token (first handshake message)
    pub async fn write_token(&mut self, token: &str) -> CodecResult<()> {
        self.writer.write_u8(MessageType::AuthenticationToken.type_id());
        self.writer.write_string(token);
        self.flush().await
    }

    /// Send the protocol version (second handshake message)
    pub async fn write_protocol_version(&mut self, version: i32) -> CodecResult<()> {
        self.writer.write_u8(MessageType::ProtocolVersion.type_id());
        self.writer.write_i32(version);
        self.flush().await
    }

    /// Block until the server sends the team size
    pub async fn read_team_size(&mut self) -> CodecResult<i32> {
        self.expect(MessageType::TeamSize).await?;
        Ok(self.reader.read_i32().await?)
    }

    /// Read the game context; an absent record yields `None`
    pub async fn read_game_context(&mut self) -> CodecResult<Option<Game>> {
        self.expect(MessageType::GameContext).await?;

        if !self.reader.read_bool().await? {
            return Ok(None);
        }
        Ok(Some(Game::decode(&mut self.reader).await?))
    }

    /// Read the opcode at a tick-read point. Only GameOver and PlayerContext are legal here.
    pub async fn next_message(&mut self) -> CodecResult<Incoming> {
        let opcode = self.read_opcode().await?;

        match MessageType::try_from(opcode) {
            Ok(MessageType::GameOver) => Ok(Incoming::GameOver),
            Ok(MessageType::PlayerContext) => Ok(Incoming::PlayerContext),
            _ => Err(CodecError::ProtocolViolation {
                expected: "PlayerContext or GameOver",
                opcode,
            }),
        }
    }

    /// Send this tick's Move and flush it as one unit
    pub async fn write_move(&mut self, action: &Move) -> CodecResult<()> {
        encode_move(&mut self.writer, action);
        self.flush().await
    }
}

fn message_name(kind: MessageType) -> &'static str {
    match kind {
        MessageType::GameOver => "GameOver",
        MessageType::AuthenticationToken => "AuthenticationToken",
        MessageType::TeamSize => "TeamSize",
        MessageType::ProtocolVersion => "ProtocolVersion",
        MessageType::GameContext => "GameContext",
        MessageType::PlayerContext => "PlayerContext",
        MessageType::Move => "Move",
    }
}
