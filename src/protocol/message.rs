//! Protocol message kinds and slot markers
//!
//! Sentinel bytes live only in this module: callers see [`MessageType`],
//! [`Slot`] and `Option<VehicleType>` instead.

use std::fmt;
use tokio::io::AsyncRead;

use super::{FramingResult, WireReader, WireWriter};
use crate::model::VehicleType;

/// Leading opcode of every message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Server ends the session, no payload
    GameOver = 1,
    /// Client token, first handshake message
    AuthenticationToken = 2,
    /// Server tells how many strategies the client controls
    TeamSize = 3,
    /// Client protocol version, second handshake message
    ProtocolVersion = 4,
    /// Server sends the match constants
    GameContext = 5,
    /// Server sends one tick of state
    PlayerContext = 6,
    /// Client sends its action for the tick
    Move = 7,
}

impl MessageType {
    /// Get the message type identifier
    pub fn type_id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            1 => Ok(MessageType::GameOver),
            2 => Ok(MessageType::AuthenticationToken),
            3 => Ok(MessageType::TeamSize),
            4 => Ok(MessageType::ProtocolVersion),
            5 => Ok(MessageType::GameContext),
            6 => Ok(MessageType::PlayerContext),
            7 => Ok(MessageType::Move),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Discriminator of an absent slot
const SLOT_ABSENT: u8 = 0;
/// Discriminator of a reference-only slot
const SLOT_REFERENCE: u8 = 127;
/// Discriminator written for a full record
const SLOT_PRESENT: u8 = 1;

/// Entity slot header: discriminator byte plus, when not absent, the entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// No entity in this slot
    Absent,
    /// A previously sent entity, unchanged
    Reference(i64),
    /// A full record body follows
    Present(i64),
}

impl Slot {
    pub async fn read<R>(reader: &mut WireReader<R>) -> FramingResult<Self>
    where
        R: AsyncRead + Unpin,
    {
        match reader.read_u8().await? {
            SLOT_ABSENT => Ok(Slot::Absent),
            SLOT_REFERENCE => Ok(Slot::Reference(reader.read_i64().await?)),
            _ => Ok(Slot::Present(reader.read_i64().await?)),
        }
    }

    pub fn write<W>(self, writer: &mut WireWriter<W>) {
        match self {
            Slot::Absent => writer.write_u8(SLOT_ABSENT),
            Slot::Reference(id) => {
                writer.write_u8(SLOT_REFERENCE);
                writer.write_i64(id);
            }
            Slot::Present(id) => {
                writer.write_u8(SLOT_PRESENT);
                writer.write_i64(id);
            }
        }
    }
}

/// Vehicle type byte meaning "no type"
const NO_VEHICLE_TYPE: u8 = 255;

/// Decode an optional vehicle type; `Err` carries an unrecognised byte
pub(crate) fn vehicle_type_from_wire(value: u8) -> Result<Option<VehicleType>, u8> {
    if value == NO_VEHICLE_TYPE {
        return Ok(None);
    }
    VehicleType::try_from(value).map(Some)
}

pub(crate) fn vehicle_type_to_wire(value: Option<VehicleType>) -> u8 {
    value.map_or(NO_VEHICLE_TYPE, VehicleType::type_id)
}
