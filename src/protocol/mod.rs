//! Protocol module - Defines the wire protocol spoken with the game server
//!
//! Every message starts with a one-byte opcode; values follow in a fixed
//! order with no length framing at the message level:
//! - 1 byte booleans and enum tags
//! - little-endian i32, i64 and f64
//! - i32 length prefix for strings and arrays

mod codec;
mod framing;
mod message;
mod move_encoder;

pub use codec::*;
pub use framing::*;
pub use message::{MessageType, Slot};
pub(crate) use message::{vehicle_type_from_wire, vehicle_type_to_wire};
pub use move_encoder::*;

/// Protocol version sent during the handshake
pub const PROTOCOL_VERSION: i32 = 1;

/// Default game server port
pub const DEFAULT_PORT: u16 = 31001;

/// Default game server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Token used when none is configured
pub const DEFAULT_TOKEN: &str = "0000000000000000";
