//! Data model - Plain values mirrored from the server
//!
//! Nothing in here knows about sentinel bytes; the codec converts wire
//! markers into `Option`s and enums before values reach these types.

mod action;
mod facility;
mod game;
mod land;
mod player;
mod types;
mod vehicle;
mod world;

pub use action::*;
pub use facility::*;
pub use game::*;
pub use land::*;
pub use player::*;
pub use types::*;
pub use vehicle::*;
pub use world::*;

use std::fmt;

/// Kinds of registry-backed entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Vehicle,
    Facility,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Player => "player",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Facility => "facility",
        };
        f.write_str(name)
    }
}
