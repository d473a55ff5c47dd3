//! wireplay - Client core for a turn-based strategy game server
//!
//! Speaks the server's binary protocol, mirrors the world it describes
//! tick by tick, and sends back one action per tick.

pub mod config;
pub mod model;
pub mod network;
pub mod protocol;
pub mod reconcile;
pub mod registry;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use model::{Game, Move, World};
pub use network::{Client, Session, SessionSummary};
pub use reconcile::Reconciler;
pub use strategy::{IdleStrategy, Snapshot, Strategy};
