//! Reconciled world state

use super::{Facility, LandGrid, Player, Vehicle};
use crate::registry::Registry;

/// The client's mirror of the server world. Registries only grow; a new
/// session must start from a fresh `World`.
#[derive(Debug, Default)]
pub struct World {
    pub tick_index: i32,
    pub tick_count: i32,
    pub width: f64,
    pub height: f64,
    pub(crate) players: Registry<Player>,
    pub(crate) vehicles: Registry<Vehicle>,
    pub(crate) facilities: Registry<Facility>,
    pub(crate) land: LandGrid,
    /// Vehicle ids created by the latest tick's "new" batch
    pub(crate) new_vehicles: Vec<i64>,
    /// Vehicle ids touched by the latest tick's "update" batch
    pub(crate) updated_vehicles: Vec<i64>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &Registry<Player> {
        &self.players
    }

    pub fn vehicles(&self) -> &Registry<Vehicle> {
        &self.vehicles
    }

    pub fn facilities(&self) -> &Registry<Facility> {
        &self.facilities
    }

    pub fn land(&self) -> &LandGrid {
        &self.land
    }

    pub fn player(&self, id: i64) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn vehicle(&self, id: i64) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn facility(&self, id: i64) -> Option<&Facility> {
        self.facilities.get(id)
    }

    /// The player flagged as ours, if the server has sent it
    pub fn my_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.me)
    }

    /// The first player not flagged as ours
    pub fn opponent_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| !p.me)
    }

    /// Vehicles owned by a player, including inactive ones
    pub fn vehicles_of(&self, player_id: i64) -> impl Iterator<Item = &Vehicle> + '_ {
        self.vehicles.iter().filter(move |v| v.player_id == player_id)
    }

    pub fn new_vehicles(&self) -> &[i64] {
        &self.new_vehicles
    }

    pub fn updated_vehicles(&self) -> &[i64] {
        &self.updated_vehicles
    }

    /// Whether the last tick is the final one of the match
    pub fn is_last_tick(&self) -> bool {
        self.tick_count > 0 && self.tick_index + 1 >= self.tick_count
    }
}
