//! Strategy seam
//!
//! The session hands the strategy a read-only [`Snapshot`] of the reconciled
//! world once per tick together with a neutral [`Move`] to fill in.

use crate::model::{Game, Move, Player, World};

/// Read-only view of the world for one tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// The player this client controls, once the server has named it
    pub me: Option<&'a Player>,
    pub world: &'a World,
    /// Match constants, absent if the server sent none
    pub game: Option<&'a Game>,
}

impl<'a> Snapshot<'a> {
    pub fn tick_index(&self) -> i32 {
        self.world.tick_index
    }

    /// Whether our player may issue a non-trivial action this tick
    pub fn can_act(&self) -> bool {
        self.me.map_or(false, Player::can_act)
    }
}

/// Decision logic driven by the session loop
pub trait Strategy: Send {
    /// Called once after the handshake, before the first tick
    fn on_game_start(&mut self, _game: Option<&Game>, _team_size: i32) {}

    /// Fill `action` for the current tick. Leaving it untouched sends `ActionType::None`.
    fn act(&mut self, snapshot: &Snapshot<'_>, action: &mut Move);
}

/// Never acts
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleStrategy;

impl Strategy for IdleStrategy {
    fn act(&mut self, _snapshot: &Snapshot<'_>, _action: &mut Move) {}
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn on_game_start(&mut self, game: Option<&Game>, team_size: i32) {
        (**self).on_game_start(game, team_size)
    }

    fn act(&mut self, snapshot: &Snapshot<'_>, action: &mut Move) {
        (**self).act(snapshot, action)
    }
}
