//! Player state

/// A match participant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    /// Unique player identifier
    pub id: i64,
    /// True only for the player this client controls
    pub me: bool,
    /// The player's strategy has crashed
    pub strategy_crashed: bool,
    /// Points scored so far
    pub score: i32,
    /// Ticks until any further action is allowed (0 = can act this tick)
    pub remaining_action_cooldown_ticks: i32,
}

impl Player {
    pub fn can_act(&self) -> bool {
        self.remaining_action_cooldown_ticks == 0 && !self.strategy_crashed
    }
}
