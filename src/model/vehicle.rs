//! Vehicle state
//!
//! A vehicle arrives once as a full record that fixes its static attributes
//! and then changes only through [`VehicleUpdate`] records.

use super::VehicleType;

/// A circular unit on the battlefield
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    /// Center X coordinate (grows to the right)
    pub x: f64,
    /// Center Y coordinate (grows downwards)
    pub y: f64,
    pub radius: f64,
    /// Owning player
    pub player_id: i64,
    /// Current durability, 0 once destroyed or out of sight
    pub durability: i32,
    pub max_durability: i32,
    /// Distance covered per tick before terrain and weather factors
    pub max_speed: f64,
    pub vision_range: f64,
    pub squared_vision_range: f64,
    pub ground_attack_range: f64,
    pub squared_ground_attack_range: f64,
    pub aerial_attack_range: f64,
    pub squared_aerial_attack_range: f64,
    pub ground_damage: i32,
    pub aerial_damage: i32,
    pub ground_defence: i32,
    pub aerial_defence: i32,
    /// Minimum ticks between two attacks
    pub attack_cooldown_ticks: i32,
    /// Ticks until the next attack is possible
    pub remaining_attack_cooldown_ticks: i32,
    pub vehicle_type: VehicleType,
    pub aerial: bool,
    pub selected: bool,
    /// Groups this vehicle belongs to
    pub groups: Vec<i32>,
}

/// The mutable subset of a vehicle, sent every tick it changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleUpdate {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub durability: i32,
    pub remaining_attack_cooldown_ticks: i32,
    pub selected: bool,
    pub groups: Vec<i32>,
}

impl Vehicle {
    /// Apply an update record in place
    pub fn apply(&mut self, update: VehicleUpdate) {
        debug_assert_eq!(self.id, update.id);
        self.x = update.x;
        self.y = update.y;
        self.durability = update.durability;
        self.remaining_attack_cooldown_ticks = update.remaining_attack_cooldown_ticks;
        self.selected = update.selected;
        self.groups = update.groups;
    }

    pub fn squared_distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        self.squared_distance_to(x, y).sqrt()
    }

    pub fn squared_distance_to_vehicle(&self, other: &Vehicle) -> f64 {
        self.squared_distance_to(other.x, other.y)
    }

    /// Whether `other` is within base vision range (terrain and weather not applied)
    pub fn sees(&self, other: &Vehicle) -> bool {
        self.squared_distance_to_vehicle(other) <= self.squared_vision_range
    }

    /// Whether `target` is within the matching attack range
    pub fn can_reach(&self, target: &Vehicle) -> bool {
        let range = if target.aerial {
            self.squared_aerial_attack_range
        } else {
            self.squared_ground_attack_range
        };
        range > 0.0 && self.squared_distance_to_vehicle(target) <= range
    }

    pub fn is_in_group(&self, group: i32) -> bool {
        self.groups.contains(&group)
    }

    /// Destroyed or outside our vision. The protocol never removes vehicles,
    /// so this is the only signal for either.
    pub fn is_inactive(&self) -> bool {
        self.durability <= 0
    }
}
