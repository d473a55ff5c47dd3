//! Facility state

use super::{FacilityType, VehicleType};

/// A capturable structure. The server sends every facility in full each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub id: i64,
    pub facility_type: FacilityType,
    /// Owning player, or a non-positive id while neutral
    pub owner_player_id: i64,
    /// X coordinate of the left edge
    pub left: f64,
    /// Y coordinate of the top edge
    pub top: f64,
    /// Capture progress; the sign tells which side is capturing
    pub capture_points: f64,
    /// Vehicle type being produced, if any
    pub vehicle_type: Option<VehicleType>,
    pub production_progress: i32,
}

impl Facility {
    pub fn is_owned_by(&self, player_id: i64) -> bool {
        self.owner_player_id == player_id
    }

    /// Whether the point lies inside a facility of the given size
    pub fn contains(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x >= self.left && x <= self.left + width && y >= self.top && y <= self.top + height
    }
}
