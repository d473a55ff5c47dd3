//! Outgoing player action
//!
//! A [`Move`] is filled by the strategy once per tick and serialized by the
//! move encoder. Fields that the chosen action does not use keep their
//! neutral defaults.

use super::{ActionType, VehicleType};

/// One player decision for a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Move {
    pub action: ActionType,
    /// Unit group (1..=max_unit_group), 0 when unused
    pub group: i32,
    /// Selection rectangle
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// Target point or displacement vector
    pub x: f64,
    pub y: f64,
    /// Rotation angle in radians, clockwise positive
    pub angle: f64,
    /// Linear speed cap, 0 = unlimited
    pub max_speed: f64,
    /// Angular speed cap in radians per tick, 0 = unlimited
    pub max_angular_speed: f64,
    /// Restricts selection or sets the production type; `None` = no filter
    pub vehicle_type: Option<VehicleType>,
    /// Target facility for production setup, 0 when unused
    pub facility_id: i64,
}

impl Move {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every field to its neutral value
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the selection rectangle from an origin and a size
    pub fn select_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.left = x;
        self.top = y;
        self.right = x + width;
        self.bottom = y + height;
    }

    /// Replace the current selection with the units inside a rectangle
    pub fn clear_and_select(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            action: ActionType::ClearAndSelect,
            left,
            top,
            right,
            bottom,
            ..Self::default()
        }
    }

    /// Select a whole group
    pub fn select_group(group: i32) -> Self {
        Self {
            action: ActionType::ClearAndSelect,
            group,
            ..Self::default()
        }
    }

    /// Move the selection by a vector
    pub fn move_by(x: f64, y: f64, max_speed: f64) -> Self {
        Self {
            action: ActionType::Move,
            x,
            y,
            max_speed,
            ..Self::default()
        }
    }

    /// Rotate the selection around a point
    pub fn rotate(x: f64, y: f64, angle: f64) -> Self {
        Self {
            action: ActionType::Rotate,
            x,
            y,
            angle,
            ..Self::default()
        }
    }

    /// Assign the current selection to a group
    pub fn assign(group: i32) -> Self {
        Self {
            action: ActionType::Assign,
            group,
            ..Self::default()
        }
    }

    /// Configure a factory; `None` stops production
    pub fn setup_production(facility_id: i64, vehicle_type: Option<VehicleType>) -> Self {
        Self {
            action: ActionType::SetupVehicleProduction,
            facility_id,
            vehicle_type,
            ..Self::default()
        }
    }

    pub fn is_none(&self) -> bool {
        self.action == ActionType::None
    }
}
