//! Enumerations shared by the data model
//!
//! Discriminants match the byte values used on the wire.

use std::fmt;

/// Declares a `#[repr(u8)]` enum together with its byte conversion
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)*
        }

        impl $name {
            /// All variants in wire order
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Byte value used on the wire
            pub fn type_id(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, u8> {
                match value {
                    $($value => Ok($name::$variant),)*
                    other => Err(other),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

wire_enum! {
    /// Player actions. Anything other than `None` counts against the action limit,
    /// even if the simulator ignores it.
    pub enum ActionType {
        /// Do nothing
        None = 0,
        /// Select matching units, clearing any previous selection
        ClearAndSelect = 1,
        /// Add matching units to the current selection
        AddToSelection = 2,
        /// Remove matching units from the selection
        Deselect = 3,
        /// Assign selected units to a group
        Assign = 4,
        /// Remove selected units from a group
        Dismiss = 5,
        /// Disband a group
        Disband = 6,
        /// Move selected units by a vector
        Move = 7,
        /// Rotate selected units around a point
        Rotate = 8,
        /// Scale the selected formation relative to a point
        Scale = 9,
        /// Configure production at a vehicle factory
        SetupVehicleProduction = 10,
        /// Request a tactical nuclear strike
        TacticalNuclearStrike = 11,
    }
}

impl Default for ActionType {
    fn default() -> Self {
        ActionType::None
    }
}

wire_enum! {
    /// Vehicle kinds
    pub enum VehicleType {
        /// Armored repair vehicle. Ground unit, repairs nearby stationary vehicles
        Arrv = 0,
        /// Air superiority unit, cannot attack ground targets
        Fighter = 1,
        /// Attack helicopter, hits both air and ground
        Helicopter = 2,
        /// Infantry fighting vehicle, hits both air and ground
        Ifv = 3,
        /// Main battle tank
        Tank = 4,
    }
}

impl VehicleType {
    /// Whether this vehicle type flies
    pub fn is_aerial(self) -> bool {
        matches!(self, VehicleType::Fighter | VehicleType::Helicopter)
    }
}

wire_enum! {
    /// Facility kinds
    pub enum FacilityType {
        /// Raises the owner's action budget
        ControlCenter = 0,
        /// Produces vehicles of a chosen type
        VehicleFactory = 1,
    }
}

wire_enum! {
    pub enum TerrainType {
        Plain = 0,
        Swamp = 1,
        Forest = 2,
    }
}

wire_enum! {
    pub enum WeatherType {
        Clear = 0,
        Cloud = 1,
        Rain = 2,
    }
}
