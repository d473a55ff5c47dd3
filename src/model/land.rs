//! Static terrain and weather grid
//!
//! The world is cut into square tiles of [`TILE_SIZE`] units, stored
//! row-major. Each tile packs its terrain and weather into [`Land`] flags.

use bitflags::bitflags;

use super::{TerrainType, WeatherType};

/// Edge length of one grid tile in world units
pub const TILE_SIZE: f64 = 32.0;

bitflags! {
    /// Terrain and weather of a tile. Plain terrain and clear weather are the empty set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Land: u8 {
        const SWAMP = 0b0000_0001;
        const FOREST = 0b0000_0010;
        const CLOUD = 0b0000_0100;
        const RAIN = 0b0000_1000;

        const TERRAIN = Self::SWAMP.bits() | Self::FOREST.bits();
        const WEATHER = Self::CLOUD.bits() | Self::RAIN.bits();
    }
}

impl Land {
    pub fn from_parts(terrain: TerrainType, weather: WeatherType) -> Self {
        let terrain = match terrain {
            TerrainType::Plain => Land::empty(),
            TerrainType::Swamp => Land::SWAMP,
            TerrainType::Forest => Land::FOREST,
        };
        let weather = match weather {
            WeatherType::Clear => Land::empty(),
            WeatherType::Cloud => Land::CLOUD,
            WeatherType::Rain => Land::RAIN,
        };
        terrain | weather
    }

    pub fn terrain(self) -> TerrainType {
        if self.contains(Land::FOREST) {
            TerrainType::Forest
        } else if self.contains(Land::SWAMP) {
            TerrainType::Swamp
        } else {
            TerrainType::Plain
        }
    }

    pub fn weather(self) -> WeatherType {
        if self.contains(Land::RAIN) {
            WeatherType::Rain
        } else if self.contains(Land::CLOUD) {
            WeatherType::Cloud
        } else {
            WeatherType::Clear
        }
    }
}

/// Number of tiles along one world dimension
pub fn tiles_along(length: f64) -> usize {
    if length.is_finite() && length > 0.0 {
        (length / TILE_SIZE).floor() as usize
    } else {
        0
    }
}

/// Row-major tile grid, written at most once per match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandGrid {
    columns: usize,
    rows: usize,
    tiles: Vec<Land>,
    /// Set by `commit`; a world smaller than one tile loads an empty grid
    loaded: bool,
}

impl LandGrid {
    /// Build a grid from decoded tiles
    pub fn new(columns: usize, rows: usize, tiles: Vec<Land>) -> Self {
        debug_assert_eq!(tiles.len(), columns * rows);
        Self {
            columns,
            rows,
            tiles,
            loaded: false,
        }
    }

    /// Whether the one-time grid block has been applied
    pub fn is_populated(&self) -> bool {
        self.loaded
    }

    /// Install a decoded grid unless one is already in place.
    /// Returns false when the grid was already populated and `grid` was discarded.
    pub fn commit(&mut self, grid: LandGrid) -> bool {
        if self.is_populated() {
            return false;
        }
        *self = grid;
        self.loaded = true;
        true
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Land] {
        &self.tiles
    }

    /// Tile by running index
    pub fn get(&self, index: usize) -> Option<Land> {
        self.tiles.get(index).copied()
    }

    pub fn tile(&self, row: usize, column: usize) -> Option<Land> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.get(row * self.columns + column)
    }

    /// Tile under a world position
    pub fn tile_at(&self, x: f64, y: f64) -> Option<Land> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let column = (x / TILE_SIZE).floor() as usize;
        let row = (y / TILE_SIZE).floor() as usize;
        self.tile(row, column)
    }
}
