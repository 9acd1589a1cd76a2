//! Generation settings
//!
//! Every field has a default, so a JSON config file only needs to name what it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dungeon::Coord;
use crate::error::ConfigError;
use crate::{
    DEFAULT_LOOP_CHANCE, DEFAULT_ROOM_BUFFER, EMPTY_CELL_PENALTY, MAX_CELLS, MAX_DIMENSION,
    MAX_ROOMS, ROOM_CELL_PENALTY, STAIR_BASE_COST,
};

/// Pathfinder cost weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathCosts {
    /// Base cost of a staircase move
    pub stair: f64,
    /// Extra cost of stepping through a room cell
    pub room: f64,
    /// Extra cost of stepping into untouched rock
    pub empty: f64,
}

impl Default for PathCosts {
    fn default() -> Self {
        Self {
            stair: STAIR_BASE_COST,
            room: ROOM_CELL_PENALTY,
            empty: EMPTY_CELL_PENALTY,
        }
    }
}

impl PathCosts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("stair", self.stair), ("room", self.room), ("empty", self.empty)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidCost { name, value });
            }
        }
        Ok(())
    }
}

/// Everything needed to generate one dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Seed text; integers are used as-is, anything else is hashed
    pub seed: String,
    /// Grid extent (x, levels, z)
    pub size: Coord,
    /// Rooms to attempt to place
    pub room_count: usize,
    pub min_room_size: Coord,
    pub max_room_size: Coord,
    /// Horizontal gap kept between rooms
    pub room_buffer: i32,
    /// Chance of keeping each non-tree candidate edge
    pub loop_chance: f64,
    pub costs: PathCosts,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            size: Coord::new(40, 4, 40),
            room_count: 12,
            min_room_size: Coord::new(3, 1, 3),
            max_room_size: Coord::new(8, 1, 8),
            room_buffer: DEFAULT_ROOM_BUFFER,
            loop_chance: DEFAULT_LOOP_CHANCE,
            costs: PathCosts::default(),
        }
    }
}

impl DungeonConfig {
    /// Default settings with a given seed
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    /// Check that the settings describe a dungeon that can be generated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.size.is_positive() {
            return Err(ConfigError::InvalidSize { size: self.size });
        }
        if self.size.max_component() > MAX_DIMENSION {
            return Err(ConfigError::TooLarge {
                extent: self.size.max_component(),
                max: MAX_DIMENSION,
            });
        }
        let cells = [self.size.x, self.size.y, self.size.z]
            .iter()
            .map(|&n| n as u64)
            .product::<u64>();
        if cells > MAX_CELLS as u64 {
            return Err(ConfigError::TooManyCells {
                cells,
                max: MAX_CELLS,
            });
        }
        if self.room_count > MAX_ROOMS {
            return Err(ConfigError::TooManyRooms {
                count: self.room_count,
                max: MAX_ROOMS,
            });
        }
        for size in [self.min_room_size, self.max_room_size] {
            if !size.is_positive() {
                return Err(ConfigError::InvalidRoomSize { size });
            }
        }
        if !self.min_room_size.all_le(self.max_room_size) {
            return Err(ConfigError::RoomSizeRange {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        if self.room_buffer < 0 {
            return Err(ConfigError::InvalidBuffer {
                buffer: self.room_buffer,
            });
        }
        if !(0.0..=1.0).contains(&self.loop_chance) {
            return Err(ConfigError::InvalidProbability {
                value: self.loop_chance,
            });
        }
        self.costs.validate()
    }

    /// Parse settings from JSON
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Settings as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load settings from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        Self::from_json_str(&contents)
    }

    /// Save settings to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_json_string()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))
    }
}
