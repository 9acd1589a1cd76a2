//! Configuration errors
//!
//! Generation itself never fails: under-placement, unreachable edges and
//! degenerate geometry are all absorbed into a smaller dungeon. The only
//! rejected input is a configuration that cannot describe a dungeon.

use thiserror::Error;

use crate::dungeon::Coord;

/// Errors raised while loading or validating a `DungeonConfig`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Dungeon size must be positive on every axis, got {size}")]
    InvalidSize { size: Coord },

    #[error("Room size must be positive on every axis, got {size}")]
    InvalidRoomSize { size: Coord },

    #[error("Minimum room size {min} exceeds maximum {max}")]
    RoomSizeRange { min: Coord, max: Coord },

    #[error("Extent {extent} exceeds the maximum of {max} cells per axis")]
    TooLarge { extent: i32, max: i32 },

    #[error("Grid of {cells} cells exceeds the maximum of {max}")]
    TooManyCells { cells: u64, max: usize },

    #[error("Requested {count} rooms, at most {max} are allowed")]
    TooManyRooms { count: usize, max: usize },

    #[error("Room buffer must not be negative, got {buffer}")]
    InvalidBuffer { buffer: i32 },

    #[error("Loop chance must be within [0, 1], got {value}")]
    InvalidProbability { value: f64 },

    #[error("Path cost '{name}' must be finite and non-negative, got {value}")]
    InvalidCost { name: &'static str, value: f64 },

    #[error("Could not read config file: {0}")]
    Io(String),

    #[error("Could not parse config: {0}")]
    Parse(String),
}
