//! Generation constants
//!
//! Defaults for the tunable values live in `DungeonConfig`; the values here
//! are fixed by the algorithm.

/// Largest allowed extent on any axis
///
/// Keeps the exact triangulation predicates inside `i128` range.
pub const MAX_DIMENSION: i32 = 4096;

/// Largest allowed grid volume
///
/// Generation holds the cell grid and a search grid of the same size.
pub const MAX_CELLS: usize = 1 << 22;

/// Largest allowed room request
pub const MAX_ROOMS: usize = 4096;

/// Room placement attempts per requested room
pub const PLACEMENT_ATTEMPTS_PER_ROOM: usize = 10;

/// Default horizontal gap kept around each placed room
pub const DEFAULT_ROOM_BUFFER: i32 = 1;

/// Default chance of promoting a non-tree candidate edge to a hallway
pub const DEFAULT_LOOP_CHANCE: f64 = 0.125;

/// Pathfinder cost defaults
pub const STAIR_BASE_COST: f64 = 100.0;
pub const ROOM_CELL_PENALTY: f64 = 5.0;
pub const EMPTY_CELL_PENALTY: f64 = 1.0;

/// Horizontal distance covered by one staircase move
pub const STAIR_RUN_LENGTH: i32 = 3;

/// Cells in one staircase footprint (two per level)
pub const STAIR_FOOTPRINT_CELLS: usize = 4;
