//! Dungeon system
//!
//! Contains the cell grid, rooms, staircases and the generation pipeline.

mod cell;
mod coord;
mod corridor;
mod generation;
mod graph;
mod grid;
mod pathfinding;
mod placement;
mod room;
mod selection;
mod stairs;
mod triangulation;

pub use cell::CellType;
pub use coord::Coord;
pub use corridor::{CarveOutcome, ConnectivityTracker, carve_path};
pub use generation::{Dungeon, DungeonGenerator, GenerationReport};
pub use graph::{CandidateGraph, RoomEdge, build_candidate_graph};
pub use grid::Grid3D;
pub use pathfinding::{GridPath, GridPathfinder};
pub use placement::{PlacementRequest, place_rooms};
pub use room::{Room, pos_to_room};
pub use selection::{EdgeKind, EdgeSelection, SelectedEdge, minimum_spanning_tree, select_edges};
pub use stairs::{Facing, Slope, StairRun, stair_footprint};
pub use triangulation::{Point, Tetrahedralization, insphere, orient3d};
