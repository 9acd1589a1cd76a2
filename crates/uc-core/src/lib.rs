//! uc-core: Dungeon layout generation for Undercroft
//!
//! Generates a multi-level dungeon on a 3D cell grid: rooms are placed at
//! random, connected through a Delaunay-style candidate graph reduced to a
//! spanning tree plus a few loops, and every selected connection is carved as
//! hallways and staircases by a grid pathfinder.
//!
//! The whole pipeline is a single synchronous call driven by one seed, so
//! every peer in a session computes the same layout independently. This
//! crate has no I/O beyond optional config file loading.

pub mod config;
pub mod dungeon;

mod consts;
mod error;
mod rng;
mod seed;

pub use config::{DungeonConfig, PathCosts};
pub use consts::*;
pub use error::ConfigError;
pub use rng::GameRng;
pub use seed::derive_seed;
