//! Dungeon generation
//!
//! Places rooms, builds the candidate graph, selects edges and carves every
//! selected edge, all from one seeded RNG.

use std::fmt;

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::error::ConfigError;
use crate::rng::GameRng;
use crate::seed::derive_seed;

use super::corridor::carve_path;
use super::graph::build_candidate_graph;
use super::pathfinding::GridPathfinder;
use super::placement::{PlacementRequest, place_rooms};
use super::room::pos_to_room;
use super::selection::{EdgeKind, select_edges};
use super::{CellType, Coord, Grid3D, Room, StairRun};

/// Counters describing one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub requested_rooms: usize,
    pub placed_rooms: usize,
    pub candidate_edges: usize,
    pub mst_edges: usize,
    pub promoted_edges: usize,
    /// Selected edges that were carved
    pub routed_edges: usize,
    /// Selected edges with no route, as room index pairs
    pub unreachable_edges: Vec<(usize, usize)>,
    pub hallway_cells: usize,
    pub stair_runs: usize,
}

impl GenerationReport {
    /// Check whether every selected edge was carved
    pub fn fully_routed(&self) -> bool {
        self.unreachable_edges.is_empty()
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed:       {}", self.seed)?;
        writeln!(
            f,
            "rooms:      {} placed of {} requested",
            self.placed_rooms, self.requested_rooms
        )?;
        writeln!(
            f,
            "edges:      {} candidates, {} tree, {} loops",
            self.candidate_edges, self.mst_edges, self.promoted_edges
        )?;
        writeln!(
            f,
            "routed:     {} ({} unreachable)",
            self.routed_edges,
            self.unreachable_edges.len()
        )?;
        write!(
            f,
            "carved:     {} hallway cells, {} staircases",
            self.hallway_cells, self.stair_runs
        )
    }
}

/// A generated dungeon layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    seed: u64,
    grid: Grid3D<CellType>,
    rooms: Vec<Room>,
    stairs: Vec<StairRun>,
    report: GenerationReport,
}

impl Dungeon {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid3D<CellType> {
        &self.grid
    }

    pub fn size(&self) -> Coord {
        self.grid.size()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn stairs(&self) -> &[StairRun] {
        &self.stairs
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Index of the room containing a cell
    pub fn room_at(&self, pos: Coord) -> Option<usize> {
        pos_to_room(&self.rooms, pos)
    }

    /// Every cell of the given type
    pub fn cells_of(&self, cell_type: CellType) -> impl Iterator<Item = Coord> + '_ {
        self.grid
            .iter()
            .filter(move |(_, c)| **c == cell_type)
            .map(|(pos, _)| pos)
    }

    /// Number of levels
    pub fn level_count(&self) -> i32 {
        self.grid.size().y
    }

    /// Staircases joining level `lower` to the level above it
    pub fn stairs_between(&self, lower: i32) -> impl Iterator<Item = &StairRun> + '_ {
        self.stairs.iter().filter(move |s| s.lower_level() == lower)
    }

    /// Text map of one level, one row per z, one character per cell
    ///
    /// Returns an empty string for a level outside the grid.
    pub fn render_level(&self, y: i32) -> String {
        let size = self.grid.size();
        if y < 0 || y >= size.y {
            return String::new();
        }
        let mut out = String::with_capacity(((size.x + 1) * size.z) as usize);
        for z in 0..size.z {
            if z > 0 {
                out.push('\n');
            }
            for x in 0..size.x {
                out.push(self.grid.get(Coord::new(x, y, z)).symbol());
            }
        }
        out
    }

    /// Check that the parts agree with each other
    ///
    /// Used after loading a saved dungeon.
    pub fn is_consistent(&self) -> bool {
        let size = self.grid.size();
        self.grid.is_consistent()
            && self.rooms.iter().all(|r| {
                r.fits_within(size) && r.cells().all(|c| self.grid.get(c) == CellType::Room)
            })
            && self.stairs.iter().all(|s| {
                s.is_well_formed()
                    && s.cells
                        .iter()
                        .all(|c| self.grid.get_checked(*c) == Some(&CellType::Stairs))
            })
    }
}

/// Generates dungeons from a validated configuration
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    config: DungeonConfig,
    seed: u64,
}

impl DungeonGenerator {
    /// Validate the configuration and derive the numeric seed
    pub fn new(config: DungeonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = derive_seed(&config.seed);
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate the dungeon for this configuration
    ///
    /// Never fails; placement shortfalls and unroutable edges are recorded
    /// in the report.
    pub fn generate(&self) -> Dungeon {
        let mut rng = GameRng::new(self.seed);
        let mut grid = Grid3D::new(self.config.size);

        let request = PlacementRequest {
            room_count: self.config.room_count,
            min_size: self.config.min_room_size,
            max_size: self.config.max_room_size,
            buffer: self.config.room_buffer,
        };
        let rooms = place_rooms(&mut grid, &request, &mut rng);

        self.connect(grid, rooms, request.room_count, &mut rng)
    }

    /// Generate with a fixed room layout instead of random placement
    ///
    /// Rooms that leave the grid are dropped. The seed still drives loop
    /// selection.
    pub fn generate_with_rooms(&self, rooms: &[Room]) -> Dungeon {
        let mut rng = GameRng::new(self.seed);
        let mut grid = Grid3D::new(self.config.size);

        let mut kept = Vec::with_capacity(rooms.len());
        for room in rooms {
            if !room.size.is_positive() || !room.fits_within(grid.size()) {
                warn!(
                    "dropping room at {} of size {}: outside the grid",
                    room.position, room.size
                );
                continue;
            }
            for cell in room.cells() {
                grid.set(cell, CellType::Room);
            }
            kept.push(*room);
        }

        self.connect(grid, kept, rooms.len(), &mut rng)
    }

    fn connect(
        &self,
        mut grid: Grid3D<CellType>,
        rooms: Vec<Room>,
        requested_rooms: usize,
        rng: &mut GameRng,
    ) -> Dungeon {
        let mut report = GenerationReport {
            seed: self.seed,
            requested_rooms,
            placed_rooms: rooms.len(),
            ..GenerationReport::default()
        };

        let graph = build_candidate_graph(&rooms);
        report.candidate_edges = graph.len();

        let selection = select_edges(&graph, self.config.loop_chance, rng);
        report.mst_edges = selection.mst.len();
        report.promoted_edges = selection.promoted.len();

        let mut pathfinder = GridPathfinder::new(grid.size(), self.config.costs);
        let mut stairs = Vec::new();
        for selected in selection.iter() {
            let (a, b) = selected.edge.key();
            let start = rooms[a].center();
            let goal = rooms[b].center();

            let Some(path) = pathfinder.find_path(&grid, start, goal) else {
                let kind = match selected.kind {
                    EdgeKind::Tree => "tree",
                    EdgeKind::Loop => "loop",
                };
                warn!("no route for {kind} edge between rooms {a} and {b}");
                report.unreachable_edges.push((a, b));
                continue;
            };
            trace!(
                "route {a} -> {b}: {} cells, {} stairs, cost {:.1}",
                path.len(),
                path.stair_count(),
                path.cost
            );

            let outcome = carve_path(&mut grid, &path.cells);
            report.routed_edges += 1;
            report.hallway_cells += outcome.hallway_cells;
            stairs.extend(outcome.stairs);
        }
        report.stair_runs = stairs.len();
        debug!(
            "carved {} of {} selected edges",
            report.routed_edges,
            selection.len()
        );

        info!(
            "generated dungeon {}: {} rooms, {} hallway cells, {} staircases",
            self.seed, report.placed_rooms, report.hallway_cells, report.stair_runs
        );

        Dungeon {
            seed: self.seed,
            grid,
            rooms,
            stairs,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: &str) -> DungeonConfig {
        DungeonConfig {
            seed: seed.to_string(),
            size: Coord::new(24, 3, 24),
            room_count: 6,
            min_room_size: Coord::new(3, 1, 3),
            max_room_size: Coord::new(6, 1, 6),
            ..DungeonConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config("x");
        config.size = Coord::new(0, 1, 1);
        assert!(DungeonGenerator::new(config).is_err());

        let mut config = small_config("x");
        config.size = Coord::new(4, 1, 4);
        config.room_count = usize::MAX / 2;
        assert!(matches!(
            DungeonGenerator::new(config),
            Err(ConfigError::TooManyRooms { .. })
        ));

        let mut config = small_config("x");
        config.size = Coord::new(crate::MAX_DIMENSION, crate::MAX_DIMENSION, crate::MAX_DIMENSION);
        assert!(matches!(
            DungeonGenerator::new(config),
            Err(ConfigError::TooManyCells { .. })
        ));
    }

    #[test]
    fn test_seed_derivation() {
        let generator = DungeonGenerator::new(small_config("-1")).unwrap();
        assert_eq!(generator.seed(), u64::MAX);
        let generator = DungeonGenerator::new(small_config("")).unwrap();
        assert_eq!(generator.seed(), 0);
    }

    #[test]
    fn test_report_matches_dungeon() {
        let dungeon = DungeonGenerator::new(small_config("report")).unwrap().generate();
        let report = dungeon.report();

        assert_eq!(report.placed_rooms, dungeon.rooms().len());
        assert_eq!(report.stair_runs, dungeon.stairs().len());
        assert_eq!(report.hallway_cells, dungeon.cells_of(CellType::Hallway).count());
        assert_eq!(
            report.routed_edges + report.unreachable_edges.len(),
            report.mst_edges + report.promoted_edges
        );
        assert!(dungeon.is_consistent());
    }

    #[test]
    fn test_zero_rooms() {
        let mut config = small_config("empty");
        config.room_count = 0;
        let dungeon = DungeonGenerator::new(config).unwrap().generate();
        assert!(dungeon.rooms().is_empty());
        assert!(dungeon.stairs().is_empty());
        assert_eq!(dungeon.cells_of(CellType::None).count(), dungeon.grid().volume());
    }

    #[test]
    fn test_render_level() {
        let mut config = small_config("render");
        config.size = Coord::new(5, 1, 3);
        let generator = DungeonGenerator::new(config).unwrap();
        let room = Room::new(Coord::new(1, 0, 0), Coord::new(2, 1, 2));
        let dungeon = generator.generate_with_rooms(&[room]);

        assert_eq!(dungeon.render_level(0), " ..  \n ..  \n     ");
        assert_eq!(dungeon.render_level(1), "");
        assert_eq!(dungeon.level_count(), 1);
        assert_eq!(dungeon.room_at(Coord::new(2, 0, 1)), Some(0));
        assert_eq!(dungeon.room_at(Coord::new(4, 0, 1)), None);
    }

    #[test]
    fn test_rooms_outside_grid_dropped() {
        let generator = DungeonGenerator::new(small_config("drop")).unwrap();
        let dungeon = generator.generate_with_rooms(&[
            Room::new(Coord::new(2, 0, 2), Coord::new(3, 1, 3)),
            Room::new(Coord::new(22, 0, 2), Coord::new(3, 1, 3)),
        ]);
        assert_eq!(dungeon.rooms().len(), 1);
        assert_eq!(dungeon.report().candidate_edges, 0);
    }

    #[test]
    fn test_report_display() {
        let report = GenerationReport {
            seed: 7,
            requested_rooms: 3,
            placed_rooms: 2,
            ..GenerationReport::default()
        };
        let text = report.to_string();
        assert!(text.contains("seed:       7"));
        assert!(text.contains("2 placed of 3 requested"));
        assert!(report.fully_routed());
    }
}
