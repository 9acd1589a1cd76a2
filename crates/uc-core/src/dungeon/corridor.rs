//! Hallway and staircase carving
//!
//! Turns a routed cell path into hallway and stair cells, and tracks which
//! rooms are joined so far.

use log::{debug, trace};

use super::stairs::{StairRun, stair_footprint};
use super::{CellType, Coord, Grid3D};

/// Tracks room connectivity using equivalence classes
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    /// Each room's equivalence class (rooms in same class are connected)
    smeq: Vec<usize>,
}

impl ConnectivityTracker {
    /// Create a new tracker for the given number of rooms
    pub fn new(num_rooms: usize) -> Self {
        Self {
            smeq: (0..num_rooms).collect(),
        }
    }

    /// Check if two rooms are connected (in same equivalence class)
    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        if a >= self.smeq.len() || b >= self.smeq.len() {
            return false;
        }
        self.smeq[a] == self.smeq[b]
    }

    /// Merge equivalence classes when rooms are connected
    pub fn merge(&mut self, a: usize, b: usize) {
        if a >= self.smeq.len() || b >= self.smeq.len() {
            return;
        }

        let old_class = self.smeq[b];
        let new_class = self.smeq[a];
        for eq in &mut self.smeq {
            if *eq == old_class {
                *eq = new_class;
            }
        }
    }

    /// Check if all rooms are connected
    pub fn all_connected(&self) -> bool {
        match self.smeq.first() {
            Some(&first) => self.smeq.iter().all(|&c| c == first),
            None => true,
        }
    }

    /// Number of distinct groups
    pub fn component_count(&self) -> usize {
        let mut classes = self.smeq.clone();
        classes.sort_unstable();
        classes.dedup();
        classes.len()
    }
}

/// What one call to `carve_path` changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarveOutcome {
    /// Cells turned from `None` into `Hallway`
    pub hallway_cells: usize,
    /// Cells turned from `None` into `Stairs`
    pub stair_cells: usize,
    /// Staircases with newly carved cells whose whole footprint is `Stairs`
    pub stairs: Vec<StairRun>,
}

impl CarveOutcome {
    pub fn is_empty(&self) -> bool {
        self.hallway_cells == 0 && self.stair_cells == 0
    }
}

/// Carve a path into the grid
///
/// Only `None` cells are converted: path cells become `Hallway`, and the
/// footprint of every vertical step becomes `Stairs`. A staircase is reported
/// only when all four footprint cells end up as `Stairs`. Carving the same
/// path twice changes nothing the second time.
pub fn carve_path(grid: &mut Grid3D<CellType>, path: &[Coord]) -> CarveOutcome {
    let mut outcome = CarveOutcome::default();
    let mut previous: Option<Coord> = None;

    for &cell in path {
        if carve_cell(grid, cell, CellType::Hallway) {
            outcome.hallway_cells += 1;
        }

        if let Some(prev) = previous.filter(|p| p.y != cell.y) {
            let footprint = stair_footprint(prev, cell);
            let mut fresh = 0;
            for foot in footprint {
                if carve_cell(grid, foot, CellType::Stairs) {
                    fresh += 1;
                }
            }
            outcome.stair_cells += fresh;

            let complete = footprint
                .iter()
                .all(|foot| grid.get_checked(*foot) == Some(&CellType::Stairs));
            if fresh > 0 && complete {
                if let Some(run) = StairRun::from_step(prev, cell) {
                    outcome.stairs.push(run);
                }
            } else if fresh > 0 {
                debug!("partial staircase {prev} -> {cell} not recorded");
            }
        }
        previous = Some(cell);
    }

    trace!(
        "carved {} cells: {} hallway, {} stairs in {} runs",
        path.len(),
        outcome.hallway_cells,
        outcome.stair_cells,
        outcome.stairs.len()
    );
    outcome
}

/// Set an empty in-bounds cell; returns whether anything changed
fn carve_cell(grid: &mut Grid3D<CellType>, pos: Coord, value: CellType) -> bool {
    match grid.get_checked(pos) {
        Some(CellType::None) => {
            grid.set(pos, value);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_tracker() {
        let mut tracker = ConnectivityTracker::new(4);
        assert!(!tracker.all_connected());
        assert_eq!(tracker.component_count(), 4);

        tracker.merge(0, 1);
        tracker.merge(2, 3);
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(1, 2));
        assert_eq!(tracker.component_count(), 2);

        tracker.merge(1, 3);
        assert!(tracker.all_connected());
        assert!(!tracker.are_connected(0, 9));
    }

    #[test]
    fn test_empty_tracker_is_connected() {
        assert!(ConnectivityTracker::new(0).all_connected());
        assert!(ConnectivityTracker::new(1).all_connected());
    }

    #[test]
    fn test_flat_path_becomes_hallway() {
        let mut grid = Grid3D::new(Coord::new(6, 1, 3));
        grid.set(Coord::new(0, 0, 1), CellType::Room);
        let path: Vec<Coord> = (0..6).map(|x| Coord::new(x, 0, 1)).collect();

        let outcome = carve_path(&mut grid, &path);
        assert_eq!(outcome.hallway_cells, 5);
        assert!(outcome.stairs.is_empty());
        assert_eq!(grid.get(Coord::new(0, 0, 1)), CellType::Room);
        assert_eq!(grid.count(&CellType::Hallway), 5);
    }

    #[test]
    fn test_vertical_step_carves_stairs() {
        let mut grid = Grid3D::new(Coord::new(8, 2, 1));
        let path = [
            Coord::new(0, 0, 0),
            Coord::new(1, 0, 0),
            Coord::new(4, 1, 0),
            Coord::new(5, 1, 0),
        ];

        let outcome = carve_path(&mut grid, &path);
        assert_eq!(outcome.stairs.len(), 1);
        assert_eq!(outcome.stair_cells, 4);
        assert_eq!(outcome.hallway_cells, 4);
        let run = outcome.stairs[0];
        assert!(run.is_well_formed());
        for cell in run.cells {
            assert_eq!(grid.get(cell), CellType::Stairs);
        }
        assert_eq!(grid.get(Coord::new(2, 0, 0)), CellType::Stairs);
        assert_eq!(grid.get(Coord::new(3, 1, 0)), CellType::Stairs);
    }

    #[test]
    fn test_carving_is_idempotent() {
        let mut grid = Grid3D::new(Coord::new(8, 2, 1));
        let path = [Coord::new(1, 0, 0), Coord::new(4, 1, 0), Coord::new(5, 1, 0)];
        let first = carve_path(&mut grid, &path);
        assert!(!first.is_empty());

        let snapshot = grid.clone();
        let second = carve_path(&mut grid, &path);
        assert!(second.is_empty());
        assert!(second.stairs.is_empty());
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn test_blocked_footprint_reports_no_stair() {
        let mut grid = Grid3D::new(Coord::new(4, 2, 1));
        grid.set(Coord::new(1, 0, 0), CellType::Room);
        let path = [Coord::new(0, 0, 0), Coord::new(3, 1, 0)];

        let outcome = carve_path(&mut grid, &path);
        assert_eq!(outcome.stair_cells, 3);
        assert!(outcome.stairs.is_empty());
        assert_eq!(grid.get(Coord::new(1, 0, 0)), CellType::Room);
    }

    #[test]
    fn test_carving_never_overwrites() {
        let mut grid = Grid3D::new(Coord::new(4, 1, 1));
        grid.set(Coord::new(1, 0, 0), CellType::Stairs);
        grid.set(Coord::new(2, 0, 0), CellType::Room);
        let path: Vec<Coord> = (0..4).map(|x| Coord::new(x, 0, 0)).collect();

        carve_path(&mut grid, &path);
        assert_eq!(grid.get(Coord::new(1, 0, 0)), CellType::Stairs);
        assert_eq!(grid.get(Coord::new(2, 0, 0)), CellType::Room);
        assert_eq!(grid.get(Coord::new(3, 0, 0)), CellType::Hallway);
    }
}
