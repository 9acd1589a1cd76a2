//! Hallway routing on the cell grid
//!
//! A best-first search over cells. Besides the four flat moves, a node can
//! take a staircase: three cells along x or z while climbing or descending one
//! level. A staircase needs four free cells for its footprint, and no path may
//! cross a cell it already used, including the footprints of its own earlier
//! stairs.
//!
//! The distance to the goal is folded into every step cost, and the frontier
//! is ordered by accumulated cost alone. This keeps routes hugging existing
//! hallways instead of finding strictly shortest paths.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::config::PathCosts;
use crate::STAIR_RUN_LENGTH;

use super::stairs::stair_footprint;
use super::{CellType, Coord, Grid3D};

const FLAT_MOVES: [Coord; 4] = [
    Coord::new(1, 0, 0),
    Coord::new(-1, 0, 0),
    Coord::new(0, 0, 1),
    Coord::new(0, 0, -1),
];

const STAIR_MOVES: [Coord; 8] = [
    Coord::new(STAIR_RUN_LENGTH, 1, 0),
    Coord::new(STAIR_RUN_LENGTH, -1, 0),
    Coord::new(-STAIR_RUN_LENGTH, 1, 0),
    Coord::new(-STAIR_RUN_LENGTH, -1, 0),
    Coord::new(0, 1, STAIR_RUN_LENGTH),
    Coord::new(0, -1, STAIR_RUN_LENGTH),
    Coord::new(0, 1, -STAIR_RUN_LENGTH),
    Coord::new(0, -1, -STAIR_RUN_LENGTH),
];

/// A routed sequence of cells from start to goal
#[derive(Debug, Clone, PartialEq)]
pub struct GridPath {
    pub cells: Vec<Coord>,
    /// Accumulated search cost at the goal
    pub cost: f64,
}

impl GridPath {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of staircase moves along the path
    pub fn stair_count(&self) -> usize {
        self.cells.windows(2).filter(|w| w[0].y != w[1].y).count()
    }
}

/// Per-cell search state
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    cost: f64,
    previous: Option<Coord>,
    closed: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            previous: None,
            closed: false,
        }
    }
}

/// Frontier entry
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    pos: Coord,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Routes hallways through a dungeon grid
///
/// The per-cell search state is kept between calls and reset on each search.
#[derive(Debug, Clone)]
pub struct GridPathfinder {
    costs: PathCosts,
    nodes: Grid3D<SearchNode>,
}

impl GridPathfinder {
    pub fn new(size: Coord, costs: PathCosts) -> Self {
        Self {
            costs,
            nodes: Grid3D::new(size),
        }
    }

    /// Route from `start` to `goal` over the current state of `grid`
    ///
    /// Returns `None` when the goal cannot be reached.
    pub fn find_path(
        &mut self,
        grid: &Grid3D<CellType>,
        start: Coord,
        goal: Coord,
    ) -> Option<GridPath> {
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return None;
        }
        if self.nodes.size() == grid.size() {
            self.nodes.fill(SearchNode::default());
        } else {
            self.nodes = Grid3D::new(grid.size());
        }
        self.nodes[start].cost = 0.0;

        let mut open = BinaryHeap::new();
        open.push(Frontier {
            cost: 0.0,
            pos: start,
        });

        while let Some(Frontier { cost, pos }) = open.pop() {
            let node = self.nodes[pos];
            if node.closed || cost > node.cost {
                continue;
            }
            self.nodes[pos].closed = true;

            if pos == goal {
                return Some(GridPath {
                    cells: self.trace_back(goal),
                    cost,
                });
            }

            let claimed = self.claimed_by(pos);
            let candidates = FLAT_MOVES.iter().chain(STAIR_MOVES.iter());
            for &offset in candidates {
                let next = pos + offset;
                if !grid.in_bounds(next) || self.nodes[next].closed || claimed.contains(&next) {
                    continue;
                }
                let Some(step) = self.step_cost(grid, pos, next, goal, &claimed) else {
                    continue;
                };

                let total = cost + step;
                if total < self.nodes[next].cost {
                    self.nodes[next].cost = total;
                    self.nodes[next].previous = Some(pos);
                    open.push(Frontier {
                        cost: total,
                        pos: next,
                    });
                }
            }
        }
        None
    }

    /// Cost of moving from `pos` to `next`, or `None` if the move is blocked
    fn step_cost(
        &self,
        grid: &Grid3D<CellType>,
        pos: Coord,
        next: Coord,
        goal: Coord,
        claimed: &HashSet<Coord>,
    ) -> Option<f64> {
        let heuristic = next.distance(goal);

        if pos.y == next.y {
            let penalty = match grid.get(next) {
                CellType::Room => self.costs.room,
                CellType::None => self.costs.empty,
                CellType::Hallway | CellType::Stairs => 0.0,
            };
            return Some(heuristic + penalty);
        }

        if !grid.get(pos).is_stair_landing() || !grid.get(next).is_stair_landing() {
            return None;
        }
        let footprint_free = stair_footprint(pos, next).iter().all(|cell| {
            grid.get_checked(*cell) == Some(&CellType::None) && !claimed.contains(cell)
        });
        footprint_free.then_some(self.costs.stair + heuristic)
    }

    /// Cells used by the current best path ending at `pos`
    fn claimed_by(&self, pos: Coord) -> HashSet<Coord> {
        let mut claimed = HashSet::new();
        let mut current = pos;
        claimed.insert(current);
        while let Some(prev) = self.nodes[current].previous {
            if prev.y != current.y {
                claimed.extend(stair_footprint(prev, current));
            }
            claimed.insert(prev);
            current = prev;
        }
        claimed
    }

    fn trace_back(&self, goal: Coord) -> Vec<Coord> {
        let mut cells = vec![goal];
        let mut current = goal;
        while let Some(prev) = self.nodes[current].previous {
            cells.push(prev);
            current = prev;
        }
        cells.reverse();
        cells
    }
}
