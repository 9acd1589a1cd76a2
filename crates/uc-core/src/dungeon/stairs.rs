//! Staircase records
//!
//! A staircase climbs one level over two horizontal cells. Its footprint is
//! four cells: the two cells ahead of the base landing, and the two cells
//! directly above (or below) them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::STAIR_FOOTPRINT_CELLS;

use super::Coord;

/// Horizontal direction of travel along a staircase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Facing {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Facing {
    /// Unit offset along the facing
    pub const fn offset(self) -> Coord {
        match self {
            Facing::PosX => Coord::new(1, 0, 0),
            Facing::NegX => Coord::new(-1, 0, 0),
            Facing::PosZ => Coord::new(0, 0, 1),
            Facing::NegZ => Coord::new(0, 0, -1),
        }
    }

    /// Facing of a horizontal step, if it is axis-aligned
    pub fn from_offset(delta: Coord) -> Option<Facing> {
        match (delta.x.signum(), delta.z.signum()) {
            (1, 0) => Some(Facing::PosX),
            (-1, 0) => Some(Facing::NegX),
            (0, 1) => Some(Facing::PosZ),
            (0, -1) => Some(Facing::NegZ),
            _ => None,
        }
    }
}

/// Whether a staircase goes up or down along the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Slope {
    Ascending,
    Descending,
}

impl Slope {
    /// +1 for ascending, -1 for descending
    pub const fn sign(self) -> i32 {
        match self {
            Slope::Ascending => 1,
            Slope::Descending => -1,
        }
    }

    pub fn from_sign(dy: i32) -> Option<Slope> {
        match dy.signum() {
            1 => Some(Slope::Ascending),
            -1 => Some(Slope::Descending),
            _ => None,
        }
    }
}

/// Cells claimed by a staircase move from `from` to `to`
///
/// `to` is three cells away horizontally and one level up or down. The
/// footprint is the one- and two-step cells along the horizontal direction,
/// on the level of `from` and on the level of `to`.
pub fn stair_footprint(from: Coord, to: Coord) -> [Coord; STAIR_FOOTPRINT_CELLS] {
    let delta = to - from;
    let step = delta.horizontal().signum();
    let rise = Coord::vertical(delta.y.signum());
    [
        from + step,
        from + step * 2,
        from + rise + step,
        from + rise + step * 2,
    ]
}

/// A single staircase carved into the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairRun {
    /// Center of the footprint in grid units; cell `(x, y, z)` spans
    /// `[x, x + 1)` on each axis
    pub center: [f32; 3],
    /// Horizontal direction of travel
    pub facing: Facing,
    /// Up or down along the direction of travel
    pub slope: Slope,
    /// Footprint: two cells on the starting level, then the two above or
    /// below them
    pub cells: [Coord; STAIR_FOOTPRINT_CELLS],
}

impl StairRun {
    /// Describe the staircase for a vertical path step
    ///
    /// Returns `None` unless `to` differs from `from` both vertically and
    /// along exactly one horizontal axis.
    pub fn from_step(from: Coord, to: Coord) -> Option<StairRun> {
        let delta = to - from;
        let slope = Slope::from_sign(delta.y)?;
        let facing = Facing::from_offset(delta.horizontal())?;
        let cells = stair_footprint(from, to);

        let mut center = [0.0f32; 3];
        for cell in &cells {
            center[0] += cell.x as f32 + 0.5;
            center[1] += cell.y as f32 + 0.5;
            center[2] += cell.z as f32 + 0.5;
        }
        for c in &mut center {
            *c /= STAIR_FOOTPRINT_CELLS as f32;
        }

        Some(StairRun {
            center,
            facing,
            slope,
            cells,
        })
    }

    /// Vertical sign, +1 ascending or -1 descending
    pub fn sign(&self) -> i32 {
        self.slope.sign()
    }

    /// The lower of the two levels the staircase joins
    pub fn lower_level(&self) -> i32 {
        self.cells.iter().map(|c| c.y).min().unwrap_or(0)
    }

    /// The upper of the two levels the staircase joins
    pub fn upper_level(&self) -> i32 {
        self.cells.iter().map(|c| c.y).max().unwrap_or(0)
    }

    /// Check the footprint shape: two horizontally adjacent pairs stacked on
    /// consecutive levels
    pub fn is_well_formed(&self) -> bool {
        let [a, b, c, d] = self.cells;
        let pair_ok = |p: Coord, q: Coord| {
            p.y == q.y && (q - p).horizontal() == self.facing.offset()
        };
        pair_ok(a, b)
            && pair_ok(c, d)
            && c - a == Coord::vertical(self.sign())
            && d - b == Coord::vertical(self.sign())
            && self.upper_level() - self.lower_level() == 1
    }
}
