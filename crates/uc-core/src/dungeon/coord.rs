//! Integer grid coordinates
//!
//! `y` is the vertical axis: one unit of `y` is one dungeon level.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A cell address, or an offset between two cells
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset of `dy` levels straight up (or down when negative)
    pub const fn vertical(dy: i32) -> Self {
        Self::new(0, dy, 0)
    }

    /// Same offset with the vertical component dropped
    pub const fn horizontal(self) -> Self {
        Self::new(self.x, 0, self.z)
    }

    /// Component-wise sign, each in {-1, 0, 1}
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum(), self.z.signum())
    }

    /// Product of the components, as a cell count
    pub const fn volume(self) -> usize {
        (self.x as usize) * (self.y as usize) * (self.z as usize)
    }

    /// True when every component is at least 1
    pub const fn is_positive(self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }

    /// Largest component
    pub fn max_component(self) -> i32 {
        self.x.max(self.y).max(self.z)
    }

    /// Euclidean distance to another coordinate
    pub fn distance(self, other: Coord) -> f64 {
        let d = other - self;
        let sq = (d.x as f64).powi(2) + (d.y as f64).powi(2) + (d.z as f64).powi(2);
        sq.sqrt()
    }

    /// Component-wise `self <= other`
    pub const fn all_le(self, other: Coord) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Coord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Coord> for (i32, i32, i32) {
    fn from(c: Coord) -> Self {
        (c.x, c.y, c.z)
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    fn mul(self, rhs: i32) -> Coord {
        Coord::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y, -self.z)
    }
}
