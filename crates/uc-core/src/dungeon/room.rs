//! Room volumes
//!
//! A room is an axis-aligned box of cells. Rooms carry no gameplay meaning
//! here; classifying them (start, boss, treasure...) is left to consumers of
//! the generated layout.

use serde::{Deserialize, Serialize};

use super::Coord;

/// Axis-aligned box of room cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Lowest corner (inclusive)
    pub position: Coord,
    /// Extent along each axis, all components at least 1
    pub size: Coord,
}

impl Room {
    pub const fn new(position: Coord, size: Coord) -> Self {
        Self { position, size }
    }

    /// One past the highest corner
    pub fn end(&self) -> Coord {
        self.position + self.size
    }

    /// Number of cells inside the room
    pub fn volume(&self) -> usize {
        self.size.volume()
    }

    /// The cell the pathfinder starts and ends at
    pub fn center(&self) -> Coord {
        Coord::new(
            self.position.x + self.size.x / 2,
            self.position.y + self.size.y / 2,
            self.position.z + self.size.z / 2,
        )
    }

    /// Geometric center of the box
    pub fn centroid(&self) -> [f64; 3] {
        [
            self.position.x as f64 + self.size.x as f64 / 2.0,
            self.position.y as f64 + self.size.y as f64 / 2.0,
            self.position.z as f64 + self.size.z as f64 / 2.0,
        ]
    }

    /// Centroid scaled by two, which is always integral
    pub fn doubled_centroid(&self) -> [i64; 3] {
        [
            2 * self.position.x as i64 + self.size.x as i64,
            2 * self.position.y as i64 + self.size.y as i64,
            2 * self.position.z as i64 + self.size.z as i64,
        ]
    }

    /// Euclidean distance between the centroids of two rooms
    pub fn centroid_distance(&self, other: &Room) -> f64 {
        let a = self.centroid();
        let b = other.centroid();
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    }

    /// Check if a cell lies inside the room
    pub fn contains(&self, pos: Coord) -> bool {
        let end = self.end();
        pos.x >= self.position.x
            && pos.y >= self.position.y
            && pos.z >= self.position.z
            && pos.x < end.x
            && pos.y < end.y
            && pos.z < end.z
    }

    /// Check if the room fits inside a grid of the given size
    pub fn fits_within(&self, bounds: Coord) -> bool {
        self.position.x >= 0
            && self.position.y >= 0
            && self.position.z >= 0
            && self.end().all_le(bounds)
    }

    /// Check if two boxes share at least one cell
    pub fn intersects(&self, other: &Room) -> bool {
        let (a0, a1) = (self.position, self.end());
        let (b0, b1) = (other.position, other.end());
        !(a1.x <= b0.x
            || a0.x >= b1.x
            || a1.y <= b0.y
            || a0.y >= b1.y
            || a1.z <= b0.z
            || a0.z >= b1.z)
    }

    /// The box grown by `buffer` cells on the x and z sides only
    ///
    /// Rooms on different levels may touch vertically; only the horizontal
    /// plane keeps a gap.
    pub fn expanded_horizontally(&self, buffer: i32) -> Room {
        Room::new(
            self.position - Coord::new(buffer, 0, buffer),
            self.size + Coord::new(2 * buffer, 0, 2 * buffer),
        )
    }

    /// Check if this room overlaps another once this one is buffered
    pub fn overlaps(&self, other: &Room, buffer: i32) -> bool {
        self.expanded_horizontally(buffer).intersects(other)
    }

    /// Every cell of the room, x fastest
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let p = self.position;
        let s = self.size;
        (0..s.y).flat_map(move |dy| {
            (0..s.z).flat_map(move |dz| (0..s.x).map(move |dx| p + Coord::new(dx, dy, dz)))
        })
    }
}

/// Find the room containing a cell
pub fn pos_to_room(rooms: &[Room], pos: Coord) -> Option<usize> {
    rooms.iter().position(|room| room.contains(pos))
}
