//! Room placement
//!
//! Rejection sampling of room boxes inside the dungeon bounds.

use log::debug;

use crate::PLACEMENT_ATTEMPTS_PER_ROOM;
use crate::rng::GameRng;

use super::{CellType, Coord, Grid3D, Room};

/// What to place and how far apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Number of rooms wanted
    pub room_count: usize,
    /// Smallest room extent per axis (inclusive)
    pub min_size: Coord,
    /// Largest room extent per axis (inclusive)
    pub max_size: Coord,
    /// Horizontal gap kept between rooms
    pub buffer: i32,
}

impl PlacementRequest {
    /// Total sampling attempts before giving up
    pub fn attempt_budget(&self) -> usize {
        self.room_count.saturating_mul(PLACEMENT_ATTEMPTS_PER_ROOM)
    }
}

/// Place rooms into the grid, marking their cells as `Room`
///
/// Each attempt draws a position uniformly over the whole grid and then a size
/// within the requested range. Candidates that leave the grid or come within
/// `buffer` cells of an accepted room horizontally are discarded. Fewer rooms
/// than requested is a normal outcome once the attempt budget runs out.
pub fn place_rooms(
    grid: &mut Grid3D<CellType>,
    request: &PlacementRequest,
    rng: &mut GameRng,
) -> Vec<Room> {
    let bounds = grid.size();
    let mut rooms: Vec<Room> = Vec::new();

    if !bounds.is_positive() {
        return rooms;
    }

    for _ in 0..request.attempt_budget() {
        if rooms.len() >= request.room_count {
            break;
        }

        let position = Coord::new(
            rng.rn2(bounds.x as u32) as i32,
            rng.rn2(bounds.y as u32) as i32,
            rng.rn2(bounds.z as u32) as i32,
        );
        let size = Coord::new(
            rng.range_inclusive(request.min_size.x, request.max_size.x),
            rng.range_inclusive(request.min_size.y, request.max_size.y),
            rng.range_inclusive(request.min_size.z, request.max_size.z),
        );
        let candidate = Room::new(position, size);

        if !candidate.fits_within(bounds) {
            continue;
        }
        if rooms.iter().any(|r| candidate.overlaps(r, request.buffer)) {
            continue;
        }

        for cell in candidate.cells() {
            grid.set(cell, CellType::Room);
        }
        rooms.push(candidate);
    }

    debug!(
        "placed {} of {} rooms in {}",
        rooms.len(),
        request.room_count,
        bounds
    );
    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(room_count: usize) -> PlacementRequest {
        PlacementRequest {
            room_count,
            min_size: Coord::new(3, 1, 3),
            max_size: Coord::new(6, 1, 6),
            buffer: 1,
        }
    }

    #[test]
    fn test_rooms_marked_in_grid() {
        let mut grid = Grid3D::new(Coord::new(30, 3, 30));
        let mut rng = GameRng::new(42);
        let rooms = place_rooms(&mut grid, &request(6), &mut rng);

        assert!(!rooms.is_empty());
        let room_cells: usize = rooms.iter().map(Room::volume).sum();
        assert_eq!(grid.count(&CellType::Room), room_cells);
        for room in &rooms {
            assert!(room.cells().all(|c| grid.get(c) == CellType::Room));
        }
    }

    #[test]
    fn test_zero_rooms_requested() {
        let mut grid = Grid3D::new(Coord::new(10, 1, 10));
        let mut rng = GameRng::new(1);
        let rooms = place_rooms(&mut grid, &request(0), &mut rng);
        assert!(rooms.is_empty());
        assert_eq!(grid.count(&CellType::Room), 0);
    }

    #[test]
    fn test_underfill_is_allowed() {
        // Room of at least 3x3 with a buffer: a 7x7 floor fits one, maybe two
        let mut grid = Grid3D::new(Coord::new(7, 1, 7));
        let mut rng = GameRng::new(5);
        let rooms = place_rooms(&mut grid, &request(20), &mut rng);
        assert!(rooms.len() < 20);
    }

    #[test]
    fn test_rooms_never_exceed_request() {
        let mut grid = Grid3D::new(Coord::new(60, 4, 60));
        let mut rng = GameRng::new(11);
        let rooms = place_rooms(&mut grid, &request(3), &mut rng);
        assert!(rooms.len() <= 3);
    }

    #[test]
    fn test_placement_is_deterministic() {
        let mut g1 = Grid3D::new(Coord::new(40, 4, 40));
        let mut g2 = Grid3D::new(Coord::new(40, 4, 40));
        let r1 = place_rooms(&mut g1, &request(8), &mut GameRng::new(77));
        let r2 = place_rooms(&mut g2, &request(8), &mut GameRng::new(77));
        assert_eq!(r1, r2);
        assert_eq!(g1, g2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn placed_rooms_respect_bounds_and_buffer(
            seed in any::<u64>(),
            w in 8i32..40,
            h in 1i32..5,
            d in 8i32..40,
            count in 0usize..12,
        ) {
            let mut grid = Grid3D::new(Coord::new(w, h, d));
            let req = PlacementRequest {
                room_count: count,
                min_size: Coord::new(2, 1, 2),
                max_size: Coord::new(6, 2, 6),
                buffer: 1,
            };
            let rooms = place_rooms(&mut grid, &req, &mut GameRng::new(seed));

            prop_assert!(rooms.len() <= count);
            for (i, a) in rooms.iter().enumerate() {
                prop_assert!(a.fits_within(grid.size()));
                prop_assert!(a.size.all_le(req.max_size));
                prop_assert!(req.min_size.all_le(a.size));
                for b in rooms.iter().skip(i + 1) {
                    prop_assert!(!a.overlaps(b, req.buffer));
                    prop_assert!(!b.overlaps(a, req.buffer));
                }
            }
        }
    }
}
