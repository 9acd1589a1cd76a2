//! Dense 3D cell storage

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::Coord;

/// Fixed-size 3D array addressed by `Coord`
///
/// Storage is level-major: all cells of level `y = 0` first, rows along `z`
/// within a level. The size never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid3D<T> {
    size: Coord,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid3D<T> {
    /// Create a grid filled with `T::default()`
    ///
    /// # Panics
    /// If any component of `size` is negative.
    pub fn new(size: Coord) -> Self {
        Self::filled(size, T::default())
    }
}

impl<T: Clone> Grid3D<T> {
    /// Create a grid filled with a specific value
    pub fn filled(size: Coord, value: T) -> Self {
        assert!(
            size.x >= 0 && size.y >= 0 && size.z >= 0,
            "grid size must not be negative: {size}"
        );
        Self {
            size,
            cells: vec![value; size.volume()],
        }
    }

    /// Overwrite every cell with `value`
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid3D<T> {
    /// Extent along each axis
    pub fn size(&self) -> Coord {
        self.size
    }

    /// Total number of cells
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    /// Check whether a coordinate addresses a cell of this grid
    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && pos.x < self.size.x
            && pos.y < self.size.y
            && pos.z < self.size.z
    }

    /// Check that the buffer length matches the size (after deserializing)
    pub fn is_consistent(&self) -> bool {
        self.size.x >= 0
            && self.size.y >= 0
            && self.size.z >= 0
            && self.cells.len() == self.size.volume()
    }

    fn index_of(&self, pos: Coord) -> usize {
        if !self.in_bounds(pos) {
            panic!("grid access out of bounds: {pos} in grid of size {}", self.size);
        }
        let (x, y, z) = (pos.x as usize, pos.y as usize, pos.z as usize);
        x + (self.size.x as usize) * (z + (self.size.z as usize) * y)
    }

    fn coord_of(&self, index: usize) -> Coord {
        let w = self.size.x as usize;
        let d = self.size.z as usize;
        Coord::new(
            (index % w) as i32,
            (index / (w * d)) as i32,
            ((index / w) % d) as i32,
        )
    }

    /// Bounds-checked read that returns `None` outside the grid
    pub fn get_checked(&self, pos: Coord) -> Option<&T> {
        if self.in_bounds(pos) {
            Some(&self.cells[self.index_of(pos)])
        } else {
            None
        }
    }

    /// Iterate over every cell with its coordinate, in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.coord_of(i), cell))
    }

    /// All cells of one level, rows along `z`
    ///
    /// # Panics
    /// If `y` is not a level of this grid.
    pub fn level(&self, y: i32) -> &[T] {
        assert!(
            y >= 0 && y < self.size.y,
            "level {y} out of range 0..{}",
            self.size.y
        );
        let per_level = (self.size.x as usize) * (self.size.z as usize);
        let start = per_level * y as usize;
        &self.cells[start..start + per_level]
    }
}

impl<T: Copy> Grid3D<T> {
    /// Read a cell
    ///
    /// # Panics
    /// If `pos` is out of bounds. Use `in_bounds` or `get_checked` for
    /// coordinates derived from arithmetic.
    pub fn get(&self, pos: Coord) -> T {
        self.cells[self.index_of(pos)]
    }

    /// Write a cell
    ///
    /// # Panics
    /// If `pos` is out of bounds.
    pub fn set(&mut self, pos: Coord, value: T) {
        let index = self.index_of(pos);
        self.cells[index] = value;
    }
}

impl<T: PartialEq> Grid3D<T> {
    /// Count cells equal to `value`
    pub fn count(&self, value: &T) -> usize {
        self.cells.iter().filter(|c| *c == value).count()
    }
}

impl<T> Index<Coord> for Grid3D<T> {
    type Output = T;

    fn index(&self, pos: Coord) -> &T {
        &self.cells[self.index_of(pos)]
    }
}

impl<T> IndexMut<Coord> for Grid3D<T> {
    fn index_mut(&mut self, pos: Coord) -> &mut T {
        let index = self.index_of(pos);
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::CellType;

    #[test]
    fn test_new_grid_is_empty() {
        let grid: Grid3D<CellType> = Grid3D::new(Coord::new(4, 2, 3));
        assert_eq!(grid.size(), Coord::new(4, 2, 3));
        assert_eq!(grid.volume(), 24);
        assert_eq!(grid.count(&CellType::None), 24);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid: Grid3D<CellType> = Grid3D::new(Coord::new(4, 2, 3));
        let pos = Coord::new(3, 1, 2);
        grid.set(pos, CellType::Hallway);
        assert_eq!(grid.get(pos), CellType::Hallway);
        assert_eq!(grid[pos], CellType::Hallway);
        assert_eq!(grid.count(&CellType::Hallway), 1);

        grid[Coord::new(0, 0, 0)] = CellType::Room;
        assert_eq!(grid.get(Coord::ZERO), CellType::Room);
    }

    #[test]
    fn test_fill_keeps_size() {
        let mut grid: Grid3D<u8> = Grid3D::new(Coord::new(3, 2, 2));
        grid.set(Coord::new(1, 1, 1), 9);
        grid.fill(4);
        assert_eq!(grid.size(), Coord::new(3, 2, 2));
        assert_eq!(grid.count(&4), 12);
    }

    #[test]
    fn test_in_bounds() {
        let grid: Grid3D<u8> = Grid3D::new(Coord::new(2, 2, 2));
        assert!(grid.in_bounds(Coord::new(0, 0, 0)));
        assert!(grid.in_bounds(Coord::new(1, 1, 1)));
        assert!(!grid.in_bounds(Coord::new(2, 0, 0)));
        assert!(!grid.in_bounds(Coord::new(0, -1, 0)));
        assert!(!grid.in_bounds(Coord::new(0, 0, 2)));
        assert_eq!(grid.get_checked(Coord::new(-1, 0, 0)), None);
        assert_eq!(grid.get_checked(Coord::new(1, 0, 0)), Some(&0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let grid: Grid3D<u8> = Grid3D::new(Coord::new(2, 2, 2));
        grid.get(Coord::new(2, 0, 0));
    }

    #[test]
    fn test_iter_coordinates_round_trip() {
        let mut grid: Grid3D<u32> = Grid3D::new(Coord::new(3, 2, 4));
        let mut n = 0;
        for y in 0..2 {
            for z in 0..4 {
                for x in 0..3 {
                    grid.set(Coord::new(x, y, z), n);
                    n += 1;
                }
            }
        }
        for (pos, value) in grid.iter() {
            assert_eq!(grid.get(pos), *value);
        }
        assert_eq!(grid.iter().count(), 24);
    }

    #[test]
    fn test_level_slice() {
        let mut grid: Grid3D<CellType> = Grid3D::new(Coord::new(3, 2, 2));
        grid.set(Coord::new(1, 1, 1), CellType::Stairs);
        let level = grid.level(1);
        assert_eq!(level.len(), 6);
        assert_eq!(level[1 + 3], CellType::Stairs);
        assert!(grid.level(0).iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_consistency_check() {
        let grid: Grid3D<CellType> = Grid3D::new(Coord::new(2, 1, 2));
        assert!(grid.is_consistent());
        let json = serde_json::to_string(&grid).unwrap();
        let broken = json.replace("\"None\",", "");
        let back: Grid3D<CellType> = serde_json::from_str(&broken).unwrap();
        assert!(!back.is_consistent());
    }
}
