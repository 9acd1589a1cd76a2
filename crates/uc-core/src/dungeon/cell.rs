//! Grid cell types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What occupies a grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    None = 0,
    Room = 1,
    Hallway = 2,
    Stairs = 3,
}

impl CellType {
    /// Check if nothing has been carved here
    pub const fn is_empty(&self) -> bool {
        matches!(self, CellType::None)
    }

    /// Check if a staircase may start or end on this cell
    pub const fn is_stair_landing(&self) -> bool {
        matches!(self, CellType::None | CellType::Hallway)
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::None => ' ',
            CellType::Room => '.',
            CellType::Hallway => '#',
            CellType::Stairs => '>',
        }
    }

    /// Parse a display character back into a cell type
    pub const fn from_symbol(c: char) -> Option<CellType> {
        match c {
            ' ' => Some(CellType::None),
            '.' => Some(CellType::Room),
            '#' => Some(CellType::Hallway),
            '>' => Some(CellType::Stairs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_is_none() {
        assert_eq!(CellType::default(), CellType::None);
        assert!(CellType::None.is_empty());
    }

    #[test]
    fn test_stair_landing() {
        assert!(CellType::None.is_stair_landing());
        assert!(CellType::Hallway.is_stair_landing());
        assert!(!CellType::Room.is_stair_landing());
        assert!(!CellType::Stairs.is_stair_landing());
    }

    #[test]
    fn test_symbols_are_distinct() {
        for cell in CellType::iter() {
            assert_eq!(CellType::from_symbol(cell.symbol()), Some(cell));
        }
        assert_eq!(CellType::from_symbol('x'), None);
    }
}
