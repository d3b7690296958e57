use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::*;
use crate::grid::Grid;
use crate::grid_dimensions::GridDimensions;
use crate::units::{ColumnsCount, RowsCount};

/// A (row, column) location on the grid. Ordering is row major.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Converts a one dimensional row major index into a position on a grid with `columns` columns.
    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> Position {
        let ColumnsCount(width) = columns;
        Position::new(index / width, index % width)
    }

    #[inline]
    pub fn row_major_index(&self, columns: ColumnsCount) -> usize {
        self.row * columns.0 + self.col
    }

    /// True when `other` is exactly one step away along a single axis.
    pub fn is_adjacent(&self, other: Position) -> bool {
        let row_delta = (self.row as isize - other.row as isize).abs();
        let col_delta = (self.col as isize - other.col as isize).abs();
        row_delta + col_delta == 1
    }
}

impl From<(usize, usize)> for Position {
    fn from(row_col_pair: (usize, usize)) -> Position {
        Position::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cell<{} {}>", self.row, self.col)
    }
}

pub type PositionSmallVec = SmallVec<[Position; 4]>;
pub type CellRefSmallVec<'g> = SmallVec<[&'g Cell; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

/// Neighbour evaluation order. Only affects which wall gets created first, never correctness.
pub const COMPASS_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                     CompassPrimary::South,
                                                     CompassPrimary::West,
                                                     CompassPrimary::East];

/// Creates a new `Position` offset 1 cell away in the given direction.
/// Returns None if the position is not representable, i.e. would go below row or column zero.
/// The upper grid bounds are not checked.
pub fn offset_position(pos: Position, dir: CompassPrimary) -> Option<Position> {
    let Position { row, col } = pos;
    match dir {
        CompassPrimary::North => {
            if row > 0 {
                Some(Position::new(row - 1, col))
            } else {
                None
            }
        }
        CompassPrimary::South => Some(Position::new(row + 1, col)),
        CompassPrimary::East => Some(Position::new(row, col + 1)),
        CompassPrimary::West => {
            if col > 0 {
                Some(Position::new(row, col - 1))
            } else {
                None
            }
        }
    }
}

/// Positions to the North, South, West and East of `pos` that lie within `dimensions`, in that
/// order.
pub fn neighbour_positions(pos: Position, dimensions: GridDimensions) -> PositionSmallVec {
    COMPASS_DIRECTIONS.iter()
        .filter_map(|&dir| offset_position(pos, dir))
        .filter(|&neighbour| Cell::in_bounds(neighbour, dimensions))
        .collect()
}

/// The identity of a cell: where it is and the size of the grid it lives in.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellKey {
    pub position: Position,
    pub dimensions: GridDimensions,
}

/// A single grid position carrying a visited marker.
///
/// Equality and hashing only look at the [`CellKey`], so a cell stays equal to itself however
/// its visited flag changes.
#[derive(Copy, Clone, Debug)]
pub struct Cell {
    key: CellKey,
    visited: bool,
}

impl Cell {
    /// Fails with `InvalidPosition` if `position` lies outside of `dimensions`.
    pub fn new(position: Position, dimensions: GridDimensions) -> Result<Cell> {
        if !Cell::in_bounds(position, dimensions) {
            return Err(ErrorKind::InvalidPosition(position).into());
        }
        Ok(Cell::unchecked(position, dimensions))
    }

    /// For positions the caller already knows are inside `dimensions`.
    pub(crate) fn unchecked(position: Position, dimensions: GridDimensions) -> Cell {
        Cell {
            key: CellKey { position, dimensions },
            visited: false,
        }
    }

    #[inline]
    pub fn in_bounds(pos: Position, dimensions: GridDimensions) -> bool {
        let (RowsCount(rows), ColumnsCount(columns)) = (dimensions.rows(), dimensions.columns());
        pos.row < rows && pos.col < columns
    }

    #[inline]
    pub fn key(&self) -> CellKey {
        self.key
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.key.position
    }

    #[inline]
    pub fn dimensions(&self) -> GridDimensions {
        self.key.dimensions
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Returns true if the cell was not visited before.
    pub(crate) fn visit(&mut self) -> bool {
        let first_visit = !self.visited;
        self.visited = true;
        first_visit
    }

    /// Positions to the North, South, West and East of this cell that lie within the grid.
    #[inline]
    pub fn neighbour_positions(&self) -> PositionSmallVec {
        neighbour_positions(self.position(), self.dimensions())
    }

    /// The grid's own cells at `neighbour_positions`.
    ///
    /// Neighbours the grid has not populated yet are left out.
    pub fn neighbours<'g>(&self, grid: &'g Grid) -> CellRefSmallVec<'g> {
        self.neighbour_positions()
            .into_iter()
            .filter_map(|pos| grid.get_cell(pos))
            .collect()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Cell) -> bool {
        self.key == other.key
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.position())
    }
}
