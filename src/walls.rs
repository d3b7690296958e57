use std::fmt;
use std::hash::{Hash, Hasher};

use crate::cells::{Cell, Position};
use crate::errors::*;
use crate::grid_dimensions::GridDimensions;

/// The unordered pair of adjacent positions a wall separates.
///
/// The pair is stored smallest position first, so `{a, b}` and `{b, a}` build the same key.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct WallKey {
    low: Position,
    high: Position,
}

impl WallKey {
    /// Fails with `InvalidPosition` if either position is outside of the grid and with
    /// `NonAdjacent` unless the positions are distinct orthogonal neighbours.
    pub fn new(a: Position, b: Position, dimensions: GridDimensions) -> Result<WallKey> {
        for &pos in &[a, b] {
            if !Cell::in_bounds(pos, dimensions) {
                return Err(ErrorKind::InvalidPosition(pos).into());
            }
        }
        if !a.is_adjacent(b) {
            return Err(ErrorKind::NonAdjacent(a, b).into());
        }

        Ok(if a <= b {
            WallKey { low: a, high: b }
        } else {
            WallKey { low: b, high: a }
        })
    }

    #[inline]
    pub fn positions(&self) -> (Position, Position) {
        (self.low, self.high)
    }
}

impl fmt::Display for WallKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}<>{}", self.low, self.high)
    }
}

/// An edge between two adjacent cells. Closed walls are impassable.
///
/// Equality and hashing only look at the [`WallKey`], never at the closed flag.
#[derive(Copy, Clone, Debug)]
pub struct Wall {
    key: WallKey,
    closed: bool,
}

impl Wall {
    /// A new closed wall.
    pub fn new(key: WallKey) -> Wall {
        Wall::with_closed(key, true)
    }

    pub fn with_closed(key: WallKey, closed: bool) -> Wall {
        Wall { key, closed }
    }

    #[inline]
    pub fn key(&self) -> WallKey {
        self.key
    }

    #[inline]
    pub fn positions(&self) -> (Position, Position) {
        self.key.positions()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    pub(crate) fn open(&mut self) {
        self.closed = false;
    }
}

impl PartialEq for Wall {
    fn eq(&self, other: &Wall) -> bool {
        self.key == other.key
    }
}

impl Eq for Wall {}

impl Hash for Wall {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = if self.closed { "closed" } else { "open" };
        write!(f, "{}:{}", self.key, state)
    }
}
