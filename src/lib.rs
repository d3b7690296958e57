//! **backtracker-mazes** generates perfect mazes on rectangular grids with the recursive
//! backtracker (randomised depth first search).
//!
//! A [`grid::Grid`] owns every [`cells::Cell`] and every [`walls::Wall`]. Walls start closed and
//! [`generators::recursive_backtracker`] opens the ones the traversal crosses. After generation
//! every cell is visited and the open/closed state of the walls describes the maze.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_iterators;
pub mod units;
pub mod walls;
