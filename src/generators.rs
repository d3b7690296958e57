use error_chain::bail;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cells::Position;
use crate::errors::*;
use crate::grid::Grid;
use crate::walls::WallKey;

/// What the recursive backtracker does when its stack runs dry while unvisited cells remain.
///
/// On a fresh rectangular grid this never happens, every cell is reachable. It only happens when
/// cells were marked visited before generation and cut the unvisited cells into separate pieces.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StallPolicy {
    /// Jump to a random unvisited cell without opening a wall to it and carry on from there.
    /// The finished maze is then split into disconnected regions and is not a perfect maze.
    Jump,
    /// Stop with `ErrorKind::Stalled`.
    Fail,
}

impl Default for StallPolicy {
    fn default() -> StallPolicy {
        StallPolicy::Jump
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct BacktrackerConfig {
    pub stall_policy: StallPolicy,
}

impl BacktrackerConfig {
    /// Fail fast instead of producing a disconnected maze.
    pub fn strict() -> BacktrackerConfig {
        BacktrackerConfig { stall_policy: StallPolicy::Fail }
    }
}

/// What a generation run did to the grid.
#[derive(Eq, PartialEq, Clone, Debug, Default)]
pub struct Generation {
    /// Walls opened, in the order they were opened.
    pub carved: Vec<WallKey>,
    /// How many times the traversal stepped back along its stack.
    pub backtracks: usize,
    /// Cells jumped to after a stall, see `StallPolicy::Jump`.
    pub jumps: Vec<Position>,
}

impl Generation {
    /// True when every carved passage hangs off the start cell, i.e. no stall jump happened.
    pub fn is_connected(&self) -> bool {
        self.jumps.is_empty()
    }
}

/// Apply the recursive backtracker maze generation algorithm to a grid.
///
/// A random walk from `start` that only steps into unvisited cells, opening the wall it crosses.
/// When the walk is boxed in by visited cells it backtracks along its own path until it finds a
/// cell with an unvisited neighbour, and carries on from there. It finishes once every cell is
/// visited, leaving a perfect maze with long winding passages and few dead ends.
///
/// Cells are populated and walls are built first if needed. All random choices are taken from
/// `rng`, so a seeded generator reproduces the same maze.
pub fn recursive_backtracker<R>(grid: &mut Grid,
                                start: Position,
                                rng: &mut R,
                                config: &BacktrackerConfig)
                                -> Result<Generation>
    where R: Rng + ?Sized
{
    if !grid.is_valid_position(start) {
        bail!(ErrorKind::InvalidPosition(start));
    }
    grid.populate_cells();
    grid.build_walls()?;

    let mut generation = Generation::default();
    let mut remaining = grid.unvisited_count();
    let mut stack: Vec<Position> = Vec::with_capacity(grid.size());
    let mut current = start;

    if grid.mark_visited(current)? {
        remaining -= 1;
    }

    while remaining > 0 {
        if grid.mark_visited(current)? {
            remaining -= 1;
        }

        let unvisited_neighbours = grid.unvisited_neighbours(current);

        if let Some(&next) = unvisited_neighbours.choose(rng) {
            stack.push(current);
            let wall = grid.wall_between_mut(current, next)?;
            wall.open();
            generation.carved.push(wall.key());
            log::trace!("carved {}", wall.key());
            current = next;

        } else if let Some(previous) = stack.pop() {
            generation.backtracks += 1;
            current = previous;

        } else {
            if remaining == 0 {
                break;
            }

            match config.stall_policy {
                StallPolicy::Fail => return Err(ErrorKind::Stalled(remaining).into()),
                StallPolicy::Jump => {
                    let candidates = grid.iter()
                        .filter(|&pos| grid.get_cell(pos).map_or(false, |c| !c.is_visited()))
                        .collect::<Vec<Position>>();
                    match candidates.choose(rng) {
                        Some(&target) => {
                            log::warn!("stalled at {} with {} unvisited cells, jumping to {} \
                                        without opening a wall",
                                       current,
                                       remaining,
                                       target);
                            generation.jumps.push(target);
                            current = target;
                        }
                        None => break,
                    }
                }
            }
        }
    }

    log::debug!("carved {} walls from {} with {} backtracks and {} jumps",
                generation.carved.len(),
                start,
                generation.backtracks,
                generation.jumps.len());

    Ok(generation)
}
