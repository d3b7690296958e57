// Creates the Error, ErrorKind, ResultExt and Result types.
// Result is a typedef of std `Result` with our own `Error` as the error type.
use error_chain::error_chain;

use crate::cells::Position;

error_chain! {

    errors {
        InvalidDimensions(rows: usize, columns: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions: {} rows by {} columns", rows, columns)
        }

        InvalidPosition(position: Position) {
            description("position outside of the grid")
            display("position outside of the grid: {}", position)
        }

        NonAdjacent(a: Position, b: Position) {
            description("positions are not adjacent")
            display("positions are not adjacent: {} and {}", a, b)
        }

        WallNotFound(a: Position, b: Position) {
            description("no wall between positions")
            display("no wall between {} and {}", a, b)
        }

        Stalled(remaining: usize) {
            description("traversal stalled with unvisited cells")
            display("traversal stalled with {} unvisited cells unreachable", remaining)
        }
    }
}
