use error_chain::bail;

use crate::errors::*;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// Cells and walls are both indexed with `u32` in the wall graph, the largest index is reserved.
const MAX_GRAPH_ITEMS: usize = u32::MAX as usize;

/// The fixed size of a rectangular grid. Both counts are at least 1.
///
/// The cell count and the wall count must each stay below `u32::MAX`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct GridDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl GridDimensions {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<GridDimensions> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        if r == 0 || c == 0 {
            bail!(ErrorKind::InvalidDimensions(r, c));
        }

        let cells = r.checked_mul(c);
        let edges = cells.and_then(|_| {
            let horizontal = r.checked_mul(c - 1)?;
            let vertical = c.checked_mul(r - 1)?;
            horizontal.checked_add(vertical)
        });
        match (cells, edges) {
            (Some(cells), Some(edges)) if cells < MAX_GRAPH_ITEMS && edges < MAX_GRAPH_ITEMS => {
                Ok(GridDimensions { rows, columns })
            }
            _ => Err(ErrorKind::InvalidDimensions(r, c).into()),
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    /// Number of pairs of orthogonally adjacent cells, i.e. the number of walls in the grid.
    pub fn edges_count(&self) -> EdgesCount {
        let (RowsCount(rows), ColumnsCount(columns)) = (self.rows, self.columns);
        EdgesCount(rows * (columns - 1) + columns * (rows - 1))
    }
}
