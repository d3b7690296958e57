use crate::cells::Position;
use crate::grid_dimensions::GridDimensions;
use crate::units::{ColumnsCount, NodesCount, RowsCount};

/// Every position of a grid in row major order.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    columns: ColumnsCount,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(dimensions: GridDimensions) -> CellIter {
        let NodesCount(cells_count) = dimensions.size();
        CellIter {
            columns: dimensions.columns(),
            current_cell_number: 0,
            cells_count,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Position;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let pos = Position::from_row_major_index(self.current_cell_number, self.columns);
            self.current_cell_number += 1;
            Some(pos)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

/// The positions of a grid one row at a time, top row first.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RowIter {
    pub fn new(dimensions: GridDimensions) -> RowIter {
        RowIter {
            current_row: 0,
            rows: dimensions.rows(),
            columns: dimensions.columns(),
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<Position>;
    fn next(&mut self) -> Option<Self::Item> {
        let (RowsCount(rows), ColumnsCount(columns)) = (self.rows, self.columns);
        if self.current_row < rows {
            let row = self.current_row;
            let positions = (0..columns).map(|col| Position::new(row, col)).collect();
            self.current_row += 1;
            Some(positions)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.0 - self.current_row;
        (remaining, Some(remaining))
    }
}
