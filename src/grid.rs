use error_chain::bail;
use fnv::{FnvHashMap, FnvHashSet};
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

use crate::cells::{self, Cell, Position, PositionSmallVec};
use crate::errors::*;
use crate::generators::{self, BacktrackerConfig, Generation};
use crate::grid_dimensions::GridDimensions;
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};
use crate::walls::{Wall, WallKey};

/// A rectangular grid of cells and the walls between them.
///
/// Cells are created lazily, the first time any position is asked for, or explicitly with
/// `populate_cells`. The wall pool is an undirected graph with one node per cell in row major
/// order and one edge per wall, so a wall is found from either of its cells.
pub struct Grid {
    dimensions: GridDimensions,
    cells: FnvHashMap<Position, Cell>,
    walls: UnGraph<(), Wall>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: rows: {:?}, columns: {:?}, cells: {:?}, walls: {:?}",
               self.rows(), self.columns(), self.cells.len(), self.walls.edge_count())
    }
}

impl Grid {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Grid> {
        let dimensions = GridDimensions::new(rows, columns)?;
        Ok(Grid::with_dimensions(dimensions))
    }

    pub fn with_dimensions(dimensions: GridDimensions) -> Grid {
        Grid {
            dimensions,
            cells: FnvHashMap::default(),
            walls: UnGraph::default(),
        }
    }

    #[inline]
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    /// Number of cells the grid holds once populated.
    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.dimensions)
    }

    #[inline]
    pub fn is_valid_position(&self, pos: Position) -> bool {
        Cell::in_bounds(pos, self.dimensions)
    }

    pub fn is_populated(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Creates a cell for every position of the grid. Does nothing if already populated.
    pub fn populate_cells(&mut self) {
        if self.is_populated() {
            return;
        }

        self.cells.reserve(self.size());
        let dimensions = self.dimensions;
        for pos in self.iter() {
            let _ = self.cells.insert(pos, Cell::unchecked(pos, dimensions));
        }
    }

    /// The grid's own cell at `pos`, populating the grid on first use.
    pub fn cell(&mut self, pos: Position) -> Result<&Cell> {
        if !self.is_valid_position(pos) {
            bail!(ErrorKind::InvalidPosition(pos));
        }
        self.populate_cells();
        self.cells.get(&pos).ok_or_else(|| ErrorKind::InvalidPosition(pos).into())
    }

    /// Looks up a cell without populating the grid.
    #[inline]
    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// All populated cells, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    #[inline]
    pub fn cells_count(&self) -> usize {
        self.cells.len()
    }

    /// Positions next to `pos` whose cells have not been visited yet.
    pub fn unvisited_neighbours(&self, pos: Position) -> PositionSmallVec {
        cells::neighbour_positions(pos, self.dimensions)
            .into_iter()
            .filter(|neighbour| self.get_cell(*neighbour).map_or(false, |c| !c.is_visited()))
            .collect()
    }

    /// Flags the cell at `pos` as visited. Returns true if it was not visited before.
    ///
    /// Marking cells ahead of generation blocks them out of the traversal.
    pub fn mark_visited(&mut self, pos: Position) -> Result<bool> {
        if !self.is_valid_position(pos) {
            bail!(ErrorKind::InvalidPosition(pos));
        }
        self.populate_cells();
        self.cells
            .get_mut(&pos)
            .map(Cell::visit)
            .ok_or_else(|| ErrorKind::InvalidPosition(pos).into())
    }

    /// The first unvisited cell in row major order.
    pub fn any_unvisited(&self) -> Option<&Cell> {
        self.iter()
            .filter_map(|pos| self.get_cell(pos))
            .find(|c| !c.is_visited())
    }

    pub fn unvisited_count(&self) -> usize {
        self.cells.values().filter(|c| !c.is_visited()).count()
    }

    pub fn walls_built(&self) -> bool {
        self.walls.node_count() > 0
    }

    /// Creates a closed wall between every pair of adjacent cells.
    ///
    /// Every cell offers a wall to each of its neighbours; a wall already in the pool, from
    /// either side, is not added twice. Does nothing once the walls are built.
    pub fn build_walls(&mut self) -> Result<()> {
        if self.walls_built() {
            return Ok(());
        }
        self.populate_cells();

        let (NodesCount(nodes), EdgesCount(edges)) = (self.dimensions.size(),
                                                      self.dimensions.edges_count());
        self.walls = UnGraph::with_capacity(nodes, edges);
        for _ in 0..nodes {
            let _ = self.walls.add_node(());
        }

        let dimensions = self.dimensions;
        for pos in self.iter() {
            for neighbour in cells::neighbour_positions(pos, dimensions) {
                let _ = self.append_wall(pos, neighbour)?;
            }
        }

        log::debug!("built {} walls for a {}x{} grid",
                    self.walls.edge_count(),
                    self.rows().0,
                    self.columns().0);
        Ok(())
    }

    /// Adds a closed wall between `a` and `b` unless the pool already has one.
    /// Returns true if a wall was added.
    fn append_wall(&mut self, a: Position, b: Position) -> Result<bool> {
        let key = WallKey::new(a, b, self.dimensions)?;
        let (a_index, b_index) = (self.node_index(a), self.node_index(b));
        if self.walls.find_edge(a_index, b_index).is_some() {
            Ok(false)
        } else {
            let _ = self.walls.add_edge(a_index, b_index, Wall::new(key));
            Ok(true)
        }
    }

    /// The wall separating two adjacent positions, in either order.
    pub fn wall_between(&self, a: Position, b: Position) -> Result<&Wall> {
        let _ = WallKey::new(a, b, self.dimensions)?;
        if !self.walls_built() {
            bail!(ErrorKind::WallNotFound(a, b));
        }
        self.walls
            .find_edge(self.node_index(a), self.node_index(b))
            .and_then(|edge| self.walls.edge_weight(edge))
            .ok_or_else(|| ErrorKind::WallNotFound(a, b).into())
    }

    pub(crate) fn wall_between_mut(&mut self, a: Position, b: Position) -> Result<&mut Wall> {
        let _ = WallKey::new(a, b, self.dimensions)?;
        if !self.walls_built() {
            bail!(ErrorKind::WallNotFound(a, b));
        }
        let edge = self.walls.find_edge(self.node_index(a), self.node_index(b));
        edge.and_then(move |edge| self.walls.edge_weight_mut(edge))
            .ok_or_else(|| ErrorKind::WallNotFound(a, b).into())
    }

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.raw_edges().iter().map(|edge| &edge.weight)
    }

    #[inline]
    pub fn walls_count(&self) -> usize {
        self.walls.edge_count()
    }

    pub fn open_walls_count(&self) -> usize {
        self.walls().filter(|wall| wall.is_open()).count()
    }

    /// Positions reachable from `start` by passing only through open walls, `start` included.
    pub fn open_region(&self, start: Position) -> Result<FnvHashSet<Position>> {
        if !self.is_valid_position(start) {
            bail!(ErrorKind::InvalidPosition(start));
        }

        let mut region = FnvHashSet::default();
        let mut frontier = VecDeque::new();
        let _ = region.insert(start);
        frontier.push_back(start);

        while let Some(pos) = frontier.pop_front() {
            for neighbour in cells::neighbour_positions(pos, self.dimensions) {
                let passable = self.wall_between(pos, neighbour).map_or(false, Wall::is_open);
                if passable && region.insert(neighbour) {
                    frontier.push_back(neighbour);
                }
            }
        }

        Ok(region)
    }

    /// Carves a maze into the grid with the recursive backtracker, starting at `start`.
    pub fn generate<R: Rng + ?Sized>(&mut self,
                                     start: Position,
                                     rng: &mut R)
                                     -> Result<Generation> {
        generators::recursive_backtracker(self, start, rng, &BacktrackerConfig::default())
    }

    #[inline]
    fn node_index(&self, pos: Position) -> NodeIndex {
        NodeIndex::new(pos.row_major_index(self.columns()))
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;
    use quickcheck::quickcheck;

    fn grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns)).expect("valid dimensions")
    }

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(Grid::new(RowsCount(0), ColumnsCount(8)).is_err());
    }

    #[test]
    fn grid_too_large_for_the_wall_pool_is_rejected() {
        assert!(Grid::new(RowsCount(usize::MAX / 2), ColumnsCount(usize::MAX / 2)).is_err());
        assert!(Grid::new(RowsCount(1 << 16), ColumnsCount(1 << 16)).is_err());
    }

    #[test]
    fn populate_cells() {
        let mut g = grid(6, 8);
        assert!(!g.is_populated());
        g.populate_cells();
        assert_eq!(g.cells_count(), 6 * 8);
        assert!(g.cells().all(|c| !c.is_visited()));
    }

    #[test]
    fn populating_twice_keeps_cell_state() {
        let mut g = grid(2, 2);
        assert!(g.mark_visited(p(1, 1)).unwrap());
        g.populate_cells();
        assert_eq!(g.cells_count(), 4);
        assert!(g.get_cell(p(1, 1)).unwrap().is_visited());
    }

    #[test]
    fn grid_rows_and_columns() {
        let g = grid(6, 8);
        let rows = g.iter_row().collect::<Vec<_>>();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].len(), 8);
    }

    #[test]
    fn cell_lookup_populates_lazily() {
        let mut g = grid(6, 8);
        let expected = Cell::new(p(4, 3), g.dimensions()).unwrap();
        assert_eq!(*g.cell(p(4, 3)).unwrap(), expected);
        assert_eq!(g.cells_count(), 48);
    }

    #[test]
    fn invalid_cell_lookup() {
        let mut g = grid(6, 8);
        let err = g.cell(p(6, 8)).expect_err("position outside grid");
        match *err.kind() {
            ErrorKind::InvalidPosition(pos) => assert_eq!(pos, p(6, 8)),
            ref other => panic!("unexpected error {:?}", other),
        }
        assert!(g.get_cell(p(0, 0)).is_none());
    }

    #[test]
    fn neighbours_resolve_to_grid_cells() {
        let mut g = grid(6, 8);
        g.populate_cells();
        assert!(g.mark_visited(p(4, 7)).unwrap());

        let corner = g.get_cell(p(5, 7)).unwrap();
        let neighbours = corner.neighbours(&g);
        let positions = neighbours.iter().map(|c| c.position()).sorted().collect::<Vec<_>>();
        assert_eq!(positions, vec![p(4, 7), p(5, 6)]);

        // the visited flag proves the lookup returned the grid's own cell
        let above = neighbours.iter().find(|c| c.position() == p(4, 7)).unwrap();
        assert!(above.is_visited());
    }

    #[test]
    fn neighbours_of_unpopulated_grid_are_empty() {
        let g = grid(6, 8);
        let c = Cell::new(p(4, 5), g.dimensions()).unwrap();
        assert!(c.neighbours(&g).is_empty());
        assert_eq!(c.neighbour_positions().len(), 4);
    }

    #[test]
    fn build_walls_creates_one_wall_per_edge() {
        let mut g = grid(6, 8);
        g.build_walls().unwrap();
        assert_eq!(g.walls_count(), 6 * 7 + 8 * 5);
        assert!(g.walls().all(Wall::is_closed));
        assert_eq!(g.walls().unique().count(), g.walls_count());
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn build_walls_is_idempotent() {
        let mut g = grid(3, 4);
        g.build_walls().unwrap();
        g.build_walls().unwrap();
        assert_eq!(g.walls_count(), 3 * 3 + 4 * 2);
    }

    #[test]
    fn single_cell_grid_has_no_walls() {
        let mut g = grid(1, 1);
        g.build_walls().unwrap();
        assert!(g.walls_built());
        assert_eq!(g.walls_count(), 0);
    }

    #[test]
    fn wall_between_either_order() {
        let mut g = grid(6, 8);
        g.build_walls().unwrap();

        let down = g.wall_between(p(4, 5), p(5, 5)).unwrap();
        let up = g.wall_between(p(5, 5), p(4, 5)).unwrap();
        assert_eq!(down, up);
        assert_eq!(down.positions(), (p(4, 5), p(5, 5)));
        assert!(down.is_closed());
    }

    #[test]
    fn wall_between_before_walls_are_built() {
        let g = grid(6, 8);
        let err = g.wall_between(p(4, 5), p(5, 5)).expect_err("no walls yet");
        match *err.kind() {
            ErrorKind::WallNotFound(a, b) => assert_eq!((a, b), (p(4, 5), p(5, 5))),
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn wall_between_invalid_positions() {
        let mut g = grid(6, 8);
        g.build_walls().unwrap();

        match *g.wall_between(p(4, 5), p(5, 6)).unwrap_err().kind() {
            ErrorKind::NonAdjacent(..) => {}
            ref other => panic!("unexpected error {:?}", other),
        }
        match *g.wall_between(p(5, 7), p(6, 7)).unwrap_err().kind() {
            ErrorKind::InvalidPosition(pos) => assert_eq!(pos, p(6, 7)),
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn mark_visited() {
        let mut g = grid(2, 3);
        assert_eq!(g.unvisited_count(), 0);
        assert!(g.mark_visited(p(0, 1)).unwrap());
        assert!(!g.mark_visited(p(0, 1)).unwrap());
        assert_eq!(g.unvisited_count(), 5);
        assert!(g.mark_visited(p(2, 0)).is_err());
    }

    #[test]
    fn any_unvisited() {
        let mut g = grid(2, 2);
        assert!(g.any_unvisited().is_none()); // nothing populated yet
        g.populate_cells();
        assert_eq!(g.any_unvisited().map(Cell::position), Some(p(0, 0)));

        for pos in g.iter() {
            let _ = g.mark_visited(pos).unwrap();
        }
        assert!(g.any_unvisited().is_none());
    }

    #[test]
    fn unvisited_neighbours() {
        let mut g = grid(3, 3);
        g.populate_cells();
        let _ = g.mark_visited(p(0, 1)).unwrap();
        assert_eq!(&*g.unvisited_neighbours(p(1, 1)), &[p(2, 1), p(1, 0), p(1, 2)]);
    }

    #[test]
    fn open_region_of_closed_grid_is_the_start() {
        let mut g = grid(3, 3);
        g.build_walls().unwrap();
        let region = g.open_region(p(1, 1)).unwrap();
        assert_eq!(region.len(), 1);
        assert!(region.contains(&p(1, 1)));
    }

    #[test]
    fn open_region_follows_open_walls() {
        let mut g = grid(3, 3);
        g.build_walls().unwrap();
        g.wall_between_mut(p(0, 0), p(0, 1)).unwrap().open();
        g.wall_between_mut(p(1, 1), p(0, 1)).unwrap().open();

        let region = g.open_region(p(0, 0)).unwrap();
        assert_eq!(region.into_iter().sorted().collect::<Vec<_>>(),
                   vec![p(0, 0), p(0, 1), p(1, 1)]);
        assert_eq!(g.open_walls_count(), 2);
    }

    #[test]
    fn quickcheck_walls_count() {
        fn prop(rows: u8, columns: u8) -> bool {
            let (rows, columns) = (rows as usize % 16 + 1, columns as usize % 16 + 1);
            let mut g = grid(rows, columns);
            g.build_walls().unwrap();
            g.walls_count() == rows * (columns - 1) + columns * (rows - 1) &&
            g.walls().unique().count() == g.walls_count()
        }
        quickcheck(prop as fn(u8, u8) -> bool)
    }
}
