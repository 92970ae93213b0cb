//! Board model: cells, traversed edges and visit stamps.

use crate::types::{BoardConfig, Cell, Direction};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, trace};

/// Grid of cells plus the symmetric "edge taken" relation.
///
/// Edges are stored as a flat `(N*N) x (N*N)` matrix. Once an edge is
/// taken it stays taken for the rest of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardModel {
    config: BoardConfig,
    taken: Vec<bool>,
    visits: Vec<Option<u32>>,
}

impl BoardModel {
    /// Creates a board with its outer walls already in place.
    ///
    /// Every edge along the four sides is taken, except the row edges
    /// whose two endpoints both lie in a goal mouth.
    #[instrument]
    pub fn new(config: BoardConfig) -> Self {
        let cells = config.size() * config.size();
        let mut board = Self {
            config,
            taken: vec![false; cells * cells],
            visits: vec![None; cells],
        };
        board.build_walls();
        board
    }

    fn build_walls(&mut self) {
        let last = self.config.side_len() - 1;
        let mouth = self.config.mouth();

        for j in 0..last {
            if !(mouth.contains(&j) && mouth.contains(&(j + 1))) {
                self.mark_traversed(Cell::new(0, j), Cell::new(0, j + 1));
                self.mark_traversed(Cell::new(last, j), Cell::new(last, j + 1));
            }
        }
        for i in 0..last {
            self.mark_traversed(Cell::new(i, 0), Cell::new(i + 1, 0));
            self.mark_traversed(Cell::new(i, last), Cell::new(i + 1, last));
        }
    }

    /// Returns the board geometry.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Whether the cell lies on the board.
    pub fn contains(&self, cell: Cell) -> bool {
        self.config.contains(cell)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.row as usize * self.config.size() + cell.col as usize)
    }

    fn edge_index(&self, a: Cell, b: Cell) -> Option<usize> {
        let cells = self.config.size() * self.config.size();
        Some(self.index(a)? * cells + self.index(b)?)
    }

    /// All on-board cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let n = self.config.side_len();
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(row, col)))
    }

    /// On-board neighbours of a cell, in canonical direction order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::iter()
            .map(move |direction| (direction, cell.step(direction)))
            .filter(move |(_, next)| self.contains(*next))
    }

    /// Neighbours still reachable through an untaken edge.
    ///
    /// This is the only legal-move generator.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        self.neighbors(cell)
            .filter(move |(_, next)| !self.is_taken(cell, *next))
    }

    /// Whether the edge between two cells has been taken.
    ///
    /// A pair with an off-board endpoint has no edge and is never taken.
    pub fn is_taken(&self, a: Cell, b: Cell) -> bool {
        self.edge_index(a, b)
            .map(|idx| self.taken[idx])
            .unwrap_or(false)
    }

    /// Closes the edge between two cells, in both directions.
    pub fn mark_traversed(&mut self, a: Cell, b: Cell) {
        match (self.edge_index(a, b), self.edge_index(b, a)) {
            (Some(ab), Some(ba)) => {
                self.taken[ab] = true;
                self.taken[ba] = true;
                trace!(%a, %b, "Edge taken");
            }
            _ => debug!(%a, %b, "No edge to take (off-board endpoint)"),
        }
    }

    /// Whether the puck at `from` may travel in `direction`.
    ///
    /// True for an untaken edge to an on-board cell, and for a scoring
    /// step into a goal mouth.
    pub fn can_move(&self, from: Cell, direction: Direction) -> bool {
        let to = from.step(direction);
        if self.contains(to) {
            self.contains(from) && !self.is_taken(from, to)
        } else {
            self.contains(from) && self.config.is_goal_cell(to)
        }
    }

    /// Records the turn stamp at which the puck first reached a cell.
    pub fn visit(&mut self, cell: Cell, stamp: u32) {
        if let Some(idx) = self.index(cell) {
            self.visits[idx].get_or_insert(stamp);
        }
    }

    /// Turn stamp of the first visit, `None` if never visited.
    pub fn visit_of(&self, cell: Cell) -> Option<u32> {
        self.index(cell).and_then(|idx| self.visits[idx])
    }

    /// Whether the puck has been on this cell.
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visit_of(cell).is_some()
    }

    /// Draws the board, one row per line.
    ///
    /// `@` puck, `$` pickup, `x` blacklisted, `o` visited, `.` fresh.
    pub fn render(
        &self,
        puck: Option<Cell>,
        pickup: Option<Cell>,
        blacklisted: impl Fn(Cell) -> bool,
    ) -> String {
        let n = self.config.side_len();
        let mut out = String::with_capacity((n * (n + 1)) as usize);
        for row in 0..n {
            for col in 0..n {
                let cell = Cell::new(row, col);
                let symbol = if Some(cell) == puck {
                    '@'
                } else if Some(cell) == pickup {
                    '$'
                } else if blacklisted(cell) {
                    'x'
                } else if self.is_visited(cell) {
                    'o'
                } else {
                    '.'
                };
                out.push(symbol);
            }
            if row < n - 1 {
                out.push('\n');
            }
        }
        out
    }
}
