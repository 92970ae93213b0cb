//! Dead-end elimination ("blacklist") over the board graph.
//!
//! A cell is blacklisted when the rules forbid it, or when entering it
//! commits the puck to a chain of cells that each have at most one way
//! out. Such chains are found by propagating backward from cells that
//! are already unsafe.

use crate::board::BoardModel;
use crate::types::{BoardConfig, Cell, GoalState, PickupState};
use tracing::{debug, instrument, trace};

/// Why a cell was blacklisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum BlacklistReason {
    /// One of the four board corners.
    Corner,
    /// The exact board center.
    Center,
    /// In front of the goal mouth the opponent scores into.
    GoalTrap,
    /// Unvisited neighbour of the pickup.
    PickupApproach,
    /// Boundary cell left with a single open edge.
    Border,
    /// Cell with at most one remaining exit toward an unsafe cell.
    Corridor,
}

impl BlacklistReason {
    /// Whether the reason comes from the static rule set rather than propagation.
    pub fn is_static(self) -> bool {
        matches!(
            self,
            BlacklistReason::Corner
                | BlacklistReason::Center
                | BlacklistReason::GoalTrap
                | BlacklistReason::PickupApproach
        )
    }
}

/// Tracks the set of cells the puck should not be moved into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadEndTracker {
    config: BoardConfig,
    marks: Vec<Option<BlacklistReason>>,
}

impl DeadEndTracker {
    /// Creates an empty tracker for the given board geometry.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            marks: vec![None; config.size() * config.size()],
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.config
            .contains(cell)
            .then(|| cell.row as usize * self.config.size() + cell.col as usize)
    }

    /// Whether the cell is blacklisted. Off-board cells never are.
    pub fn is_blacklisted(&self, cell: Cell) -> bool {
        self.reason(cell).is_some()
    }

    /// Reason the cell was blacklisted, if it is.
    pub fn reason(&self, cell: Cell) -> Option<BlacklistReason> {
        self.index(cell).and_then(|idx| self.marks[idx])
    }

    /// Blacklisted cells with their reasons, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, BlacklistReason)> + '_ {
        let n = self.config.size();
        self.marks.iter().enumerate().filter_map(move |(idx, mark)| {
            mark.map(|reason| (Cell::new((idx / n) as i32, (idx % n) as i32), reason))
        })
    }

    /// Number of blacklisted cells.
    pub fn len(&self) -> usize {
        self.marks.iter().filter(|m| m.is_some()).count()
    }

    /// Whether no cell is blacklisted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blacklists a cell, keeping the first reason it was given.
    ///
    /// Returns `true` if the cell was clear before.
    pub fn mark(&mut self, cell: Cell, reason: BlacklistReason) -> bool {
        match self.index(cell) {
            Some(idx) if self.marks[idx].is_none() => {
                self.marks[idx] = Some(reason);
                true
            }
            _ => false,
        }
    }

    /// Resets the blacklist to the static rule set.
    ///
    /// Must be rerun whenever the goal side or the pickup changes, since
    /// both feed the static rules.
    #[instrument(skip_all, fields(goal = %goal.side(), pickup = ?pickup.position))]
    pub fn init(&mut self, board: &BoardModel, goal: &GoalState, pickup: &PickupState) {
        self.marks.iter_mut().for_each(|m| *m = None);

        let last = self.config.side_len() - 1;
        for corner in [
            Cell::new(0, 0),
            Cell::new(0, last),
            Cell::new(last, 0),
            Cell::new(last, last),
        ] {
            self.mark(corner, BlacklistReason::Corner);
        }
        self.mark(self.config.center_cell(), BlacklistReason::Center);

        // The cluster guards the mouth on the opposite side of our target.
        let trap_side = goal.side().opposite();
        let edge = self.config.edge_row(trap_side);
        let front = edge + self.config.inward(trap_side);
        let center = self.config.center();
        let reach = *self.config.mouth_half_width() as i32 + 1;
        self.mark(Cell::new(edge, center), BlacklistReason::GoalTrap);
        for col in (center - reach)..=(center + reach) {
            self.mark(Cell::new(front, col), BlacklistReason::GoalTrap);
        }

        if let Some(pickup_cell) = pickup.position {
            let fresh: Vec<Cell> = board
                .neighbors(pickup_cell)
                .map(|(_, cell)| cell)
                .filter(|cell| !board.is_visited(*cell))
                .collect();
            for cell in fresh {
                self.mark(cell, BlacklistReason::PickupApproach);
            }
        }

        debug!(count = self.len(), "Blacklist initialized");
    }

    /// Propagates the blacklist after the edge relation changed.
    ///
    /// First sweeps boundary cells that have a single open edge, then
    /// runs [`DeadEndTracker::spread`] from every open, clear neighbour
    /// of every blacklisted cell. Returns the number of cells added.
    #[instrument(skip_all)]
    pub fn refresh(&mut self, board: &BoardModel) -> usize {
        let before = self.len();
        self.scan_border(board);

        let seeds: Vec<Cell> = self.cells().map(|(cell, _)| cell).collect();
        for unsafe_cell in seeds {
            let clear: Vec<Cell> = board
                .open_neighbors(unsafe_cell)
                .map(|(_, cell)| cell)
                .filter(|cell| !self.is_blacklisted(*cell))
                .collect();
            for cell in clear {
                self.spread(board, cell, unsafe_cell);
            }
        }

        let added = self.len() - before;
        debug!(added, total = self.len(), "Blacklist refreshed");
        added
    }

    fn scan_border(&mut self, board: &BoardModel) {
        let last = self.config.side_len() - 1;
        let mouth = self.config.mouth();
        let lonely: Vec<Cell> = board
            .cells()
            .filter(|cell| self.config.is_boundary(*cell))
            .filter(|cell| !((cell.row == 0 || cell.row == last) && mouth.contains(&cell.col)))
            .filter(|cell| !self.is_blacklisted(*cell))
            .filter(|cell| board.open_neighbors(*cell).count() == 1)
            .collect();
        for cell in lonely {
            trace!(%cell, "Border cell down to one edge");
            self.mark(cell, BlacklistReason::Border);
        }
    }

    /// Eliminates the forced corridor starting at `start`, entered from `from`.
    ///
    /// A cell whose exits (ignoring `from` and blacklisted cells) number
    /// zero or one is blacklisted; with exactly one exit the walk
    /// continues there. Each step blacklists a clear cell, so the walk
    /// ends within the number of cells on the board. Returns the number
    /// of cells blacklisted.
    pub fn spread(&mut self, board: &BoardModel, start: Cell, from: Cell) -> usize {
        let mut marked = 0;
        let mut work = vec![(start, from)];

        while let Some((cell, exclude)) = work.pop() {
            if self.is_blacklisted(cell) {
                continue;
            }
            let exits: Vec<Cell> = board
                .open_neighbors(cell)
                .map(|(_, next)| next)
                .filter(|next| *next != exclude && !self.is_blacklisted(*next))
                .collect();

            match exits.as_slice() {
                [] => {
                    trace!(%cell, "Dead end");
                    self.mark(cell, BlacklistReason::Corridor);
                    marked += 1;
                }
                [next] => {
                    trace!(%cell, next = %next, "Forced corridor");
                    self.mark(cell, BlacklistReason::Corridor);
                    marked += 1;
                    work.push((*next, cell));
                }
                _ => {}
            }
        }

        marked
    }

    /// Whether `cell` still has an open, clear exit other than `via`.
    pub fn has_escape(&self, board: &BoardModel, cell: Cell, via: Cell) -> bool {
        board
            .open_neighbors(cell)
            .any(|(_, next)| next != via && !self.is_blacklisted(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GoalSide;

    fn fresh(config: BoardConfig, side: GoalSide) -> (BoardModel, DeadEndTracker, GoalState) {
        let board = BoardModel::new(config);
        let mut tracker = DeadEndTracker::new(config);
        let goal = GoalState::facing(side, &config);
        tracker.init(&board, &goal, &PickupState::default());
        (board, tracker, goal)
    }

    #[test]
    fn test_classic_trap_matches_north_cluster() {
        let (_, tracker, _) = fresh(BoardConfig::classic(), GoalSide::South);
        for cell in [(0, 5), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7)] {
            assert_eq!(
                tracker.reason(Cell::new(cell.0, cell.1)),
                Some(BlacklistReason::GoalTrap),
                "expected {:?} in the trap",
                cell
            );
        }
        assert_eq!(tracker.reason(Cell::new(5, 5)), Some(BlacklistReason::Center));
        assert_eq!(tracker.len(), 4 + 1 + 6);
    }

    #[test]
    fn test_first_reason_is_kept() {
        let mut tracker = DeadEndTracker::new(BoardConfig::default());
        assert!(tracker.mark(Cell::new(3, 3), BlacklistReason::Border));
        assert!(!tracker.mark(Cell::new(3, 3), BlacklistReason::Corridor));
        assert_eq!(tracker.reason(Cell::new(3, 3)), Some(BlacklistReason::Border));
        assert!(!tracker.mark(Cell::new(-1, 3), BlacklistReason::Border));
    }

    #[test]
    fn test_spread_follows_a_corridor_to_its_mouth() {
        let config = BoardConfig::default();
        let mut board = BoardModel::new(config);
        let tracker_seed = Cell::new(4, 4);

        // (4,5) -> (4,6) is a two-cell corridor opening onto (4,7).
        let a = Cell::new(4, 5);
        let b = Cell::new(4, 6);
        let keep_a = [tracker_seed, b];
        let keep_b = [a, Cell::new(4, 7)];
        let a_links: Vec<Cell> = board.neighbors(a).map(|(_, c)| c).collect();
        for n in a_links.into_iter().filter(|n| !keep_a.contains(n)) {
            board.mark_traversed(a, n);
        }
        let b_links: Vec<Cell> = board.neighbors(b).map(|(_, c)| c).collect();
        for n in b_links.into_iter().filter(|n| !keep_b.contains(n)) {
            board.mark_traversed(b, n);
        }

        let mut tracker = DeadEndTracker::new(config);
        tracker.mark(tracker_seed, BlacklistReason::Corner);
        let marked = tracker.spread(&board, a, tracker_seed);

        assert_eq!(marked, 2);
        assert_eq!(tracker.reason(a), Some(BlacklistReason::Corridor));
        assert_eq!(tracker.reason(b), Some(BlacklistReason::Corridor));
        assert!(!tracker.is_blacklisted(Cell::new(4, 7)));
    }

    #[test]
    fn test_has_escape_ignores_the_entry_cell() {
        let config = BoardConfig::default();
        let mut board = BoardModel::new(config);
        let cell = Cell::new(5, 5);
        let via = Cell::new(6, 5);
        let links: Vec<Cell> = board.neighbors(cell).map(|(_, c)| c).collect();
        for n in links.into_iter().filter(|n| *n != via) {
            board.mark_traversed(cell, n);
        }
        let tracker = DeadEndTracker::new(config);
        assert!(!tracker.has_escape(&board, cell, via));
        assert!(tracker.has_escape(&board, via, cell));
    }
}
