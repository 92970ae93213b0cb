//! Core domain types for the hockey board.

use crate::error::BoardConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::instrument;

/// A cell on the board, addressed by row and column.
///
/// Coordinates are signed so that a goal target sitting just outside
/// the board (row `-1` or row `N`) uses the same type as a board cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new,
)]
pub struct Cell {
    /// Row index, growing southward.
    pub row: i32,
    /// Column index, growing eastward.
    pub col: i32,
}

impl Cell {
    /// Returns the cell one step away in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (drow, dcol) = direction.delta();
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the eight directions the puck can travel.
///
/// Declaration order is the canonical enumeration order, which
/// decides ties during move selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    /// Toward row 0.
    #[strum(to_string = "north")]
    North,
    /// Toward row 0 and the last column.
    #[strum(to_string = "north east", serialize = "north-east", serialize = "northeast")]
    NorthEast,
    /// Toward the last column.
    #[strum(to_string = "east")]
    East,
    /// Toward the last row and the last column.
    #[strum(to_string = "south east", serialize = "south-east", serialize = "southeast")]
    SouthEast,
    /// Toward the last row.
    #[strum(to_string = "south")]
    South,
    /// Toward the last row and column 0.
    #[strum(to_string = "south west", serialize = "south-west", serialize = "southwest")]
    SouthWest,
    /// Toward column 0.
    #[strum(to_string = "west")]
    West,
    /// Toward row 0 and column 0.
    #[strum(to_string = "north west", serialize = "north-west", serialize = "northwest")]
    NorthWest,
}

impl Direction {
    /// Unit `(row, col)` delta of this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Reflects the direction across the horizontal axis (north <-> south).
    pub fn flip_vertical(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthEast,
            Direction::East => Direction::East,
            Direction::SouthEast => Direction::NorthEast,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthWest,
            Direction::West => Direction::West,
            Direction::NorthWest => Direction::SouthWest,
        }
    }

    /// Reflects the direction across the vertical axis (east <-> west).
    pub fn flip_horizontal(self) -> Self {
        match self {
            Direction::North => Direction::North,
            Direction::NorthEast => Direction::NorthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::SouthWest,
            Direction::South => Direction::South,
            Direction::SouthWest => Direction::SouthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::NorthEast,
        }
    }
}

/// Side of the board a goal sits on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GoalSide {
    /// Beyond row 0.
    North,
    /// Beyond row `N - 1`.
    South,
}

impl GoalSide {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            GoalSide::North => GoalSide::South,
            GoalSide::South => GoalSide::North,
        }
    }
}

/// Board geometry for one game variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of rows and columns (odd).
    #[serde(default = "default_size")]
    size: usize,

    /// Columns on each side of the center column that belong to the goal mouth.
    #[serde(default = "default_mouth_half_width")]
    mouth_half_width: usize,
}

fn default_size() -> usize {
    15
}

fn default_mouth_half_width() -> usize {
    1
}

/// Largest supported board. The edge matrix holds `(N*N)^2` flags.
pub const MAX_BOARD_SIZE: usize = 25;

impl BoardConfig {
    /// Creates a board configuration (unvalidated, see [`BoardConfig::validate`]).
    pub fn new(size: usize, mouth_half_width: usize) -> Self {
        Self {
            size,
            mouth_half_width,
        }
    }

    /// The 11x11 board of the early tournament rounds.
    pub fn classic() -> Self {
        Self::new(11, 1)
    }

    /// Checks that the geometry can host a game.
    #[instrument]
    pub fn validate(self) -> Result<Self, BoardConfigError> {
        if self.size < 5 {
            return Err(BoardConfigError::new(format!(
                "board size {} is too small (minimum 5)",
                self.size
            )));
        }
        if self.size > MAX_BOARD_SIZE {
            return Err(BoardConfigError::new(format!(
                "board size {} is too large (maximum {})",
                self.size, MAX_BOARD_SIZE
            )));
        }
        if self.size % 2 == 0 {
            return Err(BoardConfigError::new(format!(
                "board size {} must be odd to have a center column",
                self.size
            )));
        }
        let mouth_width = self
            .mouth_half_width
            .checked_mul(2)
            .and_then(|w| w.checked_add(1));
        if mouth_width.is_none_or(|w| w > self.size - 4) {
            return Err(BoardConfigError::new(format!(
                "goal mouth of half-width {} does not fit a {}x{} board",
                self.mouth_half_width, self.size, self.size
            )));
        }
        Ok(self)
    }

    /// Board size as a signed coordinate bound.
    pub fn side_len(&self) -> i32 {
        self.size as i32
    }

    /// Index of the center row and column.
    pub fn center(&self) -> i32 {
        self.side_len() / 2
    }

    /// Center cell of the board.
    pub fn center_cell(&self) -> Cell {
        Cell::new(self.center(), self.center())
    }

    /// Columns forming the goal opening.
    pub fn mouth(&self) -> RangeInclusive<i32> {
        let h = self.mouth_half_width as i32;
        (self.center() - h)..=(self.center() + h)
    }

    /// Whether the cell lies on the board.
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.side_len()).contains(&cell.row) && (0..self.side_len()).contains(&cell.col)
    }

    /// Whether the cell lies on the outer ring of the board.
    pub fn is_boundary(&self, cell: Cell) -> bool {
        let last = self.side_len() - 1;
        self.contains(cell)
            && (cell.row == 0 || cell.row == last || cell.col == 0 || cell.col == last)
    }

    /// Whether the cell is one row past the board edge, inside a goal mouth.
    pub fn is_goal_cell(&self, cell: Cell) -> bool {
        (cell.row == -1 || cell.row == self.side_len()) && self.mouth().contains(&cell.col)
    }

    /// Board row that borders the goal on the given side.
    pub fn edge_row(&self, side: GoalSide) -> i32 {
        match side {
            GoalSide::North => 0,
            GoalSide::South => self.side_len() - 1,
        }
    }

    /// Row step pointing from the goal edge on `side` into the board.
    pub fn inward(&self, side: GoalSide) -> i32 {
        match side {
            GoalSide::North => 1,
            GoalSide::South => -1,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(default_size(), default_mouth_half_width())
    }
}

/// The goal this client scores into.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GoalState {
    /// Side of the board the goal is on.
    side: GoalSide,
    /// Cell just outside the board at the center of the goal.
    target: Cell,
    /// Columns forming the goal opening.
    mouth: RangeInclusive<i32>,
}

impl GoalState {
    /// Builds the goal state for scoring on `side`.
    #[instrument]
    pub fn facing(side: GoalSide, config: &BoardConfig) -> Self {
        let row = match side {
            GoalSide::North => -1,
            GoalSide::South => config.side_len(),
        };
        Self {
            side,
            target: Cell::new(row, config.center()),
            mouth: config.mouth(),
        }
    }

    /// Swaps the goal side, mirroring the target across the row midpoint.
    #[instrument(skip(self))]
    pub fn invert(&mut self, config: &BoardConfig) {
        self.side = self.side.opposite();
        self.target.row = config.side_len() - 1 - self.target.row;
    }

    /// Number of rows between the cell and the board edge next to this goal.
    pub fn depth_of(&self, cell: Cell, config: &BoardConfig) -> i32 {
        (cell.row - config.edge_row(self.side)).abs()
    }
}

/// The power-up pickup, as far as this client knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickupState {
    /// Cell of the pickup on the board, if one is placed.
    pub position: Option<Cell>,
    /// Whether this client holds an unspent power-up.
    pub held: bool,
}
