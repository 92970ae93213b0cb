//! Move selection strategies.

use crate::board::BoardModel;
use crate::dead_end::DeadEndTracker;
use crate::error::SelectError;
use crate::funnel;
use crate::types::{Cell, Direction, GoalState, PickupState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, instrument, warn};

/// A move as sent to the server.
///
/// Moves are domain values: they can be logged, compared in tests and
/// rendered to the wire form with `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Direction the puck travels.
    pub direction: Direction,
    /// Whether the move spends the held power-up.
    pub power: bool,
}

impl Move {
    /// A plain move in `direction`.
    pub fn plain(direction: Direction) -> Self {
        Self {
            direction,
            power: false,
        }
    }

    /// A power move in `direction`.
    pub fn power(direction: Direction) -> Self {
        Self {
            direction,
            power: true,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.power {
            write!(f, "power {}", self.direction)
        } else {
            write!(f, "{}", self.direction)
        }
    }
}

/// Everything a strategy may look at on its turn.
#[derive(Debug, Clone, Copy, derive_new::new)]
pub struct TurnContext<'a> {
    /// Board with its taken edges.
    pub board: &'a BoardModel,
    /// Current blacklist, already refreshed.
    pub blacklist: &'a DeadEndTracker,
    /// Cell the puck is on.
    pub puck: Cell,
    /// Goal this client scores into.
    pub goal: &'a GoalState,
    /// Pickup position and held power-up.
    pub pickup: &'a PickupState,
}

impl TurnContext<'_> {
    /// Whether a power-up is available to spend.
    pub fn power_held(&self) -> bool {
        self.pickup.held
    }

    /// Distance of a candidate cell to the nearest objective.
    ///
    /// The objective is the goal target, or the pickup if that is closer.
    pub fn score(&self, cell: Cell) -> u32 {
        let to_goal = cell.manhattan(*self.goal.target());
        match self.pickup.position {
            Some(pickup) => to_goal.min(cell.manhattan(pickup)),
            None => to_goal,
        }
    }

    fn open_moves(&self) -> Result<Vec<(Direction, Cell)>, SelectError> {
        let open: Vec<_> = self.board.open_neighbors(self.puck).collect();
        if open.is_empty() {
            return Err(SelectError::NoLegalMove { from: self.puck });
        }
        Ok(open)
    }
}

/// Something that can pick a move on its turn.
pub trait Strategy: Send {
    /// Picks a move for the current turn.
    fn choose(&mut self, turn: &TurnContext<'_>) -> Result<Move, SelectError>;

    /// Returns the strategy name, for logs.
    fn name(&self) -> &str;
}

/// Heuristic selector: funnel table first, then the closest safe neighbour.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveSelector;

impl MoveSelector {
    /// Creates a heuristic selector.
    pub fn new() -> Self {
        Self
    }

    /// Picks the best legal move.
    ///
    /// 1. A funnel table move, if one applies and its edge is open.
    /// 2. The open, non-blacklisted neighbour closest to the objective,
    ///    ties going to the earliest direction in canonical order.
    /// 3. Otherwise the closest blacklisted neighbour, spending a held
    ///    power-up on it when it still has a clear exit.
    #[instrument(skip_all, fields(puck = %turn.puck, power = turn.power_held()))]
    pub fn select(&self, turn: &TurnContext<'_>) -> Result<Move, SelectError> {
        let config = turn.board.config();
        let table = funnel::lookup(turn.puck, turn.goal, config, turn.power_held());
        if let Some(mv) = table
            .into_iter()
            .find(|mv| turn.board.can_move(turn.puck, mv.direction))
        {
            debug!(%mv, "Funnel rule applies");
            return Ok(mv);
        }

        let open = turn.open_moves()?;

        let safe = open
            .iter()
            .filter(|(_, cell)| !turn.blacklist.is_blacklisted(*cell))
            .min_by_key(|(_, cell)| turn.score(*cell));
        if let Some(&(direction, cell)) = safe {
            debug!(%direction, %cell, score = turn.score(cell), "Safe move");
            return Ok(Move::plain(direction));
        }

        let Some(&(direction, cell)) = open.iter().min_by_key(|(_, cell)| turn.score(*cell)) else {
            return Err(SelectError::NoLegalMove { from: turn.puck });
        };
        let burn = turn.power_held() && turn.blacklist.has_escape(turn.board, cell, turn.puck);
        warn!(%direction, %cell, burn, "No safe move, entering a blacklisted cell");
        Ok(Move {
            direction,
            power: burn,
        })
    }
}

impl Strategy for MoveSelector {
    fn choose(&mut self, turn: &TurnContext<'_>) -> Result<Move, SelectError> {
        self.select(turn)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Baseline player: a random safe neighbour, or any open one.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Creates a selector seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a selector with a fixed seed, for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomSelector {
    #[instrument(skip_all, fields(puck = %turn.puck))]
    fn choose(&mut self, turn: &TurnContext<'_>) -> Result<Move, SelectError> {
        let open = turn.open_moves()?;
        let safe: Vec<_> = open
            .iter()
            .copied()
            .filter(|(_, cell)| !turn.blacklist.is_blacklisted(*cell))
            .collect();
        let pool = if safe.is_empty() { &open } else { &safe };

        let (direction, cell) = *pool
            .choose(&mut self.rng)
            .ok_or(SelectError::NoLegalMove { from: turn.puck })?;
        debug!(%direction, %cell, safe = !safe.is_empty(), "Random move");
        Ok(Move::plain(direction))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_wire_form() {
        assert_eq!(Move::plain(Direction::South).to_string(), "south");
        assert_eq!(Move::power(Direction::NorthWest).to_string(), "power north west");
    }
}
