//! First-class invariants for a game session.
//!
//! Invariants are logical properties that must hold after every event.
//! The session checks them in debug builds; tests check them directly.

use crate::board::BoardModel;
use crate::dead_end::DeadEndTracker;
use crate::session::GameSession;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for the three-invariant tuple that [`SessionInvariants`] names.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ];
        let violations: Vec<_> = checks
            .into_iter()
            .filter(|(holds, _)| !holds)
            .map(|(_, description)| InvariantViolation::new(description))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: the edge relation is symmetric.
pub struct EdgeSymmetryInvariant;

impl EdgeSymmetryInvariant {
    /// Checks symmetry of every edge between neighbouring cells.
    pub fn check(board: &BoardModel) -> bool {
        board.cells().all(|cell| {
            board
                .neighbors(cell)
                .all(|(_, next)| board.is_taken(cell, next) == board.is_taken(next, cell))
        })
    }
}

impl Invariant<GameSession> for EdgeSymmetryInvariant {
    fn holds(session: &GameSession) -> bool {
        Self::check(session.board())
    }

    fn description() -> &'static str {
        "Edge relation is symmetric"
    }
}

/// Invariant: propagated blacklist entries are real dead ends.
///
/// Every cell blacklisted by propagation (not by a static rule) has at
/// most one open, non-blacklisted neighbour.
pub struct BlacklistSoundInvariant;

impl BlacklistSoundInvariant {
    /// Checks the blacklist against the board.
    pub fn check(board: &BoardModel, blacklist: &DeadEndTracker) -> bool {
        blacklist
            .cells()
            .filter(|(_, reason)| !reason.is_static())
            .all(|(cell, _)| {
                board
                    .open_neighbors(cell)
                    .filter(|(_, next)| !blacklist.is_blacklisted(*next))
                    .count()
                    <= 1
            })
    }
}

impl Invariant<GameSession> for BlacklistSoundInvariant {
    fn holds(session: &GameSession) -> bool {
        Self::check(session.board(), session.blacklist())
    }

    fn description() -> &'static str {
        "Propagated blacklist cells have at most one clear exit"
    }
}

/// Invariant: the puck is on the board or inside a goal mouth.
pub struct PuckPlacementInvariant;

impl Invariant<GameSession> for PuckPlacementInvariant {
    fn holds(session: &GameSession) -> bool {
        match session.puck() {
            Some(cell) => {
                session.config().contains(cell) || session.config().is_goal_cell(cell)
            }
            None => true,
        }
    }

    fn description() -> &'static str {
        "Puck is on the board or in a goal mouth"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    EdgeSymmetryInvariant,
    BlacklistSoundInvariant,
    PuckPlacementInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dead_end::BlacklistReason;
    use crate::event::ServerEvent;
    use crate::types::{BoardConfig, Cell, GoalSide};

    #[test]
    fn test_invariant_set_holds_for_new_session() {
        let session = GameSession::new("Kek1", BoardConfig::default()).unwrap();
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_events() {
        let mut session = GameSession::new("Kek1", BoardConfig::default()).unwrap();
        session
            .handle(ServerEvent::GoalAssigned {
                side: GoalSide::South,
                turn: 0,
            })
            .unwrap();
        session
            .handle(ServerEvent::BallAt {
                cell: Cell::new(7, 7),
                turn: 1,
            })
            .unwrap();
        session
            .handle(ServerEvent::ActivePlayer {
                name: "Kek1".to_string(),
                turn: 2,
            })
            .unwrap();
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_blacklist_soundness_detects_bogus_corridor() {
        let config = BoardConfig::default();
        let board = BoardModel::new(config);
        let mut blacklist = DeadEndTracker::new(config);
        blacklist.mark(Cell::new(5, 5), BlacklistReason::Corridor);
        assert!(!BlacklistSoundInvariant::check(&board, &blacklist));

        let mut statics = DeadEndTracker::new(config);
        statics.mark(Cell::new(5, 5), BlacklistReason::Center);
        assert!(BlacklistSoundInvariant::check(&board, &statics));
    }

    struct Holds;
    struct Broken;

    impl Invariant<u8> for Holds {
        fn holds(_: &u8) -> bool {
            true
        }

        fn description() -> &'static str {
            "always holds"
        }
    }

    impl Invariant<u8> for Broken {
        fn holds(_: &u8) -> bool {
            false
        }

        fn description() -> &'static str {
            "never holds"
        }
    }

    #[test]
    fn test_check_all_collects_every_violation() {
        assert!(<(Holds, Holds, Holds)>::check_all(&0u8).is_ok());

        let violations = <(Broken, Holds, Broken)>::check_all(&0u8).unwrap_err();
        assert_eq!(
            violations,
            vec![
                InvariantViolation::new("never holds"),
                InvariantViolation::new("never holds"),
            ]
        );
    }
}
