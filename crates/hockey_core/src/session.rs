//! Game session: applies server events and answers turns.

use crate::board::BoardModel;
use crate::dead_end::DeadEndTracker;
use crate::error::{BoardConfigError, SessionError};
use crate::event::ServerEvent;
#[cfg(debug_assertions)]
use crate::invariants::{InvariantSet, SessionInvariants};
use crate::selector::{Move, MoveSelector, Strategy, TurnContext};
use crate::types::{BoardConfig, Cell, Direction, GoalSide, GoalState, PickupState};
use tracing::{debug, info, instrument, warn};

/// Phase of a session.
///
/// The goal only exists once the server assigned it, and the winner only
/// once a goal was scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Connected, waiting for `your goal is ...`.
    AwaitingGoalAssignment,
    /// Goal known, moves are tracked and turns answered.
    Playing {
        /// Goal this client scores into.
        goal: GoalState,
    },
    /// A goal was scored. Terminal.
    GameOver {
        /// Name of the player who scored.
        winner: String,
    },
}

impl Phase {
    /// Short name of the phase, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingGoalAssignment => "awaiting goal assignment",
            Phase::Playing { .. } => "playing",
            Phase::GameOver { .. } => "game over",
        }
    }
}

/// One game, as seen by this client.
pub struct GameSession {
    name: String,
    config: BoardConfig,
    board: BoardModel,
    blacklist: DeadEndTracker,
    strategy: Box<dyn Strategy>,
    phase: Phase,
    puck: Option<Cell>,
    pickup: PickupState,
}

impl GameSession {
    /// Creates a session for the player `name` on a board of the given geometry.
    #[instrument(skip(name), fields(player = %name.as_ref()))]
    pub fn new(name: impl AsRef<str>, config: BoardConfig) -> Result<Self, BoardConfigError> {
        let config = config.validate()?;
        info!(size = config.size(), "Creating game session");
        Ok(Self {
            name: name.as_ref().to_string(),
            config,
            board: BoardModel::new(config),
            blacklist: DeadEndTracker::new(config),
            strategy: Box::new(MoveSelector::new()),
            phase: Phase::AwaitingGoalAssignment,
            puck: None,
            pickup: PickupState::default(),
        })
    }

    /// Replaces the move strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Player name this session answers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Board geometry.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Board with its taken edges and visit stamps.
    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    /// Current blacklist.
    pub fn blacklist(&self) -> &DeadEndTracker {
        &self.blacklist
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Goal this client scores into, once assigned.
    pub fn goal(&self) -> Option<&GoalState> {
        match &self.phase {
            Phase::Playing { goal } => Some(goal),
            _ => None,
        }
    }

    /// Last known puck position.
    pub fn puck(&self) -> Option<Cell> {
        self.puck
    }

    /// Pickup position and held power-up.
    pub fn pickup(&self) -> &PickupState {
        &self.pickup
    }

    /// Whether the game is over.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    /// Winner of the game, once it is over.
    pub fn winner(&self) -> Option<&str> {
        match &self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Applies one server event, returning the move to send if it is our turn.
    #[instrument(skip(self), fields(player = %self.name, phase = self.phase.name()))]
    pub fn handle(&mut self, event: ServerEvent) -> Result<Option<Move>, SessionError> {
        if self.is_over() {
            debug!(kind = event.kind(), "Ignoring event after game over");
            return Ok(None);
        }

        let kind = event.kind();
        let reply = match event {
            ServerEvent::BallAt { cell, turn } => {
                self.puck = Some(cell);
                self.board.visit(cell, turn);
                None
            }
            ServerEvent::GoalAssigned { side, .. } => {
                self.assign_goal(side);
                None
            }
            ServerEvent::PowerUpAt { cell, .. } => {
                debug!(%cell, "Power-up placed");
                self.pickup.position = Some(cell);
                self.reset_blacklist();
                None
            }
            ServerEvent::PolarityInverted { .. } => {
                let Phase::Playing { goal } = &mut self.phase else {
                    return Err(self.out_of_phase(kind));
                };
                goal.invert(&self.config);
                info!(side = %goal.side(), target = %goal.target(), "Goal polarity inverted");
                self.reset_blacklist();
                None
            }
            ServerEvent::Moved {
                actor,
                direction,
                power,
                turn,
            } => {
                self.apply_move(kind, &actor, direction, power, turn)?;
                None
            }
            ServerEvent::GoalScored { winner, .. } => {
                info!(winner = %winner, "Goal scored, game over");
                self.phase = Phase::GameOver { winner };
                None
            }
            ServerEvent::ActivePlayer { name, .. } => {
                if name == self.name {
                    Some(self.take_turn(kind)?)
                } else {
                    debug!(active = %name, "Opponent to move");
                    None
                }
            }
            ServerEvent::InvalidMove => {
                warn!("Server rejected the last move, choosing again");
                Some(self.take_turn(kind)?)
            }
        };

        #[cfg(debug_assertions)]
        SessionInvariants::check_all(&*self).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            SessionError::InvariantViolation(format!("after {}: {}", kind, descriptions))
        })?;

        Ok(reply)
    }

    fn out_of_phase(&self, event: &'static str) -> SessionError {
        warn!(event, phase = self.phase.name(), "Event out of phase");
        SessionError::OutOfPhase {
            event,
            phase: self.phase.name(),
        }
    }

    fn assign_goal(&mut self, defended: GoalSide) {
        let goal = GoalState::facing(defended.opposite(), &self.config);
        info!(defended = %defended, target = %goal.target(), "Goal assigned");
        self.phase = Phase::Playing { goal };
        self.reset_blacklist();
    }

    /// Rebuilds the blacklist from the static rules, once a goal is known.
    fn reset_blacklist(&mut self) {
        if let Phase::Playing { goal } = &self.phase {
            self.blacklist.init(&self.board, goal, &self.pickup);
        }
    }

    fn apply_move(
        &mut self,
        kind: &'static str,
        actor: &str,
        direction: Direction,
        power: bool,
        turn: u32,
    ) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Playing { .. }) {
            return Err(self.out_of_phase(kind));
        }
        let from = self.puck.ok_or(SessionError::PuckUnknown { event: kind })?;
        let to = from.step(direction);

        self.board.mark_traversed(from, to);
        self.board.visit(to, turn);
        self.puck = Some(to);
        debug!(actor, %direction, power, %from, %to, "Puck moved");

        if self.pickup.position == Some(to) {
            self.pickup.position = None;
            if actor == self.name {
                info!(cell = %to, "Picked up a power-up");
                self.pickup.held = true;
            } else {
                debug!(actor, cell = %to, "Opponent took the power-up");
            }
        }

        self.reset_blacklist();
        Ok(())
    }

    fn take_turn(&mut self, kind: &'static str) -> Result<Move, SessionError> {
        let Phase::Playing { goal } = &self.phase else {
            return Err(self.out_of_phase(kind));
        };
        let puck = self.puck.ok_or(SessionError::PuckUnknown { event: kind })?;

        self.blacklist.refresh(&self.board);
        let turn = TurnContext::new(&self.board, &self.blacklist, puck, goal, &self.pickup);
        let mv = self.strategy.choose(&turn)?;

        if mv.power {
            self.pickup.held = false;
        }
        debug!(
            strategy = self.strategy.name(),
            %mv,
            board = %format!("\n{}", self.render()),
            "Move chosen"
        );
        Ok(mv)
    }

    /// Draws the board with puck, pickup and blacklist.
    pub fn render(&self) -> String {
        self.board.render(self.puck, self.pickup.position, |cell| {
            self.blacklist.is_blacklisted(cell)
        })
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("strategy", &self.strategy.name())
            .field("phase", &self.phase)
            .field("puck", &self.puck)
            .field("pickup", &self.pickup)
            .finish_non_exhaustive()
    }
}
