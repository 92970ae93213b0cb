//! Server events, decoded from protocol lines.
//!
//! Events are first-class values: the session applies them, tests build
//! them directly, and the client only has to turn lines into them.

use crate::types::{Cell, Direction, GoalSide};
use tracing::trace;

/// A server event the session knows how to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// `ball is at (R, C) - T`
    BallAt {
        /// Puck position.
        cell: Cell,
        /// Server turn stamp.
        turn: u32,
    },
    /// `your goal is SIDE - T`
    GoalAssigned {
        /// Side named by the server (the side this client defends).
        side: GoalSide,
        /// Server turn stamp.
        turn: u32,
    },
    /// `power up is at (R, C) - T`
    PowerUpAt {
        /// Pickup position.
        cell: Cell,
        /// Server turn stamp.
        turn: u32,
    },
    /// `polarity of the goal has been inverted - T`
    PolarityInverted {
        /// Server turn stamp.
        turn: u32,
    },
    /// `ACTOR did go [power] DIRECTION - T`
    Moved {
        /// Name of the player who moved.
        actor: String,
        /// Direction the puck travelled.
        direction: Direction,
        /// Whether the move was a power move.
        power: bool,
        /// Server turn stamp.
        turn: u32,
    },
    /// `ACTOR won a goal was made - T`
    GoalScored {
        /// Name of the winning player.
        winner: String,
        /// Server turn stamp.
        turn: u32,
    },
    /// `NAME is active player - T`
    ActivePlayer {
        /// Name of the player whose turn it is.
        name: String,
        /// Server turn stamp.
        turn: u32,
    },
    /// Any line mentioning `invalid move`.
    InvalidMove,
}

impl ServerEvent {
    /// Decodes a protocol line. Returns `None` for lines the client ignores.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.contains("invalid move") {
            return Some(ServerEvent::InvalidMove);
        }

        let (body, stamp) = line.rsplit_once(" - ")?;
        let turn: u32 = stamp.trim().parse().ok()?;

        let event = if let Some(rest) = body.strip_prefix("ball is at ") {
            ServerEvent::BallAt {
                cell: parse_cell(rest)?,
                turn,
            }
        } else if let Some(rest) = body.strip_prefix("your goal is ") {
            ServerEvent::GoalAssigned {
                side: rest.trim().parse().ok()?,
                turn,
            }
        } else if let Some(rest) = body.strip_prefix("power up is at ") {
            ServerEvent::PowerUpAt {
                cell: parse_cell(rest)?,
                turn,
            }
        } else if body == "polarity of the goal has been inverted" {
            ServerEvent::PolarityInverted { turn }
        } else if let Some(winner) = body.strip_suffix(" won a goal was made") {
            ServerEvent::GoalScored {
                winner: winner.to_string(),
                turn,
            }
        } else if let Some(name) = body.strip_suffix(" is active player") {
            ServerEvent::ActivePlayer {
                name: name.to_string(),
                turn,
            }
        } else if let Some((actor, rest)) = body.split_once(" did go ") {
            let (power, label) = match rest.strip_prefix("power ") {
                Some(label) => (true, label),
                None => (false, rest),
            };
            ServerEvent::Moved {
                actor: actor.to_string(),
                direction: label.trim().parse().ok()?,
                power,
                turn,
            }
        } else {
            trace!(line, "Unrecognized line");
            return None;
        };

        Some(event)
    }

    /// Short name of the event kind, for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::BallAt { .. } => "ball position",
            ServerEvent::GoalAssigned { .. } => "goal assignment",
            ServerEvent::PowerUpAt { .. } => "power-up placement",
            ServerEvent::PolarityInverted { .. } => "polarity inversion",
            ServerEvent::Moved { .. } => "move",
            ServerEvent::GoalScored { .. } => "goal scored",
            ServerEvent::ActivePlayer { .. } => "active player",
            ServerEvent::InvalidMove => "invalid move",
        }
    }

    /// Server turn stamp, when the line carried one.
    pub fn turn(&self) -> Option<u32> {
        match self {
            ServerEvent::BallAt { turn, .. }
            | ServerEvent::GoalAssigned { turn, .. }
            | ServerEvent::PowerUpAt { turn, .. }
            | ServerEvent::PolarityInverted { turn }
            | ServerEvent::Moved { turn, .. }
            | ServerEvent::GoalScored { turn, .. }
            | ServerEvent::ActivePlayer { turn, .. } => Some(*turn),
            ServerEvent::InvalidMove => None,
        }
    }
}

fn parse_cell(text: &str) -> Option<Cell> {
    let inner = text.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (row, col) = inner.split_once(',')?;
    Some(Cell::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ball_position() {
        assert_eq!(
            ServerEvent::parse("ball is at (7, 7) - 0"),
            Some(ServerEvent::BallAt {
                cell: Cell::new(7, 7),
                turn: 0
            })
        );
    }

    #[test]
    fn test_parse_goal_and_polarity() {
        assert_eq!(
            ServerEvent::parse("your goal is north - 2"),
            Some(ServerEvent::GoalAssigned {
                side: GoalSide::North,
                turn: 2
            })
        );
        assert_eq!(
            ServerEvent::parse("polarity of the goal has been inverted - 31"),
            Some(ServerEvent::PolarityInverted { turn: 31 })
        );
    }

    #[test]
    fn test_parse_plain_and_power_moves() {
        assert_eq!(
            ServerEvent::parse("Kek12 did go north east - 5"),
            Some(ServerEvent::Moved {
                actor: "Kek12".to_string(),
                direction: Direction::NorthEast,
                power: false,
                turn: 5
            })
        );
        assert_eq!(
            ServerEvent::parse("Bob did go power south - 6"),
            Some(ServerEvent::Moved {
                actor: "Bob".to_string(),
                direction: Direction::South,
                power: true,
                turn: 6
            })
        );
    }

    #[test]
    fn test_parse_turn_and_end_of_game() {
        assert_eq!(
            ServerEvent::parse("Kek12 is active player - 8"),
            Some(ServerEvent::ActivePlayer {
                name: "Kek12".to_string(),
                turn: 8
            })
        );
        assert_eq!(
            ServerEvent::parse("Bob won a goal was made - 40"),
            Some(ServerEvent::GoalScored {
                winner: "Bob".to_string(),
                turn: 40
            })
        );
        assert_eq!(
            ServerEvent::parse("Kek12: invalid move"),
            Some(ServerEvent::InvalidMove)
        );
    }

    #[test]
    fn test_unmatched_lines_are_ignored() {
        assert_eq!(ServerEvent::parse("welcome to the arena"), None);
        assert_eq!(ServerEvent::parse("ball is at (x, 7) - 1"), None);
        assert_eq!(ServerEvent::parse("Bob did go sideways - 3"), None);
        assert_eq!(ServerEvent::parse("your goal is north - soon"), None);
        assert_eq!(ServerEvent::parse(""), None);
    }
}
