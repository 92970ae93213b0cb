//! Hockey core - board tracking and move selection for the hockey puck game
//!
//! The puck sits on the vertices of a square grid. Players take turns
//! moving it to a neighbouring cell through an edge nobody has used yet,
//! and the game ends when the puck passes through a goal mouth.
//!
//! # Architecture
//!
//! - **Board**: the grid, its taken edges and visit stamps
//! - **Dead ends**: blacklist of cells that trap the puck
//! - **Funnel**: fixed moves around the goal mouth
//! - **Selector**: strategies that pick a move on our turn
//! - **Session**: applies server events and answers turns
//!
//! # Example
//!
//! ```
//! use hockey_core::{BoardConfig, GameSession, ServerEvent};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GameSession::new("Kek7", BoardConfig::default())?;
//! for line in [
//!     "your goal is south - 0",
//!     "ball is at (7, 7) - 1",
//!     "Kek7 is active player - 2",
//! ] {
//!     if let Some(event) = ServerEvent::parse(line) {
//!         if let Some(mv) = session.handle(event)? {
//!             println!("{}", mv);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod dead_end;
mod error;
mod event;
mod funnel;
mod invariants;
mod selector;
mod session;
mod types;

// Crate-level exports - Domain types
pub use types::{
    BoardConfig, Cell, Direction, GoalSide, GoalState, MAX_BOARD_SIZE, PickupState,
};

// Crate-level exports - Board and blacklist
pub use board::BoardModel;
pub use dead_end::{BlacklistReason, DeadEndTracker};

// Crate-level exports - Move selection
pub use funnel::{FUNNEL_RULES, FunnelColumn, FunnelRule, lookup as funnel_lookup};
pub use selector::{Move, MoveSelector, RandomSelector, Strategy, TurnContext};

// Crate-level exports - Protocol events and session
pub use event::ServerEvent;
pub use session::{GameSession, Phase};

// Crate-level exports - Errors
pub use error::{BoardConfigError, SelectError, SessionError};

// Crate-level exports - Invariants
pub use invariants::{
    BlacklistSoundInvariant, EdgeSymmetryInvariant, Invariant, InvariantSet, InvariantViolation,
    PuckPlacementInvariant, SessionInvariants,
};
