//! Fixed goal-mouth policy.
//!
//! Around a narrow opening every neighbour sits at nearly the same
//! distance from the target, so the moves there come from a table
//! instead of the heuristic. Rules are written for a north goal and
//! for the left half of the board; they are mirrored vertically for a
//! south goal and horizontally for cells east of the center column.

use crate::selector::Move;
use crate::types::{BoardConfig, Cell, Direction, GoalSide, GoalState};
use tracing::instrument;

/// Column class of a cell relative to the goal mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunnelColumn {
    /// The center column.
    Center,
    /// Inside the mouth, beside the center column.
    Flank,
    /// First column outside the mouth, one past a goal post.
    ///
    /// Only the row directly in front of the mouth has a rebound rule,
    /// so this is a column class, never a row.
    Rebound,
}

impl FunnelColumn {
    /// Classifies a column by its distance from the center column.
    pub fn classify(distance: i32, mouth_half_width: i32) -> Option<Self> {
        match distance {
            0 => Some(FunnelColumn::Center),
            d if d <= mouth_half_width => Some(FunnelColumn::Flank),
            d if d == mouth_half_width + 1 => Some(FunnelColumn::Rebound),
            _ => None,
        }
    }
}

/// One entry of the funnel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunnelRule {
    /// Rows between the puck and the board edge next to the goal.
    pub depth: i32,
    /// Column class of the puck.
    pub column: FunnelColumn,
    /// Move for a north goal, puck west of or on the center column.
    pub direction: Direction,
    /// Whether the rule spends a held power-up.
    pub power: bool,
}

const fn rule(depth: i32, column: FunnelColumn, direction: Direction, power: bool) -> FunnelRule {
    FunnelRule {
        depth,
        column,
        direction,
        power,
    }
}

/// The funnel table, in priority order.
pub const FUNNEL_RULES: [FunnelRule; 7] = [
    // In the mouth row: straight through.
    rule(0, FunnelColumn::Center, Direction::North, false),
    rule(0, FunnelColumn::Flank, Direction::NorthEast, false),
    // Directly in front of the mouth.
    rule(1, FunnelColumn::Center, Direction::North, false),
    rule(1, FunnelColumn::Flank, Direction::NorthEast, false),
    // Rebound column beside a goal post, one row out.
    rule(1, FunnelColumn::Rebound, Direction::NorthEast, false),
    // Two rows back with a power-up in hand.
    rule(2, FunnelColumn::Center, Direction::North, true),
    rule(2, FunnelColumn::Flank, Direction::NorthEast, true),
];

impl FunnelRule {
    /// Direction of this rule for the actual goal side and column offset.
    pub fn oriented(&self, side: GoalSide, offset: i32) -> Direction {
        let mut direction = self.direction;
        if side == GoalSide::South {
            direction = direction.flip_vertical();
        }
        if offset > 0 {
            direction = direction.flip_horizontal();
        }
        direction
    }
}

/// Returns the table moves that apply to the puck, in priority order.
///
/// Power rules are only offered when a power-up is held. Legality of
/// the returned moves is left to the caller.
#[instrument(skip(goal, config))]
pub fn lookup(puck: Cell, goal: &GoalState, config: &BoardConfig, power_held: bool) -> Vec<Move> {
    let depth = goal.depth_of(puck, config);
    let offset = puck.col - config.center();
    let half_width = *config.mouth_half_width() as i32;

    let Some(column) = FunnelColumn::classify(offset.abs(), half_width) else {
        return Vec::new();
    };

    FUNNEL_RULES
        .iter()
        .filter(|r| r.depth == depth && r.column == column)
        .filter(|r| !r.power || power_held)
        .map(|r| Move {
            direction: r.oriented(*goal.side(), offset),
            power: r.power,
        })
        .collect()
}
