//! Tests for move selection: funnel table, heuristic and fallback.

use hockey_core::{
    BoardConfig, BoardModel, Cell, DeadEndTracker, Direction, GoalSide, GoalState, Move,
    MoveSelector, PickupState, RandomSelector, SelectError, Strategy, TurnContext,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A board plus everything a selector reads on its turn.
struct Table {
    board: BoardModel,
    blacklist: DeadEndTracker,
    goal: GoalState,
    pickup: PickupState,
}

impl Table {
    fn new(side: GoalSide) -> Self {
        let config = BoardConfig::default();
        Self {
            board: BoardModel::new(config),
            blacklist: DeadEndTracker::new(config),
            goal: GoalState::facing(side, &config),
            pickup: PickupState::default(),
        }
    }

    fn seal(&mut self, cell: Cell, keep: &[Cell]) {
        let links: Vec<Cell> = self.board.neighbors(cell).map(|(_, c)| c).collect();
        for next in links.into_iter().filter(|c| !keep.contains(c)) {
            self.board.mark_traversed(cell, next);
        }
    }

    fn prepare(&mut self) {
        self.blacklist.init(&self.board, &self.goal, &self.pickup);
        self.blacklist.refresh(&self.board);
    }

    fn turn(&self, puck: Cell) -> TurnContext<'_> {
        TurnContext::new(&self.board, &self.blacklist, puck, &self.goal, &self.pickup)
    }

    fn select(&mut self, puck: Cell) -> Result<Move, SelectError> {
        self.prepare();
        MoveSelector::new().select(&self.turn(puck))
    }
}

#[test]
fn test_open_field_heads_for_the_target() {
    let mut table = Table::new(GoalSide::North);
    assert_eq!(table.select(Cell::new(7, 7)), Ok(Move::plain(Direction::North)));
}

#[test]
fn test_mouth_row_scores_straight_through() {
    let mut table = Table::new(GoalSide::North);
    assert_eq!(table.select(Cell::new(0, 7)), Ok(Move::plain(Direction::North)));
}

#[test]
fn test_south_target_mirrors_the_funnel() {
    let mut table = Table::new(GoalSide::South);
    assert_eq!(table.select(Cell::new(14, 7)), Ok(Move::plain(Direction::South)));
    assert_eq!(
        table.select(Cell::new(13, 6)),
        Ok(Move::plain(Direction::SouthEast))
    );
    assert_eq!(
        table.select(Cell::new(13, 8)),
        Ok(Move::plain(Direction::SouthWest))
    );
}

#[test]
fn test_blocked_funnel_falls_back_to_first_best_direction() {
    let mut table = Table::new(GoalSide::North);
    table.board.mark_traversed(Cell::new(1, 7), Cell::new(0, 7));

    // North-east and north-west tie; north-east comes first.
    assert_eq!(
        table.select(Cell::new(1, 7)),
        Ok(Move::plain(Direction::NorthEast))
    );
}

#[test]
fn test_power_funnel_needs_a_held_power_up() {
    let mut table = Table::new(GoalSide::North);
    assert_eq!(table.select(Cell::new(2, 7)), Ok(Move::plain(Direction::North)));

    table.pickup.held = true;
    let mv = table.select(Cell::new(2, 7));
    assert_eq!(mv, Ok(Move::power(Direction::North)));
    assert_eq!(mv.map(|m| m.to_string()), Ok("power north".to_string()));
}

#[test]
fn test_rebound_column_cuts_back_into_the_mouth() {
    let mut table = Table::new(GoalSide::North);
    assert_eq!(
        table.select(Cell::new(1, 5)),
        Ok(Move::plain(Direction::NorthEast))
    );
    assert_eq!(
        table.select(Cell::new(1, 9)),
        Ok(Move::plain(Direction::NorthWest))
    );
}

#[test]
fn test_nearby_pickup_pulls_the_puck() {
    let mut table = Table::new(GoalSide::South);
    for col in 6..=8 {
        table.board.visit(Cell::new(6, col), 1);
    }
    table.pickup.position = Some(Cell::new(5, 7));

    assert_eq!(table.select(Cell::new(7, 7)), Ok(Move::plain(Direction::North)));
    assert_eq!(table.turn(Cell::new(6, 7)).score(Cell::new(6, 7)), 1);
}

#[test]
fn test_forced_blacklisted_move_burns_power_when_it_can_escape() {
    let mut table = Table::new(GoalSide::North);
    let p = Cell::new(7, 7);
    let q = Cell::new(8, 7);
    let r = Cell::new(9, 7);
    table.seal(p, &[q]);
    table.seal(q, &[p, r]);

    assert_eq!(table.select(p), Ok(Move::plain(Direction::South)));
    assert!(table.blacklist.is_blacklisted(q));

    table.pickup.held = true;
    assert_eq!(table.select(p), Ok(Move::power(Direction::South)));
}

#[test]
fn test_boxed_in_puck_has_no_legal_move() {
    let mut table = Table::new(GoalSide::North);
    let p = Cell::new(7, 7);
    table.seal(p, &[]);

    assert_eq!(table.select(p), Err(SelectError::NoLegalMove { from: p }));
    let mut random = RandomSelector::seeded(7);
    assert_eq!(
        random.choose(&table.turn(p)),
        Err(SelectError::NoLegalMove { from: p })
    );
}

#[test]
fn test_every_chosen_move_is_legal() {
    for side in [GoalSide::North, GoalSide::South] {
        let mut table = Table::new(side);
        table.pickup.held = true;
        table.prepare();
        let cells: Vec<Cell> = table.board.cells().collect();
        for puck in cells {
            let mv = MoveSelector::new()
                .select(&table.turn(puck))
                .unwrap_or_else(|e| panic!("no move from {}: {}", puck, e));
            assert!(
                table.board.can_move(puck, mv.direction),
                "illegal {} from {}",
                mv,
                puck
            );
        }
    }
}

#[test]
fn test_chosen_moves_stay_legal_on_scarred_boards() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let side = if seed % 2 == 0 {
            GoalSide::North
        } else {
            GoalSide::South
        };
        let mut table = Table::new(side);
        for _ in 0..300 {
            let a = Cell::new(rng.gen_range(0..15), rng.gen_range(0..15));
            let neighbors: Vec<Cell> = table.board.neighbors(a).map(|(_, c)| c).collect();
            let b = neighbors[rng.gen_range(0..neighbors.len())];
            table.board.mark_traversed(a, b);
        }

        for held in [false, true] {
            table.pickup.held = held;
            table.prepare();
            let mut random = RandomSelector::seeded(seed);
            let cells: Vec<Cell> = table.board.cells().collect();
            for puck in cells {
                let stuck = table.board.open_neighbors(puck).next().is_none();
                match MoveSelector::new().select(&table.turn(puck)) {
                    Ok(mv) => {
                        assert!(
                            table.board.can_move(puck, mv.direction),
                            "seed {}: illegal {} from {}",
                            seed,
                            mv,
                            puck
                        );
                        assert!(held || !mv.power, "seed {}: power without pickup", seed);
                    }
                    Err(e) => assert!(stuck, "seed {}: {} with open edges", seed, e),
                }
                match random.choose(&table.turn(puck)) {
                    Ok(mv) => assert!(table.board.can_move(puck, mv.direction)),
                    Err(_) => assert!(stuck),
                }
            }
        }
    }
}

#[test]
fn test_seeded_random_selector_is_reproducible() {
    let mut table = Table::new(GoalSide::South);
    table.prepare();
    let pucks = [Cell::new(3, 3), Cell::new(7, 7), Cell::new(10, 2), Cell::new(0, 7)];

    let mut first = RandomSelector::seeded(42);
    let mut second = RandomSelector::seeded(42);
    for puck in pucks {
        let a = first.choose(&table.turn(puck));
        let b = second.choose(&table.turn(puck));
        assert_eq!(a, b);
        let mv = a.unwrap_or_else(|e| panic!("no move from {}: {}", puck, e));
        assert!(table.board.can_move(puck, mv.direction));
        assert!(!mv.power);
    }
    assert_eq!(first.name(), "random");
    assert_eq!(MoveSelector::new().name(), "heuristic");
}

#[test]
fn test_random_selector_prefers_clear_cells() {
    let mut table = Table::new(GoalSide::North);
    let p = Cell::new(4, 4);
    let clear = Cell::new(4, 3);
    let trapped = Cell::new(5, 5);
    table.seal(p, &[clear, trapped]);
    table.prepare();
    table.blacklist.mark(trapped, hockey_core::BlacklistReason::Corridor);

    let mut random = RandomSelector::seeded(1);
    for _ in 0..20 {
        assert_eq!(
            random.choose(&table.turn(p)),
            Ok(Move::plain(Direction::West))
        );
    }
}
