// engine/tests/core_engine_characterization.rs
#![forbid(unsafe_code)]

/**
 * Core engine characterization tests.
 *
 * Purpose:
 * - Lock in observable grid behavior: clear rules, creature shrinking, the
 *   top-discard insertion policy, game-over detection, and input validation.
 * - Lock in session semantics: turn ordering, game-over latch, atomic rejection
 *   of bad moves and malformed rows, and seed determinism.
 *
 * How the tests work:
 * - Boards are written as glyph strings (`.` empty, `c`/`h`/`w` plain tokens,
 *   `<`/`=`/`>` creature parts), top row first.
 * - They assert public API contracts only.
 */
use row_puzzle_engine::{
    COLS, Cell, ClearRule, Direction, EngineError, FixedRowSource, Game, Grid, ROWS, SlideMove,
    TurnPhase, parse_board, parse_row_codes, row_from_codes,
};

fn row(s: &str) -> Vec<Cell> {
    s.chars()
        .map(|ch| {
            *Cell::all()
                .iter()
                .find(|c| c.glyph() == ch)
                .unwrap_or_else(|| panic!("unknown glyph {ch:?}"))
        })
        .collect()
}

fn set_row(g: &mut Grid, r: usize, s: &str) {
    for (c, cell) in row(s).into_iter().enumerate() {
        g.set(r, c, cell);
    }
}

fn occupied(g: &Grid) -> usize {
    g.rows() * g.cols() - g.empty_count()
}

// -----------------------------------------------------------------------------
// Clear rules
// -----------------------------------------------------------------------------

#[test]
fn creature_run_of_three_shrinks_to_two() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 1, "cc<=>cccc");

    assert_eq!(g.clear_filled_rows(), 1);
    assert_eq!(g.row(ROWS - 1), row("..<=.....").as_slice());
}

#[test]
fn lone_creature_head_is_destroyed() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 1, "cccc<cccc");

    assert_eq!(g.clear_filled_rows(), 1);
    assert_eq!(g.empty_count(), ROWS * COLS);
}

#[test]
fn plain_rule_resets_the_whole_row_including_creatures() {
    let mut g = Grid::with_rule(ROWS, COLS, ClearRule::Plain);
    set_row(&mut g, ROWS - 1, "cc<=>cccc");

    assert_eq!(g.clear_filled_rows(), 1);
    assert_eq!(g.empty_count(), ROWS * COLS);
}

#[test]
fn row_with_an_empty_cell_is_not_a_clear_candidate() {
    for rule in [ClearRule::Plain, ClearRule::Creature] {
        let mut g = Grid::with_rule(ROWS, COLS, rule);
        set_row(&mut g, ROWS - 1, "cc<=>ccc.");
        let before = g.clone();

        assert_eq!(g.clear_filled_rows(), 0);
        assert_eq!(g, before);
    }
}

#[test]
fn shrunk_creature_falls_after_clear() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 2, "<=>cccccc");
    set_row(&mut g, ROWS - 1, "...hhhhhh");

    assert_eq!(g.clear_filled_rows(), 1);
    assert_eq!(g.row(ROWS - 2), row(".........").as_slice());
    assert_eq!(g.row(ROWS - 1), row("<=.hhhhhh").as_slice());
}

#[test]
fn several_full_rows_count_once_each_and_settle_once() {
    let mut g = Grid::with_rule(ROWS, COLS, ClearRule::Plain);
    set_row(&mut g, ROWS - 4, "w........");
    set_row(&mut g, ROWS - 3, "ccccccccc");
    set_row(&mut g, ROWS - 2, "w.......w");
    set_row(&mut g, ROWS - 1, "hhhhhhhhh");

    assert_eq!(g.clear_filled_rows(), 2);
    assert_eq!(g.row(ROWS - 2), row("w........").as_slice());
    assert_eq!(g.row(ROWS - 1), row("w.......w").as_slice());
    assert_eq!(occupied(&g), 3);
}

// -----------------------------------------------------------------------------
// Insertion (top-discard policy)
// -----------------------------------------------------------------------------

#[test]
fn append_pushes_the_stack_up_and_discards_the_top_row() {
    let mut g = Grid::new(ROWS, COLS);
    for r in 0..ROWS {
        g.set(r, 4, Cell::Cow);
    }

    g.add_new_row(&row("ccccccccc")).unwrap();

    assert_eq!(g.row(ROWS - 1), row("ccccccccc").as_slice());
    let cows = (0..ROWS).filter(|&r| g.get(r, 4) == Cell::Cow).count();
    assert_eq!(cows, ROWS - 1);
    assert!(g.get(0, 4) == Cell::Cow);
}

#[test]
fn insert_at_index_keeps_rows_below_and_lifts_rows_above() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 2, "ccccccccc");
    set_row(&mut g, ROWS - 1, "hhhhhhhhh");

    g.insert_new_row(&row("wwwwwwwww"), ROWS - 1).unwrap();

    assert_eq!(g.row(ROWS - 3), row("ccccccccc").as_slice());
    assert_eq!(g.row(ROWS - 2), row("wwwwwwwww").as_slice());
    assert_eq!(g.row(ROWS - 1), row("hhhhhhhhh").as_slice());
    assert_eq!(occupied(&g), 3 * COLS);
}

#[test]
fn insert_at_top_spills_the_inserted_row() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 1, "hhhh.hhhh");
    let before = g.clone();

    g.insert_new_row(&row("wwwwwwwww"), 0).unwrap();
    assert_eq!(g, before);
}

#[test]
fn inserted_partial_row_is_settled_by_gravity() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 1, "c........");

    g.add_new_row(&row(".h.......")).unwrap();

    assert_eq!(g.row(ROWS - 1), row("ch.......").as_slice());
    assert_eq!(occupied(&g), 2);
}

#[test]
fn bad_insert_is_rejected_without_mutation() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 1, "c.c.c.c.c");
    let before = g.clone();

    let err = g.insert_new_row(&row("ccccccccc"), ROWS + 1).unwrap_err();
    assert!(matches!(err, EngineError::InvalidDimensions { index, limit, .. } if index == ROWS + 1 && limit == ROWS));

    let err = g.add_new_row(&row("cccc")).unwrap_err();
    assert!(matches!(err, EngineError::MalformedRowInput(_)));

    assert_eq!(g, before);
}

// -----------------------------------------------------------------------------
// Slide / game over / queries
// -----------------------------------------------------------------------------

#[test]
fn slide_rotates_with_wraparound() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, 3, "<=>chw...");

    g.slide_row(3, Direction::Left).unwrap();
    assert_eq!(g.row(3), row("=>chw...<").as_slice());

    g.slide_row(3, Direction::Right).unwrap();
    g.slide_row(3, Direction::Right).unwrap();
    assert_eq!(g.row(3), row(".<=>chw..").as_slice());
}

#[test]
fn slide_out_of_range_is_rejected_without_mutation() {
    let mut g = Grid::new(ROWS, COLS);
    set_row(&mut g, ROWS - 1, "chwchwchw");
    let before = g.clone();

    let err = g.slide_row(ROWS, Direction::Left).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidDimensions {
            what: "row",
            index: ROWS,
            limit: ROWS
        }
    );
    assert_eq!(g, before);
}

#[test]
fn any_top_row_cell_triggers_game_over() {
    let g = Grid::new(ROWS, COLS);
    assert!(!g.game_over());

    for c in 0..COLS {
        let mut h = g.clone();
        h.set(0, c, Cell::Chick);
        assert!(h.game_over());
    }

    let mut low = g.clone();
    set_row(&mut low, 1, "ccccccccc");
    assert!(!low.game_over());
}

#[test]
fn clone_is_a_deep_copy() {
    let g = Grid::new(ROWS, COLS);
    let mut h = g.clone();
    h.set(ROWS - 1, 0, Cell::Cat);
    assert_eq!(g.get(ROWS - 1, 0), Cell::Empty);
    assert_eq!(g.empty_count(), ROWS * COLS);
    assert_eq!(h.empty_count(), ROWS * COLS - 1);
}

#[test]
fn end_to_end_stacking_then_single_clear() {
    let mut g = Grid::with_rule(ROWS, COLS, ClearRule::Plain);
    let partial = row(".cccccccc");

    for _ in 0..10 {
        g.add_new_row(&partial).unwrap();
        assert_eq!(g.clear_filled_rows(), 0);
    }
    assert!(!g.game_over());
    assert_eq!(occupied(&g), 10 * (COLS - 1));

    // The 11th row fills column 0 of the bottom row; column 1 drops into its gap.
    g.add_new_row(&row("w.ccccccc")).unwrap();
    assert_eq!(g.row(ROWS - 1), row("wcccccccc").as_slice());
    assert!(g.game_over());
    let before_clear = occupied(&g);

    assert_eq!(g.clear_filled_rows(), 1);
    assert_eq!(occupied(&g), before_clear - COLS);
    assert!(g.cells().iter().flatten().all(|&c| c != Cell::Cow));
    assert!(!g.game_over());

    let settled = g.clone();
    g.apply_gravity();
    assert_eq!(g, settled);
}

// -----------------------------------------------------------------------------
// External input
// -----------------------------------------------------------------------------

#[test]
fn manual_rows_are_validated() {
    assert_eq!(
        parse_row_codes("1, 2 3,0,4,5,6,0,1", COLS).unwrap(),
        row("chw.<=>.c")
    );
    assert!(matches!(
        parse_row_codes("1,2,3", COLS),
        Err(EngineError::MalformedRowInput(_))
    ));
    assert!(matches!(
        parse_row_codes("1,2,3,x,1,2,3,1,2", COLS),
        Err(EngineError::MalformedRowInput(_))
    ));
    assert!(matches!(
        row_from_codes(&[1, 2, 3, 7, 1, 2, 3, 1, 2], COLS),
        Err(EngineError::MalformedRowInput(_))
    ));
    assert!(matches!(
        row_from_codes(&[1, 2, 3, -1, 1, 2, 3, 1, 2], COLS),
        Err(EngineError::MalformedRowInput(_))
    ));
}

#[test]
fn manual_boards_are_validated() {
    let good = "# bottom row only\n0 0 0\n0 0 0\n1,4,6\n";
    let g = parse_board(good, 3, 3, ClearRule::Creature).unwrap();
    assert_eq!(g.row(2), row("c<>").as_slice());

    for bad in ["0 0 0\n1 1 1\n", "0 0 0\n0 0\n1 1 1\n", "0 0 0\n0 0 0\n1 9 1\n", "0 0 0\n0 a 0\n1 1 1\n"] {
        assert!(matches!(
            parse_board(bad, 3, 3, ClearRule::Creature),
            Err(EngineError::MalformedBoardInput(_))
        ));
    }
}

// -----------------------------------------------------------------------------
// Session
// -----------------------------------------------------------------------------

fn fixed_game(grid: Grid, rows: &[&str]) -> Game {
    let cols = grid.cols();
    let source = FixedRowSource::new(rows.iter().map(|s| row(s)).collect(), cols).unwrap();
    Game::with_source(grid, Box::new(source))
}

#[test]
fn full_incoming_row_is_cleared_in_the_same_turn() {
    let mut g = fixed_game(Grid::new(ROWS, COLS), &["chwchwchw"]);

    let r = g.step(None).unwrap();
    assert!(!r.terminated);
    assert_eq!(r.cleared_rows, 1);
    assert_eq!(g.grid.empty_count(), ROWS * COLS);
    assert_eq!((g.turns, g.rows_cleared, g.score), (1, 1, 100));
    assert_eq!(g.phase(), TurnPhase::Idle);
}

#[test]
fn game_over_latches() {
    let mut grid = Grid::new(ROWS, COLS);
    for r in 1..ROWS {
        grid.set(r, 0, Cell::Cow);
    }
    let mut g = fixed_game(grid, &["w........"]);

    let r1 = g.step(None).unwrap();
    assert!(r1.terminated);
    assert!(g.is_game_over());
    assert_eq!(g.phase(), TurnPhase::GameOver);

    let snapshot = g.grid.clone();
    let r2 = g.step(Some(SlideMove::new(0, Direction::Left))).unwrap();
    assert!(r2.terminated);
    assert_eq!(r2.cleared_rows, 0);
    assert_eq!(g.turns, 1);
    assert_eq!(g.grid, snapshot);
}

#[test]
fn invalid_move_is_rejected_without_mutation() {
    let mut g = fixed_game(Grid::new(ROWS, COLS), &["c........", "h........"]);
    let grid_before = g.grid.clone();
    let next_before = g.next_row().to_vec();

    let err = g.step(Some(SlideMove::new(ROWS, Direction::Right))).unwrap_err();
    assert!(matches!(err, EngineError::InvalidDimensions { .. }));
    assert_eq!(g.grid, grid_before);
    assert_eq!(g.next_row(), next_before.as_slice());
    assert_eq!(g.turns, 0);
}

#[test]
fn malformed_manual_next_row_keeps_previous() {
    let mut g = fixed_game(Grid::new(ROWS, COLS), &["c........"]);

    assert!(g.set_next_row(&row("ccc")).is_err());
    assert_eq!(g.next_row(), row("c........").as_slice());

    g.set_next_row(&row("........w")).unwrap();
    g.step(None).unwrap();
    assert_eq!(g.grid.get(ROWS - 1, COLS - 1), Cell::Cow);
}

#[test]
fn load_board_checks_dimensions() {
    let mut g = Game::new(5);
    assert!(matches!(
        g.load_board(Grid::new(ROWS - 1, COLS)),
        Err(EngineError::MalformedBoardInput(_))
    ));

    let mut board = Grid::new(ROWS, COLS);
    board.set(ROWS - 1, 2, Cell::Chick);
    g.load_board(board.clone()).unwrap();
    assert_eq!(g.grid, board);
}

#[test]
fn session_on_a_full_top_board_starts_over() {
    let mut grid = Grid::new(ROWS, COLS);
    grid.set(0, 0, Cell::Cat);
    let mut g = fixed_game(grid.clone(), &["........."]);
    assert_eq!(g.phase(), TurnPhase::GameOver);

    let r = g.step(None).unwrap();
    assert!(r.terminated);
    assert_eq!(r.cleared_rows, 0);
    assert_eq!(g.grid.get(0, 0), Cell::Cat);
    assert_eq!(g.grid, grid);
    assert_eq!(g.turns, 0);
}

#[test]
fn load_board_sets_phase_from_the_board() {
    let mut g = fixed_game(Grid::new(ROWS, COLS), &["c........"]);
    assert_eq!(g.phase(), TurnPhase::Idle);

    let mut full_top = Grid::new(ROWS, COLS);
    full_top.set(0, 4, Cell::Cow);
    g.load_board(full_top).unwrap();
    assert!(g.is_game_over());
    assert!(g.step(None).unwrap().terminated);

    // A playable board brings a finished session back to Idle.
    let mut fresh = Grid::new(ROWS, COLS);
    fresh.set(ROWS - 1, 4, Cell::Cow);
    g.load_board(fresh).unwrap();
    assert_eq!(g.phase(), TurnPhase::Idle);
    let r = g.step(None).unwrap();
    assert!(!r.terminated);
    assert_eq!(g.grid.get(ROWS - 1, 0), Cell::Cat);
    assert_eq!(g.grid.get(ROWS - 1, 4), Cell::Cow);
    assert_eq!(g.grid.empty_count(), ROWS * COLS - 2);
}

#[test]
fn deterministic_session_for_same_seed() {
    let mut g1 = Game::new(20260228);
    let mut g2 = Game::new(20260228);

    for i in 0..60usize {
        assert_eq!(g1.grid, g2.grid);
        assert_eq!(g1.next_row(), g2.next_row());

        let mid = (i * 7) % g1.valid_move_ids().len();
        let r1 = g1.step_move_id(mid).unwrap();
        let r2 = g2.step_move_id(mid).unwrap();
        assert_eq!(r1, r2);
        if r1.terminated {
            break;
        }
    }
    assert_eq!((g1.score, g1.turns), (g2.score, g2.turns));
}
