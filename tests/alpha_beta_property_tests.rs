//! Alpha-beta must agree with plain negamax at the root, and zero-window
//! probes must bracket the true score. The position is a locked pawn
//! formation where no capture is reachable inside the horizon, so the
//! quiescence extension reduces to the static evaluation and a reference
//! negamax over the same leaf function is exact.

use outpost::game::Game;
use outpost::moves::movegen::in_check;
use outpost::search::eval::evaluate;
use outpost::search::search::{INF, MATE_SCORE, SearchStats, TimeManager, alpha_beta};
use outpost::search::tt::TranspositionTable;
use std::time::Duration;

const LOCKED_PAWNS: &str = "k7/8/p1p1p3/P1P1P3/8/8/8/K7 w - - 0 1";

fn reference_negamax(game: &mut Game, depth: i32, ply: i32) -> i32 {
    let moves = game.legal_moves(false);
    if moves.is_empty() {
        return if in_check(&game.board, game.board.side_to_move()) {
            -MATE_SCORE + ply
        } else {
            0
        };
    }
    if depth == 0 {
        return evaluate(&game.board);
    }
    let mut best = -INF;
    for &mv in moves.iter() {
        game.push(mv);
        let score = -reference_negamax(game, depth - 1, ply + 1);
        game.pop();
        best = best.max(score);
    }
    best
}

fn search_window(fen: &str, depth: i32, alpha: i32, beta: i32) -> i32 {
    let mut game = Game::from_fen(fen).unwrap();
    game.set_fast_mode(true);
    let mut tt = TranspositionTable::new(1 << 12);
    let mut stats = SearchStats::default();
    let mut time = TimeManager::new(Duration::from_secs(60));
    alpha_beta(&mut game, &mut tt, depth, 0, alpha, beta, &mut stats, &mut time).0
}

fn true_value(depth: i32) -> i32 {
    let mut game = Game::from_fen(LOCKED_PAWNS).unwrap();
    game.set_fast_mode(true);
    reference_negamax(&mut game, depth, 0)
}

#[test]
fn full_window_search_equals_plain_negamax() {
    for depth in 1..=4 {
        assert_eq!(
            search_window(LOCKED_PAWNS, depth, -INF, INF),
            true_value(depth),
            "divergence at depth {depth}"
        );
    }
}

#[test]
fn zero_windows_bracket_the_true_score() {
    let depth = 3;
    let value = true_value(depth);

    // window just below the value: the search must fail high
    let high = search_window(LOCKED_PAWNS, depth, value - 1, value);
    assert!(high >= value, "expected fail-high, got {high} vs {value}");

    // window just above: the search must fail low
    let low = search_window(LOCKED_PAWNS, depth, value, value + 1);
    assert!(low <= value, "expected fail-low, got {low} vs {value}");
}

#[test]
fn the_driver_restores_fast_mode_state() {
    let mut game = Game::from_fen(LOCKED_PAWNS).unwrap();
    let mut tt = TranspositionTable::new(1 << 12);
    let _ = outpost::search::search::find_best_move(
        &mut game,
        &mut tt,
        Duration::from_millis(100),
    );
    // push/pop balance held: the root position is intact
    assert_eq!(game.board.to_fen(), LOCKED_PAWNS);
}
