use crate::game::{Game, GameState};
use crate::moves::movegen::in_check;
use crate::moves::types::Move;
use crate::search::eval::evaluate;
use crate::search::ordering::order_moves;
use crate::search::tt::{Bound, TranspositionTable};
use std::time::{Duration, Instant};
use tracing::debug;

pub const INF: i32 = 32_000;
pub const MATE_SCORE: i32 = 31_000;
/// Everything at or beyond this magnitude is a mate score.
pub const MATE_THRESHOLD: i32 = 30_000;

const MAX_DEPTH: i32 = 64;
/// The clock is sampled once per this many nodes.
const TIME_CHECK_MASK: u64 = 1023;

/// Telemetry counters; they never influence the search result.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_probes: u64,
    pub tt_hits: u64,
}

/// Wall-clock deadline. Once `stopped` flips, the search unwinds and the
/// iterative-deepening driver discards the incomplete depth.
pub struct TimeManager {
    start: Instant,
    limit: Duration,
    stopped: bool,
}

impl TimeManager {
    pub fn new(limit: Duration) -> Self {
        TimeManager {
            start: Instant::now(),
            limit,
            stopped: false,
        }
    }

    #[inline(always)]
    pub fn check(&mut self) {
        if !self.stopped && self.start.elapsed() >= self.limit {
            self.stopped = true;
        }
    }

    #[inline(always)]
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// What an iterative-deepening run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Best(Move),
    /// No legal move existed; the position's terminal classification.
    Terminal(GameState),
}

// Mate scores are stored ply-independent ("distance from mate") and turned
// back into node-relative scores on probe; otherwise a deep probe would
// misreport the mate distance.
fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

/// Capture-only extension past the nominal horizon: stand pat on the
/// static evaluation, then try captures until the position goes quiet.
pub fn quiescence(
    game: &mut Game,
    mut alpha: i32,
    beta: i32,
    stats: &mut SearchStats,
    time: &mut TimeManager,
) -> i32 {
    if stats.nodes & TIME_CHECK_MASK == 0 {
        time.check();
    }
    if time.stopped() {
        return 0;
    }
    stats.nodes += 1;

    let stand = evaluate(&game.board);
    if stand >= beta {
        return stand;
    }
    if stand > alpha {
        alpha = stand;
    }

    let mut captures = game.legal_moves(true);
    order_moves(&mut captures, &game.board, None);

    for &mv in captures.iter() {
        game.push(mv);
        let score = -quiescence(game, -beta, -alpha, stats, time);
        game.pop();
        if time.stopped() {
            return 0;
        }
        if score >= beta {
            return score;
        }
        if score > alpha {
            alpha = score;
        }
    }
    alpha
}

/// Negamax alpha-beta over the legal move list, with transposition-table
/// probing and storing at every node.
pub fn alpha_beta(
    game: &mut Game,
    tt: &mut TranspositionTable,
    depth: i32,
    ply: i32,
    mut alpha: i32,
    beta: i32,
    stats: &mut SearchStats,
    time: &mut TimeManager,
) -> (i32, Option<Move>) {
    if stats.nodes & TIME_CHECK_MASK == 0 {
        time.check();
    }
    if time.stopped() {
        return (0, None);
    }
    stats.nodes += 1;

    let key = game.board.zobrist;
    let mut hash_move = None;

    stats.tt_probes += 1;
    if let Some(entry) = tt.probe(key) {
        stats.tt_hits += 1;
        if !entry.best_move.is_null() {
            hash_move = Some(entry.best_move);
        }
        // The root must always run the move loop to produce a move.
        if entry.depth >= depth && ply > 0 {
            let score = score_from_tt(entry.score, ply);
            match entry.bound {
                Bound::Exact => return (score, hash_move),
                Bound::Lower if score >= beta => return (score, hash_move),
                Bound::Upper if score <= alpha => return (score, hash_move),
                _ => {}
            }
        }
    }

    if depth <= 0 {
        return (quiescence(game, alpha, beta, stats, time), None);
    }

    let mut moves = game.legal_moves(false);
    if moves.is_empty() {
        // Shorter mates score higher than longer ones.
        return if in_check(&game.board, game.board.side_to_move()) {
            (-MATE_SCORE + ply, None)
        } else {
            (0, None)
        };
    }
    order_moves(&mut moves, &game.board, hash_move);

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = None;

    for &mv in moves.iter() {
        game.push(mv);
        let (child_score, _) = alpha_beta(game, tt, depth - 1, ply + 1, -beta, -alpha, stats, time);
        let score = -child_score;
        game.pop();

        if time.stopped() {
            return (0, None);
        }

        if score > best_score {
            best_score = score;
        }
        if score >= beta {
            tt.store(key, mv, score_to_tt(score, ply), depth, Bound::Lower);
            return (score, Some(mv));
        }
        if score > alpha {
            alpha = score;
            best_move = Some(mv);
        }
    }

    let bound = if alpha > original_alpha {
        Bound::Exact
    } else {
        Bound::Upper
    };
    tt.store(
        key,
        best_move.unwrap_or(Move::NULL),
        score_to_tt(best_score, ply),
        depth,
        bound,
    );
    (best_score, best_move)
}

/// Iterative deepening under a wall-clock budget. Each completed depth
/// overwrites the best move; a depth cut short by the deadline is
/// discarded, so the answer is always the last fully searched iteration.
pub fn find_best_move(
    game: &mut Game,
    tt: &mut TranspositionTable,
    time_limit: Duration,
) -> (SearchOutcome, SearchStats) {
    let mut stats = SearchStats::default();

    let root_moves = game.legal_moves(false);
    if root_moves.is_empty() {
        return (SearchOutcome::Terminal(game.game_state()), stats);
    }

    let mut time = TimeManager::new(time_limit);
    game.set_fast_mode(true);

    let mut best: Option<Move> = None;
    for depth in 1..=MAX_DEPTH {
        let (score, mv) = alpha_beta(game, tt, depth, 0, -INF, INF, &mut stats, &mut time);
        if time.stopped() {
            break;
        }
        if let Some(mv) = mv {
            best = Some(mv);
        }
        debug!(
            depth,
            score,
            nodes = stats.nodes,
            tt_probes = stats.tt_probes,
            tt_hits = stats.tt_hits,
            elapsed_ms = time.elapsed().as_millis() as u64,
            best = %mv.map(|m| m.to_uci()).unwrap_or_default(),
            "iteration complete"
        );
        // a forced mate cannot improve with more depth
        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    game.set_fast_mode(false);
    game.game_state();

    // The deadline can cut off even the first iteration; any legal move
    // beats returning nothing.
    let mv = best.unwrap_or(root_moves[0]);
    (SearchOutcome::Best(mv), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_mate_scores_are_ply_normalised() {
        let mate_in_three = MATE_SCORE - 3;
        let stored = score_to_tt(mate_in_three, 5);
        assert_eq!(score_from_tt(stored, 5), mate_in_three);
        // probing from a different ply re-anchors the distance
        assert_eq!(score_from_tt(stored, 2), mate_in_three + 3);

        let mated = -MATE_SCORE + 4;
        let stored = score_to_tt(mated, 4);
        assert_eq!(score_from_tt(stored, 4), mated);
        assert_eq!(score_to_tt(100, 7), 100);
    }

    #[test]
    fn time_manager_expires() {
        let mut tm = TimeManager::new(Duration::ZERO);
        assert!(!tm.stopped());
        tm.check();
        assert!(tm.stopped());
    }
}
