use crate::board::Board;
use crate::moves::movegen::{generate_legal, in_check};
use crate::moves::types::Move;
use tracing::{debug, instrument};

/// Per-move-type breakdown collected alongside the node count.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

fn perft_nodes(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal(board, false);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in moves.iter() {
        let next = board.child(mv);
        #[cfg(debug_assertions)]
        debug_assert_eq!(next.compute_zobrist_full(), next.zobrist);
        nodes += perft_nodes(&next, depth - 1);
    }
    nodes
}

/// Counts leaf nodes of the full legal-move tree to `depth`.
#[instrument(skip(board))]
pub fn perft(board: &Board, depth: u32) -> u64 {
    perft_nodes(board, depth)
}

/// Perft split by root move: returns each root move with its subtree count
/// and the total.
#[instrument(skip(board))]
pub fn perft_divide(board: &Board, depth: u32) -> (Vec<(Move, u64)>, u64) {
    let moves = generate_legal(board, false);
    let mut out = Vec::with_capacity(moves.len());
    let mut total = 0;

    for &mv in moves.iter() {
        let count = if depth <= 1 {
            1
        } else {
            perft_nodes(&board.child(mv), depth - 1)
        };
        debug!(%mv, nodes = count, "divide: root child total");
        out.push((mv, count));
        total += count;
    }
    debug!(depth, total, "divide: total");
    (out, total)
}

fn perft_breakdown_rec(board: &Board, depth: u32, out: &mut PerftCounters) {
    if depth == 0 {
        out.nodes += 1;
        let side_in_check = in_check(board, board.side_to_move());
        if side_in_check {
            out.checks += 1;
            if generate_legal(board, false).is_empty() {
                out.checkmates += 1;
            }
        }
        return;
    }

    for &mv in generate_legal(board, false).iter() {
        if depth == 1 {
            if mv.is_capture() {
                out.captures += 1;
                if mv.is_ep_capture() {
                    out.ep_captures += 1;
                }
            }
            if mv.is_castle() {
                out.castles += 1;
            }
            if mv.is_promotion() {
                out.promotions += 1;
            }
        }
        perft_breakdown_rec(&board.child(mv), depth - 1, out);
    }
}

/// Perft with the classic move-type breakdown (captures, ep, castles,
/// promotions, checks, mates) tallied at the leaf edge.
pub fn perft_with_breakdown(board: &Board, depth: u32) -> PerftCounters {
    let mut out = PerftCounters::default();
    perft_breakdown_rec(board, depth, &mut out);
    out
}
