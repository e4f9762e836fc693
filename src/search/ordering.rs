use crate::board::{Board, Piece};
use crate::moves::types::Move;

const HASH_MOVE_SCORE: i32 = 1_000_000;

/// Most-valuable-victim / least-valuable-attacker score for captures;
/// zero for everything else.
pub fn mvv_lva_score(mv: Move, board: &Board) -> i32 {
    if !mv.is_capture() {
        return 0;
    }
    // En passant lands on an empty square; the victim is always a pawn.
    let victim = if mv.is_ep_capture() {
        Piece::Pawn.value()
    } else {
        board.kind_at(mv.dest()).map_or(0, Piece::value)
    };
    let attacker = board.kind_at(mv.origin()).map_or(0, Piece::value);
    1000 + 10 * victim - attacker
}

/// Sorts the hash move first, then captures by MVV/LVA; the stable sort
/// leaves quiet moves in generator order.
pub fn order_moves(moves: &mut [Move], board: &Board, hash_move: Option<Move>) {
    moves.sort_by_cached_key(|&mv| {
        if hash_move == Some(mv) {
            return -HASH_MOVE_SCORE;
        }
        -mvv_lva_score(mv, board)
    });
}
