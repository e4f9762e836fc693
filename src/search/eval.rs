use crate::bitboard::pop_lsb;
use crate::board::{Board, COLORS, Color, PIECES, Piece};
use crate::search::pst;

/// Vertical mirror: the White index into the diagram-ordered tables.
#[inline(always)]
pub fn mirror_vert(sq: u8) -> usize {
    (sq ^ 56) as usize
}

fn table_for(kind: Piece) -> &'static [i32; 64] {
    match kind {
        Piece::Pawn => &pst::PAWN_PST,
        Piece::Knight => &pst::KNIGHT_PST,
        Piece::Bishop => &pst::BISHOP_PST,
        Piece::Rook => &pst::ROOK_PST,
        Piece::Queen => &pst::QUEEN_PST,
        Piece::King => &pst::KING_PST,
    }
}

/// Material plus piece-square score from White's point of view.
fn white_score(board: &Board) -> i32 {
    let mut score = 0;
    for &colour in &COLORS {
        for &kind in &PIECES {
            let table = table_for(kind);
            let mut bb = board.pieces(kind, colour);
            while bb != 0 {
                let sq = pop_lsb(&mut bb);
                let term = kind.value()
                    + match colour {
                        Color::White => table[mirror_vert(sq)],
                        Color::Black => table[sq as usize],
                    };
                match colour {
                    Color::White => score += term,
                    Color::Black => score -= term,
                }
            }
        }
    }
    score
}

/// Static evaluation in centipawns, positive when the side to move stands
/// better (negamax convention).
pub fn evaluate(board: &Board) -> i32 {
    let score = white_score(board);
    match board.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(evaluate(&Board::new()), 0);
    }

    #[test]
    fn evaluation_is_symmetric_under_side_flip() {
        let white =
            Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let black =
            Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(evaluate(&white), -evaluate(&black));
    }

    #[test]
    fn an_extra_queen_dominates_the_score() {
        let board = Board::from_str("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        assert!(evaluate(&board) > 800);
        let board = Board::from_str("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1").unwrap();
        assert!(evaluate(&board) < -800);
    }

    #[test]
    fn centre_pawns_beat_home_pawns() {
        // after 1. e4 White has gained the centre bonus
        let board =
            Board::from_str("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert!(-evaluate(&board) > 0); // from White's view
    }
}
