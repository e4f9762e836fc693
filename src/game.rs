use crate::board::{Board, Color, FenError, Piece};
use crate::moves::movegen::{generate_legal, in_check};
use crate::moves::types::{Move, MoveList};
use std::fmt;
use std::str::FromStr;

/// Alternating light/dark colouring of the board, light squares set.
const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// Outcome classification of the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate,
    Stalemate,
    DrawRepetition,
    Draw50Move,
    DrawInsufficientMaterial,
}

impl GameState {
    /// Wire names used by the request/response protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Ongoing => "ongoing",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
            GameState::DrawRepetition => "draw_repetition",
            GameState::Draw50Move => "draw_50_move",
            GameState::DrawInsufficientMaterial => "draw_insufficient_material",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the board and the make/unmake history. Every push snapshots the
/// whole position (bitboards, info word, clock, Zobrist key) so a pop is
/// an exact restore.
pub struct Game {
    pub board: Board,
    history: Vec<Board>,
    state: GameState,
    fast_mode: bool,
}

impl Game {
    /// A game at the standard starting position.
    pub fn new() -> Self {
        let mut game = Game {
            board: Board::new(),
            history: Vec::new(),
            state: GameState::Ongoing,
            fast_mode: false,
        };
        game.update_state();
        game
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let board = Board::from_str(fen)?;
        let mut game = Game {
            board,
            history: Vec::new(),
            state: GameState::Ongoing,
            fast_mode: false,
        };
        game.update_state();
        Ok(game)
    }

    /// Plies recorded on the history stack.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// While enabled, push/pop skip the state classification; the search
    /// re-derives terminal positions from its own move lists and has no
    /// use for the draw rules at interior nodes.
    pub fn set_fast_mode(&mut self, on: bool) {
        self.fast_mode = on;
    }

    /// Snapshots the position, applies the move in place, reclassifies.
    pub fn push(&mut self, mv: Move) {
        self.history.push(self.board);
        self.board.apply_move(mv);
        self.update_state();
    }

    /// Restores the previous snapshot; a pop past the bottom is a no-op.
    pub fn pop(&mut self) {
        if let Some(prev) = self.history.pop() {
            self.board = prev;
            self.update_state();
        }
    }

    /// The position after `mv`, without touching the driver.
    pub fn make_copy(&self, mv: Move) -> Board {
        self.board.child(mv)
    }

    pub fn legal_moves(&self, captures_only: bool) -> MoveList {
        generate_legal(&self.board, captures_only)
    }

    /// Cached classification (stale `Ongoing` while fast mode is on).
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Full classification, regardless of fast mode; refreshes the cache.
    pub fn game_state(&mut self) -> GameState {
        self.state = self.classify_state();
        self.state
    }

    fn update_state(&mut self) {
        self.state = if self.fast_mode {
            GameState::Ongoing
        } else {
            self.classify_state()
        };
    }

    fn classify_state(&self) -> GameState {
        if self.legal_moves(false).is_empty() {
            return if in_check(&self.board, self.board.side_to_move()) {
                GameState::Checkmate
            } else {
                GameState::Stalemate
            };
        }
        if self.board.halfmove_clock >= 100 {
            return GameState::Draw50Move;
        }
        if self.is_insufficient_material() {
            return GameState::DrawInsufficientMaterial;
        }
        if self.is_repetition_draw() {
            return GameState::DrawRepetition;
        }
        GameState::Ongoing
    }

    /// The current key has occurred three times counting the position on
    /// the board. Only positions since the last irreversible move can
    /// match, so the scan stops after `halfmove_clock` entries.
    fn is_repetition_draw(&self) -> bool {
        let current = self.board.zobrist;
        let mut count = 1;
        for past in self
            .history
            .iter()
            .rev()
            .take(self.board.halfmove_clock as usize)
        {
            if past.zobrist == current {
                count += 1;
                if count >= 3 {
                    return true;
                }
            }
        }
        false
    }

    /// Dead material: bare kings, a lone minor, or same-coloured bishops
    /// one per side.
    fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = board.kind_bb[Piece::Pawn as usize]
            | board.kind_bb[Piece::Rook as usize]
            | board.kind_bb[Piece::Queen as usize];
        if heavy != 0 {
            return false;
        }

        let white_bishops = board.pieces(Piece::Bishop, Color::White);
        let black_bishops = board.pieces(Piece::Bishop, Color::Black);
        let knights = board.kind_bb[Piece::Knight as usize].count_ones();
        let minors = knights + white_bishops.count_ones() + black_bishops.count_ones();

        match minors {
            0 | 1 => true,
            2 if knights == 0
                && white_bishops.count_ones() == 1
                && black_bishops.count_ones() == 1 =>
            {
                // same square colour on both sides
                (white_bishops & LIGHT_SQUARES != 0) == (black_bishops & LIGHT_SQUARES != 0)
            }
            _ => false,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_restores_the_exact_snapshot() {
        let mut game = Game::new();
        let before = game.board;
        let mv = game.legal_moves(false)[0];
        game.push(mv);
        assert_ne!(game.board, before);
        assert_eq!(game.ply(), 1);
        game.pop();
        assert_eq!(game.board, before);
        assert_eq!(game.ply(), 0);
    }

    #[test]
    fn pop_on_empty_history_is_a_no_op() {
        let mut game = Game::new();
        let before = game.board;
        game.pop();
        assert_eq!(game.board, before);
    }

    #[test]
    fn fast_mode_defers_classification() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.state(), GameState::Stalemate);

        let mut game = Game::new();
        game.set_fast_mode(true);
        let mv = game.legal_moves(false)[0];
        game.push(mv);
        assert_eq!(game.state(), GameState::Ongoing);
        // the full query still classifies
        assert_eq!(game.game_state(), GameState::Ongoing);
    }

    #[test]
    fn light_square_mask_matches_square_parity() {
        // a1 is dark, h1 light, a8 light, h8 dark
        assert_eq!(LIGHT_SQUARES & 1, 0);
        assert_ne!(LIGHT_SQUARES & (1 << 7), 0);
        assert_ne!(LIGHT_SQUARES & (1 << 56), 0);
        assert_eq!(LIGHT_SQUARES & (1 << 63), 0);
    }
}
