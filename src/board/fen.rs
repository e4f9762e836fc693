use super::{Board, Color, Piece};
use super::info::*;
use crate::square::Square;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("missing FEN field: {0}")]
    MissingField(&'static str),
    #[error("bad piece placement: {0}")]
    BadPlacement(String),
    #[error("bad side to move: {0:?}")]
    BadSideToMove(String),
    #[error("bad castling character: {0:?}")]
    BadCastling(char),
    #[error("bad en passant target: {0:?}")]
    BadEnPassant(String),
    #[error("bad halfmove clock: {0:?}")]
    BadClock(String),
}

fn piece_from_char(c: char) -> Option<(Color, Piece)> {
    let colour = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match c.to_ascii_uppercase() {
        'P' => Piece::Pawn,
        'N' => Piece::Knight,
        'B' => Piece::Bishop,
        'R' => Piece::Rook,
        'Q' => Piece::Queen,
        'K' => Piece::King,
        _ => return None,
    };
    Some((colour, kind))
}

fn piece_to_char(colour: Color, kind: Piece) -> char {
    let glyph = match kind {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match colour {
        Color::White => glyph.to_ascii_uppercase(),
        Color::Black => glyph,
    }
}

impl Board {
    /// Loads a position from a FEN record, replacing the current state.
    ///
    /// The halfmove clock field is optional (defaults to 0); the fullmove
    /// number is accepted and discarded.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingField("placement"))?;
        let turn = fields.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = fields.next().ok_or(FenError::MissingField("castling"))?;
        let ep = fields.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove = fields.next();
        let _fullmove = fields.next();

        *self = Board::new_empty();

        // 1. Piece placement, rank 8 down to rank 1.
        let mut rank: i8 = 7;
        let mut file: i8 = 0;
        for c in placement.chars() {
            match c {
                '/' => {
                    if file != 8 || rank == 0 {
                        return Err(FenError::BadPlacement(placement.into()));
                    }
                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => {
                    file += c as i8 - '0' as i8;
                    if file > 8 {
                        return Err(FenError::BadPlacement(placement.into()));
                    }
                }
                _ => {
                    let (colour, kind) = piece_from_char(c)
                        .ok_or_else(|| FenError::BadPlacement(placement.into()))?;
                    if file > 7 {
                        return Err(FenError::BadPlacement(placement.into()));
                    }
                    let idx = (rank * 8 + file) as u8;
                    self.colour_bb[colour as usize] |= 1u64 << idx;
                    self.kind_bb[kind as usize] |= 1u64 << idx;
                    file += 1;
                }
            }
        }
        if rank != 0 || file != 8 {
            return Err(FenError::BadPlacement(placement.into()));
        }

        // 2. Side to move.
        match turn {
            "w" => self.info |= TURN_MASK,
            "b" => self.info &= !TURN_MASK,
            _ => return Err(FenError::BadSideToMove(turn.into())),
        }

        // 3. Castling rights.
        if castling != "-" {
            for c in castling.chars() {
                match c {
                    'K' => self.info |= CASTLE_WK,
                    'Q' => self.info |= CASTLE_WQ,
                    'k' => self.info |= CASTLE_BK,
                    'q' => self.info |= CASTLE_BQ,
                    _ => return Err(FenError::BadCastling(c)),
                }
            }
        }

        // 4. En passant target; only the file is stored.
        if ep != "-" {
            let sq: Square = ep
                .parse()
                .map_err(|_| FenError::BadEnPassant(ep.into()))?;
            self.set_ep_file(sq.file());
        }

        // 5. Halfmove clock.
        if let Some(clock) = halfmove {
            self.halfmove_clock = clock
                .parse()
                .map_err(|_| FenError::BadClock(clock.into()))?;
        }

        self.refresh_zobrist();
        Ok(())
    }

    /// Emits the position as FEN. The en-passant rank is inferred from the
    /// side to move (rank 6 when White moves next, rank 3 when Black does);
    /// the fullmove number is not tracked and is emitted as 1.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((colour, kind)) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(piece_to_char(colour, kind));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side_to_move() == Color::White {
            'w'
        } else {
            'b'
        });

        fen.push(' ');
        if self.has_castling(CASTLE_ALL) {
            if self.has_castling(CASTLE_WK) {
                fen.push('K');
            }
            if self.has_castling(CASTLE_WQ) {
                fen.push('Q');
            }
            if self.has_castling(CASTLE_BK) {
                fen.push('k');
            }
            if self.has_castling(CASTLE_BQ) {
                fen.push('q');
            }
        } else {
            fen.push('-');
        }

        fen.push(' ');
        if self.ep_is_set() {
            fen.push((b'a' + self.ep_file()) as char);
            fen.push(if self.side_to_move() == Color::White {
                '6'
            } else {
                '3'
            });
        } else {
            fen.push('-');
        }

        fen.push_str(&format!(" {} 1", self.halfmove_clock));
        fen
    }

    /// Plain 8x8 rendering, rank 8 at the top, `.` for empty squares.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(8 * 17);
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                let glyph = match self.piece_at(sq) {
                    Some((colour, kind)) => piece_to_char(colour, kind),
                    None => '.',
                };
                out.push(glyph);
                if file < 7 {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }
}
