use super::info::*;
use super::{Board, Color, Piece};
use crate::hash::zobrist::{xor_castling_rights_delta, zobrist_keys};
use crate::moves::types::Move;

/// Rook relocation for a castle, keyed by the king's destination.
#[inline(always)]
fn castle_rook_squares(king_to: u8) -> Option<(u8, u8)> {
    match king_to {
        6 => Some((7, 5)),    // White O-O:   h1 -> f1
        2 => Some((0, 3)),    // White O-O-O: a1 -> d1
        62 => Some((63, 61)), // Black O-O:   h8 -> f8
        58 => Some((56, 59)), // Black O-O-O: a8 -> d8
        _ => None,
    }
}

/// The castling right lost when the rook on `rook_sq` moves or is removed.
#[inline(always)]
fn rook_right_to_clear(colour: Color, rook_sq: u8) -> InfoBits {
    match (colour, rook_sq) {
        (Color::White, 0) => CASTLE_WQ,
        (Color::White, 7) => CASTLE_WK,
        (Color::Black, 56) => CASTLE_BQ,
        (Color::Black, 63) => CASTLE_BK,
        _ => 0,
    }
}

impl Board {
    /// Applies a move in place, keeping the Zobrist key in step with every
    /// flipped bit. The moving and captured piece kinds are read into
    /// locals before anything is written, so the reads can never observe a
    /// partially updated position.
    ///
    /// The move must be pseudo-legal for the side to move; legality
    /// filtering happens in the generator.
    pub fn apply_move(&mut self, mv: Move) {
        let keys = zobrist_keys();
        let from = mv.origin();
        let to = mv.dest();
        let from_idx = from.index();
        let to_idx = to.index();

        let Some((colour, kind)) = self.piece_at(from) else {
            debug_assert!(false, "apply_move from empty square {}", from);
            return;
        };
        debug_assert_eq!(colour, self.side_to_move(), "apply_move out of turn");

        // Any pending en-passant state lapses now; a double push below
        // re-establishes it for the new side to move.
        if self.ep_is_set() {
            self.zobrist ^= keys.ep_file[self.ep_file() as usize];
        }
        self.clear_ep();

        // Identify and remove the captured piece first. For en passant the
        // victim sits one rank behind the destination.
        let mut captured: Option<(Color, Piece, u8)> = None;
        if mv.is_capture() {
            if mv.is_ep_capture() {
                let cap_idx = if colour == Color::White {
                    to_idx - 8
                } else {
                    to_idx + 8
                };
                captured = Some((colour.opposite(), Piece::Pawn, cap_idx));
            } else if let Some((cap_colour, cap_kind)) = self.piece_at(to) {
                captured = Some((cap_colour, cap_kind, to_idx));
            } else {
                debug_assert!(false, "capture flag with empty destination {}", to);
            }
            if let Some((cap_colour, cap_kind, cap_idx)) = captured {
                self.remove(cap_colour, cap_kind, cap_idx);
            }
        }

        self.remove(colour, kind, from_idx);

        if let Some(promo) = mv.promotion_kind() {
            debug_assert_eq!(kind, Piece::Pawn, "promotion by non-pawn");
            self.place(colour, promo, to_idx);
        } else {
            self.place(colour, kind, to_idx);
            if kind == Piece::Pawn && from_idx.abs_diff(to_idx) == 16 {
                let file = to_idx % 8;
                self.set_ep_file(file);
                self.zobrist ^= keys.ep_file[file as usize];
            }
        }

        if mv.is_castle() {
            if let Some((rook_from, rook_to)) = castle_rook_squares(to_idx) {
                self.remove(colour, Piece::Rook, rook_from);
                self.place(colour, Piece::Rook, rook_to);
            }
        }

        if mv.is_capture() || kind == Piece::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // Castling rights: a king move drops both of its rights, a rook
        // leaving its corner drops one, and so does a rook captured on its
        // corner.
        let old_rights = self.info & CASTLE_ALL;
        let mut lost: InfoBits = 0;
        if kind == Piece::King {
            lost |= match colour {
                Color::White => CASTLE_WK | CASTLE_WQ,
                Color::Black => CASTLE_BK | CASTLE_BQ,
            };
        }
        if kind == Piece::Rook {
            lost |= rook_right_to_clear(colour, from_idx);
        }
        if let Some((cap_colour, cap_kind, cap_idx)) = captured {
            if cap_kind == Piece::Rook {
                lost |= rook_right_to_clear(cap_colour, cap_idx);
            }
        }
        let new_rights = old_rights & !lost;
        if new_rights != old_rights {
            xor_castling_rights_delta(&mut self.zobrist, keys, old_rights, new_rights);
            self.info = (self.info & !CASTLE_ALL) | new_rights;
        }

        self.set_side_to_move(colour.opposite());
        self.zobrist ^= keys.side_to_move;

        #[cfg(debug_assertions)]
        self.assert_hash();
    }

    /// Copy-apply: returns the position after `mv` without touching `self`.
    #[inline]
    pub fn child(&self, mv: Move) -> Board {
        let mut next = *self;
        next.apply_move(mv);
        next
    }
}
