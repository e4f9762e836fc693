use crate::board::info::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, InfoBits};
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Fixed seed: the table must be identical across runs so perft results and
/// transposition-table keys are reproducible.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct ZobristKeys {
    /// [colour][kind][square] with {White=0, Black=1} and {P,N,B,R,Q,K}={0..5}
    pub piece: [[[u64; 64]; 6]; 2],
    /// Xored into the hash when White is to move.
    pub side_to_move: u64,
    /// [0]=K, [1]=Q, [2]=k, [3]=q
    pub castling: [u64; 4],
    /// a..h => 0..7; xored only while the en-passant bit is set.
    pub ep_file: [u64; 8],
}

/// Global keys, initialized on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

/// Xors the castling keys for every right that differs between `old` and
/// `new_` into `hash`.
#[inline]
pub fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old: InfoBits, new_: InfoBits) {
    let d = old ^ new_;
    if d & CASTLE_WK != 0 {
        *hash ^= keys.castling[0];
    }
    if d & CASTLE_WQ != 0 {
        *hash ^= keys.castling[1];
    }
    if d & CASTLE_BK != 0 {
        *hash ^= keys.castling[2];
    }
    if d & CASTLE_BQ != 0 {
        *hash ^= keys.castling[3];
    }
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // zero is the empty-hash sentinel; keep it out of the table
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };

    for colour in 0..2 {
        for kind in 0..6 {
            for sq in 0..64 {
                keys.piece[colour][kind][sq] = non_zero(&mut rng);
            }
        }
    }

    keys.side_to_move = non_zero(&mut rng);

    for i in 0..4 {
        keys.castling[i] = non_zero(&mut rng);
    }

    for f in 0..8 {
        keys.ep_file[f] = non_zero(&mut rng);
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_generations() {
        let a = generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED));
        let b = generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED));
        assert_eq!(a.piece[0][0][0], b.piece[0][0][0]);
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.castling, b.castling);
        assert_eq!(a.ep_file, b.ep_file);
    }

    #[test]
    fn castling_delta_is_its_own_inverse() {
        let keys = zobrist_keys();
        let mut hash = 0xDEAD_BEEFu64;
        let original = hash;
        xor_castling_rights_delta(&mut hash, keys, 0, CASTLE_WK | CASTLE_BQ);
        assert_ne!(hash, original);
        xor_castling_rights_delta(&mut hash, keys, CASTLE_WK | CASTLE_BQ, 0);
        assert_eq!(hash, original);
    }
}
