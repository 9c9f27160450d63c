//! Zobrist keys for incremental position hashing.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{CastlingRights, Color, Piece, Square};

pub(crate) struct ZobristKeys {
    /// `[color][piece][square]`
    pieces: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    /// One key per castling-rights bit.
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);
        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in &mut pieces {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let black_to_move = rng.gen();
        let castling = [rng.gen(), rng.gen(), rng.gen(), rng.gen()];
        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }
        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant_file,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move
    }

    /// XOR of the keys of every right held.
    #[inline]
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let bits = rights.as_u8();
        let mut key = 0;
        for (i, k) in self.castling.iter().enumerate() {
            if bits & (1 << i) != 0 {
                key ^= k;
            }
        }
        key
    }

    #[inline]
    pub(crate) fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_file[sq.file()]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);
