//! Piece-square tables with tapered (middlegame, endgame) scores.
//!
//! Each entry already includes the piece value. Bonus tables are written
//! for White on files a-d and mirrored onto e-h; Black's entries are the
//! negated vertical mirror of White's, so the sum over a position is always
//! White-relative and exactly antisymmetric under a color flip.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use once_cell::sync::Lazy;

use super::types::{Color, Piece, Square};

/// A (middlegame, endgame) score pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub mg: i32,
    pub eg: i32,
}

impl Score {
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    #[must_use]
    pub const fn new(mg: i32, eg: i32) -> Self {
        Score { mg, eg }
    }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score {
        Score::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl Sub for Score {
    type Output = Score;
    fn sub(self, rhs: Score) -> Score {
        Score::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl Neg for Score {
    type Output = Score;
    fn neg(self) -> Score {
        Score::new(-self.mg, -self.eg)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Score) {
        self.mg -= rhs.mg;
        self.eg -= rhs.eg;
    }
}

/// Material values in internal units, indexed by piece.
pub const PIECE_VALUE_MG: [i32; 6] = [188, 753, 826, 1285, 2513, 0];
pub const PIECE_VALUE_EG: [i32; 6] = [248, 832, 897, 1371, 2650, 0];

/// Non-pawn material (middlegame values, both sides) bounding the phase.
pub const MIDGAME_LIMIT: i32 = 15258;
pub const ENDGAME_LIMIT: i32 = 3915;
pub const PHASE_MIDGAME: i32 = 128;

const fn s(mg: i32, eg: i32) -> Score {
    Score::new(mg, eg)
}

/// `BONUS[piece][rank][min(file, 7 - file)]` for White.
#[rustfmt::skip]
const BONUS: [[[Score; 4]; 8]; 6] = [
    [ // Pawn
        [s(0, 0), s(0, 0), s(0, 0), s(0, 0)],
        [s(-11, 7), s(6, -4), s(7, 8), s(3, -2)],
        [s(-18, -4), s(-2, -5), s(19, 5), s(24, 4)],
        [s(-17, 3), s(-9, 3), s(20, -8), s(35, -3)],
        [s(-6, 8), s(5, 9), s(3, 7), s(21, -6)],
        [s(-6, 8), s(-8, -5), s(-6, 2), s(-2, 4)],
        [s(-4, 3), s(20, -9), s(-8, 1), s(-4, 18)],
        [s(0, 0), s(0, 0), s(0, 0), s(0, 0)],
    ],
    [ // Knight
        [s(-133, -88), s(-87, -72), s(-72, -38), s(-65, -8)],
        [s(-75, -60), s(-37, -46), s(-16, -11), s(-6, 14)],
        [s(-64, -42), s(-17, -32), s(4, -1), s(12, 32)],
        [s(-20, -33), s(21, -18), s(45, 11), s(49, 42)],
        [s(-21, -38), s(19, -18), s(40, 8), s(51, 44)],
        [s(-7, -46), s(39, -31), s(57, -1), s(66, 31)],
        [s(-55, -56), s(-12, -42), s(9, -17), s(17, 18)],
        [s(-180, -98), s(-59, -79), s(-36, -42), s(-24, -7)],
    ],
    [ // Bishop
        [s(-41, -52), s(-12, -25), s(-23, -31), s(-31, -14)],
        [s(-19, -28), s(18, -4), s(11, -9), s(1, 8)],
        [s(-8, -18), s(25, 5), s(19, 2), s(10, 20)],
        [s(-10, -21), s(26, 2), s(19, 0), s(9, 20)],
        [s(-10, -21), s(22, 1), s(15, -2), s(8, 18)],
        [s(-16, -19), s(15, 3), s(11, 5), s(2, 17)],
        [s(-21, -28), s(15, -5), s(5, -7), s(-2, 10)],
        [s(-32, -49), s(-10, -26), s(-18, -30), s(-27, -12)],
    ],
    [ // Rook
        [s(-25, 0), s(-16, 0), s(-16, 0), s(-9, 0)],
        [s(-21, 0), s(-8, 0), s(-3, 0), s(0, 0)],
        [s(-21, 0), s(-9, 0), s(-4, 0), s(2, 0)],
        [s(-22, 0), s(-6, 0), s(-1, 0), s(2, 0)],
        [s(-22, 0), s(-7, 0), s(0, 0), s(1, 0)],
        [s(-21, 0), s(-7, 0), s(0, 0), s(2, 0)],
        [s(-12, 0), s(4, 0), s(8, 0), s(12, 0)],
        [s(-23, 0), s(-15, 0), s(-11, 0), s(-5, 0)],
    ],
    [ // Queen
        [s(0, -64), s(-4, -49), s(-3, -35), s(-1, -23)],
        [s(-4, -49), s(6, -24), s(9, -15), s(8, 0)],
        [s(-2, -33), s(6, -11), s(9, -2), s(9, 10)],
        [s(-1, -23), s(8, 0), s(10, 14), s(7, 24)],
        [s(-3, -21), s(9, 0), s(8, 15), s(7, 26)],
        [s(-2, -34), s(6, -10), s(8, -4), s(10, 8)],
        [s(-2, -48), s(7, -24), s(7, -15), s(6, -1)],
        [s(-1, -67), s(-4, -48), s(-1, -36), s(0, -24)],
    ],
    [ // King
        [s(267, 0), s(320, 49), s(270, 76), s(195, 85)],
        [s(264, 44), s(304, 93), s(238, 145), s(180, 134)],
        [s(200, 84), s(245, 140), s(176, 170), s(110, 168)],
        [s(177, 108), s(185, 172), s(148, 172), s(110, 182)],
        [s(149, 110), s(177, 166), s(115, 203), s(66, 206)],
        [s(118, 97), s(159, 157), s(84, 179), s(41, 177)],
        [s(86, 51), s(128, 101), s(63, 124), s(18, 141)],
        [s(63, 9), s(89, 56), s(47, 81), s(0, 91)],
    ],
];

/// `[color][piece][square]`, White-relative.
static PSQ: Lazy<[[[Score; 64]; 6]; 2]> = Lazy::new(|| {
    let mut table = [[[Score::ZERO; 64]; 6]; 2];
    for piece in Piece::ALL {
        let p = piece.index();
        let value = Score::new(PIECE_VALUE_MG[p], PIECE_VALUE_EG[p]);
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let folded_file = sq.file().min(7 - sq.file());
            let white = value + BONUS[p][sq.rank()][folded_file];
            table[Color::White.index()][p][idx] = white;
            table[Color::Black.index()][p][sq.flip_vertical().index()] = -white;
        }
    }
    table
});

#[inline]
#[must_use]
pub fn psq(color: Color, piece: Piece, sq: Square) -> Score {
    PSQ[color.index()][piece.index()][sq.index()]
}

/// Middlegame value counted toward the game phase; zero for pawns and kings.
#[inline]
#[must_use]
pub const fn non_pawn_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn | Piece::King => 0,
        _ => PIECE_VALUE_MG[piece.index()],
    }
}

/// Game phase in `0..=PHASE_MIDGAME` from total non-pawn material.
#[inline]
#[must_use]
pub fn phase(non_pawn_material: i32) -> i32 {
    let npm = non_pawn_material.clamp(ENDGAME_LIMIT, MIDGAME_LIMIT);
    ((npm - ENDGAME_LIMIT) * PHASE_MIDGAME) / (MIDGAME_LIMIT - ENDGAME_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_entries_mirror_white() {
        for piece in Piece::ALL {
            for idx in 0..64 {
                let sq = Square::from_index(idx);
                assert_eq!(
                    psq(Color::Black, piece, sq.flip_vertical()),
                    -psq(Color::White, piece, sq)
                );
            }
        }
    }

    #[test]
    fn phase_bounds() {
        assert_eq!(phase(0), 0);
        assert_eq!(phase(MIDGAME_LIMIT * 2), PHASE_MIDGAME);
    }
}
