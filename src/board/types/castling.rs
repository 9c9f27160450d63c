//! Castling rights.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// Rights that survive a move touching each square. Moving from or capturing
/// on a king or rook home square clears the matching rights.
const fn build_rights_mask() -> [u8; 64] {
    let mut mask = [0x0Fu8; 64];
    mask[Square::E1.index()] = !(CASTLE_WHITE_K | CASTLE_WHITE_Q) & 0x0F;
    mask[Square::H1.index()] = !CASTLE_WHITE_K & 0x0F;
    mask[Square::A1.index()] = !CASTLE_WHITE_Q & 0x0F;
    mask[Square::E8.index()] = !(CASTLE_BLACK_K | CASTLE_BLACK_Q) & 0x0F;
    mask[Square::H8.index()] = !CASTLE_BLACK_K & 0x0F;
    mask[Square::A8.index()] = !CASTLE_BLACK_Q & 0x0F;
    mask
}

pub(crate) static RIGHTS_MASK: [u8; 64] = build_rights_mask();

/// Castling rights as a 4-bit mask (WK, WQ, BK, BQ).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Keep only the rights allowed by a move between `from` and `to`.
    #[inline]
    pub(crate) fn restrict(&mut self, from: Square, to: Square) {
        self.0 &= RIGHTS_MASK[from.index()] & RIGHTS_MASK[to.index()];
    }

    /// Swap White and Black rights.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        CastlingRights(((self.0 & 0x3) << 2) | ((self.0 >> 2) & 0x3))
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}
