//! Move encoding and fixed-capacity move lists.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

const FLAG_QUIET: u16 = 0;
const FLAG_DOUBLE_PAWN: u16 = 1;
const FLAG_CASTLE_KINGSIDE: u16 = 2;
const FLAG_CASTLE_QUEENSIDE: u16 = 3;
const FLAG_CAPTURE: u16 = 4;
const FLAG_EN_PASSANT: u16 = 5;
const FLAG_PROMOTION: u16 = 8;
const FLAG_PROMOTION_CAPTURE: u16 = 12;

/// Promotion flag offsets, indexed by `flag & 3`.
const PROMOTION_BY_OFFSET: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// Compact 16-bit move.
///
/// - bits 0-5:   origin square
/// - bits 6-11:  destination square
/// - bits 12-15: kind (quiet, double push, castles, capture, en passant,
///   promotion with the piece in the low two bits, promotion capture)
///
/// The all-zero value is reserved as the null move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    pub const NULL: Move = Move(0);

    #[inline]
    const fn with_flag(from: Square, to: Square, flag: u16) -> Self {
        Move(from.index() as u16 | ((to.index() as u16) << 6) | (flag << 12))
    }

    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_QUIET)
    }

    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_DOUBLE_PAWN)
    }

    #[inline]
    #[must_use]
    pub const fn capture(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_CAPTURE)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_EN_PASSANT)
    }

    /// King move of a castle; `to` is the king's destination.
    #[inline]
    #[must_use]
    pub const fn castle(from: Square, to: Square, kingside: bool) -> Self {
        let flag = if kingside {
            FLAG_CASTLE_KINGSIDE
        } else {
            FLAG_CASTLE_QUEENSIDE
        };
        Move::with_flag(from, to, flag)
    }

    /// Promotion to `piece`; pawns and kings fall back to a queen.
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece, capture: bool) -> Self {
        let offset = match piece {
            Piece::Knight => 0,
            Piece::Bishop => 1,
            Piece::Rook => 2,
            _ => 3,
        };
        let base = if capture {
            FLAG_PROMOTION_CAPTURE
        } else {
            FLAG_PROMOTION
        };
        Move::with_flag(from, to, base | offset)
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> 6) & 0x3F) as usize)
    }

    #[inline]
    const fn flag(self) -> u16 {
        self.0 >> 12
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Captures, including en passant and promotion captures.
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        let f = self.flag();
        f == FLAG_CAPTURE || f == FLAG_EN_PASSANT || f >= FLAG_PROMOTION_CAPTURE
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == FLAG_EN_PASSANT
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        let f = self.flag();
        f == FLAG_CASTLE_KINGSIDE || f == FLAG_CASTLE_QUEENSIDE
    }

    #[inline]
    #[must_use]
    pub const fn is_castle_kingside(self) -> bool {
        self.flag() == FLAG_CASTLE_KINGSIDE
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        self.flag() == FLAG_DOUBLE_PAWN
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.flag() >= FLAG_PROMOTION
    }

    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        if self.is_promotion() {
            Some(PROMOTION_BY_OFFSET[(self.flag() & 3) as usize])
        } else {
            None
        }
    }

    /// Captures and promotions.
    #[inline]
    #[must_use]
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        Move(value)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Move(null)");
        }
        write!(f, "Move({self}")?;
        if self.is_capture() {
            write!(f, " x")?;
        }
        if self.is_castling() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

/// Coordinate notation (`e2e4`, `e7e8q`); the null move prints as `0000`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// Maximum search ply, bounding every per-ply array.
pub const MAX_PLY: usize = 128;

/// Move list backed by a fixed array.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Move {
        &self.as_slice()[idx]
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Moves paired with ordering scores, consumed best-first.
pub(crate) struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::NULL,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    /// Selection step: swap the best remaining move into `start` and return it.
    /// Ties keep generation order.
    #[inline]
    pub fn pick_best(&mut self, start: usize) -> Option<ScoredMove> {
        if start >= self.len {
            return None;
        }
        let mut best_idx = start;
        for i in (start + 1)..self.len {
            if self.moves[i].score > self.moves[best_idx].score {
                best_idx = i;
            }
        }
        self.moves.swap(start, best_idx);
        Some(self.moves[start])
    }
}
