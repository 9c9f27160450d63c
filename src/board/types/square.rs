//! Square type.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// A board square stored as its 0-63 index (a1 = 0, b1 = 1, ..., h8 = 63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Bounds-checked constructor from (rank, file), both 0-7.
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Caller guarantees `idx < 64`.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square((idx & 63) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 >> 3) as usize
    }

    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 & 7) as usize
    }

    /// Mirror across the horizontal midline (a1 <-> a8).
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Square offset by `delta` index steps; caller keeps the result on board.
    #[inline]
    #[must_use]
    pub(crate) const fn offset(self, delta: i32) -> Self {
        Square((self.0 as i32 + delta) as u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file() as u8) as char,
            self.rank() + 1
        )
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (usize, usize)) -> Result<Self, Self::Error> {
        if rank >= 8 {
            return Err(SquareError::RankOutOfBounds { rank });
        }
        if file >= 8 {
            return Err(SquareError::FileOutOfBounds { file });
        }
        Ok(Square((rank * 8 + file) as u8))
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let invalid = || SquareError::InvalidNotation {
            notation: s.to_string(),
        };
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = match bytes[0] {
            b'a'..=b'h' => (bytes[0] - b'a') as usize,
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => (bytes[1] - b'1') as usize,
            _ => return Err(invalid()),
        };
        Ok(Square((rank * 8 + file) as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_agree() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let parsed: Square = sq.to_string().parse().expect("valid square");
            assert_eq!(parsed, sq);
        }
    }

    #[test]
    fn rejects_bad_notation() {
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!(Square::try_from((8, 0)).is_err());
    }

    #[test]
    fn flip_vertical_maps_ranks() {
        let e2: Square = "e2".parse().unwrap();
        assert_eq!(e2.flip_vertical().to_string(), "e7");
    }
}
