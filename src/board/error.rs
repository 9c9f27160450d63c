//! Error types for board construction and text parsing.

use std::fmt;

/// FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewParts { found: usize },
    /// Placement field does not describe exactly 8 ranks
    WrongRankCount { found: usize },
    /// Invalid piece character in placement field
    InvalidPiece { char: char },
    /// A rank describes more or fewer than 8 files
    BadRankLength { rank: usize, files: usize },
    /// Side to move must be 'w' or 'b'
    InvalidSideToMove { found: String },
    InvalidCastling { char: char },
    InvalidEnPassant { found: String },
    InvalidHalfmoveClock { found: String },
    InvalidFullmoveNumber { found: String },
    /// Each side needs exactly one king
    KingCount { color: &'static str, count: u32 },
    /// Pawns may not stand on the first or last rank
    PawnOnBackRank,
    /// The side not to move is in check
    OpponentInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::BadRankLength { rank, files } => {
                write!(f, "Rank {rank} describes {files} files, expected 8")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "Invalid halfmove clock '{found}'")
            }
            FenError::InvalidFullmoveNumber { found } => {
                write!(f, "Invalid fullmove number '{found}'")
            }
            FenError::KingCount { color, count } => {
                write!(f, "{color} has {count} kings, expected exactly 1")
            }
            FenError::PawnOnBackRank => write!(f, "Pawn on first or last rank"),
            FenError::OpponentInCheck => write!(f, "Side not to move is in check"),
        }
    }
}

impl std::error::Error for FenError {}

/// Coordinate move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string must be 4 or 5 characters
    InvalidLength { len: usize },
    InvalidSquare { notation: String },
    InvalidPromotion { char: char },
    /// Well-formed but not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    RankOutOfBounds { rank: usize },
    FileOutOfBounds { file: usize },
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_errors_name_the_offending_input() {
        assert!(FenError::TooFewParts { found: 2 }.to_string().contains('2'));
        assert!(FenError::InvalidPiece { char: 'z' }.to_string().contains("'z'"));
        let err = FenError::KingCount {
            color: "white",
            count: 2,
        };
        assert!(err.to_string().starts_with("white has 2"));
    }

    #[test]
    fn move_errors_name_the_move() {
        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert!(err.to_string().contains("e2e5"));
        assert!(MoveParseError::InvalidLength { len: 3 }.to_string().contains('3'));
    }

    #[test]
    fn square_errors_display() {
        assert!(SquareError::FileOutOfBounds { file: 10 }.to_string().contains("10"));
        let err = SquareError::InvalidNotation {
            notation: "xyz".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
    }
}
