//! Chess board representation and game logic.
//!
//! Uses bitboards for move generation and an incrementally maintained
//! Zobrist hash and piece-square tally. Supports full chess rules including
//! castling, en passant, promotions and draw detection.
//!
//! # Example
//! ```
//! use strix::board::Board;
//!
//! let board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

pub mod attack_tables;
mod error;
pub mod eval;
mod fen;
mod make_unmake;
mod movegen;
pub mod psqt;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use eval::{Evaluator, PsqtEvaluator};
pub use fen::START_FEN;
pub use make_unmake::{NullMoveInfo, UnmakeInfo};
pub use psqt::Score;
pub use state::Board;
pub use types::{Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, Piece, Square, MAX_PLY};

pub(crate) use types::ScoredMoveList;
