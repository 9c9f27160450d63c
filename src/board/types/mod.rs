//! Core chess types: pieces, colors, squares, bitboards, moves and
//! castling rights.

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList, MAX_PLY};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use moves::ScoredMoveList;
pub(crate) use piece::PROMOTION_PIECES;
