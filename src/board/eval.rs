//! Static evaluation.
//!
//! Search only depends on the [`Evaluator`] trait. The built-in
//! [`PsqtEvaluator`] tapers the incrementally maintained piece-square
//! tally between middlegame and endgame by game phase.

use super::psqt::{self, Score, PHASE_MIDGAME};
use super::{Board, Color, Piece};

/// Scores a position in centipawns from the side to move's point of view.
///
/// Implementations must be deterministic and antisymmetric: passing the
/// turn without changing the placement negates the score.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board) -> i32;
}

const BISHOP_PAIR: Score = Score::new(90, 110);

#[derive(Clone, Copy, Debug, Default)]
pub struct PsqtEvaluator;

impl PsqtEvaluator {
    /// White-relative tapered score in internal units.
    fn white_relative(board: &Board) -> i32 {
        let mut score = board.psq_score();
        for color in Color::BOTH {
            if board.pieces(color, Piece::Bishop).more_than_one() {
                let bonus = BISHOP_PAIR;
                score += if color == Color::White { bonus } else { -bonus };
            }
        }
        let phase = board.phase();
        (score.mg * phase + score.eg * (PHASE_MIDGAME - phase)) / PHASE_MIDGAME
    }
}

impl Evaluator for PsqtEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let internal = Self::white_relative(board) * board.side_to_move().sign();
        internal * 100 / psqt::PIECE_VALUE_EG[Piece::Pawn.index()]
    }
}
