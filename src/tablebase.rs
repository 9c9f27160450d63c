//! Endgame tablebase probing.
//!
//! The search only sees [`TablebaseProbe`]. A probe must answer from memory
//! without blocking; anything it cannot answer immediately is `None`.

use crate::board::{Board, Color, Piece};

/// Game-theoretic outcome for the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wdl {
    Loss,
    Draw,
    Win,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TbResult {
    pub wdl: Wdl,
    /// Plies to the end of the game (mate or conversion) under best play.
    pub distance: u32,
}

pub trait TablebaseProbe: Send + Sync {
    /// Largest piece count (kings included) this source can answer.
    fn max_pieces(&self) -> u32;

    fn probe(&self, board: &Board) -> Option<TbResult>;
}

/// No tablebases installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTablebase;

impl TablebaseProbe for NoTablebase {
    fn max_pieces(&self) -> u32 {
        0
    }

    fn probe(&self, _board: &Board) -> Option<TbResult> {
        None
    }
}

/// Answers the minor-piece endings that cannot be won by force: each side
/// has a king and at most one knight or bishop.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialDrawProbe;

impl TablebaseProbe for MaterialDrawProbe {
    fn max_pieces(&self) -> u32 {
        4
    }

    fn probe(&self, board: &Board) -> Option<TbResult> {
        if board.piece_count() > self.max_pieces() {
            return None;
        }
        let drawn = Color::BOTH.iter().all(|&color| {
            let heavy_or_pawn = [Piece::Pawn, Piece::Rook, Piece::Queen]
                .iter()
                .any(|&p| board.pieces(color, p).any());
            let minors = board.pieces(color, Piece::Knight).popcount()
                + board.pieces(color, Piece::Bishop).popcount();
            !heavy_or_pawn && minors <= 1
        });
        drawn.then_some(TbResult {
            wdl: Wdl::Draw,
            distance: 0,
        })
    }
}
