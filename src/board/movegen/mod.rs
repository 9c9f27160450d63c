//! Move generation: pseudo-legal generation per piece family followed by a
//! legality filter that tests the king's safety on the resulting occupancy
//! without making the move.

mod pawns;
mod pieces;

use super::error::MoveParseError;
use super::{Bitboard, Board, Move, MoveList, Piece, Square};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum GenKind {
    All,
    /// Captures (en passant included) and promotions.
    Tactical,
}

impl Board {
    fn generate_pseudo_moves(&self, kind: GenKind) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pawn_moves(kind, &mut moves);
        self.generate_piece_moves(kind, &mut moves);
        moves
    }

    fn filter_legal(&self, pseudo: &MoveList) -> MoveList {
        let mut legal = MoveList::new();
        for &mv in pseudo {
            if self.is_pseudo_move_legal(mv) {
                legal.push(mv);
            }
        }
        legal
    }

    /// Whether a pseudo-legal move leaves the mover's king safe.
    /// Castling is fully validated during generation.
    fn is_pseudo_move_legal(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let enemies = self.occupied_by(us.opponent());
        let Some(king) = self.king_square(us) else {
            return true;
        };
        let from = mv.from();
        let to = mv.to();
        let from_bb = Bitboard::from_square(from);
        let to_bb = Bitboard::from_square(to);

        if mv.is_castling() {
            return true;
        }
        if from == king {
            let occ = self.all_occupied ^ from_bb;
            return (self.attackers_to(to, occ) & enemies).is_empty();
        }
        if mv.is_en_passant() {
            let victim = Bitboard::from_square(to.offset(-8 * us.sign()));
            let occ = (self.all_occupied ^ from_bb ^ victim) | to_bb;
            return (self.attackers_to(king, occ) & enemies & !victim).is_empty();
        }
        let occ = (self.all_occupied ^ from_bb) | to_bb;
        (self.attackers_to(king, occ) & enemies & !to_bb).is_empty()
    }

    /// All legal moves for the side to move.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.filter_legal(&self.generate_pseudo_moves(GenKind::All))
    }

    /// Legal captures, en passant captures and promotions.
    #[must_use]
    pub fn generate_tactical_moves(&self) -> MoveList {
        self.filter_legal(&self.generate_pseudo_moves(GenKind::Tactical))
    }

    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        !mv.is_null() && self.generate_moves().contains(mv)
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.generate_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.generate_moves().is_empty()
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &mv in &moves {
            let info = self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.unmake_move(mv, info);
        }
        nodes
    }

    /// Parse a coordinate move such as `e2e4` or `e7e8q` and match it
    /// against the legal moves of this position.
    pub fn parse_move(&self, notation: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&notation.len()) || !notation.is_ascii() {
            return Err(MoveParseError::InvalidLength {
                len: notation.len(),
            });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: notation.to_string(),
        };
        let from: Square = notation[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = notation[2..4].parse().map_err(|_| invalid_square())?;
        let promotion = match notation[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c.to_ascii_lowercase()) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.generate_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: notation.to_string(),
            })
    }
}
