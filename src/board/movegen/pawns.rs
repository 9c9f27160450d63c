use super::super::attack_tables::pawn_attacks;
use super::super::types::{MoveList, Piece, PROMOTION_PIECES};
use super::super::{Board, Move, Square};
use super::GenKind;

fn push_promotions(moves: &mut MoveList, from: Square, to: Square, capture: bool) {
    for piece in PROMOTION_PIECES {
        moves.push(Move::promotion(from, to, piece, capture));
    }
}

impl Board {
    /// Pseudo-legal pawn moves. Tactical generation keeps captures,
    /// en passant and every promotion.
    pub(super) fn generate_pawn_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let enemies = self.occupied_by(them);
        let forward = 8 * us.sign();

        for from in self.pieces(us, Piece::Pawn) {
            let push = from.offset(forward);
            if !self.all_occupied.contains(push) {
                if push.rank() == us.promotion_rank() {
                    push_promotions(moves, from, push, false);
                } else if kind == GenKind::All {
                    moves.push(Move::quiet(from, push));
                    if from.rank() == us.pawn_start_rank() {
                        let double = push.offset(forward);
                        if !self.all_occupied.contains(double) {
                            moves.push(Move::double_pawn_push(from, double));
                        }
                    }
                }
            }

            let attacks = pawn_attacks(us, from);
            for to in attacks & enemies {
                if to.rank() == us.promotion_rank() {
                    push_promotions(moves, from, to, true);
                } else {
                    moves.push(Move::capture(from, to));
                }
            }

            if let Some(ep) = self.en_passant {
                if attacks.contains(ep) {
                    moves.push(Move::en_passant(from, ep));
                }
            }
        }
    }
}
