use super::super::attack_tables::{bishop_attacks, king_attacks, knight_attacks, rook_attacks};
use super::super::types::MoveList;
use super::super::{Bitboard, Board, Move, Piece, Square};
use super::GenKind;

impl Board {
    /// Knight, bishop, rook, queen and king steps, pseudo-legal.
    pub(super) fn generate_piece_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move;
        let enemies = self.occupied_by(us.opponent());
        let targets = match kind {
            GenKind::All => !self.occupied_by(us),
            GenKind::Tactical => enemies,
        };
        let occ = self.all_occupied;

        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            for from in self.pieces(us, piece) {
                let attacks = match piece {
                    Piece::Knight => knight_attacks(from),
                    Piece::Bishop => bishop_attacks(from, occ),
                    Piece::Rook => rook_attacks(from, occ),
                    Piece::Queen => bishop_attacks(from, occ) | rook_attacks(from, occ),
                    _ => king_attacks(from),
                };
                push_targets(moves, from, attacks & targets, enemies);
            }
        }

        if kind == GenKind::All && !self.in_check() {
            self.generate_castling(moves);
        }
    }

    /// Castling moves whose transit squares are empty and unattacked.
    fn generate_castling(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let rank = us.back_rank();
        let Some(king) = Square::new(rank, 4) else {
            return;
        };
        if self.piece_at(king) != Some((us, Piece::King)) {
            return;
        }

        for kingside in [true, false] {
            if !self.castling.has(us, kingside) {
                continue;
            }
            let (rook_file, empty_files, safe_files): (usize, &[usize], [usize; 2]) = if kingside {
                (7, &[5, 6], [5, 6])
            } else {
                (0, &[1, 2, 3], [3, 2])
            };
            let rook_ok = Square::new(rank, rook_file)
                .is_some_and(|sq| self.piece_at(sq) == Some((us, Piece::Rook)));
            if !rook_ok {
                continue;
            }
            let path_clear = empty_files
                .iter()
                .filter_map(|&f| Square::new(rank, f))
                .all(|sq| !self.all_occupied.contains(sq));
            let path_safe = safe_files
                .iter()
                .filter_map(|&f| Square::new(rank, f))
                .all(|sq| !self.is_attacked(sq, them));
            if path_clear && path_safe {
                if let Some(to) = Square::new(rank, if kingside { 6 } else { 2 }) {
                    moves.push(Move::castle(king, to, kingside));
                }
            }
        }
    }
}

#[inline]
fn push_targets(moves: &mut MoveList, from: Square, targets: Bitboard, enemies: Bitboard) {
    for to in targets {
        if enemies.contains(to) {
            moves.push(Move::capture(from, to));
        } else {
            moves.push(Move::quiet(from, to));
        }
    }
}
