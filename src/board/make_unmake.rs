use super::attack_tables::pawn_attacks;
use super::state::Board;
use super::types::{Bitboard, CastlingRights, Color, Move, Piece, Square};
use crate::zobrist::ZOBRIST;

/// Everything `unmake_move` needs that cannot be derived from the move.
#[derive(Clone, Copy, Debug)]
pub struct UnmakeInfo {
    moved: Piece,
    captured: Option<Piece>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    checkers: Bitboard,
    plies_from_null: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct NullMoveInfo {
    en_passant: Option<Square>,
    halfmove_clock: u32,
    hash: u64,
    checkers: Bitboard,
    plies_from_null: u32,
}

/// Rook origin and destination for a castling move landing the king on `king_to`.
#[inline]
fn castling_rook_squares(king_to: Square, kingside: bool) -> (Square, Square) {
    if kingside {
        (king_to.offset(1), king_to.offset(-1))
    } else {
        (king_to.offset(-2), king_to.offset(1))
    }
}

/// Square of the pawn removed by an en passant capture landing on `to`.
#[inline]
fn en_passant_victim(us: Color, to: Square) -> Square {
    to.offset(-8 * us.sign())
}

impl Board {
    /// Apply a legal move in place.
    ///
    /// # Panics
    ///
    /// Panics if the origin square is empty; callers must only pass moves
    /// produced by the move generator for this position.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let moved = match self.mailbox[from.index()] {
            Some((_, piece)) => piece,
            None => panic!("make_move {mv}: no piece on {from}"),
        };

        let mut info = UnmakeInfo {
            moved,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            checkers: self.checkers,
            plies_from_null: self.plies_from_null,
        };

        self.history.push(self.hash);

        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.en_passant(ep);
        }

        if mv.is_en_passant() {
            self.remove_piece(them, Piece::Pawn, en_passant_victim(us, to));
            info.captured = Some(Piece::Pawn);
        } else if mv.is_capture() {
            if let Some((_, victim)) = self.mailbox[to.index()] {
                self.remove_piece(them, victim, to);
                info.captured = Some(victim);
            }
        }

        match mv.promotion_piece() {
            Some(promoted) => {
                self.remove_piece(us, Piece::Pawn, from);
                self.put_piece(us, promoted, to);
            }
            None => self.move_piece(us, moved, from, to),
        }

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to, mv.is_castle_kingside());
            self.move_piece(us, Piece::Rook, rook_from, rook_to);
        }

        if self.castling.as_u8() != 0 {
            self.hash ^= ZOBRIST.castling(self.castling);
            self.castling.restrict(from, to);
            self.hash ^= ZOBRIST.castling(self.castling);
        }

        if mv.is_double_pawn_push() {
            let ep = from.offset(8 * us.sign());
            if (pawn_attacks(us, ep) & self.pieces(them, Piece::Pawn)).any() {
                self.en_passant = Some(ep);
                self.hash ^= ZOBRIST.en_passant(ep);
            }
        }

        if moved == Piece::Pawn || info.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= ZOBRIST.side();
        self.plies_from_null += 1;
        self.checkers = self.compute_checkers();

        info
    }

    /// Revert `mv`, which must be the last move made with `make_move`.
    pub fn unmake_move(&mut self, mv: Move, info: UnmakeInfo) {
        let us = self.side_to_move.opponent();
        let them = self.side_to_move;
        let from = mv.from();
        let to = mv.to();

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to, mv.is_castle_kingside());
            self.move_piece(us, Piece::Rook, rook_to, rook_from);
        }

        match mv.promotion_piece() {
            Some(promoted) => {
                self.remove_piece(us, promoted, to);
                self.put_piece(us, Piece::Pawn, from);
            }
            None => self.move_piece(us, info.moved, to, from),
        }

        if let Some(victim) = info.captured {
            let sq = if mv.is_en_passant() {
                en_passant_victim(us, to)
            } else {
                to
            };
            self.put_piece(them, victim, sq);
        }

        self.side_to_move = us;
        self.castling = info.castling;
        self.en_passant = info.en_passant;
        self.halfmove_clock = info.halfmove_clock;
        self.fullmove_number = info.fullmove_number;
        self.hash = info.hash;
        self.checkers = info.checkers;
        self.plies_from_null = info.plies_from_null;
        self.history.pop();
    }

    /// Pass the turn. Must not be called while in check.
    pub fn make_null_move(&mut self) -> NullMoveInfo {
        debug_assert!(!self.in_check(), "null move while in check");
        let info = NullMoveInfo {
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            checkers: self.checkers,
            plies_from_null: self.plies_from_null,
        };

        self.history.push(self.hash);
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.en_passant(ep);
        }
        self.side_to_move = self.side_to_move.opponent();
        self.hash ^= ZOBRIST.side();
        self.halfmove_clock += 1;
        self.plies_from_null = 0;
        self.checkers = Bitboard::EMPTY;
        info
    }

    pub fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant = info.en_passant;
        self.halfmove_clock = info.halfmove_clock;
        self.hash = info.hash;
        self.checkers = info.checkers;
        self.plies_from_null = info.plies_from_null;
        self.history.pop();
    }
}
