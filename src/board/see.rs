//! Static exchange evaluation.
//!
//! Plays out the capture sequence on one square, each side always
//! recapturing with its least valuable attacker, and returns the material
//! balance for the side making the first capture. Sliders hidden behind
//! a capturer join the sequence as the square is uncovered.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::state::Board;
use super::types::{Bitboard, Move, Piece};

const MAX_EXCHANGES: usize = 32;

impl Board {
    /// Exchange balance of `mv` in centipawns from the mover's side.
    /// Quiet moves and castling score zero.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        if mv.is_castling() {
            return 0;
        }
        let from = mv.from();
        let to = mv.to();
        let Some((us, mut attacker)) = self.piece_at(from) else {
            return 0;
        };

        let mut occupancy = self.all_occupied ^ Bitboard::from_square(from);
        let mut gain = [0i32; MAX_EXCHANGES];
        gain[0] = if mv.is_en_passant() {
            occupancy ^= Bitboard::from_square(to.offset(-8 * us.sign()));
            Piece::Pawn.see_value()
        } else {
            self.piece_at(to).map_or(0, |(_, victim)| victim.see_value())
        };
        if let Some(promoted) = mv.promotion_piece() {
            gain[0] += promoted.see_value() - Piece::Pawn.see_value();
            attacker = promoted;
        }

        let diagonal = self.sliders(Piece::Bishop);
        let straight = self.sliders(Piece::Rook);
        let mut attackers = self.attackers_to(to, occupancy) & occupancy;
        let mut side = us.opponent();
        let mut depth = 0;

        loop {
            let ours = attackers & self.occupied_by(side);
            if ours.is_empty() || depth + 1 >= MAX_EXCHANGES {
                break;
            }
            depth += 1;
            gain[depth] = attacker.see_value() - gain[depth - 1];

            let Some((piece, bb)) = self.least_valuable(ours) else {
                break;
            };
            // A king may only recapture when nothing defends the square.
            if piece == Piece::King && (attackers & self.occupied_by(side.opponent())).any() {
                depth -= 1;
                break;
            }
            occupancy ^= bb;
            attackers ^= bb;
            if matches!(piece, Piece::Pawn | Piece::Bishop | Piece::Queen) {
                attackers |= bishop_attacks(to, occupancy) & diagonal & occupancy;
            }
            if matches!(piece, Piece::Rook | Piece::Queen) {
                attackers |= rook_attacks(to, occupancy) & straight & occupancy;
            }
            attacker = piece;
            side = side.opponent();
        }

        while depth > 0 {
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
            depth -= 1;
        }
        gain[0]
    }

    /// Whether the exchange started by `mv` nets at least `threshold`.
    #[inline]
    #[must_use]
    pub fn see_ge(&self, mv: Move, threshold: i32) -> bool {
        self.see(mv) >= threshold
    }

    /// Sliders of both colors moving like `kind` (queens included).
    fn sliders(&self, kind: Piece) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for color in super::Color::BOTH {
            bb |= self.pieces(color, kind) | self.pieces(color, Piece::Queen);
        }
        bb
    }

    fn least_valuable(&self, candidates: Bitboard) -> Option<(Piece, Bitboard)> {
        for piece in Piece::ALL {
            for color in super::Color::BOTH {
                let found = candidates & self.pieces(color, piece);
                if found.any() {
                    return Some((piece, Bitboard::from_square(found.lsb())));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn see_of(fen: &str, mv: &str) -> i32 {
        let board = Board::from_fen(fen).unwrap();
        let mv = board.parse_move(mv).unwrap();
        board.see(mv)
    }

    #[test]
    fn undefended_piece_wins_its_value() {
        assert_eq!(see_of("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5"), 100);
    }

    #[test]
    fn defended_pawn_costs_the_queen() {
        assert_eq!(
            see_of("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1", "d1d5"),
            100 - 950
        );
    }

    #[test]
    fn xray_rook_backs_up_capture() {
        // Rxd5 cxd5 Rxd5: wins pawn + pawn - rook.
        assert_eq!(
            see_of("4k3/8/2p5/3p4/8/8/3R4/3RK3 w - - 0 1", "d2d5"),
            100 - 500 + 100
        );
    }

    #[test]
    fn king_cannot_recapture_defended_square() {
        // Qxf7+ with the bishop on c4 behind: the king may not retake.
        assert_eq!(
            see_of("4k3/5p2/8/8/2B5/8/8/4KQ2 w - - 0 1", "f1f7"),
            100
        );
    }
}
