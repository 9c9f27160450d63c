use super::attack_tables::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use super::psqt::{self, Score};
use super::types::{Bitboard, CastlingRights, Color, Piece, Square};
use crate::zobrist::ZOBRIST;

/// Full position: bitboards plus a square-indexed mailbox kept in lockstep,
/// game-state fields, and incrementally maintained hash, check and
/// material tallies.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) mailbox: [Option<(Color, Piece)>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    /// Set only when a pawn of the side to move can actually capture there.
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) checkers: Bitboard,
    /// White-relative sum of piece-square scores.
    pub(crate) psq: Score,
    pub(crate) non_pawn_material: [i32; 2],
    /// Hashes of earlier positions, oldest first, for repetition checks.
    pub(crate) history: Vec<u64>,
    /// Plies since the last null move; repetition scans stop there.
    pub(crate) plies_from_null: u32,
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            board.put_piece(Color::White, piece, Square::from_index(file));
            board.put_piece(Color::White, Piece::Pawn, Square::from_index(8 + file));
            board.put_piece(Color::Black, Piece::Pawn, Square::from_index(48 + file));
            board.put_piece(Color::Black, piece, Square::from_index(56 + file));
        }
        board.castling = CastlingRights::all();
        board.refresh_derived_state();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            mailbox: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            checkers: Bitboard::EMPTY,
            psq: Score::ZERO,
            non_pawn_material: [0, 0],
            history: Vec::with_capacity(256),
            plies_from_null: 0,
        }
    }

    /// Place a piece, updating bitboards, mailbox, hash and material.
    #[inline]
    pub(crate) fn put_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bb;
        self.occupied[color.index()] |= bb;
        self.all_occupied |= bb;
        self.mailbox[sq.index()] = Some((color, piece));
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        self.psq += psqt::psq(color, piece, sq);
        self.non_pawn_material[color.index()] += psqt::non_pawn_value(piece);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] ^= bb;
        self.occupied[color.index()] ^= bb;
        self.all_occupied ^= bb;
        self.mailbox[sq.index()] = None;
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        self.psq -= psqt::psq(color, piece, sq);
        self.non_pawn_material[color.index()] -= psqt::non_pawn_value(piece);
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        let bb = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.pieces[color.index()][piece.index()] ^= bb;
        self.occupied[color.index()] ^= bb;
        self.all_occupied ^= bb;
        self.mailbox[from.index()] = None;
        self.mailbox[to.index()] = Some((color, piece));
        self.hash ^= ZOBRIST.piece(color, piece, from) ^ ZOBRIST.piece(color, piece, to);
        self.psq += psqt::psq(color, piece, to) - psqt::psq(color, piece, from);
    }

    /// Recompute hash and checkers after a position was assembled piece by piece.
    pub(crate) fn refresh_derived_state(&mut self) {
        self.hash = self.calculate_hash();
        self.checkers = self.compute_checkers();
    }

    /// Hash from scratch; always equals the incremental `hash()`.
    #[must_use]
    pub fn calculate_hash(&self) -> u64 {
        let mut hash = 0u64;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces[color.index()][piece.index()] {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side();
        }
        hash ^= ZOBRIST.castling(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    pub(crate) fn compute_checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        match self.king_square(us) {
            Some(ksq) => self.attackers_to(ksq, self.all_occupied) & self.occupied[us.opponent().index()],
            None => Bitboard::EMPTY,
        }
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.mailbox[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    /// Total number of pieces on the board, kings included.
    #[inline]
    #[must_use]
    pub fn piece_count(&self) -> u32 {
        self.all_occupied.popcount()
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces(color, Piece::King);
        kings.any().then(|| kings.lsb())
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.checkers.any()
    }

    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    /// White-relative piece-square tally.
    #[inline]
    #[must_use]
    pub fn psq_score(&self) -> Score {
        self.psq
    }

    #[inline]
    #[must_use]
    pub fn non_pawn_material(&self, color: Color) -> i32 {
        self.non_pawn_material[color.index()]
    }

    /// Game phase, 0 (bare endgame) to `psqt::PHASE_MIDGAME`.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> i32 {
        psqt::phase(self.non_pawn_material[0] + self.non_pawn_material[1])
    }

    /// Every piece of either color attacking `sq` given `occupancy`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let bishops_queens = self.pieces[0][Piece::Bishop.index()]
            | self.pieces[1][Piece::Bishop.index()]
            | self.pieces[0][Piece::Queen.index()]
            | self.pieces[1][Piece::Queen.index()];
        let rooks_queens = self.pieces[0][Piece::Rook.index()]
            | self.pieces[1][Piece::Rook.index()]
            | self.pieces[0][Piece::Queen.index()]
            | self.pieces[1][Piece::Queen.index()];
        let knights = self.pieces[0][Piece::Knight.index()] | self.pieces[1][Piece::Knight.index()];
        let kings = self.pieces[0][Piece::King.index()] | self.pieces[1][Piece::King.index()];

        (pawn_attacks(Color::Black, sq) & self.pieces(Color::White, Piece::Pawn))
            | (pawn_attacks(Color::White, sq) & self.pieces(Color::Black, Piece::Pawn))
            | (knight_attacks(sq) & knights)
            | (king_attacks(sq) & kings)
            | (bishop_attacks(sq, occupancy) & bishops_queens)
            | (rook_attacks(sq, occupancy) & rooks_queens)
    }

    /// Whether `by` attacks `sq` in the current occupancy.
    #[inline]
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        (self.attackers_to(sq, self.all_occupied) & self.occupied[by.index()]).any()
    }

    /// Fifty-move rule, repetition, or insufficient mating material.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.halfmove_clock >= 100 || self.is_repetition() || self.is_insufficient_material()
    }

    /// The current position occurred before, looking back no further than
    /// the last irreversible move or null move.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        let window = self.halfmove_clock.min(self.plies_from_null) as usize;
        if window < 4 {
            return false;
        }
        let len = self.history.len();
        // history[len - 1] is the position one ply ago; same side to move is
        // found at even distances.
        let mut distance = 4;
        while distance <= window && distance <= len {
            if self.history[len - distance] == self.hash {
                return true;
            }
            distance += 2;
        }
        false
    }

    /// No pawns, rooks or queens, and at most one minor piece, or only
    /// bishops all on one square color.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawns = [Piece::Pawn, Piece::Rook, Piece::Queen]
            .iter()
            .any(|&p| (self.pieces(Color::White, p) | self.pieces(Color::Black, p)).any());
        if heavy_or_pawns {
            return false;
        }
        let knights = self.pieces(Color::White, Piece::Knight) | self.pieces(Color::Black, Piece::Knight);
        let bishops = self.pieces(Color::White, Piece::Bishop) | self.pieces(Color::Black, Piece::Bishop);
        let minors = knights.popcount() + bishops.popcount();
        if minors <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & Bitboard::DARK_SQUARES).is_empty())
    }

    /// Color-reversed copy: ranks mirrored, piece colors, castling rights and
    /// side to move swapped. Game history is not carried over.
    #[must_use]
    pub fn flipped(&self) -> Board {
        let mut board = Board::empty();
        for (idx, entry) in self.mailbox.iter().enumerate() {
            if let Some((color, piece)) = *entry {
                board.put_piece(color.opponent(), piece, Square::from_index(idx).flip_vertical());
            }
        }
        board.side_to_move = self.side_to_move.opponent();
        board.castling = self.castling.flipped();
        board.en_passant = self.en_passant.map(Square::flip_vertical);
        board.halfmove_clock = self.halfmove_clock;
        board.fullmove_number = self.fullmove_number;
        board.refresh_derived_state();
        board
    }

    /// Mailbox and bitboards describe the same placement, and the
    /// incremental tallies match a recomputation.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut psq = Score::ZERO;
        let mut npm = [0, 0];
        let mut all = Bitboard::EMPTY;
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let bb = Bitboard::from_square(sq);
            match self.mailbox[idx] {
                Some((color, piece)) => {
                    if (self.pieces(color, piece) & bb).is_empty() {
                        return false;
                    }
                    psq += psqt::psq(color, piece, sq);
                    npm[color.index()] += psqt::non_pawn_value(piece);
                    all |= bb;
                }
                None => {
                    if (self.all_occupied & bb).any() {
                        return false;
                    }
                }
            }
        }
        let union = self.pieces[0].iter().chain(self.pieces[1].iter()).fold(Bitboard::EMPTY, |acc, &b| acc | b);
        all == self.all_occupied
            && union == self.all_occupied
            && (self.occupied[0] | self.occupied[1]) == self.all_occupied
            && (self.occupied[0] & self.occupied[1]).is_empty()
            && psq == self.psq
            && npm == self.non_pawn_material
            && self.hash == self.calculate_hash()
            && self.checkers == self.compute_checkers()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
