use std::fmt;
use std::str::FromStr;

use super::attack_tables::pawn_attacks;
use super::error::FenError;
use super::{Bitboard, Board, Color, Piece, Square};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a position from FEN.
    ///
    /// The halfmove and fullmove fields are optional. Castling rights whose
    /// king or rook is not on its home square are dropped, and an en passant
    /// square is kept only when a pawn can actually capture there, so equal
    /// positions always hash equally.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut board = Board::empty();
        parse_placement(&mut board, parts[0])?;

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        parse_castling(&mut board, parts[2])?;
        board.en_passant = parse_en_passant(&board, parts[3])?;

        if let Some(field) = parts.get(4) {
            board.halfmove_clock = field.parse().map_err(|_| FenError::InvalidHalfmoveClock {
                found: (*field).to_string(),
            })?;
        }
        if let Some(field) = parts.get(5) {
            board.fullmove_number = match field.parse::<u32>() {
                Ok(n) => n.max(1),
                Err(_) => {
                    return Err(FenError::InvalidFullmoveNumber {
                        found: (*field).to_string(),
                    })
                }
            };
        }

        validate(&board)?;
        board.refresh_derived_state();
        Ok(board)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.mailbox[rank * 8 + file] {
                    Some((color, piece)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let mut castling = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.castling.has(color, kingside) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }
}

fn parse_placement(board: &mut Board, field: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let sq = Square::new(rank, file).ok_or(FenError::BadRankLength {
                rank: rank + 1,
                files: file + 1,
            })?;
            board.put_piece(color, piece, sq);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadRankLength {
                rank: rank + 1,
                files: file,
            });
        }
    }
    Ok(())
}

fn parse_castling(board: &mut Board, field: &str) -> Result<(), FenError> {
    if field == "-" {
        return Ok(());
    }
    for c in field.chars() {
        let (color, kingside) = match c {
            'K' => (Color::White, true),
            'Q' => (Color::White, false),
            'k' => (Color::Black, true),
            'q' => (Color::Black, false),
            _ => return Err(FenError::InvalidCastling { char: c }),
        };
        let rank = color.back_rank();
        let rook_file = if kingside { 7 } else { 0 };
        let home = |file: usize, piece: Piece| {
            Square::new(rank, file).is_some_and(|sq| board.mailbox[sq.index()] == Some((color, piece)))
        };
        if home(4, Piece::King) && home(rook_file, Piece::Rook) {
            board.castling.set(color, kingside);
        }
    }
    Ok(())
}

fn parse_en_passant(board: &Board, field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant {
        found: field.to_string(),
    };
    let ep: Square = field.parse().map_err(|_| invalid())?;
    let us = board.side_to_move;
    let them = us.opponent();
    let expected_rank = match us {
        Color::White => 5,
        Color::Black => 2,
    };
    if ep.rank() != expected_rank {
        return Err(invalid());
    }

    let pushed_pawn = ep.offset(-8 * us.sign());
    let has_pushed_pawn = board.pieces(them, Piece::Pawn).contains(pushed_pawn);
    let can_capture = (pawn_attacks(them, ep) & board.pieces(us, Piece::Pawn)).any();
    Ok((has_pushed_pawn && can_capture && !board.all_occupied.contains(ep)).then_some(ep))
}

fn validate(board: &Board) -> Result<(), FenError> {
    for color in Color::BOTH {
        let count = board.pieces(color, Piece::King).popcount();
        if count != 1 {
            return Err(FenError::KingCount {
                color: match color {
                    Color::White => "white",
                    Color::Black => "black",
                },
                count,
            });
        }
    }
    let pawns = board.pieces(Color::White, Piece::Pawn) | board.pieces(Color::Black, Piece::Pawn);
    if (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).any() {
        return Err(FenError::PawnOnBackRank);
    }
    let them = board.side_to_move.opponent();
    if let Some(king) = board.king_square(them) {
        if board.is_attacked(king, board.side_to_move) {
            return Err(FenError::OpponentInCheck);
        }
    }
    Ok(())
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = match self.mailbox[rank * 8 + file] {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}
