use super::super::constants::{
    BAD_CAPTURE_SCORE, GOOD_CAPTURE_SCORE, KILLER1_SCORE, KILLER2_SCORE, TT_MOVE_SCORE,
};
use super::super::heuristics::history_bonus;
use super::SearchWorker;
use crate::board::{Board, Move, MoveList, Piece, ScoredMoveList};

/// Spacing between exchange gains, wider than any MVV/LVA score so the
/// exchange gain always dominates.
const SEE_ORDER_SCALE: i32 = 1 << 15;

/// Piece removed by `mv`, if any.
#[inline]
pub(super) fn captured_piece(board: &Board, mv: Move) -> Option<Piece> {
    if mv.is_en_passant() {
        Some(Piece::Pawn)
    } else if mv.is_capture() {
        board.piece_at(mv.to()).map(|(_, piece)| piece)
    } else {
        None
    }
}

impl SearchWorker {
    /// Most valuable victim first, cheapest attacker breaking ties, nudged
    /// by capture history. Promotions count the promoted piece as gain.
    fn mvv_lva(&self, mv: Move) -> i32 {
        let attacker = self
            .board
            .piece_at(mv.from())
            .map_or(Piece::Pawn, |(_, piece)| piece);
        let victim = captured_piece(&self.board, mv);
        let promotion = mv.promotion_piece().map_or(0, Piece::see_value);
        let history = victim.map_or(0, |v| self.capture_history.score(attacker, v) / 32);
        victim.map_or(0, Piece::see_value) * 16 + promotion * 16 - attacker.index() as i32 + history
    }

    /// Full-width ordering: TT move, winning captures by exchange gain with
    /// MVV/LVA breaking ties, killers, quiet history, then losing captures.
    pub(super) fn score_moves(&self, moves: &MoveList, tt_move: Option<Move>, ply: usize) -> ScoredMoveList {
        let us = self.board.side_to_move();
        let killers = self.killers.get(ply);
        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            let score = if Some(mv) == tt_move {
                TT_MOVE_SCORE
            } else if mv.is_tactical() {
                let see = self.board.see(mv);
                if see >= 0 {
                    GOOD_CAPTURE_SCORE + see * SEE_ORDER_SCALE + self.mvv_lva(mv)
                } else {
                    BAD_CAPTURE_SCORE + self.mvv_lva(mv)
                }
            } else if mv == killers[0] {
                KILLER1_SCORE
            } else if mv == killers[1] {
                KILLER2_SCORE
            } else {
                self.history.score(us, mv)
            };
            scored.push(mv, score);
        }
        scored
    }

    /// Quiescence ordering: TT move, then MVV/LVA.
    pub(super) fn score_tactical(&self, moves: &MoveList, tt_move: Option<Move>) -> ScoredMoveList {
        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            let score = if Some(mv) == tt_move {
                TT_MOVE_SCORE
            } else {
                self.mvv_lva(mv)
            };
            scored.push(mv, score);
        }
        scored
    }

    /// Reward the move that failed high and penalize the quiets tried before it.
    pub(super) fn record_cutoff(&mut self, mv: Move, depth: i32, ply: usize, quiets_tried: &MoveList) {
        let bonus = history_bonus(depth);
        let us = self.board.side_to_move();
        if mv.is_tactical() {
            let attacker = self.board.piece_at(mv.from()).map(|(_, piece)| piece);
            if let (Some(attacker), Some(victim)) = (attacker, captured_piece(&self.board, mv)) {
                self.capture_history.update(attacker, victim, bonus);
            }
            return;
        }
        self.killers.update(ply, mv);
        self.history.update(us, mv, bonus);
        for &quiet in quiets_tried {
            self.history.update(us, quiet, -bonus);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use super::super::super::params::SearchParams;
    use super::super::super::smp::SharedSearchState;
    use super::super::WorkerSetup;
    use super::*;
    use crate::board::PsqtEvaluator;
    use crate::sync::{Counter, StopFlag};
    use crate::tablebase::NoTablebase;
    use crate::tt::TranspositionTable;

    fn worker_for(fen: &str) -> SearchWorker {
        let board = Board::from_fen(fen).unwrap();
        let shared = Arc::new(SharedSearchState {
            tt: Arc::new(TranspositionTable::new(1).unwrap()),
            evaluator: Arc::new(PsqtEvaluator),
            tablebase: Arc::new(NoTablebase),
            params: SearchParams::default(),
            stop: StopFlag::new(),
            nodes: Counter::default(),
            seldepth: Counter::default(),
            tb_hits: Counter::default(),
            node_limit: None,
            tb_probe_limit: 0,
        });
        let setup = WorkerSetup {
            id: 0,
            root_moves: board.generate_moves().iter().copied().collect(),
            board,
            max_depth: 1,
            infinite: false,
            time: None,
            callback: None,
            start: Instant::now(),
        };
        SearchWorker::new(setup, shared)
    }

    fn ordered(worker: &SearchWorker, tt_move: Option<Move>) -> Vec<String> {
        let moves = worker.board.generate_moves();
        let mut scored = worker.score_moves(&moves, tt_move, 0);
        let mut out = Vec::new();
        let mut i = 0;
        while let Some(next) = scored.pick_best(i) {
            out.push(next.mv.to_string());
            i += 1;
        }
        out
    }

    // Nxc6 wins a rook for a knight (+180); dxe5 wins a bishop outright (+330).
    const EXCHANGE_FEN: &str = "7k/1p6/2r5/N3b3/3P4/8/8/6K1 w - - 0 1";

    #[test]
    fn winning_captures_follow_exchange_gain() {
        let worker = worker_for(EXCHANGE_FEN);
        let order = ordered(&worker, None);
        assert_eq!(&order[..2], ["d4e5", "a5c6"]);
    }

    #[test]
    fn tt_move_precedes_every_capture() {
        let worker = worker_for(EXCHANGE_FEN);
        let quiet = worker.board.parse_move("g1f1").unwrap();
        let order = ordered(&worker, Some(quiet));
        assert_eq!(&order[..3], ["g1f1", "d4e5", "a5c6"]);
    }

    #[test]
    fn losing_captures_come_last() {
        // The queen takes a pawn guarded by another pawn.
        let worker = worker_for("7k/8/2p5/3p4/8/3Q4/8/6K1 w - - 0 1");
        let order = ordered(&worker, None);
        assert_eq!(order.last().map(String::as_str), Some("d3d5"));
    }
}
