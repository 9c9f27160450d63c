use super::super::constants::{mated_in, score_from_tt, score_to_tt, DRAW, EVAL_NONE, INFINITE};
use super::ordering::captured_piece;
use super::{NodeResult, SearchWorker};
use crate::board::{Piece, MAX_PLY};
use crate::tt::Bound;

impl SearchWorker {
    /// Search captures and promotions until the position is quiet. In
    /// check every evasion is searched and there is no stand-pat.
    pub(super) fn quiescence(&mut self, mut alpha: i32, beta: i32, ply: usize, qdepth: i32) -> NodeResult {
        self.pv_len[ply] = ply;
        self.check_stop()?;
        self.seldepth = self.seldepth.max(ply);

        let in_check = self.board.in_check();
        if ply >= MAX_PLY - 1 {
            return Ok(if in_check { DRAW } else { self.evaluate() });
        }
        if self.board.is_draw() {
            return Ok(DRAW);
        }

        let pv_node = beta - alpha > 1;
        let hash = self.board.hash();
        let tt_entry = self.shared.tt.probe(hash);
        if let Some(entry) = tt_entry {
            if !pv_node {
                let score = score_from_tt(entry.score, ply);
                let usable = match entry.bound {
                    Bound::Exact => true,
                    Bound::Lower => score >= beta,
                    Bound::Upper => score <= alpha,
                };
                if usable {
                    return Ok(score);
                }
            }
        }
        let tt_move = tt_entry.and_then(|entry| entry.best_move);

        let (moves, stand_pat) = if in_check {
            let evasions = self.board.generate_moves();
            if evasions.is_empty() {
                return Ok(mated_in(ply));
            }
            (evasions, EVAL_NONE)
        } else {
            let stand_pat = tt_entry
                .map(|entry| entry.static_eval)
                .filter(|&eval| eval != EVAL_NONE)
                .unwrap_or_else(|| self.evaluate());
            if stand_pat >= beta {
                return Ok(stand_pat);
            }
            if qdepth >= self.shared.params.qsearch_max_depth {
                return Ok(stand_pat);
            }
            alpha = alpha.max(stand_pat);
            (self.board.generate_tactical_moves(), stand_pat)
        };

        let original_alpha = alpha;
        let mut best_score = if in_check { -INFINITE } else { stand_pat };
        let mut best_move = None;
        let mut ordered = self.score_tactical(&moves, tt_move);
        let mut index = 0;

        while let Some(scored) = ordered.pick_best(index) {
            index += 1;
            let mv = scored.mv;

            if !in_check {
                if !self.board.see_ge(mv, 0) {
                    continue;
                }
                // Delta pruning: even winning the victim outright stays below alpha.
                let gain = captured_piece(&self.board, mv).map_or(0, Piece::see_value);
                if !mv.is_promotion() && stand_pat + gain + self.shared.params.delta_margin <= alpha {
                    continue;
                }
            }

            let info = self.board.make_move(mv);
            let result = self.quiescence(-beta, -alpha, ply + 1, qdepth + 1);
            self.board.unmake_move(mv, info);
            let score = -result?;

            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                    best_move = Some(mv);
                    self.update_pv(ply, mv);
                    if score >= beta {
                        break;
                    }
                }
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if alpha > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.shared.tt.store(
            hash,
            best_move,
            score_to_tt(best_score, ply),
            stand_pat,
            0,
            bound,
        );
        Ok(best_score)
    }
}
