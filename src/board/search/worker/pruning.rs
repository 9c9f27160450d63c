use super::super::constants::{score_to_tt, DRAW, EVAL_NONE, KILLER2_SCORE, TB_WIN, TB_WIN_BOUND};
use super::{Aborted, SearchWorker};
use crate::board::Move;
use crate::tablebase::Wdl;
use crate::tt::Bound;

impl SearchWorker {
    /// Reverse futility and null-move pruning, tried before any move is
    /// generated. Only called at non-PV nodes not in check.
    pub(super) fn prune_before_moves(
        &mut self,
        depth: i32,
        beta: i32,
        static_eval: i32,
        improving: bool,
        ply: usize,
    ) -> Result<Option<i32>, Aborted> {
        let params = &self.shared.params;

        if depth <= params.rfp_max_depth
            && static_eval.abs() < TB_WIN_BOUND
            && static_eval - params.rfp_margin * (depth - i32::from(improving)) >= beta
        {
            return Ok(Some(static_eval));
        }

        let us = self.board.side_to_move();
        let null_allowed = depth >= params.null_min_depth
            && static_eval >= beta
            && beta.abs() < TB_WIN_BOUND
            && self.board.non_pawn_material(us) > 0
            && ply > 0
            && !self.frames[ply - 1].current_move.is_null();
        if !null_allowed {
            return Ok(None);
        }

        let r = params.null_base_reduction + depth / params.null_depth_divisor.max(1);
        self.frames[ply].current_move = Move::NULL;
        self.frames[ply + 1].extensions = self.frames[ply].extensions;
        let info = self.board.make_null_move();
        let result = self.alphabeta(depth - r, -beta, -beta + 1, ply + 1);
        self.board.unmake_null_move(info);
        let score = -result?;

        if score >= beta {
            // Unproven mates from a null search are not trusted.
            return Ok(Some(if score >= TB_WIN_BOUND { beta } else { score }));
        }
        Ok(None)
    }

    /// Whether a quiet, non-checking move at this depth cannot raise alpha.
    pub(super) fn futility_prunes(&self, depth: i32, alpha: i32, static_eval: i32) -> bool {
        let params = &self.shared.params;
        depth <= params.futility_max_depth
            && static_eval + params.futility_base + params.futility_margin * depth <= alpha
    }

    /// One ply for checks and forced replies, until the path ceiling.
    pub(super) fn extension(&self, forcing: bool, ply: usize) -> i32 {
        i32::from(forcing && self.frames[ply].extensions < self.shared.params.max_extensions)
    }

    /// Late-move reduction for a quiet move. Killers and moves searched
    /// before the threshold are not reduced.
    pub(super) fn reduction(
        &self,
        depth: i32,
        searched: usize,
        pv_node: bool,
        improving: bool,
        order_score: i32,
    ) -> i32 {
        let params = &self.shared.params;
        if depth < params.lmr_min_depth
            || searched < params.lmr_min_moves
            || order_score >= KILLER2_SCORE
        {
            return 0;
        }
        let mut r = self.lmr.reduction(depth, searched);
        if !pv_node {
            r += 1;
        }
        if improving {
            r -= 1;
        }
        r.max(0)
    }

    /// Probe the tablebase when few enough pieces remain. Wins and losses
    /// rank just inside the mate range, nearer results first.
    pub(super) fn probe_tablebase(&mut self, depth: i32, ply: usize) -> Option<i32> {
        let limit = self.shared.tb_probe_limit;
        if limit == 0 || self.board.piece_count() > limit {
            return None;
        }
        let result = self.shared.tablebase.probe(&self.board)?;
        self.shared.tb_hits.add(1);
        let score = match result.wdl {
            Wdl::Win => TB_WIN - ply as i32,
            Wdl::Loss => -TB_WIN + ply as i32,
            Wdl::Draw => DRAW,
        };
        self.shared.tt.store(
            self.board.hash(),
            None,
            score_to_tt(score, ply),
            EVAL_NONE,
            depth,
            Bound::Exact,
        );
        Some(score)
    }
}
