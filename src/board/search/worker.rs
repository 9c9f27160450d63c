//! A single search thread: private board copy, ordering tables, PV table,
//! and the recursive alpha-beta driver.
//!
//! Every node returns a [`NodeResult`]. The stop flag is checked on node
//! entry and surfaces as `Err(Aborted)`, which `?` carries to the
//! iterative-deepening loop. Moves are always unmade before `?` is applied
//! so the board is intact whichever way a call returns.

mod iterative;
mod ordering;
mod pruning;
mod quiescence;

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::constants::{
    mate_in, mated_in, score_from_tt, score_to_tt, DRAW, EVAL_LIMIT, EVAL_NONE, INFINITE,
    NODE_CHECK_INTERVAL, TB_WIN_BOUND,
};
use super::heuristics::{CaptureHistory, HistoryTable, KillerTable, LmrTable};
use super::smp::SharedSearchState;
use super::SearchInfoCallback;
use crate::board::{Board, Move, MoveList, MAX_PLY};
use crate::engine::TimeManager;
use crate::tt::Bound;

/// Raised through `?` when the stop flag is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Aborted;

pub(crate) type NodeResult = Result<i32, Aborted>;

#[derive(Clone, Copy)]
struct Frame {
    static_eval: i32,
    extensions: i32,
    current_move: Move,
}

impl Frame {
    const EMPTY: Frame = Frame {
        static_eval: EVAL_NONE,
        extensions: 0,
        current_move: Move::NULL,
    };
}

#[derive(Clone, Debug)]
struct RootMove {
    mv: Move,
    score: i32,
    pv: Vec<Move>,
}

/// Deepest iteration this worker finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CompletedIteration {
    pub(crate) depth: u32,
    pub(crate) score: i32,
    pub(crate) pv: Vec<Move>,
}

#[derive(Debug)]
pub(crate) struct WorkerReport {
    pub(crate) completed: Option<CompletedIteration>,
    /// Best root move of an interrupted iteration, if one was scored.
    pub(crate) partial_best: Option<(Move, i32)>,
    pub(crate) aborted: bool,
}

/// Everything a worker needs besides the shared state.
pub(crate) struct WorkerSetup {
    pub(crate) id: usize,
    pub(crate) board: Board,
    pub(crate) root_moves: Vec<Move>,
    pub(crate) max_depth: u32,
    pub(crate) infinite: bool,
    pub(crate) time: Option<TimeManager>,
    pub(crate) callback: Option<SearchInfoCallback>,
    pub(crate) start: Instant,
}

pub(crate) struct SearchWorker {
    id: usize,
    board: Board,
    shared: Arc<SharedSearchState>,
    root_moves: Vec<RootMove>,
    max_depth: u32,
    infinite: bool,
    time: Option<TimeManager>,
    callback: Option<SearchInfoCallback>,
    start: Instant,
    killers: KillerTable,
    history: HistoryTable,
    capture_history: CaptureHistory,
    lmr: LmrTable,
    frames: Box<[Frame; MAX_PLY + 2]>,
    pv: Box<[[Move; MAX_PLY + 1]; MAX_PLY + 1]>,
    pv_len: [usize; MAX_PLY + 2],
    nodes: u64,
    flushed_nodes: u64,
    seldepth: usize,
    completed: Option<CompletedIteration>,
    partial_best: Option<(Move, i32)>,
}

impl SearchWorker {
    pub(crate) fn new(setup: WorkerSetup, shared: Arc<SharedSearchState>) -> Self {
        let mut root_moves: Vec<RootMove> = setup
            .root_moves
            .iter()
            .map(|&mv| RootMove {
                mv,
                score: -INFINITE,
                pv: vec![mv],
            })
            .collect();

        let tt_move = shared
            .tt
            .probe(setup.board.hash())
            .and_then(|entry| entry.best_move);
        if let Some(pos) = root_moves.iter().position(|rm| Some(rm.mv) == tt_move) {
            root_moves[..=pos].rotate_right(1);
        }
        // Helpers start from a different move order so their trees diverge.
        if setup.id > 0 && root_moves.len() > 2 {
            let mut rng = StdRng::seed_from_u64(setup.id as u64);
            root_moves[1..].shuffle(&mut rng);
        }

        let lmr = LmrTable::new(shared.params.lmr_divisor);
        SearchWorker {
            id: setup.id,
            board: setup.board,
            shared,
            root_moves,
            max_depth: setup.max_depth,
            infinite: setup.infinite,
            time: setup.time,
            callback: setup.callback,
            start: setup.start,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            capture_history: CaptureHistory::new(),
            lmr,
            frames: Box::new([Frame::EMPTY; MAX_PLY + 2]),
            pv: Box::new([[Move::NULL; MAX_PLY + 1]; MAX_PLY + 1]),
            pv_len: [0; MAX_PLY + 2],
            nodes: 0,
            flushed_nodes: 0,
            seldepth: 0,
            completed: None,
            partial_best: None,
        }
    }

    #[inline]
    fn is_main(&self) -> bool {
        self.id == 0
    }

    /// Count the node and observe the stop flag.
    #[inline]
    fn check_stop(&mut self) -> Result<(), Aborted> {
        self.nodes += 1;
        if self.nodes & (NODE_CHECK_INTERVAL - 1) == 0 {
            self.poll_limits();
        }
        if self.shared.stop.is_stopped() {
            Err(Aborted)
        } else {
            Ok(())
        }
    }

    fn poll_limits(&mut self) {
        let total = self.flush_nodes();
        if self.shared.node_limit.is_some_and(|limit| total >= limit) {
            self.shared.stop.stop();
        }
        if self.time.as_ref().is_some_and(TimeManager::hard_expired) {
            self.shared.stop.stop();
        }
    }

    /// Publish local counters; returns the global node count.
    fn flush_nodes(&mut self) -> u64 {
        let delta = self.nodes - self.flushed_nodes;
        self.flushed_nodes = self.nodes;
        self.shared.seldepth.raise_to(self.seldepth as u64);
        self.shared.nodes.add(delta)
    }

    #[inline]
    fn evaluate(&self) -> i32 {
        self.shared
            .evaluator
            .evaluate(&self.board)
            .clamp(-EVAL_LIMIT, EVAL_LIMIT)
    }

    #[inline]
    fn update_pv(&mut self, ply: usize, mv: Move) {
        self.pv[ply][ply] = mv;
        let child_len = self.pv_len[ply + 1].max(ply + 1);
        for i in (ply + 1)..child_len {
            self.pv[ply][i] = self.pv[ply + 1][i];
        }
        self.pv_len[ply] = child_len;
    }

    /// Search one already-made move: full window for the first move,
    /// otherwise a (possibly reduced) null window with re-searches.
    fn search_child(
        &mut self,
        new_depth: i32,
        reduction: i32,
        alpha: i32,
        beta: i32,
        ply: usize,
        first: bool,
    ) -> NodeResult {
        if first {
            return Ok(-self.alphabeta(new_depth, -beta, -alpha, ply + 1)?);
        }
        let mut score = -self.alphabeta(new_depth - reduction, -alpha - 1, -alpha, ply + 1)?;
        if score > alpha && reduction > 0 {
            score = -self.alphabeta(new_depth, -alpha - 1, -alpha, ply + 1)?;
        }
        if score > alpha && score < beta {
            score = -self.alphabeta(new_depth, -beta, -alpha, ply + 1)?;
        }
        Ok(score)
    }

    fn alphabeta(&mut self, mut depth: i32, mut alpha: i32, mut beta: i32, ply: usize) -> NodeResult {
        let pv_node = beta - alpha > 1;
        self.pv_len[ply] = ply;

        if depth <= 0 {
            return self.quiescence(alpha, beta, ply, 0);
        }
        self.check_stop()?;
        self.seldepth = self.seldepth.max(ply);

        let in_check = self.board.in_check();
        if ply >= MAX_PLY - 1 {
            return Ok(if in_check { DRAW } else { self.evaluate() });
        }
        if self.board.is_draw() {
            return Ok(DRAW);
        }

        alpha = alpha.max(mated_in(ply));
        beta = beta.min(mate_in(ply + 1));
        if alpha >= beta {
            return Ok(alpha);
        }

        let hash = self.board.hash();
        let tt_entry = self.shared.tt.probe(hash);
        let tt_move = tt_entry.and_then(|entry| entry.best_move);
        if let Some(entry) = tt_entry {
            if !pv_node && i32::from(entry.depth) >= depth {
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

        if let Some(score) = self.probe_tablebase(depth, ply) {
            return Ok(score);
        }

        let static_eval = if in_check {
            EVAL_NONE
        } else {
            tt_entry
                .map(|entry| entry.static_eval)
                .filter(|&eval| eval != EVAL_NONE)
                .unwrap_or_else(|| self.evaluate())
        };
        self.frames[ply].static_eval = static_eval;
        let improving = !in_check
            && ply >= 2
            && self.frames[ply - 2].static_eval != EVAL_NONE
            && static_eval > self.frames[ply - 2].static_eval;

        if !pv_node && !in_check {
            if let Some(score) = self.prune_before_moves(depth, beta, static_eval, improving, ply)? {
                return Ok(score);
            }
        }

        let moves = self.board.generate_moves();
        if moves.is_empty() {
            return Ok(if in_check { mated_in(ply) } else { DRAW });
        }

        if tt_move.is_none() && depth >= self.shared.params.iir_min_depth {
            depth -= 1;
        }

        let single_reply = moves.len() == 1;
        let mut ordered = self.score_moves(&moves, tt_move, ply);
        let mut quiets_tried = MoveList::new();
        let mut best_score = -INFINITE;
        let mut best_move = None;
        let mut searched = 0usize;
        let mut index = 0;

        while let Some(scored) = ordered.pick_best(index) {
            index += 1;
            let mv = scored.mv;
            let quiet = !mv.is_tactical();

            self.frames[ply].current_move = mv;
            let info = self.board.make_move(mv);
            let gives_check = self.board.in_check();

            if searched > 0
                && !pv_node
                && !in_check
                && quiet
                && !gives_check
                && best_score > -TB_WIN_BOUND
                && self.futility_prunes(depth, alpha, static_eval)
            {
                self.board.unmake_move(mv, info);
                continue;
            }

            let extension = self.extension(gives_check || single_reply, ply);
            self.frames[ply + 1].extensions = self.frames[ply].extensions + extension;
            let new_depth = depth - 1 + extension;
            let reduction = if quiet && !in_check && !gives_check {
                self.reduction(depth, searched, pv_node, improving, scored.score)
                    .clamp(0, (new_depth - 1).max(0))
            } else {
                0
            };

            let result = self.search_child(new_depth, reduction, alpha, beta, ply, searched == 0);
            self.board.unmake_move(mv, info);
            let score = result?;
            searched += 1;

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = Some(mv);
                    self.update_pv(ply, mv);
                    if score >= beta {
                        self.record_cutoff(mv, depth, ply, &quiets_tried);
                        break;
                    }
                    alpha = score;
                }
            }
            if quiet {
                quiets_tried.push(mv);
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_move.is_some() {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.shared.tt.store(
            hash,
            best_move,
            score_to_tt(best_score, ply),
            static_eval,
            depth,
            bound,
        );
        Ok(best_score)
    }
}
