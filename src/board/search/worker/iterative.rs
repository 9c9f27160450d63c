use std::thread;
use std::time::Duration;

use super::super::constants::{is_decisive, mate_distance, score_to_tt, EVAL_NONE, INFINITE};
use super::super::SearchIterationInfo;
use super::{Aborted, CompletedIteration, NodeResult, SearchWorker, WorkerReport};
use crate::tt::Bound;

/// Window width beyond which aspiration gives up and searches full width.
const ASPIRATION_LIMIT: i32 = 1000;

/// Poll interval while an infinite search waits for its stop.
const IDLE_POLL: Duration = Duration::from_millis(1);

impl SearchWorker {
    /// Iterative deepening from depth 1 until a limit or the stop flag.
    pub(crate) fn run(mut self) -> WorkerReport {
        let mut aborted = false;
        // Odd helpers skip the first depth to stagger against the others.
        let first_depth = 1 + (self.id % 2) as u32;

        if !self.root_moves.is_empty() {
            for depth in first_depth..=self.max_depth.max(first_depth) {
                if self.shared.stop.is_stopped() {
                    break;
                }
                match self.aspiration(depth as i32) {
                    Ok(score) => self.finish_iteration(depth, score),
                    Err(Aborted) => {
                        aborted = true;
                        break;
                    }
                }
                if self.is_main() && self.should_stop_after_iteration() {
                    break;
                }
            }
        }

        if self.is_main() {
            if self.infinite {
                while !self.shared.stop.is_stopped() {
                    thread::sleep(IDLE_POLL);
                }
            }
            self.shared.stop.stop();
        }
        self.flush_nodes();

        WorkerReport {
            completed: self.completed,
            partial_best: self.partial_best,
            aborted,
        }
    }

    fn should_stop_after_iteration(&self) -> bool {
        let Some(time) = &self.time else {
            return false;
        };
        // With a single legal reply there is nothing to think about.
        time.should_stop_soft() || self.root_moves.len() == 1
    }

    fn aspiration(&mut self, depth: i32) -> NodeResult {
        let params = &self.shared.params;
        let mut delta = params.aspiration_delta.max(1);
        let previous = self.completed.as_ref().map(|c| c.score);

        let (mut alpha, mut beta) = match previous {
            Some(score) if depth >= params.aspiration_min_depth && !is_decisive(score) => {
                ((score - delta).max(-INFINITE), (score + delta).min(INFINITE))
            }
            _ => (-INFINITE, INFINITE),
        };

        loop {
            let score = self.search_root(depth, alpha, beta)?;
            if score <= alpha && alpha > -INFINITE {
                beta = (alpha + beta) / 2;
                alpha = (score - delta).max(-INFINITE);
            } else if score >= beta && beta < INFINITE {
                beta = (score + delta).min(INFINITE);
            } else {
                return Ok(score);
            }
            delta += delta / 2;
            if delta > ASPIRATION_LIMIT {
                alpha = -INFINITE;
                beta = INFINITE;
            }
        }
    }

    /// One pass over the root moves. Moves that do not beat alpha keep
    /// `-INFINITE` and sink when the list is re-sorted.
    fn search_root(&mut self, depth: i32, mut alpha: i32, beta: i32) -> NodeResult {
        self.pv_len[0] = 0;
        self.frames[0].extensions = 0;
        self.frames[0].static_eval = if self.board.in_check() {
            EVAL_NONE
        } else {
            self.evaluate()
        };
        for root_move in &mut self.root_moves {
            root_move.score = -INFINITE;
        }
        let mut best_score = -INFINITE;

        for i in 0..self.root_moves.len() {
            let mv = self.root_moves[i].mv;
            self.frames[0].current_move = mv;

            let info = self.board.make_move(mv);
            let gives_check = self.board.in_check();
            let extension = self.extension(gives_check || self.root_moves.len() == 1, 0);
            self.frames[1].extensions = extension;
            let result = self.search_child(depth - 1 + extension, 0, alpha, beta, 0, i == 0);
            self.board.unmake_move(mv, info);
            let score = result?;

            let root_move = &mut self.root_moves[i];
            if i == 0 || score > alpha {
                root_move.score = score;
                root_move.pv.clear();
                root_move.pv.push(mv);
                let child_len = self.pv_len[1].max(1);
                root_move.pv.extend_from_slice(&self.pv[1][1..child_len]);
                if score > best_score {
                    self.partial_best = Some((mv, score));
                }
            } else {
                root_move.score = -INFINITE;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                    if score >= beta {
                        break;
                    }
                }
            }
        }

        // Stable sort keeps the previous order among unresolved moves.
        self.root_moves.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(best_score)
    }

    fn finish_iteration(&mut self, depth: u32, score: i32) {
        let best = &self.root_moves[0];
        let completed = CompletedIteration {
            depth,
            score,
            pv: best.pv.clone(),
        };
        let best_move = best.mv;
        self.shared.tt.store(
            self.board.hash(),
            Some(best_move),
            score_to_tt(score, 0),
            self.frames[0].static_eval,
            depth as i32,
            Bound::Exact,
        );
        self.completed = Some(completed);
        self.partial_best = None;

        if !self.is_main() {
            return;
        }
        if let Some(time) = self.time.as_mut() {
            time.update_iteration(best_move, score);
        }
        let nodes = self.flush_nodes();
        let elapsed = self.start.elapsed();
        let time_ms = elapsed.as_millis() as u64;
        let info = SearchIterationInfo {
            depth,
            seldepth: self.shared.seldepth.get() as u32,
            score,
            mate_in: mate_distance(score),
            nodes,
            nps: if time_ms > 0 { nodes * 1000 / time_ms } else { nodes },
            time_ms,
            pv: self.completed.as_ref().map(|c| c.pv.clone()).unwrap_or_default(),
            hashfull: self.shared.tt.hashfull_per_mille(),
            tb_hits: self.shared.tb_hits.get(),
        };
        log::debug!(
            "depth {} seldepth {} score {} nodes {} time {}ms pv {}",
            info.depth,
            info.seldepth,
            info.score,
            info.nodes,
            info.time_ms,
            info.pv_string()
        );
        if let Some(callback) = &self.callback {
            callback(&info);
        }
    }
}
