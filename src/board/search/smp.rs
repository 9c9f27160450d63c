//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! Every worker searches the same root independently with its own board
//! copy and ordering tables. The transposition table is the only channel
//! between them. Helpers start from a shuffled root order and odd helpers
//! skip depth 1, so their trees drift apart and fill the table with entries
//! the primary worker can use. Only the primary worker's result is
//! reported; helpers stop when it finishes.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::constants::{mated_in, DRAW};
use super::params::SearchParams;
use super::worker::{SearchWorker, WorkerReport, WorkerSetup};
use super::{SearchInfoCallback, SearchOutcome};
use crate::board::eval::Evaluator;
use crate::board::{Board, Move};
use crate::engine::{EngineError, SearchLimits, TimeConfig, TimeManager};
use crate::sync::{Counter, StopFlag};
use crate::tablebase::TablebaseProbe;
use crate::timer::DeadlineTimer;
use crate::tt::TranspositionTable;

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// State every worker reads or bumps during one search.
pub struct SharedSearchState {
    pub(crate) tt: Arc<TranspositionTable>,
    pub(crate) evaluator: Arc<dyn Evaluator>,
    pub(crate) tablebase: Arc<dyn TablebaseProbe>,
    pub(crate) params: SearchParams,
    pub(crate) stop: StopFlag,
    pub(crate) nodes: Counter,
    pub(crate) seldepth: Counter,
    pub(crate) tb_hits: Counter,
    pub(crate) node_limit: Option<u64>,
    /// Effective piece ceiling for probes; 0 disables probing.
    pub(crate) tb_probe_limit: u32,
}

/// The long-lived collaborators a search borrows from its engine.
#[derive(Clone)]
pub struct SearchSetup {
    pub tt: Arc<TranspositionTable>,
    pub evaluator: Arc<dyn Evaluator>,
    pub tablebase: Arc<dyn TablebaseProbe>,
    pub params: SearchParams,
    pub time: TimeConfig,
    pub tb_probe_limit: u32,
    pub callback: Option<SearchInfoCallback>,
}

/// A running search. Dropping the pool without [`WorkerPool::wait_all`]
/// stops the workers and detaches them.
pub struct WorkerPool {
    shared: Arc<SharedSearchState>,
    handles: Vec<JoinHandle<WorkerReport>>,
    timer: Option<DeadlineTimer>,
    board: Board,
    root_moves: Vec<Move>,
    start: Instant,
}

impl WorkerPool {
    /// Spawn `threads` workers on `board` under `limits`. Limits are assumed
    /// validated. Fails only if the primary worker cannot be spawned; a
    /// helper that fails to spawn is skipped with a warning.
    pub fn start(
        threads: usize,
        board: &Board,
        limits: &SearchLimits,
        setup: SearchSetup,
    ) -> Result<WorkerPool, EngineError> {
        let start = Instant::now();
        let threads = threads.max(1);
        setup.tt.new_search();

        let legal = board.generate_moves();
        let root_moves: Vec<Move> = if limits.search_moves.is_empty() {
            legal.iter().copied().collect()
        } else {
            legal
                .iter()
                .copied()
                .filter(|mv| limits.search_moves.contains(mv))
                .collect()
        };

        let stop = StopFlag::new();
        let shared = Arc::new(SharedSearchState {
            tb_probe_limit: setup.tb_probe_limit.min(setup.tablebase.max_pieces()),
            tt: setup.tt,
            evaluator: setup.evaluator,
            tablebase: setup.tablebase,
            params: setup.params,
            stop: stop.clone(),
            nodes: Counter::default(),
            seldepth: Counter::default(),
            tb_hits: Counter::default(),
            node_limit: limits.nodes,
        });

        let time = TimeManager::new(limits, &setup.time, start);
        let timer = time
            .hard_deadline()
            .and_then(|deadline| DeadlineTimer::start_at(deadline, stop.clone()));

        log::info!(
            "search start: {} thread(s), {} root move(s), depth {}, soft {:?}, hard {:?}",
            threads,
            root_moves.len(),
            limits.max_depth(),
            time.soft_limit(),
            time.hard_limit()
        );

        let mut pool = WorkerPool {
            shared,
            handles: Vec::with_capacity(threads),
            timer,
            board: board.clone(),
            root_moves,
            start,
        };

        if pool.root_moves.is_empty() {
            return Ok(pool);
        }

        let mut time = Some(time);
        for id in 0..threads {
            let setup = WorkerSetup {
                id,
                board: board.clone(),
                root_moves: pool.root_moves.clone(),
                max_depth: limits.max_depth(),
                infinite: limits.infinite,
                time: if id == 0 { time.take() } else { None },
                callback: if id == 0 { setup.callback.clone() } else { None },
                start,
            };
            let shared = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn(move || SearchWorker::new(setup, shared).run());
            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(err) if id == 0 => {
                    pool.stop();
                    return Err(EngineError::WorkerSpawn(err));
                }
                Err(err) => {
                    log::warn!("helper search-{id} failed to start: {err}");
                }
            }
        }
        Ok(pool)
    }

    /// Ask every worker to stop. Idempotent, and safe after they finished.
    pub fn stop(&self) {
        self.shared.stop.stop();
    }

    /// A handle that stops this search from another thread.
    #[must_use]
    pub fn stop_flag(&self) -> StopFlag {
        self.shared.stop.clone()
    }

    /// Whether every worker has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Block until every worker exits and assemble the primary worker's result.
    pub fn wait_all(mut self) -> SearchOutcome {
        let mut reports = Vec::with_capacity(self.handles.len());
        for handle in self.handles.drain(..) {
            match handle.join() {
                Ok(report) => reports.push(Some(report)),
                Err(_) => {
                    log::warn!("a search worker panicked");
                    reports.push(None);
                }
            }
        }
        self.shared.stop.stop();
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let elapsed = self.start.elapsed();
        let nodes = self.shared.nodes.get();
        let seldepth = self.shared.seldepth.get() as u32;
        let main = reports.into_iter().next().flatten();

        let Some(&first_move) = self.root_moves.first() else {
            let score = if self.board.in_check() { mated_in(0) } else { DRAW };
            log::info!("search finished: no legal moves");
            return SearchOutcome {
                best_move: None,
                ponder_move: None,
                score,
                depth: 0,
                seldepth: 0,
                pv: Vec::new(),
                nodes,
                elapsed,
                stopped: false,
            };
        };

        let stopped = main.as_ref().map_or(true, |r| r.aborted);
        let (pv, score, depth) = match main {
            Some(WorkerReport {
                completed: Some(done),
                ..
            }) => (done.pv, done.score, done.depth),
            Some(WorkerReport {
                partial_best: Some((mv, score)),
                ..
            }) => {
                log::warn!("stopped before any iteration completed; using partial result");
                (vec![mv], score, 0)
            }
            _ => {
                log::warn!("stopped before any move was scored; using first legal move");
                (vec![first_move], DRAW, 0)
            }
        };

        let best_move = pv.first().copied().unwrap_or(first_move);
        let outcome = SearchOutcome {
            best_move: Some(best_move),
            ponder_move: pv.get(1).copied(),
            score,
            depth,
            seldepth,
            pv,
            nodes,
            elapsed,
            stopped,
        };
        log::info!(
            "search finished: bestmove {} score {} depth {} nodes {} in {:?}",
            best_move,
            outcome.score,
            outcome.depth,
            outcome.nodes,
            outcome.elapsed
        );
        outcome
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.shared.stop.stop();
        }
    }
}
