//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Principal variation search with null move pruning, LMR and futility pruning
//! - Quiescence search with stand-pat, SEE and delta pruning
//! - Move ordering (TT move, SEE-sorted captures, killers, history)
//! - Shared transposition table and tablebase probing
//! - Lazy SMP parallel search

pub(crate) mod constants;
mod heuristics;
mod params;
pub mod smp;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use super::Move;

pub use constants::{mate_distance, DRAW, INFINITE, MATE, MATE_BOUND, TB_WIN, TB_WIN_BOUND};
pub use params::SearchParams;
pub use smp::{SearchSetup, WorkerPool};

/// Final answer of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` only when the root has no legal (or allowed) moves.
    pub best_move: Option<Move>,
    /// The expected opponent reply (for pondering)
    pub ponder_move: Option<Move>,
    /// Centipawns from the side to move's point of view, or a mate score.
    pub score: i32,
    /// Deepest fully completed iteration; 0 if none completed.
    pub depth: u32,
    pub seldepth: u32,
    pub pv: Vec<Move>,
    pub nodes: u64,
    pub elapsed: Duration,
    /// The search was cut short by a stop request or a limit mid-iteration.
    pub stopped: bool,
}

impl SearchOutcome {
    /// Signed full moves to mate, if the score is a forced mate.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_distance(self.score)
    }
}

/// Progress report emitted after each completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub pv: Vec<Move>,
    pub hashfull: u32,
    pub tb_hits: u64,
}

impl SearchIterationInfo {
    /// The principal variation in coordinate notation, space separated.
    #[must_use]
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;
