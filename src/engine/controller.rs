//! Engine controller: owns the transposition table and the pluggable
//! evaluation and tablebase services, and turns search requests into
//! worker pools.

use std::sync::Arc;

use parking_lot::Mutex;

use super::config::{self, EngineConfig};
use super::error::EngineError;
use super::limits::SearchLimits;
use crate::board::attack_tables;
use crate::board::eval::{Evaluator, PsqtEvaluator};
use crate::board::search::{SearchInfoCallback, SearchOutcome, SearchSetup, WorkerPool};
use crate::board::Board;
use crate::sync::StopFlag;
use crate::tablebase::{NoTablebase, TablebaseProbe};
use crate::tt::TranspositionTable;

pub struct Engine {
    config: EngineConfig,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    tablebase: Arc<dyn TablebaseProbe>,
    info_callback: Option<SearchInfoCallback>,
    /// Stop handle of the most recently started search.
    active: Mutex<Option<StopFlag>>,
}

impl Engine {
    /// Validate `config`, build the attack tables, and allocate the
    /// transposition table.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        attack_tables::init();
        let tt = TranspositionTable::new(config.hash_mb)?;
        log::info!(
            "engine ready: {} thread(s), {} MB hash ({} entries)",
            config.threads,
            config.hash_mb,
            tt.capacity()
        );
        Ok(Engine {
            config,
            tt: Arc::new(tt),
            evaluator: Arc::new(PsqtEvaluator),
            tablebase: Arc::new(NoTablebase),
            info_callback: None,
            active: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    #[must_use]
    pub fn with_tablebase(mut self, tablebase: Arc<dyn TablebaseProbe>) -> Self {
        self.tablebase = tablebase;
        self
    }

    /// Receive a progress report after every completed iteration.
    pub fn set_info_callback(&mut self, callback: Option<SearchInfoCallback>) {
        self.info_callback = callback;
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Begin searching `board` in the background. The returned pool is the
    /// only way to collect the result.
    pub fn start_search(&self, board: &Board, limits: &SearchLimits) -> Result<WorkerPool, EngineError> {
        limits.validate(board)?;
        if self.config.clean_search {
            self.tt.clear();
        }
        let setup = SearchSetup {
            tt: Arc::clone(&self.tt),
            evaluator: Arc::clone(&self.evaluator),
            tablebase: Arc::clone(&self.tablebase),
            params: self.config.params.clone(),
            time: self.config.time,
            tb_probe_limit: self.config.tb_probe_limit,
            callback: self.info_callback.clone(),
        };
        let pool = WorkerPool::start(self.config.threads, board, limits, setup)?;
        *self.active.lock() = Some(pool.stop_flag());
        Ok(pool)
    }

    /// Search `board` and block until the result is ready.
    pub fn search(&self, board: &Board, limits: &SearchLimits) -> Result<SearchOutcome, EngineError> {
        Ok(self.start_search(board, limits)?.wait_all())
    }

    /// Stop the most recent search, if it is still running.
    pub fn stop(&self) {
        if let Some(flag) = self.active.lock().as_ref() {
            flag.stop();
        }
    }

    /// Replace the transposition table. On failure the old table is kept.
    pub fn resize_hash(&mut self, hash_mb: usize) -> Result<(), EngineError> {
        config::validate_hash_mb(hash_mb)?;
        let tt = TranspositionTable::new(hash_mb)?;
        log::trace!("hash resized to {} MB ({} entries)", hash_mb, tt.capacity());
        self.tt = Arc::new(tt);
        self.config.hash_mb = hash_mb;
        Ok(())
    }

    pub fn set_threads(&mut self, threads: usize) -> Result<(), EngineError> {
        config::validate_threads(threads)?;
        self.config.threads = threads;
        Ok(())
    }

    /// Forget everything learned in earlier searches.
    pub fn clear(&self) {
        self.tt.clear();
    }

    #[must_use]
    pub fn hashfull(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ConfigError;

    fn small_engine() -> Engine {
        Engine::new(EngineConfig::default().with_hash_mb(1)).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let result = Engine::new(EngineConfig::default().with_threads(0));
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidThreads { .. }))
        ));
    }

    #[test]
    fn invalid_limits_never_start_workers() {
        let engine = small_engine();
        let result = engine.search(&Board::new(), &SearchLimits::depth(0));
        assert!(matches!(result, Err(EngineError::Config(ConfigError::ZeroDepth))));
    }

    #[test]
    fn resize_and_thread_changes_are_validated() {
        let mut engine = small_engine();
        assert!(engine.resize_hash(0).is_err());
        assert_eq!(engine.config().hash_mb, 1);
        engine.resize_hash(2).unwrap();
        assert_eq!(engine.config().hash_mb, 2);
        assert!(engine.set_threads(1000).is_err());
        engine.set_threads(2).unwrap();
        assert_eq!(engine.config().threads, 2);
    }

    #[test]
    fn clear_empties_the_table() {
        let engine = small_engine();
        engine.search(&Board::new(), &SearchLimits::depth(4)).unwrap();
        assert!(engine.hashfull() > 0);
        engine.clear();
        assert_eq!(engine.hashfull(), 0);
    }

    #[test]
    fn stop_without_search_is_harmless() {
        let engine = small_engine();
        engine.stop();
        let outcome = engine.search(&Board::new(), &SearchLimits::depth(2)).unwrap();
        assert!(outcome.best_move.is_some());
    }
}
