//! Strix: a bitboard chess engine core.
//!
//! - [`board`]: position, move generation, evaluation and search
//! - [`engine`]: configuration, limits, time management and the [`Engine`] controller
//! - [`tt`]: the lock-free shared transposition table
//! - [`tablebase`]: endgame probe interface
//!
//! ```no_run
//! use strix::{Board, Engine, EngineConfig, SearchLimits};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let outcome = engine.search(&Board::new(), &SearchLimits::depth(8)).unwrap();
//! println!("bestmove {}", outcome.best_move.unwrap());
//! ```

pub mod board;
pub mod engine;
pub mod sync;
pub mod tablebase;
pub mod timer;
pub mod tt;
mod zobrist;

pub use board::search::{SearchInfoCallback, SearchIterationInfo, SearchOutcome, WorkerPool};
pub use board::{Board, Color, Move, Piece, Square};
pub use engine::{Clock, Engine, EngineConfig, EngineError, SearchLimits};
pub use tt::TranspositionTable;
