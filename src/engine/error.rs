//! Errors raised at the engine boundary, before any worker starts.

use std::fmt;
use std::io;

use crate::tt::TableAllocError;

/// A rejected engine setting or search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidThreads { requested: usize, max: usize },
    InvalidHashSize { requested_mb: usize, max_mb: usize },
    ZeroDepth,
    DepthTooLarge { depth: u32, max: u32 },
    ZeroNodes,
    ZeroMoveTime,
    ZeroMovesToGo,
    IllegalSearchMove { notation: String },
    DuplicateSearchMove { notation: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreads { requested, max } => {
                write!(f, "thread count {requested} outside 1..={max}")
            }
            ConfigError::InvalidHashSize { requested_mb, max_mb } => {
                write!(f, "hash size {requested_mb} MB outside 1..={max_mb}")
            }
            ConfigError::ZeroDepth => write!(f, "search depth must be at least 1"),
            ConfigError::DepthTooLarge { depth, max } => {
                write!(f, "search depth {depth} exceeds maximum {max}")
            }
            ConfigError::ZeroNodes => write!(f, "node limit must be at least 1"),
            ConfigError::ZeroMoveTime => write!(f, "move time must be positive"),
            ConfigError::ZeroMovesToGo => write!(f, "moves to go must be at least 1"),
            ConfigError::IllegalSearchMove { notation } => {
                write!(f, "search move {notation} is not legal in this position")
            }
            ConfigError::DuplicateSearchMove { notation } => {
                write!(f, "search move {notation} listed more than once")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    TableAlloc(TableAllocError),
    /// The primary search thread could not be started.
    WorkerSpawn(io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(err) => write!(f, "invalid configuration: {err}"),
            EngineError::TableAlloc(err) => write!(f, "{err}"),
            EngineError::WorkerSpawn(err) => write!(f, "failed to spawn search worker: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            EngineError::TableAlloc(err) => Some(err),
            EngineError::WorkerSpawn(err) => Some(err),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

impl From<TableAllocError> for EngineError {
    fn from(err: TableAllocError) -> Self {
        EngineError::TableAlloc(err)
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        EngineError::WorkerSpawn(err)
    }
}
