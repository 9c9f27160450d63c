//! What a single search is allowed to spend.

use std::time::Duration;

use super::error::ConfigError;
use crate::board::{Board, Move};

/// Deepest iteration a search may be asked for.
pub const MAX_DEPTH: u32 = 100;

/// A running game clock for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    pub remaining: Duration,
    pub increment: Duration,
    pub moves_to_go: Option<u32>,
}

/// Stopping conditions for one search. All set limits apply; the first one
/// reached ends the search. With nothing set the search runs to
/// [`MAX_DEPTH`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime: Option<Duration>,
    pub clock: Option<Clock>,
    /// Run until stopped, even after reaching the maximum depth.
    pub infinite: bool,
    /// Restrict the root to these moves. Empty means all legal moves.
    pub search_moves: Vec<Move>,
}

impl SearchLimits {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn nodes(nodes: u64) -> Self {
        SearchLimits {
            nodes: Some(nodes),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn movetime(movetime: Duration) -> Self {
        SearchLimits {
            movetime: Some(movetime),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn infinite() -> Self {
        SearchLimits {
            infinite: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    #[must_use]
    pub fn with_movetime(mut self, movetime: Duration) -> Self {
        self.movetime = Some(movetime);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn with_search_moves(mut self, moves: Vec<Move>) -> Self {
        self.search_moves = moves;
        self
    }

    /// Iteration ceiling implied by these limits.
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.depth.unwrap_or(MAX_DEPTH).min(MAX_DEPTH)
    }

    /// Reject limits that could never produce a meaningful search of `board`.
    pub fn validate(&self, board: &Board) -> Result<(), ConfigError> {
        match self.depth {
            Some(0) => return Err(ConfigError::ZeroDepth),
            Some(depth) if depth > MAX_DEPTH => {
                return Err(ConfigError::DepthTooLarge {
                    depth,
                    max: MAX_DEPTH,
                })
            }
            _ => {}
        }
        if self.nodes == Some(0) {
            return Err(ConfigError::ZeroNodes);
        }
        if self.movetime.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroMoveTime);
        }
        if self
            .clock
            .is_some_and(|clock| clock.moves_to_go == Some(0))
        {
            return Err(ConfigError::ZeroMovesToGo);
        }
        for (i, &mv) in self.search_moves.iter().enumerate() {
            if !board.is_legal(mv) {
                return Err(ConfigError::IllegalSearchMove {
                    notation: mv.to_string(),
                });
            }
            if self.search_moves[..i].contains(&mv) {
                return Err(ConfigError::DuplicateSearchMove {
                    notation: mv.to_string(),
                });
            }
        }
        Ok(())
    }
}
