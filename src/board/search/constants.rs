//! Score bounds and move-ordering tiers.

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

pub const INFINITE: i32 = 32_001;
pub const MATE: i32 = 32_000;
pub const DRAW: i32 = 0;

/// Any score at or beyond this is a forced mate within `MAX_PLY`.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

/// Tablebase wins rank just below the shortest mates.
pub const TB_WIN: i32 = MATE_BOUND - 1;
pub const TB_WIN_BOUND: i32 = TB_WIN - MAX_PLY as i32;

/// Static evaluations are clamped strictly inside this.
pub const EVAL_LIMIT: i32 = TB_WIN_BOUND - 1;

/// Placeholder static evaluation for nodes in check.
pub const EVAL_NONE: i32 = -INFINITE;

#[inline]
#[must_use]
pub const fn mated_in(ply: usize) -> i32 {
    -MATE + ply as i32
}

#[inline]
#[must_use]
pub const fn mate_in(ply: usize) -> i32 {
    MATE - ply as i32
}

/// Whether `score` is a proven result (mate or tablebase) rather than a heuristic.
#[inline]
#[must_use]
pub const fn is_decisive(score: i32) -> bool {
    score >= TB_WIN_BOUND || score <= -TB_WIN_BOUND
}

/// Convert a root-relative mate score to node-relative before storing.
#[inline]
#[must_use]
pub const fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= TB_WIN_BOUND {
        score + ply as i32
    } else if score <= -TB_WIN_BOUND {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
#[must_use]
pub const fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= TB_WIN_BOUND {
        score - ply as i32
    } else if score <= -TB_WIN_BOUND {
        score + ply as i32
    } else {
        score
    }
}

/// Full moves to mate: positive when the side to move mates, negative
/// when it gets mated. `None` for ordinary scores.
#[must_use]
pub const fn mate_distance(score: i32) -> Option<i32> {
    if score >= MATE_BOUND {
        Some((MATE - score + 1) / 2)
    } else if score <= -MATE_BOUND {
        Some(-(MATE + score) / 2)
    } else {
        None
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================
// TT move > winning captures > killers > quiet history > losing captures

pub const TT_MOVE_SCORE: i32 = 1 << 28;
pub const GOOD_CAPTURE_SCORE: i32 = 1 << 26;
pub const KILLER1_SCORE: i32 = 1 << 25;
pub const KILLER2_SCORE: i32 = KILLER1_SCORE - 1;
pub const BAD_CAPTURE_SCORE: i32 = -(1 << 26);

/// History values stay within +/- this.
pub const HISTORY_MAX: i32 = 16_384;

// ============================================================================
// LIMIT POLLING
// ============================================================================

/// Nodes between clock and node-limit polls; must be a power of two.
pub const NODE_CHECK_INTERVAL: u64 = 1024;

pub const LMR_TABLE_SIZE: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_distance_in_moves() {
        assert_eq!(mate_distance(mate_in(1)), Some(1));
        assert_eq!(mate_distance(mate_in(3)), Some(2));
        assert_eq!(mate_distance(mated_in(2)), Some(-1));
        assert_eq!(mate_distance(150), None);
        assert_eq!(mate_distance(TB_WIN), None);
    }

    #[test]
    fn tt_adjustment_round_trips() {
        for &score in &[mate_in(7), mated_in(12), TB_WIN - 3, -TB_WIN + 9, 55, -300] {
            assert_eq!(score_from_tt(score_to_tt(score, 9), 9), score);
        }
        assert_eq!(score_to_tt(mate_in(7), 5), mate_in(2));
    }
}
