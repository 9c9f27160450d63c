//! Search time budgeting.
//!
//! A search gets a soft limit (stop after an iteration once it is passed)
//! and a hard limit (stop mid-iteration, never exceeded). Between
//! iterations the soft limit is rescaled by how volatile the search looks.

use std::time::{Duration, Instant};

use super::limits::{Clock, SearchLimits};
use crate::board::Move;

/// Time threshold below which we enter "panic mode" (in ms)
const PANIC_THRESHOLD_MS: u64 = 5000;

/// Minimum moves-to-go estimate to avoid over-thinking
const MIN_MOVES_TO_GO: u64 = 10;

/// Safety margin added to overhead for critical time detection
const CRITICAL_TIME_MARGIN_MS: u64 = 50;

const PANIC_TIME_FRACTION: f64 = 0.05;
const PANIC_MIN_FRACTION: u64 = 5;
const PANIC_HARD_FRACTION: u64 = 3;

const LONG_TIME_CONTROL_MS: u64 = 300_000;
const MEDIUM_TIME_CONTROL_MS: u64 = 60_000;

const LONG_MOVES_ESTIMATE: u64 = 40;
const MEDIUM_MOVES_ESTIMATE: u64 = 30;
const SHORT_MOVES_ESTIMATE: u64 = 25;

/// The hard limit never exceeds this multiple of the soft limit.
const HARD_TO_SOFT_RATIO: u64 = 4;

// Volatility scaling, in percent of the base soft limit.
const UNSTABLE_SCALE: u64 = 140;
const STABLE_SCALE: u64 = 70;
const STABLE_ITERATIONS: u32 = 4;
const SCORE_DROP_THRESHOLD: i32 = 30;
const SCORE_DROP_SCALE: u64 = 130;

/// Percentages and overheads used to turn a clock into limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimeConfig {
    /// Time reserved for communication latency.
    pub move_overhead_ms: u64,
    /// Ceiling on the soft limit, as a percentage of the safe remaining time.
    pub soft_time_percent: u64,
    /// Ceiling on the hard limit, as a percentage of the safe remaining time.
    pub hard_time_percent: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: 50,
            soft_time_percent: 20,
            hard_time_percent: 40,
        }
    }
}

/// Compute `(soft_ms, hard_ms)` for a running clock.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clock_limits(clock: &Clock, config: &TimeConfig) -> (u64, u64) {
    let time_left_ms = clock.remaining.as_millis() as u64;
    let inc_ms = clock.increment.as_millis() as u64;
    let safe_ms = time_left_ms.saturating_sub(config.move_overhead_ms);

    if time_left_ms <= config.move_overhead_ms.saturating_add(CRITICAL_TIME_MARGIN_MS) {
        let fallback = (time_left_ms / 2).max(1);
        return (fallback, fallback);
    }

    if safe_ms < PANIC_THRESHOLD_MS {
        let panic_factor = safe_ms as f64 / PANIC_THRESHOLD_MS as f64;
        let target = (safe_ms as f64 * PANIC_TIME_FRACTION * panic_factor) as u64 + inc_ms;
        let target = target.min(safe_ms / PANIC_MIN_FRACTION).max(1);
        let hard = (safe_ms / PANIC_HARD_FRACTION).max(target).max(1);
        return (target, hard);
    }

    let moves_to_go = clock
        .moves_to_go
        .map(u64::from)
        .unwrap_or(if safe_ms > LONG_TIME_CONTROL_MS {
            LONG_MOVES_ESTIMATE
        } else if safe_ms > MEDIUM_TIME_CONTROL_MS {
            MEDIUM_MOVES_ESTIMATE
        } else {
            SHORT_MOVES_ESTIMATE
        })
        .max(MIN_MOVES_TO_GO);

    let base_ms = safe_ms / moves_to_go + inc_ms;
    let soft_cap = safe_ms * config.soft_time_percent / 100;
    let hard_cap = safe_ms * config.hard_time_percent / 100;

    let soft_ms = base_ms.min(soft_cap).max(1);
    let hard_ms = hard_cap
        .min(soft_ms.saturating_mul(HARD_TO_SOFT_RATIO))
        .max(soft_ms)
        .min(safe_ms.max(1));
    (soft_ms, hard_ms)
}

/// Per-search deadline tracker, owned by the primary worker.
#[derive(Debug, Clone)]
pub struct TimeManager {
    start: Instant,
    base_soft: Option<Duration>,
    soft: Option<Duration>,
    hard: Option<Duration>,
    /// Fixed move time and unlimited searches are never rescaled.
    adaptive: bool,
    last_best: Option<Move>,
    last_score: Option<i32>,
    stable_iterations: u32,
}

impl TimeManager {
    /// Limits for `limits`, counted from `start`. Infinite, depth-only and
    /// node-only searches get neither limit.
    #[must_use]
    pub fn new(limits: &SearchLimits, config: &TimeConfig, start: Instant) -> Self {
        let (soft, hard, adaptive) = if limits.infinite {
            (None, None, false)
        } else if let Some(movetime) = limits.movetime {
            let fixed = movetime.max(Duration::from_millis(1));
            (Some(fixed), Some(fixed), false)
        } else if let Some(clock) = &limits.clock {
            let (soft_ms, hard_ms) = clock_limits(clock, config);
            (
                Some(Duration::from_millis(soft_ms)),
                Some(Duration::from_millis(hard_ms)),
                true,
            )
        } else {
            (None, None, false)
        };
        TimeManager {
            start,
            base_soft: soft,
            soft,
            hard,
            adaptive,
            last_best: None,
            last_score: None,
            stable_iterations: 0,
        }
    }

    #[must_use]
    pub fn soft_limit(&self) -> Option<Duration> {
        self.soft
    }

    #[must_use]
    pub fn hard_limit(&self) -> Option<Duration> {
        self.hard
    }

    #[must_use]
    pub fn hard_deadline(&self) -> Option<Instant> {
        self.hard.map(|hard| self.start + hard)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[must_use]
    pub fn hard_expired(&self) -> bool {
        self.hard.is_some_and(|hard| self.elapsed() >= hard)
    }

    /// Feed the result of a completed iteration. A changed best move or a
    /// falling score stretches the soft limit; a best move that has held for
    /// several iterations shrinks it. The result never passes the hard limit.
    pub fn update_iteration(&mut self, best_move: Move, score: i32) {
        if self.last_best == Some(best_move) {
            self.stable_iterations += 1;
        } else {
            self.stable_iterations = 0;
        }
        let score_dropped = self
            .last_score
            .is_some_and(|previous| score < previous - SCORE_DROP_THRESHOLD);
        let first_iteration = self.last_best.is_none();
        self.last_best = Some(best_move);
        self.last_score = Some(score);

        if !self.adaptive || first_iteration {
            return;
        }
        let (Some(base), Some(hard)) = (self.base_soft, self.hard) else {
            return;
        };

        let mut scale = if self.stable_iterations == 0 {
            UNSTABLE_SCALE
        } else if self.stable_iterations >= STABLE_ITERATIONS {
            STABLE_SCALE
        } else {
            100
        };
        if score_dropped {
            scale = scale * SCORE_DROP_SCALE / 100;
        }

        let scaled = base.mul_f64(scale as f64 / 100.0);
        self.soft = Some(scaled.min(hard));
        log::trace!(
            "time: stable={} dropped={} soft={:?}",
            self.stable_iterations,
            score_dropped,
            self.soft
        );
    }

    #[must_use]
    pub fn should_stop_soft(&self) -> bool {
        self.soft.is_some_and(|soft| self.elapsed() >= soft)
    }
}
