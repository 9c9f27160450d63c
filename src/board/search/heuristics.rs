//! Per-worker move-ordering memory: killers, quiet history, capture
//! history, and the late-move reduction table.
//!
//! None of these are shared between workers; divergent ordering is what
//! makes helper threads explore different parts of the tree.

use super::constants::{HISTORY_MAX, LMR_TABLE_SIZE};
use crate::board::{Color, Move, Piece, MAX_PLY};

/// Depth-squared bonus, capped so a single deep cutoff cannot saturate the table.
#[inline]
#[must_use]
pub(crate) fn history_bonus(depth: i32) -> i32 {
    (depth * depth).min(1536)
}

/// Move `entry` toward `bonus` while keeping it within +/- `HISTORY_MAX`.
#[inline]
fn apply_gravity(entry: &mut i32, bonus: i32) {
    let bonus = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
    *entry += bonus - *entry * bonus.abs() / HISTORY_MAX;
}

pub(crate) struct KillerTable {
    slots: [[Move; 2]; MAX_PLY + 1],
}

impl KillerTable {
    pub(crate) fn new() -> Self {
        KillerTable {
            slots: [[Move::NULL; 2]; MAX_PLY + 1],
        }
    }

    #[inline]
    pub(crate) fn get(&self, ply: usize) -> [Move; 2] {
        self.slots.get(ply).copied().unwrap_or([Move::NULL; 2])
    }

    pub(crate) fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }
}

/// Quiet-move history indexed by `[color][from][to]`.
pub(crate) struct HistoryTable {
    entries: Box<[[[i32; 64]; 64]; 2]>,
}

impl HistoryTable {
    pub(crate) fn new() -> Self {
        HistoryTable {
            entries: Box::new([[[0; 64]; 64]; 2]),
        }
    }

    #[inline]
    pub(crate) fn score(&self, color: Color, mv: Move) -> i32 {
        self.entries[color.index()][mv.from().index()][mv.to().index()]
    }

    pub(crate) fn update(&mut self, color: Color, mv: Move, bonus: i32) {
        let entry = &mut self.entries[color.index()][mv.from().index()][mv.to().index()];
        apply_gravity(entry, bonus);
    }
}

/// Capture history indexed by `[attacker][victim]`.
pub(crate) struct CaptureHistory {
    entries: [[i32; 6]; 6],
}

impl CaptureHistory {
    pub(crate) fn new() -> Self {
        CaptureHistory {
            entries: [[0; 6]; 6],
        }
    }

    #[inline]
    pub(crate) fn score(&self, attacker: Piece, victim: Piece) -> i32 {
        self.entries[attacker.index()][victim.index()]
    }

    pub(crate) fn update(&mut self, attacker: Piece, victim: Piece, bonus: i32) {
        apply_gravity(&mut self.entries[attacker.index()][victim.index()], bonus);
    }
}

/// Logarithmic late-move reductions, `ln(depth) * ln(moves) / divisor`.
pub(crate) struct LmrTable {
    table: Box<[[u8; LMR_TABLE_SIZE]; LMR_TABLE_SIZE]>,
}

impl LmrTable {
    pub(crate) fn new(divisor: f64) -> Self {
        let divisor = if divisor > 0.0 { divisor } else { 1.0 };
        let mut table = Box::new([[0u8; LMR_TABLE_SIZE]; LMR_TABLE_SIZE]);
        for (depth, row) in table.iter_mut().enumerate().skip(1) {
            for (moves, cell) in row.iter_mut().enumerate().skip(1) {
                let r = 0.75 + (depth as f64).ln() * (moves as f64).ln() / divisor;
                *cell = r.clamp(0.0, f64::from(u8::MAX)) as u8;
            }
        }
        LmrTable { table }
    }

    #[inline]
    pub(crate) fn reduction(&self, depth: i32, moves_searched: usize) -> i32 {
        let d = (depth.max(0) as usize).min(LMR_TABLE_SIZE - 1);
        let m = moves_searched.min(LMR_TABLE_SIZE - 1);
        i32::from(self.table[d][m])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn killers_shift_and_ignore_duplicates() {
        let mut killers = KillerTable::new();
        let a = Move::quiet(Square::from_index(12), Square::from_index(28));
        let b = Move::quiet(Square::from_index(6), Square::from_index(21));
        killers.update(3, a);
        killers.update(3, a);
        assert_eq!(killers.get(3), [a, Move::NULL]);
        killers.update(3, b);
        assert_eq!(killers.get(3), [b, a]);
        assert_eq!(killers.get(4), [Move::NULL; 2]);
        killers.update(MAX_PLY + 10, a);
    }

    #[test]
    fn history_saturates_within_bounds() {
        let mut history = HistoryTable::new();
        let mv = Move::quiet(Square::from_index(1), Square::from_index(18));
        for _ in 0..1000 {
            history.update(Color::White, mv, history_bonus(20));
        }
        let high = history.score(Color::White, mv);
        assert!(high > 0 && high <= HISTORY_MAX);
        assert_eq!(history.score(Color::Black, mv), 0);
        for _ in 0..1000 {
            history.update(Color::White, mv, -history_bonus(20));
        }
        assert!(history.score(Color::White, mv) >= -HISTORY_MAX);
        assert!(history.score(Color::White, mv) < 0);
    }

    #[test]
    fn reductions_grow_with_depth_and_move_count() {
        let lmr = LmrTable::new(2.25);
        assert_eq!(lmr.reduction(1, 1), 0);
        assert!(lmr.reduction(10, 20) > lmr.reduction(3, 4));
        assert!(lmr.reduction(200, 500) >= lmr.reduction(63, 63));
    }
}
