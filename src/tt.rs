//! Shared transposition table.
//!
//! Lockless: every slot is two `AtomicU64`s holding `key ^ data` and
//! `data`. Writers store both words with relaxed ordering and readers
//! accept a slot only when the two words XOR back to the probed key, so a
//! read that interleaves with a concurrent write is rejected as a miss
//! instead of returning a payload belonging to another position.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is at most this value (failed low).
    Upper,
    /// Score is at least this value (failed high).
    Lower,
    Exact,
}

impl Bound {
    const fn to_bits(self) -> u64 {
        match self {
            Bound::Upper => 1,
            Bound::Lower => 2,
            Bound::Exact => 3,
        }
    }

    const fn from_bits(bits: u64) -> Bound {
        match bits & 0x3 {
            1 => Bound::Upper,
            2 => Bound::Lower,
            _ => Bound::Exact,
        }
    }
}

/// Unpacked entry returned by [`TranspositionTable::probe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub best_move: Option<Move>,
    pub score: i32,
    pub static_eval: i32,
    pub depth: u8,
    pub bound: Bound,
    pub generation: u8,
}

const GENERATION_MASK: u8 = 0x3F;

// Layout of the data word:
//   0..16   move (0 = none)
//   16..32  score (i16)
//   32..48  static eval (i16)
//   48..56  depth
//   56..58  bound (never 0, so a live entry is never all zero)
//   58..64  generation
fn pack(entry: &TtEntry) -> u64 {
    let mv = entry.best_move.map_or(0, Move::as_u16);
    u64::from(mv)
        | (u64::from(entry.score as i16 as u16) << 16)
        | (u64::from(entry.static_eval as i16 as u16) << 32)
        | (u64::from(entry.depth) << 48)
        | (entry.bound.to_bits() << 56)
        | (u64::from(entry.generation & GENERATION_MASK) << 58)
}

fn unpack(data: u64) -> TtEntry {
    let mv = (data & 0xFFFF) as u16;
    TtEntry {
        best_move: (mv != 0).then(|| Move::from_u16(mv)),
        score: i32::from((data >> 16) as u16 as i16),
        static_eval: i32::from((data >> 32) as u16 as i16),
        depth: (data >> 48) as u8,
        bound: Bound::from_bits(data >> 56),
        generation: (data >> 58) as u8 & GENERATION_MASK,
    }
}

#[repr(C)]
struct Slot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn empty() -> Self {
        Slot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    #[inline]
    fn write(&self, key: u64, data: u64) {
        self.data.store(data, Ordering::Relaxed);
        self.key_xor.store(key ^ data, Ordering::Relaxed);
    }

    /// Payload if this slot verifiably holds `key`.
    #[inline]
    fn read(&self, key: u64) -> Option<u64> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (data != 0 && key_xor ^ data == key).then_some(data)
    }

    /// Unverified payload, used only to rank replacement victims.
    #[inline]
    fn peek(&self) -> u64 {
        self.data.load(Ordering::Relaxed)
    }
}

const BUCKET_SIZE: usize = 4;

#[repr(C, align(64))]
struct Bucket {
    slots: [Slot; BUCKET_SIZE],
}

impl Bucket {
    fn empty() -> Self {
        Bucket {
            slots: [Slot::empty(), Slot::empty(), Slot::empty(), Slot::empty()],
        }
    }
}

/// The table could not be allocated at the requested size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAllocError {
    pub requested_mb: usize,
}

impl fmt::Display for TableAllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to allocate {} MB for the transposition table",
            self.requested_mb
        )
    }
}

impl std::error::Error for TableAllocError {}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Allocate a table of at most `size_mb` megabytes, rounded down to a
    /// power-of-two number of buckets.
    pub fn new(size_mb: usize) -> Result<Self, TableAllocError> {
        let bytes = size_mb.saturating_mul(1024 * 1024);
        let fit = (bytes / mem::size_of::<Bucket>()).max(1);
        let count = if fit.is_power_of_two() {
            fit
        } else {
            fit.next_power_of_two() / 2
        };

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(count)
            .map_err(|_| TableAllocError {
                requested_mb: size_mb,
            })?;
        buckets.resize_with(count, Bucket::empty);
        log::trace!("transposition table: {count} buckets ({size_mb} MB requested)");

        Ok(TranspositionTable {
            buckets,
            mask: count - 1,
            generation: AtomicU8::new(0),
        })
    }

    #[inline]
    fn bucket(&self, key: u64) -> &Bucket {
        &self.buckets[(key as usize) & self.mask]
    }

    /// Total number of entry slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Age every stored entry by one search.
    pub fn new_search(&self) {
        let next = self.generation().wrapping_add(1) & GENERATION_MASK;
        self.generation.store(next, Ordering::Relaxed);
    }

    #[must_use]
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        self.bucket(key)
            .slots
            .iter()
            .find_map(|slot| slot.read(key))
            .map(unpack)
    }

    /// Record a search result for `key`.
    ///
    /// An entry already holding `key` is refreshed unless it comes from this
    /// search and is strictly deeper. Otherwise the victim is an empty slot,
    /// else the oldest then shallowest slot, and it is only replaced when it
    /// is from an earlier search or no deeper than the new result.
    pub fn store(
        &self,
        key: u64,
        best_move: Option<Move>,
        score: i32,
        static_eval: i32,
        depth: i32,
        bound: Bound,
    ) {
        let generation = self.generation();
        let mut entry = TtEntry {
            best_move,
            score: score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)),
            static_eval: static_eval.clamp(i32::from(i16::MIN), i32::from(i16::MAX)),
            depth: depth.clamp(0, i32::from(u8::MAX)) as u8,
            bound,
            generation,
        };
        let bucket = self.bucket(key);

        for slot in &bucket.slots {
            if let Some(data) = slot.read(key) {
                let existing = unpack(data);
                if existing.generation == generation && existing.depth > entry.depth {
                    return;
                }
                if entry.best_move.is_none() {
                    entry.best_move = existing.best_move;
                }
                slot.write(key, pack(&entry));
                return;
            }
        }

        let mut victim = &bucket.slots[0];
        let mut victim_rank = (u8::MAX, u8::MAX);
        for slot in &bucket.slots {
            let data = slot.peek();
            if data == 0 {
                slot.write(key, pack(&entry));
                return;
            }
            let existing = unpack(data);
            let rank = (u8::from(existing.generation == generation), existing.depth);
            if rank < victim_rank {
                victim = slot;
                victim_rank = rank;
            }
        }

        let (same_generation, victim_depth) = victim_rank;
        if same_generation == 0 || entry.depth >= victim_depth {
            victim.write(key, pack(&entry));
        }
    }

    /// Per-mille of sampled slots filled during the current search.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.buckets.len().min(250);
        let generation = self.generation();
        let used = self.buckets[..sample]
            .iter()
            .flat_map(|b| b.slots.iter())
            .filter(|slot| {
                let data = slot.peek();
                data != 0 && unpack(data).generation == generation
            })
            .count();
        (used * 1000 / (sample * BUCKET_SIZE)) as u32
    }

    pub fn clear(&self) {
        for slot in self.buckets.iter().flat_map(|b| b.slots.iter()) {
            slot.key_xor.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
        self.generation.store(0, Ordering::Relaxed);
        log::trace!("transposition table cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn mv() -> Move {
        Move::quiet(Square::from_index(12), Square::from_index(28))
    }

    #[test]
    fn stored_entry_is_probed_back_unchanged() {
        let tt = TranspositionTable::new(1).unwrap();
        let key = 0x1234_5678_9ABC_DEF0;
        tt.store(key, Some(mv()), -731, 42, 9, Bound::Lower);
        let entry = tt.probe(key).unwrap();
        assert_eq!(entry.best_move, Some(mv()));
        assert_eq!(entry.score, -731);
        assert_eq!(entry.static_eval, 42);
        assert_eq!(entry.depth, 9);
        assert_eq!(entry.bound, Bound::Lower);
    }

    #[test]
    fn other_keys_miss() {
        let tt = TranspositionTable::new(1).unwrap();
        tt.store(0x1111, None, 10, 0, 1, Bound::Exact);
        assert!(tt.probe(0x2222).is_none());
    }

    #[test]
    fn zero_payload_entry_is_not_mistaken_for_empty() {
        let tt = TranspositionTable::new(1).unwrap();
        tt.store(77, None, 0, 0, 0, Bound::Upper);
        assert!(tt.probe(77).is_some());
    }

    #[test]
    fn shallower_result_does_not_replace_deeper_in_same_search() {
        let tt = TranspositionTable::new(1).unwrap();
        tt.store(5, Some(mv()), 100, 0, 10, Bound::Exact);
        tt.store(5, None, -50, 0, 3, Bound::Upper);
        assert_eq!(tt.probe(5).unwrap().depth, 10);

        tt.new_search();
        tt.store(5, None, -50, 0, 3, Bound::Upper);
        let entry = tt.probe(5).unwrap();
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.best_move, Some(mv()), "old move kept when none given");
    }

    #[test]
    fn full_bucket_evicts_oldest_then_shallowest() {
        let tt = TranspositionTable::new(1).unwrap();
        let stride = (tt.mask as u64) + 1;
        for i in 0..4u64 {
            tt.store(1 + i * stride, None, 0, 0, 10 + i as i32, Bound::Exact);
        }
        // Same generation, shallower than every slot: dropped.
        tt.store(1 + 4 * stride, None, 0, 0, 2, Bound::Exact);
        assert!(tt.probe(1 + 4 * stride).is_none());
        // Deep enough to beat the shallowest slot.
        tt.store(1 + 5 * stride, None, 0, 0, 10, Bound::Exact);
        assert!(tt.probe(1 + 5 * stride).is_some());
        assert!(tt.probe(1).is_none());

        tt.new_search();
        tt.store(1 + 6 * stride, None, 0, 0, 0, Bound::Exact);
        assert!(tt.probe(1 + 6 * stride).is_some());
    }

    #[test]
    fn clear_and_hashfull() {
        let tt = TranspositionTable::new(1).unwrap();
        assert_eq!(tt.hashfull_per_mille(), 0);
        for key in 0..4000u64 {
            tt.store(key, None, 1, 1, 1, Bound::Exact);
        }
        assert!(tt.hashfull_per_mille() > 0);
        tt.clear();
        assert_eq!(tt.hashfull_per_mille(), 0);
        assert!(tt.probe(3).is_none());
    }

    #[test]
    fn capacity_is_power_of_two_buckets() {
        let tt = TranspositionTable::new(3).unwrap();
        assert!((tt.capacity() / BUCKET_SIZE).is_power_of_two());
        assert!(tt.capacity() * mem::size_of::<Slot>() <= 3 * 1024 * 1024);
    }
}
