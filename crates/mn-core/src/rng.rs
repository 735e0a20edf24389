//! Seed-derived, non-overlapping random substreams.
//!
//! # Determinism strategy
//!
//! Every randomized generator asks a [`StreamAllocator`] for a block of
//! stream indices before it draws anything.  Stream `s` of a run with seed
//! `seed` is a `SmallRng` seeded by:
//!
//!   seed_s = seed XOR ((s + 1) * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream indices uniformly across the seed space.
//! This means:
//!
//! - Generators never share RNG state; a generator that draws more (or fewer)
//!   values cannot shift another generator's sequence.
//! - A generator's streams depend only on the allocation order, so mobility
//!   is allocated before traffic and traffic changes cannot perturb it.
//!
//! The allocator is an owned value threaded through setup, not a global.
//! Allocation is sequential; blocks never overlap.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── StreamAllocator ───────────────────────────────────────────────────────────

/// Hands out disjoint ranges of stream indices for one run.
#[derive(Debug, Clone)]
pub struct StreamAllocator {
    seed: u64,
    next: u64,
}

impl StreamAllocator {
    pub fn new(seed: u64) -> Self {
        Self { seed, next: 0 }
    }

    /// Reserve `n` consecutive streams.  The returned block's `base` is the
    /// counter value before the call.
    pub fn allocate(&mut self, n: u64) -> StreamBlock {
        let base = self.next;
        self.next = self.next.saturating_add(n);
        StreamBlock { seed: self.seed, base, len: n }
    }

    /// Index the next allocation will start at.
    #[inline]
    pub fn next_offset(&self) -> u64 {
        self.next
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

// ── StreamBlock ───────────────────────────────────────────────────────────────

/// A contiguous range `[base, base + len)` of stream indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamBlock {
    seed: u64,
    pub base: u64,
    pub len:  u64,
}

impl StreamBlock {
    /// Open stream `i` of this block.
    ///
    /// # Panics
    /// Panics if `i >= len`; drawing outside the reserved block would alias
    /// another generator's streams.
    pub fn stream(&self, i: u64) -> StreamRng {
        assert!(i < self.len, "stream {i} outside block of {} streams", self.len);
        StreamRng::new(self.seed, self.base + i)
    }

    #[inline]
    pub fn overlaps(&self, other: &StreamBlock) -> bool {
        self.base < other.base + other.len && other.base < self.base + self.len
    }
}

// ── StreamRng ─────────────────────────────────────────────────────────────────

/// One deterministic substream.
pub struct StreamRng(SmallRng);

impl StreamRng {
    pub fn new(seed: u64, stream: u64) -> Self {
        let mixed = seed ^ stream.wrapping_add(1).wrapping_mul(MIXING_CONSTANT);
        StreamRng(SmallRng::seed_from_u64(mixed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform draw in `[lo, hi)`.  Returns `lo` when the range is empty.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { self.0.gen_range(lo..hi) } else { lo }
    }

    /// Uniform draw in `(0, max]`.  Never returns zero for `max > 0`.
    #[inline]
    pub fn uniform_positive(&mut self, max: f64) -> f64 {
        max - self.uniform(0.0, max)
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }
}
