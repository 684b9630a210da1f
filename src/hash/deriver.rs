//! Double hashing: `k` bit indices from two base hashes.
//!
//! For base hashes `h1`, `h2` and a filter of `m` bits:
//!
//! ```text
//! gᵢ(x) = (h₁(x) + i·h₂(x)) mod m,   i in [0, k)
//! ```
//!
//! Kirsch & Mitzenmacher show this matches the asymptotic false positive
//! rate of `k` independent hash functions while hashing the item only twice,
//! whatever `k` is.
//!
//! The sequence is computed exactly: `h1` and `h2` are reduced mod `m` once,
//! then each step adds the reduced stride and subtracts `m` once the running
//! sum reaches it.
//!
//! # Examples
//!
//! ```
//! use bloomgate::hash::deriver::double_hash_indices;
//!
//! let indices: Vec<usize> = double_hash_indices(3, 5, 4, 11).collect();
//! assert_eq!(indices, vec![3, 8, 2, 7]);
//! ```
//!
//! # References
//!
//! - Kirsch, A., & Mitzenmacher, M. (2006). "Less Hashing, Same Performance: Building a Better Bloom Filter"

#![allow(clippy::cast_possible_truncation)]

use super::hasher::BloomHasher;

/// Iterator over the `k` indices of one item.
#[derive(Debug, Clone)]
pub struct Indices {
    current: u64,
    step: u64,
    m: u64,
    remaining: u32,
}

impl Iterator for Indices {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let index = self.current;
        let (sum, overflowed) = self.current.overflowing_add(self.step);
        self.current = if overflowed || sum >= self.m {
            sum.wrapping_sub(self.m)
        } else {
            sum
        };
        Some(index as usize)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Indices {}

/// Indices `(h1 + i·h2) mod m` for `i` in `[0, k)`.
///
/// # Panics
///
/// Panics if `m == 0`.
#[inline]
#[must_use]
pub fn double_hash_indices(h1: u64, h2: u64, k: u32, m: u64) -> Indices {
    assert!(m > 0, "double hashing over an empty range");
    Indices {
        current: h1 % m,
        step: h2 % m,
        m,
        remaining: k,
    }
}

/// Binds a hasher to a filter's `(m, k)` and produces index sequences.
#[derive(Debug, Clone)]
pub struct IndexDeriver<H> {
    hasher: H,
    m: u64,
    k: u32,
}

impl<H: BloomHasher> IndexDeriver<H> {
    /// Deriver over `m` slots producing `k` indices per item.
    ///
    /// `m` must be non-zero; filters validate this before building one.
    #[must_use]
    pub fn new(hasher: H, m: u64, k: u32) -> Self {
        debug_assert!(m > 0, "IndexDeriver requires m > 0");
        Self { hasher, m, k }
    }

    /// The `k` indices for `item`. Deterministic for a fixed `(m, k, seed)`.
    #[inline]
    pub fn indices(&self, item: &[u8]) -> Indices {
        let (h1, h2) = self.hasher.hash_bytes_pair(item);
        double_hash_indices(h1, h2, self.k, self.m)
    }

    /// The underlying hasher.
    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Seed of the underlying hasher.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.hasher.seed()
    }
}
