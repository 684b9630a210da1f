//! XXH3 hasher, the default for every filter in the crate.
//!
//! XXH3 passes SMHasher cleanly and is fast on short keys, which is the
//! common Bloom filter workload. Its output for a given `(bytes, seed)` is
//! specified by the algorithm, so persisted filters stay valid across
//! versions and platforms.
//!
//! The two base hashes are XXH3-64 with the filter seed and XXH3-64 with
//! the filter seed offset by a fixed odd constant.
//!
//! This module wraps the `xxhash-rust` crate.
//!
//! ```
//! use bloomgate::hash::{BloomHasher, XxHasher};
//!
//! let h1 = XxHasher::with_seed(0).hash_bytes(b"test");
//! let h2 = XxHasher::with_seed(1).hash_bytes(b"test");
//! assert_ne!(h1, h2);
//! ```
//!
//! # References
//!
//! - XXHash Project: https://github.com/Cyan4973/xxHash

#![allow(clippy::module_name_repetitions)]

use super::hasher::{BloomHasher, DEFAULT_SEED, PAIR_SEED_OFFSET};
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Seeded XXH3-64 hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XxHasher {
    seed: u64,
}

impl XxHasher {
    /// Hasher with [`DEFAULT_SEED`].
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl Default for XxHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomHasher for XxHasher {
    fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    #[inline]
    fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        xxh3_64_with_seed(bytes, self.seed.wrapping_add(seed))
    }

    #[inline]
    fn hash_bytes_pair(&self, bytes: &[u8]) -> (u64, u64) {
        let h1 = xxh3_64_with_seed(bytes, self.seed);
        let h2 = xxh3_64_with_seed(bytes, self.seed.wrapping_add(PAIR_SEED_OFFSET));
        (h1, h2)
    }

    fn name(&self) -> &'static str {
        "XxHasher"
    }
}
