//! The hasher seam and a dependency-free FNV-1a implementation.
//!
//! Hashers work on `&[u8]`. Callers canonicalize their items to bytes first,
//! so the same item hashes identically across processes and platforms.
//! A hasher only produces the two base values; turning them into `k` indices
//! is the job of [`IndexDeriver`](super::deriver::IndexDeriver).
//!
//! Every hasher is constructed from a `u64` seed. Filters persist that seed,
//! so a restored filter rebuilds the exact same hasher.
//!
//! ```
//! use bloomgate::hash::{BloomHasher, FnvHasher};
//!
//! let hasher = FnvHasher::with_seed(7);
//! let (h1, h2) = hasher.hash_bytes_pair(b"hello");
//! assert_ne!(h1, h2);
//! assert_eq!((h1, h2), FnvHasher::with_seed(7).hash_bytes_pair(b"hello"));
//! ```

#![allow(clippy::module_name_repetitions)]

/// Seed used when the caller does not choose one.
pub const DEFAULT_SEED: u64 = 0x517c_c1b7_2722_0a95;

/// Offset mixed into the seed of the second base hash.
pub(crate) const PAIR_SEED_OFFSET: u64 = 0x9e37_79b9_7f4a_7c15;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic, seeded producer of base hash values.
///
/// Implementations must return the same output for the same `(seed, bytes)`
/// on every run and platform.
pub trait BloomHasher: Send + Sync + Clone + std::fmt::Debug {
    /// Build a hasher for `seed`.
    fn with_seed(seed: u64) -> Self;

    /// The seed this hasher was built with.
    fn seed(&self) -> u64;

    /// Hash `bytes` with an extra seed combined into this hasher's own.
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64;

    /// Hash `bytes` with this hasher's seed.
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        self.hash_bytes_with_seed(bytes, 0)
    }

    /// Two independent 64-bit hashes, `(h1, h2)`, for double hashing.
    #[inline]
    fn hash_bytes_pair(&self, bytes: &[u8]) -> (u64, u64) {
        (
            self.hash_bytes(bytes),
            self.hash_bytes_with_seed(bytes, PAIR_SEED_OFFSET),
        )
    }

    /// Name for diagnostics.
    fn name(&self) -> &'static str;
}

/// FNV-1a over the little-endian seed followed by the item bytes.
///
/// Has no dependencies and is stable forever, but mixes worse than
/// [`XxHasher`](super::XxHasher), which filters use by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FnvHasher {
    seed: u64,
}

impl FnvHasher {
    /// Hasher with [`DEFAULT_SEED`].
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    #[inline]
    fn fnv1a(state: u64, bytes: &[u8]) -> u64 {
        bytes.iter().fold(state, |acc, &byte| {
            (acc ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomHasher for FnvHasher {
    fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    #[inline]
    fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        let state = Self::fnv1a(FNV_OFFSET_BASIS, &(self.seed ^ seed).to_le_bytes());
        Self::fnv1a(state, bytes)
    }

    fn name(&self) -> &'static str {
        "FnvHasher"
    }
}
