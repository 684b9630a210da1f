//! Counting Bloom filter with deletion support.
//!
//! Each bit of the standard filter becomes a 4-bit saturating counter
//! (Fan et al., 2000):
//! - Insert: increment the item's `k` counters
//! - Remove: decrement them
//! - Query: present only if all `k` counters are non-zero
//!
//! # Trade-offs
//!
//! | Aspect          | Standard Bloom     | Counting Bloom              |
//! |-----------------|--------------------|-----------------------------|
//! | Space           | 1 bit per slot     | 4 bits per slot             |
//! | Delete          | Not supported      | O(k)                        |
//! | False negatives | Never              | Only after caller misuse    |
//!
//! # Removal Contract
//!
//! Removing an item that was never inserted can zero counters other items
//! rely on and turn them into false negatives. `remove` guards what it can:
//! it does nothing for items that are not currently present, and it refuses
//! with [`FilterError::InvariantViolation`] when a counter is too low to
//! account for the item. The caller still owns its insert/remove balance.
//!
//! Saturated counters (value 15) are sticky; their true count is unknown,
//! so removal never lowers them.
//!
//! # Examples
//!
//! ```
//! use bloomgate::filters::CountingBloomFilter;
//!
//! let filter = CountingBloomFilter::new(10_000, 0.01).unwrap();
//! filter.insert("hello");
//! filter.insert("world");
//!
//! assert!(filter.remove("hello").unwrap());
//! assert!(!filter.contains("hello"));
//! assert!(filter.contains("world"));
//! ```
//!
//! # References
//!
//! - Fan, L., Cao, P., Almeida, J., & Broder, A. Z. (2000). "Summary cache: a scalable
//!   wide-area web cache sharing protocol". IEEE/ACM Transactions on Networking.

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

use crate::core::counters::{CounterStore, COUNTERS_PER_WORD, COUNTER_MAX};
use crate::core::filter::MembershipFilter;
use crate::core::params::FilterParameters;
use crate::error::{FilterError, Result};
use crate::format::{self, FormatHeader, FORMAT_VERSION};
use crate::hash::{BloomHasher, DefaultHasher, IndexDeriver, DEFAULT_SEED};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bloom filter over saturating counters, supporting `remove`.
#[derive(Debug)]
pub struct CountingBloomFilter<H: BloomHasher = DefaultHasher> {
    counters: CounterStore,
    params: FilterParameters,
    deriver: IndexDeriver<H>,
    inserted: AtomicU64,
    /// Shared by inserters, exclusive for removal and serialization.
    gate: RwLock<()>,
}

impl CountingBloomFilter<DefaultHasher> {
    /// Counting filter for `expected_items` at `fp_rate`, default seed.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] on bad sizing inputs.
    pub fn new(expected_items: u64, fp_rate: f64) -> Result<Self> {
        Self::with_seed(expected_items, fp_rate, DEFAULT_SEED)
    }

    /// Counting filter with `m` counters and `k` hashes, default seed.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `m == 0` or `k` is out of range.
    pub fn explicit(m: u64, k: u32) -> Result<Self> {
        Self::explicit_with_seed(m, k, DEFAULT_SEED)
    }
}

impl<H: BloomHasher> CountingBloomFilter<H> {
    /// Counting filter for `(expected_items, fp_rate)` with hash seed `seed`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] on bad sizing inputs.
    pub fn with_seed(expected_items: u64, fp_rate: f64, seed: u64) -> Result<Self> {
        let params = FilterParameters::from_capacity(expected_items, fp_rate)?;
        Self::from_parameters(params, seed)
    }

    /// Counting filter with explicit `(m, k)` and seed.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `m == 0` or `k` is out of range.
    pub fn explicit_with_seed(m: u64, k: u32, seed: u64) -> Result<Self> {
        let params = FilterParameters::explicit(m, k)?;
        Self::from_parameters(params, seed)
    }

    /// Counting filter from a parameter record.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `params` fails
    /// [`FilterParameters::validate`] or storage cannot be sized.
    pub fn from_parameters(params: FilterParameters, seed: u64) -> Result<Self> {
        params.validate()?;
        let counters = CounterStore::new(params.len())?;

        #[cfg(feature = "trace")]
        tracing::debug!(
            m = params.bit_count(),
            k = params.hash_count(),
            seed,
            "created counting bloom filter"
        );

        Ok(Self::from_parts(counters, params, seed, 0))
    }

    fn from_parts(counters: CounterStore, params: FilterParameters, seed: u64, inserted: u64) -> Self {
        Self {
            deriver: IndexDeriver::new(H::with_seed(seed), params.bit_count(), params.hash_count()),
            counters,
            params,
            inserted: AtomicU64::new(inserted),
            gate: RwLock::new(()),
        }
    }

    /// Add `item`, incrementing its `k` counters. Saturated counters stay at 15.
    pub fn insert(&self, item: impl AsRef<[u8]>) {
        let _shared = self.gate.read();
        for index in self.deriver.indices(item.as_ref()) {
            self.counters.increment(index);
        }
        self.inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// `true` iff all `k` counters of `item` are non-zero.
    #[must_use]
    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        self.deriver
            .indices(item.as_ref())
            .all(|index| self.counters.get(index) != 0)
    }

    /// Remove one occurrence of `item`.
    ///
    /// Returns `Ok(false)` and changes nothing if `item` is not currently
    /// present. Returns `Ok(true)` after decrementing its counters.
    ///
    /// Runs under the exclusive gate, so the presence check and the
    /// decrements are atomic with respect to other inserts and removals.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvariantViolation`] if some counter holds less than
    /// the number of times the item's indices hit it, meaning the item was
    /// never inserted or was already removed. No counter is changed.
    pub fn remove(&self, item: impl AsRef<[u8]>) -> Result<bool> {
        let _exclusive = self.gate.write();

        let mut indices: Vec<usize> = self.deriver.indices(item.as_ref()).collect();
        if indices.iter().any(|&index| self.counters.get(index) == 0) {
            return Ok(false);
        }

        // An index may repeat within one item; each repeat needs its own unit.
        indices.sort_unstable();
        for (index, needed) in index_runs(&indices) {
            let current = self.counters.get(index);
            if current != COUNTER_MAX && usize::from(current) < needed {
                #[cfg(feature = "trace")]
                tracing::warn!(index, current, needed, "counter underflow on remove");

                return Err(FilterError::invariant_violation(format!(
                    "counter {} holds {} but removal needs {}; item was not inserted",
                    index, current, needed
                )));
            }
        }

        for index in indices {
            self.counters.decrement(index);
        }

        let inserted = self.inserted.load(Ordering::Relaxed);
        self.inserted.store(inserted.saturating_sub(1), Ordering::Relaxed);
        Ok(true)
    }

    /// Upper bound on how many times `item` was inserted: the minimum of its
    /// counters. `0` means definitely absent.
    #[must_use]
    pub fn count_estimate(&self, item: impl AsRef<[u8]>) -> u8 {
        self.deriver
            .indices(item.as_ref())
            .map(|index| self.counters.get(index))
            .min()
            .unwrap_or(0)
    }

    /// Insert a bincode-canonicalized value.
    ///
    /// # Errors
    ///
    /// [`FilterError::EncodingError`] if the value cannot be encoded.
    #[cfg(feature = "serde")]
    pub fn insert_value<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)?;
        self.insert(bytes);
        Ok(())
    }

    /// `contains` for a bincode-canonicalized value.
    ///
    /// # Errors
    ///
    /// [`FilterError::EncodingError`] if the value cannot be encoded.
    #[cfg(feature = "serde")]
    pub fn contains_value<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<bool> {
        let bytes = bincode::serialize(value)?;
        Ok(self.contains(bytes))
    }

    /// `remove` for a bincode-canonicalized value.
    ///
    /// # Errors
    ///
    /// [`FilterError::EncodingError`] or the errors of [`remove`](Self::remove).
    #[cfg(feature = "serde")]
    pub fn remove_value<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<bool> {
        let bytes = bincode::serialize(value)?;
        self.remove(bytes)
    }

    /// Live false positive estimate, `(non-zero counters / m)^k`.
    #[must_use]
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.params.hash_count() as i32)
    }

    /// Fraction of counters that are non-zero.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        self.counters.nonzero_count() as f64 / self.params.bit_count() as f64
    }

    /// Number of non-zero counters.
    #[must_use]
    pub fn nonzero_counters(&self) -> usize {
        self.counters.nonzero_count()
    }

    /// Number of counters stuck at 15.
    #[must_use]
    pub fn saturated_counters(&self) -> usize {
        self.counters.saturated_count()
    }

    /// Inserts minus successful removals.
    #[must_use]
    pub fn inserted_count(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self.params.bit_count() == other.params.bit_count()
            && self.params.hash_count() == other.params.hash_count()
            && self.seed() == other.seed()
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if !self.is_compatible(other) {
            #[cfg(feature = "trace")]
            tracing::debug!("rejected counting filter combination");

            return Err(FilterError::incompatible_filter(format!(
                "(m, k, seed) mismatch: ({}, {}, {:#x}) vs ({}, {}, {:#x})",
                self.params.bit_count(),
                self.params.hash_count(),
                self.seed(),
                other.params.bit_count(),
                other.params.hash_count(),
                other.seed()
            )));
        }
        Ok(())
    }

    /// New filter whose counters are the saturating sum of both inputs.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if `m`, `k`, or seed differ.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let counters = self.counters.union(&other.counters)?;
        let inserted = self.inserted_count().saturating_add(other.inserted_count());

        #[cfg(feature = "trace")]
        tracing::debug!(m = self.params.bit_count(), inserted, "merged counting bloom filters");

        Ok(Self::from_parts(counters, self.params, self.seed(), inserted))
    }

    /// Encode in the shared binary format, 16 counters per word.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let _exclusive = self.gate.write();

        let header = FormatHeader {
            version: FORMAT_VERSION,
            bit_count: self.params.bit_count(),
            hash_count: self.params.hash_count(),
            seed: self.seed(),
            inserted_count: self.inserted_count(),
        };

        #[cfg(feature = "trace")]
        tracing::debug!(m = header.bit_count, "serialized counting bloom filter");

        format::encode(&header, &self.counters.to_words())
    }

    /// Decode a filter written by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// [`FilterError::CorruptData`] on any malformed input, including a
    /// payload sized for a standard filter.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let decoded = format::decode(bytes, COUNTERS_PER_WORD)
            .map_err(FilterError::from)
            .and_then(|(header, words)| {
                let counters = CounterStore::from_words(words, header.bit_count as usize)?;
                let params = FilterParameters::explicit(header.bit_count, header.hash_count)
                    .map_err(|err| FilterError::corrupt_data(err.to_string()))?;
                Ok(Self::from_parts(counters, params, header.seed, header.inserted_count))
            });

        #[cfg(feature = "trace")]
        {
            match &decoded {
                Ok(filter) => {
                    tracing::debug!(m = filter.params.bit_count(), "deserialized counting bloom filter")
                }
                Err(err) => {
                    tracing::debug!(%err, len = bytes.len(), "rejected counting filter payload")
                }
            }
        }

        decoded
    }

    /// Zero every counter and the insert count.
    pub fn clear(&mut self) {
        self.counters.clear();
        *self.inserted.get_mut() = 0;
    }

    /// Sizing record.
    #[must_use]
    pub fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    /// Number of counters, `m`.
    #[must_use]
    pub fn bit_count(&self) -> u64 {
        self.params.bit_count()
    }

    /// Number of hash functions, `k`.
    #[must_use]
    pub fn hash_count(&self) -> u32 {
        self.params.hash_count()
    }

    /// Hash seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.deriver.seed()
    }

    /// `true` when nothing is currently inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted_count() == 0
    }

    /// Approximate heap plus inline size in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.counters.memory_usage() + std::mem::size_of::<Self>()
            - std::mem::size_of::<CounterStore>()
    }
}

/// Runs of equal values in a sorted slice, as `(value, run length)`.
fn index_runs(sorted: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::with_capacity(sorted.len());
    for &index in sorted {
        match runs.last_mut() {
            Some((last, count)) if *last == index => *count += 1,
            _ => runs.push((index, 1)),
        }
    }
    runs
}

impl Default for CountingBloomFilter<DefaultHasher> {
    /// Sized for 100 items at 1% false positives.
    fn default() -> Self {
        let params = FilterParameters::default();
        Self::from_parts(CounterStore::zeroed(params.len()), params, DEFAULT_SEED, 0)
    }
}

impl<H: BloomHasher> Clone for CountingBloomFilter<H> {
    fn clone(&self) -> Self {
        Self::from_parts(self.counters.clone(), self.params, self.seed(), self.inserted_count())
    }
}

/// Equal when `m`, `k`, seed, and every counter match.
impl<H: BloomHasher> PartialEq for CountingBloomFilter<H> {
    fn eq(&self, other: &Self) -> bool {
        self.is_compatible(other) && self.counters == other.counters
    }
}

impl<H: BloomHasher> MembershipFilter for CountingBloomFilter<H> {
    fn insert(&self, item: &[u8]) {
        CountingBloomFilter::insert(self, item);
    }

    fn contains(&self, item: &[u8]) -> bool {
        CountingBloomFilter::contains(self, item)
    }

    fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    fn seed(&self) -> u64 {
        CountingBloomFilter::seed(self)
    }

    fn inserted_count(&self) -> u64 {
        CountingBloomFilter::inserted_count(self)
    }

    fn estimated_false_positive_rate(&self) -> f64 {
        CountingBloomFilter::estimated_false_positive_rate(self)
    }
}
