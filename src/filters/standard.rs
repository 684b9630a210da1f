//! Standard Bloom filter over an atomic bit store.
//!
//! A Bloom filter answers "have I seen this item?" with no false negatives
//! and a tunable false positive rate, using a fraction of the memory an exact
//! set would need. It suits a fast existence check in front of an expensive
//! exact store such as a disk index, remote cache, or database.
//!
//! # Algorithm
//!
//! 1. Size the filter: `m` bits and `k` hashes from `(n_expected, p_target)`
//! 2. Insert: hash the item twice, derive `k` indices by double hashing, set those bits
//! 3. Query: derive the same indices, report present only if every bit is set
//!
//! # Thread Safety
//!
//! `insert` and `contains` take `&self`. Bits are set with atomic `fetch_or`,
//! so `Arc<BloomFilter>` can be shared across threads with no `Mutex`:
//!
//! - `contains` takes no lock at all.
//! - `insert` holds a shared gate that many inserters hold at once.
//! - `serialize` holds the gate exclusively for the duration of the copy, so
//!   the bits and insert count it writes form a consistent snapshot.
//! - `union` and the intersection estimates read both operands word by word
//!   and never block.
//! - `clear` and `union_inplace` take `&mut self`.
//!
//! # Examples
//!
//! ```
//! use bloomgate::filters::BloomFilter;
//!
//! let filter = BloomFilter::new(50, 0.01).unwrap();
//! filter.insert("google");
//! filter.insert("openai");
//!
//! assert!(filter.contains("google"));
//! assert!(filter.contains("openai"));
//! // almost always false; never false for inserted items
//! let _maybe = filter.contains("microsoft");
//! ```
//!
//! ## Persistence
//!
//! ```
//! use bloomgate::filters::BloomFilter;
//!
//! let filter: BloomFilter = BloomFilter::with_seed(1000, 0.01, 42).unwrap();
//! filter.insert(b"key-1");
//!
//! let bytes = filter.serialize();
//! let restored: BloomFilter = BloomFilter::deserialize(&bytes).unwrap();
//! assert_eq!(restored, filter);
//! assert!(restored.contains(b"key-1"));
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

use crate::core::bitstore::{BitStore, WORD_BITS};
use crate::core::filter::MembershipFilter;
use crate::core::params::FilterParameters;
use crate::error::{FilterError, Result};
use crate::format::{self, FormatHeader, FORMAT_VERSION};
use crate::hash::{BloomHasher, DefaultHasher, IndexDeriver, DEFAULT_SEED};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Space-efficient probabilistic set with no false negatives.
///
/// Generic over the base hasher `H`, which defaults to XXH3.
#[derive(Debug)]
pub struct BloomFilter<H: BloomHasher = DefaultHasher> {
    bits: BitStore,
    params: FilterParameters,
    deriver: IndexDeriver<H>,
    inserted: AtomicU64,
    /// Shared by inserters, exclusive while serializing.
    gate: RwLock<()>,
}

impl BloomFilter<DefaultHasher> {
    /// Filter for `expected_items` items at false positive rate `fp_rate`,
    /// with the default seed.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `expected_items == 0` or
    /// `fp_rate` is outside `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomgate::filters::BloomFilter;
    ///
    /// let filter = BloomFilter::new(10_000, 0.01).unwrap();
    /// assert_eq!(filter.hash_count(), 7);
    /// assert!(BloomFilter::new(10_000, 1.5).is_err());
    /// ```
    pub fn new(expected_items: u64, fp_rate: f64) -> Result<Self> {
        Self::with_seed(expected_items, fp_rate, DEFAULT_SEED)
    }

    /// Filter with explicit `m` bits and `k` hash functions, default seed.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `m == 0` or `k` is outside
    /// `[1, 64]`.
    pub fn explicit(m: u64, k: u32) -> Result<Self> {
        Self::explicit_with_seed(m, k, DEFAULT_SEED)
    }
}

impl<H: BloomHasher> BloomFilter<H> {
    /// Filter sized for `(expected_items, fp_rate)` using hash seed `seed`.
    ///
    /// Filters only merge when their seeds match.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] on bad sizing inputs.
    pub fn with_seed(expected_items: u64, fp_rate: f64, seed: u64) -> Result<Self> {
        let params = FilterParameters::from_capacity(expected_items, fp_rate)?;
        Self::from_parameters(params, seed)
    }

    /// Filter with explicit `(m, k)` and seed.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `m == 0` or `k` is out of range.
    pub fn explicit_with_seed(m: u64, k: u32, seed: u64) -> Result<Self> {
        let params = FilterParameters::explicit(m, k)?;
        Self::from_parameters(params, seed)
    }

    /// Filter from a parameter record.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `params` fails
    /// [`FilterParameters::validate`] or storage cannot be sized.
    pub fn from_parameters(params: FilterParameters, seed: u64) -> Result<Self> {
        params.validate()?;
        let bits = BitStore::new(params.len())?;

        #[cfg(feature = "trace")]
        tracing::debug!(
            m = params.bit_count(),
            k = params.hash_count(),
            seed,
            "created bloom filter"
        );

        Ok(Self::from_parts(bits, params, seed, 0))
    }

    fn from_parts(bits: BitStore, params: FilterParameters, seed: u64, inserted: u64) -> Self {
        Self {
            deriver: IndexDeriver::new(H::with_seed(seed), params.bit_count(), params.hash_count()),
            bits,
            params,
            inserted: AtomicU64::new(inserted),
            gate: RwLock::new(()),
        }
    }

    /// Add `item`. Always succeeds.
    ///
    /// After this returns, `contains(item)` is `true` on every thread.
    #[inline]
    pub fn insert(&self, item: impl AsRef<[u8]>) {
        let _shared = self.gate.read();
        for index in self.deriver.indices(item.as_ref()) {
            self.bits.set(index);
        }
        self.inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether `item` may have been inserted.
    ///
    /// `false` is exact: the item was never inserted. `true` may be a false
    /// positive, at roughly the design-time rate while the load stays at or
    /// below `expected_items`.
    #[must_use]
    #[inline]
    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        self.deriver
            .indices(item.as_ref())
            .all(|index| self.bits.get(index))
    }

    /// Insert a structured value canonicalized with bincode's fixed-width
    /// little-endian encoding.
    ///
    /// # Errors
    ///
    /// [`FilterError::EncodingError`] if the value cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomgate::filters::BloomFilter;
    ///
    /// let filter = BloomFilter::new(100, 0.01).unwrap();
    /// filter.insert_value(&(42u32, "user")).unwrap();
    /// assert!(filter.contains_value(&(42u32, "user")).unwrap());
    /// ```
    #[cfg(feature = "serde")]
    pub fn insert_value<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)?;
        self.insert(bytes);
        Ok(())
    }

    /// `contains` for a value encoded like [`insert_value`](Self::insert_value).
    ///
    /// # Errors
    ///
    /// [`FilterError::EncodingError`] if the value cannot be encoded.
    #[cfg(feature = "serde")]
    pub fn contains_value<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<bool> {
        let bytes = bincode::serialize(value)?;
        Ok(self.contains(bytes))
    }

    /// Live false positive estimate, `(popcount / m)^k`.
    ///
    /// Unlike [`FilterParameters::target_fp_rate`] this reflects the actual
    /// fill, and keeps rising as the load exceeds the design capacity.
    #[must_use]
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.params.hash_count() as i32)
    }

    /// Fraction of bits set, in `[0, 1]`.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        self.bits.popcount() as f64 / self.params.bit_count() as f64
    }

    /// Number of set bits.
    #[must_use]
    pub fn popcount(&self) -> usize {
        self.bits.popcount()
    }

    /// Inserts performed since construction or the last `clear`.
    ///
    /// Counts calls, not distinct items.
    #[must_use]
    pub fn inserted_count(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    /// `inserted_count / expected_items`, or `None` when the expected count
    /// is unknown (explicit or restored filters).
    #[must_use]
    pub fn load_factor(&self) -> Option<f64> {
        match self.params.expected_items() {
            0 => None,
            n => Some(self.inserted_count() as f64 / n as f64),
        }
    }

    /// Distinct items estimated from the fill: `-(m/k) × ln(1 - X/m)`.
    ///
    /// Returns `f64::INFINITY` once every bit is set.
    #[must_use]
    pub fn estimated_cardinality(&self) -> f64 {
        cardinality(self.bits.popcount(), self.params.bit_count(), self.params.hash_count())
    }

    /// Whether `other` has the same `m`, `k`, and seed.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.params.bit_count() == other.params.bit_count()
            && self.params.hash_count() == other.params.hash_count()
            && self.seed() == other.seed()
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        let result = if self.params.bit_count() != other.params.bit_count() {
            Err(FilterError::incompatible_filter(format!(
                "bit count mismatch: {} vs {}",
                self.params.bit_count(),
                other.params.bit_count()
            )))
        } else if self.params.hash_count() != other.params.hash_count() {
            Err(FilterError::incompatible_filter(format!(
                "hash count mismatch: {} vs {}",
                self.params.hash_count(),
                other.params.hash_count()
            )))
        } else if self.seed() != other.seed() {
            Err(FilterError::incompatible_filter(format!(
                "seed mismatch: {:#x} vs {:#x}",
                self.seed(),
                other.seed()
            )))
        } else {
            Ok(())
        };

        #[cfg(feature = "trace")]
        {
            if let Err(err) = &result {
                tracing::debug!(%err, "rejected filter combination");
            }
        }

        result
    }

    /// New filter whose bits are the OR of `self` and `other`.
    ///
    /// The result reports present for anything either input reports present.
    /// It keeps `self`'s design parameters; its insert count is the sum of
    /// both counts.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if `m`, `k`, or seed differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomgate::filters::BloomFilter;
    ///
    /// let a = BloomFilter::new(1000, 0.01).unwrap();
    /// let b = BloomFilter::new(1000, 0.01).unwrap();
    /// a.insert("left");
    /// b.insert("right");
    ///
    /// let both = a.union(&b).unwrap();
    /// assert!(both.contains("left") && both.contains("right"));
    ///
    /// let other = BloomFilter::new(2000, 0.01).unwrap();
    /// assert!(a.union(&other).is_err());
    /// ```
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let bits = self.bits.union(&other.bits)?;
        let inserted = self.inserted_count().saturating_add(other.inserted_count());

        #[cfg(feature = "trace")]
        tracing::debug!(m = self.params.bit_count(), inserted, "merged bloom filters");

        Ok(Self::from_parts(bits, self.params, self.seed(), inserted))
    }

    /// OR `other` into `self`.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if `m`, `k`, or seed differ.
    pub fn union_inplace(&mut self, other: &Self) -> Result<()> {
        self.check_compatible(other)?;
        self.bits.union_inplace(&other.bits)?;
        let inserted = self.inserted.get_mut();
        *inserted = inserted.saturating_add(other.inserted_count());
        Ok(())
    }

    /// Probability that a random non-member reads as present in both filters,
    /// `(popcount(A AND B) / m)^k`.
    ///
    /// This is an approximation. Bloom filters cannot compute an exact
    /// intersection, and the AND of two filters over-approximates the filter
    /// of the intersected sets.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if `m`, `k`, or seed differ.
    pub fn intersection_estimate(&self, other: &Self) -> Result<f64> {
        self.check_compatible(other)?;
        let shared = self.bits.and_popcount(&other.bits)?;
        let ratio = shared as f64 / self.params.bit_count() as f64;
        Ok(ratio.powi(self.params.hash_count() as i32))
    }

    /// Estimated number of items present in both filters,
    /// `|A| + |B| - |A ∪ B|` from the cardinality estimator, clamped at 0.
    ///
    /// Approximate; returns `f64::INFINITY` if the union is saturated.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if `m`, `k`, or seed differ.
    pub fn estimated_intersection_cardinality(&self, other: &Self) -> Result<f64> {
        self.check_compatible(other)?;
        let (m, k) = (self.params.bit_count(), self.params.hash_count());

        let shared = self.bits.and_popcount(&other.bits)?;
        let union = cardinality(self.bits.popcount() + other.bits.popcount() - shared, m, k);
        if union.is_infinite() {
            return Ok(f64::INFINITY);
        }

        let estimate = self.estimated_cardinality() + other.estimated_cardinality() - union;
        Ok(estimate.max(0.0))
    }

    /// Encode as the versioned binary format.
    ///
    /// Holds the gate exclusively while copying, so concurrent inserts wait
    /// and the output is a consistent snapshot.
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
        let bytes = format::encode(&header, &self.bits.to_words());

        #[cfg(feature = "trace")]
        tracing::debug!(len = bytes.len(), m = header.bit_count, "serialized bloom filter");

        bytes
    }

    /// Decode a filter written by [`serialize`](Self::serialize).
    ///
    /// The restored filter has the same `m`, `k`, seed, insert count, and
    /// bits. Its design-time `expected_items`/`target_fp_rate` are unknown.
    /// It must be read back with the hasher type it was written with.
    ///
    /// # Errors
    ///
    /// [`FilterError::CorruptData`] on truncation, trailing bytes, an
    /// unknown version, out-of-range `m`/`k`, or bits set past `m`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let decoded = format::decode(bytes, WORD_BITS)
            .map_err(FilterError::from)
            .and_then(|(header, words)| {
                let bits = BitStore::from_words(words, header.bit_count as usize)?;
                let params = FilterParameters::explicit(header.bit_count, header.hash_count)
                    .map_err(|err| FilterError::corrupt_data(err.to_string()))?;
                Ok(Self::from_parts(bits, params, header.seed, header.inserted_count))
            });

        #[cfg(feature = "trace")]
        {
            match &decoded {
                Ok(filter) => tracing::debug!(m = filter.params.bit_count(), "deserialized bloom filter"),
                Err(err) => tracing::debug!(%err, len = bytes.len(), "rejected bloom filter payload"),
            }
        }

        decoded
    }

    /// Zero every bit and the insert count.
    pub fn clear(&mut self) {
        self.bits.clear();
        *self.inserted.get_mut() = 0;
    }

    /// Sizing record.
    #[must_use]
    pub fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    /// Number of bits, `m`.
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

    /// Base hasher.
    #[must_use]
    pub fn hasher(&self) -> &H {
        self.deriver.hasher()
    }

    /// `true` when nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted_count() == 0
    }

    /// Approximate heap plus inline size in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.bits.memory_usage() + std::mem::size_of::<Self>() - std::mem::size_of::<BitStore>()
    }
}

fn cardinality(set_bits: usize, m: u64, k: u32) -> f64 {
    if set_bits == 0 {
        return 0.0;
    }
    let m = m as f64;
    let x = set_bits as f64;
    if x >= m {
        return f64::INFINITY;
    }
    -(m / f64::from(k)) * (1.0 - x / m).ln()
}

impl Default for BloomFilter<DefaultHasher> {
    /// Sized for 100 items at 1% false positives.
    fn default() -> Self {
        let params = FilterParameters::default();
        Self::from_parts(BitStore::zeroed(params.len()), params, DEFAULT_SEED, 0)
    }
}

impl<H: BloomHasher> Clone for BloomFilter<H> {
    fn clone(&self) -> Self {
        Self::from_parts(self.bits.clone(), self.params, self.seed(), self.inserted_count())
    }
}

/// Equal when `m`, `k`, seed, and every bit match.
impl<H: BloomHasher> PartialEq for BloomFilter<H> {
    fn eq(&self, other: &Self) -> bool {
        self.is_compatible(other) && self.bits == other.bits
    }
}

impl<H: BloomHasher> MembershipFilter for BloomFilter<H> {
    fn insert(&self, item: &[u8]) {
        BloomFilter::insert(self, item);
    }

    fn contains(&self, item: &[u8]) -> bool {
        BloomFilter::contains(self, item)
    }

    fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    fn seed(&self) -> u64 {
        BloomFilter::seed(self)
    }

    fn inserted_count(&self) -> u64 {
        BloomFilter::inserted_count(self)
    }

    fn estimated_false_positive_rate(&self) -> f64 {
        BloomFilter::estimated_false_positive_rate(self)
    }
}
