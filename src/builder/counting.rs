//! Builder for counting Bloom filters.
//!
//! Same shape as [`BloomFilterBuilder`](super::BloomFilterBuilder); `m`
//! counts 4-bit counters instead of bits.
//!
//! # Examples
//!
//! ```
//! use bloomgate::builder::CountingBloomFilterBuilder;
//!
//! let filter = CountingBloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .build()
//!     .unwrap();
//!
//! filter.insert("session-17");
//! assert!(filter.remove("session-17").unwrap());
//! ```

use super::{Complete, Initial, Sizing, WithItems};
use crate::error::Result;
use crate::filters::counting::CountingBloomFilter;
use crate::hash::{BloomHasher, DefaultHasher, DEFAULT_SEED};
use std::marker::PhantomData;

/// Builder for [`CountingBloomFilter`] with type-state guarantees.
#[derive(Debug)]
pub struct CountingBloomFilterBuilder<State, H = DefaultHasher> {
    sizing: Sizing,
    seed: u64,
    _state: PhantomData<State>,
    _hasher: PhantomData<H>,
}

impl CountingBloomFilterBuilder<Initial, DefaultHasher> {
    /// Create a new builder with the default hasher and seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sizing: Sizing::Pending,
            seed: DEFAULT_SEED,
            _state: PhantomData,
            _hasher: PhantomData,
        }
    }
}

impl<State, H> CountingBloomFilterBuilder<State, H> {
    fn transition<Next, H2>(self, sizing: Sizing) -> CountingBloomFilterBuilder<Next, H2> {
        CountingBloomFilterBuilder {
            sizing,
            seed: self.seed,
            _state: PhantomData,
            _hasher: PhantomData,
        }
    }

    /// Set the hash seed (optional, any state).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl<H> CountingBloomFilterBuilder<Initial, H> {
    /// Switch the hash function.
    #[must_use]
    pub fn hasher<H2: BloomHasher>(self) -> CountingBloomFilterBuilder<Initial, H2> {
        self.transition(Sizing::Pending)
    }

    /// Set the expected number of items.
    #[must_use]
    pub fn expected_items(self, items: u64) -> CountingBloomFilterBuilder<WithItems, H> {
        self.transition(Sizing::Items(items))
    }

    /// Use `m` counters with `k` hashes.
    #[must_use]
    pub fn explicit(self, m: u64, k: u32) -> CountingBloomFilterBuilder<Complete, H> {
        self.transition(Sizing::Explicit(m, k))
    }
}

impl<H> CountingBloomFilterBuilder<WithItems, H> {
    /// Set the target false positive rate.
    #[must_use]
    pub fn false_positive_rate(self, fp_rate: f64) -> CountingBloomFilterBuilder<Complete, H> {
        let sizing = self.sizing.with_fp_rate(fp_rate);
        self.transition(sizing)
    }
}

impl<H: BloomHasher> CountingBloomFilterBuilder<Complete, H> {
    /// Build the filter.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`](crate::FilterError::InvalidParameter)
    /// if the sizing inputs are out of range.
    pub fn build(self) -> Result<CountingBloomFilter<H>> {
        let params = self.sizing.resolve()?;
        CountingBloomFilter::from_parameters(params, self.seed)
    }
}

impl Default for CountingBloomFilterBuilder<Initial, DefaultHasher> {
    fn default() -> Self {
        Self::new()
    }
}
