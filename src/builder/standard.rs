//! Builder for standard Bloom filters.
//!
//! ```text
//! Initial → WithItems → Complete → BloomFilter
//!     ↓         ↓           ↓
//!   .expected_items()  .false_positive_rate()  .build()
//! ```
//!
//! # Examples
//!
//! ## Minimal Configuration
//!
//! ```
//! use bloomgate::builder::BloomFilterBuilder;
//!
//! let filter = BloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .build()
//!     .unwrap();
//! assert!(filter.is_empty());
//! ```
//!
//! ## Custom Hasher
//!
//! ```
//! use bloomgate::builder::BloomFilterBuilder;
//! use bloomgate::hash::FnvHasher;
//!
//! let filter = BloomFilterBuilder::new()
//!     .hasher::<FnvHasher>()
//!     .explicit(1024, 4)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.seed(), 7);
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use bloomgate::builder::BloomFilterBuilder;
//!
//! let result = BloomFilterBuilder::new()
//!     .expected_items(0)  // Invalid!
//!     .false_positive_rate(0.01)
//!     .build();
//!
//! assert!(result.is_err());
//! ```

use super::{Complete, Initial, Sizing, WithItems};
use crate::error::Result;
use crate::filters::standard::BloomFilter;
use crate::hash::{BloomHasher, DefaultHasher, DEFAULT_SEED};
use std::marker::PhantomData;

/// Builder for [`BloomFilter`] with type-state guarantees.
///
/// # Type Parameters
///
/// - `State`: current builder state (`Initial`, `WithItems`, `Complete`)
/// - `H`: hash function type (defaults to [`DefaultHasher`])
#[derive(Debug)]
pub struct BloomFilterBuilder<State, H = DefaultHasher> {
    sizing: Sizing,
    seed: u64,
    _state: PhantomData<State>,
    _hasher: PhantomData<H>,
}

impl BloomFilterBuilder<Initial, DefaultHasher> {
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

impl<State, H> BloomFilterBuilder<State, H> {
    fn transition<Next, H2>(self, sizing: Sizing) -> BloomFilterBuilder<Next, H2> {
        BloomFilterBuilder {
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

impl<H> BloomFilterBuilder<Initial, H> {
    /// Switch the hash function.
    #[must_use]
    pub fn hasher<H2: BloomHasher>(self) -> BloomFilterBuilder<Initial, H2> {
        self.transition(Sizing::Pending)
    }

    /// Set the expected number of items. Transitions to `WithItems`.
    #[must_use]
    pub fn expected_items(self, items: u64) -> BloomFilterBuilder<WithItems, H> {
        self.transition(Sizing::Items(items))
    }

    /// Skip the sizing calculator and use `m` bits with `k` hashes.
    /// Transitions to `Complete`.
    #[must_use]
    pub fn explicit(self, m: u64, k: u32) -> BloomFilterBuilder<Complete, H> {
        self.transition(Sizing::Explicit(m, k))
    }
}

impl<H> BloomFilterBuilder<WithItems, H> {
    /// Set the target false positive rate. Transitions to `Complete`.
    #[must_use]
    pub fn false_positive_rate(self, fp_rate: f64) -> BloomFilterBuilder<Complete, H> {
        let sizing = self.sizing.with_fp_rate(fp_rate);
        self.transition(sizing)
    }
}

impl<H: BloomHasher> BloomFilterBuilder<Complete, H> {
    /// Build the filter.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`](crate::FilterError::InvalidParameter)
    /// if the sizing inputs are out of range.
    pub fn build(self) -> Result<BloomFilter<H>> {
        let params = self.sizing.resolve()?;
        BloomFilter::from_parameters(params, self.seed)
    }
}

impl Default for BloomFilterBuilder<Initial, DefaultHasher> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::hash::FnvHasher;

    #[test]
    fn test_builder_minimal() {
        let filter = BloomFilterBuilder::new()
            .expected_items(1000)
            .false_positive_rate(0.01)
            .build()
            .unwrap();

        assert!(filter.is_empty());
        assert_eq!(filter.bit_count(), 9586);
        assert_eq!(filter.hash_count(), 7);
        assert_eq!(filter.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_builder_matches_constructor() {
        let built = BloomFilterBuilder::new()
            .expected_items(1000)
            .false_positive_rate(0.01)
            .build()
            .unwrap();
        let direct = BloomFilter::new(1000, 0.01).unwrap();

        built.insert("x");
        direct.insert("x");
        assert_eq!(built, direct);
    }

    #[test]
    fn test_seed_in_any_state() {
        let early = BloomFilterBuilder::new()
            .seed(9)
            .expected_items(100)
            .false_positive_rate(0.1)
            .build()
            .unwrap();
        let late = BloomFilterBuilder::new()
            .expected_items(100)
            .false_positive_rate(0.1)
            .seed(9)
            .build()
            .unwrap();
        assert_eq!(early.seed(), 9);
        assert_eq!(late.seed(), 9);
    }

    #[test]
    fn test_explicit() {
        let filter = BloomFilterBuilder::new().explicit(1024, 4).build().unwrap();
        assert_eq!(filter.bit_count(), 1024);
        assert_eq!(filter.hash_count(), 4);
        assert_eq!(filter.parameters().design_fp_rate(), None);
    }

    #[test]
    fn test_custom_hasher() {
        let filter: BloomFilter<FnvHasher> = BloomFilterBuilder::new()
            .hasher::<FnvHasher>()
            .expected_items(100)
            .false_positive_rate(0.01)
            .build()
            .unwrap();
        filter.insert("fnv");
        assert!(filter.contains("fnv"));
    }

    #[test]
    fn test_builder_invalid_items() {
        let result = BloomFilterBuilder::new()
            .expected_items(0)
            .false_positive_rate(0.01)
            .build();
        assert!(matches!(result, Err(FilterError::InvalidParameter { .. })));
    }

    #[test]
    fn test_builder_invalid_fp_rate() {
        for fp_rate in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let result = BloomFilterBuilder::new()
                .expected_items(10_000)
                .false_positive_rate(fp_rate)
                .build();
            assert!(result.is_err(), "fp_rate {} accepted", fp_rate);
        }
    }

    #[test]
    fn test_builder_invalid_explicit() {
        assert!(BloomFilterBuilder::new().explicit(0, 3).build().is_err());
        assert!(BloomFilterBuilder::new().explicit(64, 0).build().is_err());
        assert!(BloomFilterBuilder::new().explicit(64, 65).build().is_err());
    }
}
