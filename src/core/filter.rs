//! The trait shared by both filter kinds.
//!
//! [`MembershipFilter`] lets callers write code that works with either
//! [`BloomFilter`](crate::filters::BloomFilter) or
//! [`CountingBloomFilter`](crate::filters::CountingBloomFilter). Items are
//! byte slices, canonicalized by the caller.
//!
//! # Concurrency Contract
//!
//! Both methods take `&self`. Implementations update storage through atomic
//! read-modify-write, so an `Arc<F>` can be shared across threads without a
//! `Mutex`, and an insert that has returned is visible to every later
//! `contains` on any thread.
//!
//! ```
//! use bloomgate::core::MembershipFilter;
//! use bloomgate::filters::{BloomFilter, CountingBloomFilter};
//!
//! fn seed_with<F: MembershipFilter>(filter: &F, words: &[&str]) {
//!     filter.insert_batch(words.iter().map(|w| w.as_bytes()));
//! }
//!
//! let plain = BloomFilter::new(100, 0.01).unwrap();
//! let counting = CountingBloomFilter::new(100, 0.01).unwrap();
//! seed_with(&plain, &["a", "b"]);
//! seed_with(&counting, &["a", "b"]);
//! assert!(plain.contains_all([b"a".as_slice(), b"b"]));
//! assert!(MembershipFilter::contains(&counting, b"a"));
//! ```

use super::params::FilterParameters;

/// Probabilistic set membership over byte-slice items.
///
/// # Guarantees
///
/// * If `insert(x)` returned, `contains(x)` returns `true` (for the counting
///   variant, until `x` is removed).
/// * `contains(x) == false` means `x` was never inserted.
/// * `contains(x) == true` may be a false positive.
pub trait MembershipFilter: Send + Sync {
    /// Add `item`.
    fn insert(&self, item: &[u8]);

    /// Whether `item` may have been inserted.
    #[must_use]
    fn contains(&self, item: &[u8]) -> bool;

    /// Sizing record fixed at construction.
    fn parameters(&self) -> &FilterParameters;

    /// Hash seed.
    fn seed(&self) -> u64;

    /// Running insert count. Diagnostic only.
    fn inserted_count(&self) -> u64;

    /// Live false positive estimate from the current fill.
    fn estimated_false_positive_rate(&self) -> f64;

    /// Number of bits or counters, `m`.
    #[must_use]
    fn bit_count(&self) -> u64 {
        self.parameters().bit_count()
    }

    /// Number of hash functions, `k`.
    #[must_use]
    fn hash_count(&self) -> u32 {
        self.parameters().hash_count()
    }

    /// `true` when nothing has been inserted since construction or `clear`.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.inserted_count() == 0
    }

    /// Insert every item of `items`.
    fn insert_batch<I, B>(&self, items: I)
    where
        Self: Sized,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        for item in items {
            self.insert(item.as_ref());
        }
    }

    /// `contains` for each item, in order.
    #[must_use]
    fn contains_batch<I, B>(&self, items: I) -> Vec<bool>
    where
        Self: Sized,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        items
            .into_iter()
            .map(|item| self.contains(item.as_ref()))
            .collect()
    }

    /// `true` if every item may be present. Short-circuits.
    #[must_use]
    fn contains_all<I, B>(&self, items: I) -> bool
    where
        Self: Sized,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        items.into_iter().all(|item| self.contains(item.as_ref()))
    }

    /// `true` if any item may be present. Short-circuits.
    #[must_use]
    fn contains_any<I, B>(&self, items: I) -> bool
    where
        Self: Sized,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        items.into_iter().any(|item| self.contains(item.as_ref()))
    }
}
