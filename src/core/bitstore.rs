//! Lock-free bit store backed by atomic 64-bit words.
//!
//! `BitStore` is a fixed-size bit array stored in `Box<[AtomicU64]>`, packed
//! `ceil(m / 64)` words for `m` bits. It is the storage layer of
//! [`BloomFilter`](crate::filters::BloomFilter).
//!
//! # Thread Safety
//!
//! - `set`: lock-free with `&self` (atomic `fetch_or`, `Ordering::Release`)
//! - `get`: lock-free with `&self` (`Ordering::Acquire`)
//! - `clear`: requires exclusive access (`&mut self`)
//!
//! Two threads setting different bits of the same word never lose an update,
//! since `fetch_or` is a single read-modify-write. Release/Acquire pairing
//! means a reader that observes a bit also observes every write that happened
//! before it was set, so concurrent insert/query never yields a false negative
//! for a completed insert.
//!
//! # Memory Layout
//!
//! ```text
//! Word 0: [bit 0][bit 1]...[bit 63]
//! Word 1: [bit 64][bit 65]...[bit 127]
//! ```
//!
//! Bits past `len` in the last word are always zero.
//!
//! # Examples
//!
//! ```
//! use bloomgate::core::bitstore::BitStore;
//!
//! let bits = BitStore::new(100).unwrap();
//! bits.set(42);
//! assert!(bits.get(42));
//! assert!(!bits.get(43));
//! assert_eq!(bits.popcount(), 1);
//! ```

use crate::error::{FilterError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bits per storage word.
pub const WORD_BITS: usize = 64;

/// Number of 64-bit words needed to hold `bits` bits.
#[inline]
#[must_use]
pub const fn words_for(bits: usize) -> usize {
    (bits + WORD_BITS - 1) / WORD_BITS
}

/// Fixed-size array of `m` bits with atomic set/get.
#[derive(Debug)]
pub struct BitStore {
    words: Box<[AtomicU64]>,
    len: usize,
}

impl BitStore {
    /// Create a store of `num_bits` zeroed bits.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `num_bits` is 0.
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(FilterError::invalid_parameter(
                "BitStore size must be greater than 0",
            ));
        }

        Ok(Self::zeroed(num_bits))
    }

    /// Zeroed store for a length already known to be non-zero.
    pub(crate) fn zeroed(num_bits: usize) -> Self {
        debug_assert!(num_bits > 0, "BitStore size must be greater than 0");
        let words = (0..words_for(num_bits))
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            words,
            len: num_bits,
        }
    }

    /// Rebuild a store from raw little-endian-decoded words.
    ///
    /// # Errors
    ///
    /// [`FilterError::CorruptData`] if the word count does not match
    /// `ceil(len / 64)` exactly, or if any bit at or beyond `len` is set.
    pub fn from_words(raw: Vec<u64>, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(FilterError::corrupt_data("bit count must be greater than 0"));
        }

        let expected = words_for(len);
        if raw.len() != expected {
            return Err(FilterError::corrupt_data(format!(
                "expected {} words for {} bits, got {}",
                expected,
                len,
                raw.len()
            )));
        }

        let tail_bits = len % WORD_BITS;
        if tail_bits != 0 {
            let tail_mask = !0u64 << tail_bits;
            if raw[expected - 1] & tail_mask != 0 {
                return Err(FilterError::corrupt_data(
                    "bits set beyond the declared bit count",
                ));
            }
        }

        let words = raw
            .into_iter()
            .map(AtomicU64::new)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self { words, len })
    }

    /// Number of bits, `m`.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a constructed store; kept for API symmetry with `len`.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of backing words.
    #[must_use]
    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Set bit `index`. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&self, index: usize) {
        assert!(
            index < self.len,
            "BitStore index out of bounds: index={} len={}",
            index,
            self.len
        );

        let mask = 1u64 << (index % WORD_BITS);
        self.words[index / WORD_BITS].fetch_or(mask, Ordering::Release);
    }

    /// Read bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(
            index < self.len,
            "BitStore index out of bounds: index={} len={}",
            index,
            self.len
        );

        let mask = 1u64 << (index % WORD_BITS);
        (self.words[index / WORD_BITS].load(Ordering::Acquire) & mask) != 0
    }

    /// Reset every bit to 0.
    pub fn clear(&mut self) {
        for word in self.words.iter_mut() {
            *word.get_mut() = 0;
        }
    }

    /// Number of set bits.
    #[must_use]
    pub fn popcount(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    /// Number of bits set in both `self` and `other`.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if the lengths differ.
    pub fn and_popcount(&self, other: &Self) -> Result<usize> {
        self.check_same_len(other)?;
        Ok(self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a.load(Ordering::Acquire) & b.load(Ordering::Acquire)).count_ones() as usize)
            .sum())
    }

    /// New store holding the bitwise OR of `self` and `other`.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if the lengths differ.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other)?;
        let words = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| AtomicU64::new(a.load(Ordering::Acquire) | b.load(Ordering::Acquire)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            words,
            len: self.len,
        })
    }

    /// OR `other` into `self` word by word.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if the lengths differ.
    pub fn union_inplace(&self, other: &Self) -> Result<()> {
        self.check_same_len(other)?;
        for (a, b) in self.words.iter().zip(other.words.iter()) {
            a.fetch_or(b.load(Ordering::Acquire), Ordering::Release);
        }
        Ok(())
    }

    /// Snapshot of the backing words.
    #[must_use]
    pub fn to_words(&self) -> Vec<u64> {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire))
            .collect()
    }

    /// Heap plus inline size in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.words.len() * std::mem::size_of::<AtomicU64>() + std::mem::size_of::<Self>()
    }

    fn check_same_len(&self, other: &Self) -> Result<()> {
        if self.len != other.len {
            return Err(FilterError::incompatible_filter(format!(
                "bit count mismatch: {} vs {}",
                self.len, other.len
            )));
        }
        Ok(())
    }
}

impl Clone for BitStore {
    fn clone(&self) -> Self {
        let words = self
            .words
            .iter()
            .map(|word| AtomicU64::new(word.load(Ordering::Acquire)))
            .collect();

        Self {
            words,
            len: self.len,
        }
    }
}

impl PartialEq for BitStore {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .words
                .iter()
                .zip(other.words.iter())
                .all(|(a, b)| a.load(Ordering::Acquire) == b.load(Ordering::Acquire))
    }
}

impl Eq for BitStore {}
